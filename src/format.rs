use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use std::io::{self, Write};

/// Signature that opens an appended tail.  ASCII, frozen for the lifetime
/// of the format; changing it orphans every combined file already written.
pub const MARKER: &[u8; 11] = b"STEG_GUI_V1";
/// Width of the metadata length field that follows the marker.
pub const META_LEN_SIZE: usize = 4;
/// Largest serialized manifest the u32 length field can describe.
pub const MAX_METADATA_LEN: u64 = u32::MAX as u64;

/// Write `MARKER ++ len(metadata) as u32 BE ++ metadata`.
///
/// The caller must have checked `metadata.len()` against
/// [`MAX_METADATA_LEN`]; the cast here truncates silently.
pub fn write_tail<W: Write>(mut writer: W, metadata: &[u8]) -> io::Result<()> {
    writer.write_all(MARKER)?;
    writer.write_u32::<BigEndian>(metadata.len() as u32)?;
    writer.write_all(metadata)?;
    Ok(())
}

/// Read the big-endian length field at the start of `bytes`.
/// `None` when fewer than [`META_LEN_SIZE`] bytes are available.
pub fn read_meta_len(bytes: &[u8]) -> Option<u32> {
    if bytes.len() < META_LEN_SIZE {
        return None;
    }
    Some(BigEndian::read_u32(&bytes[..META_LEN_SIZE]))
}
