//! Encoder: append payload files to a carrier behind a manifest tail.
//!
//! ```no_run
//! use std::path::{Path, PathBuf};
//!
//! let combined = stegtail::embed(
//!     Path::new("photo.jpg"),
//!     &[PathBuf::from("notes.txt")],
//!     Path::new("out"),
//!     "photo_with_notes.jpg",
//! )?;
//! println!("wrote {}", combined.display());
//! # Ok::<(), stegtail::EmbedError>(())
//! ```

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::format::{write_tail, MAX_METADATA_LEN};
use crate::manifest::{FileEntry, Manifest};

#[derive(Error, Debug)]
pub enum EmbedError {
    #[error("no payload files were given")]
    NoPayloads,
    #[error("invalid output file name: {0:?}")]
    InvalidOutputName(String),
    #[error("carrier file not found: {}", .0.display())]
    CarrierMissing(PathBuf),
    #[error("payload file(s) not found: {}", join_paths(.0))]
    PayloadsMissing(Vec<PathBuf>),
    #[error("output path collides with an input file: {}", .0.display())]
    OutputCollidesWithInput(PathBuf),
    #[error("serialized manifest is {0} bytes, too large for the length field")]
    MetadataTooLarge(usize),
    #[error("output file missing after write: {}", .0.display())]
    WriteNotVerified(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Append `payloads` to `carrier` and write the combined file as
/// `output_dir/output_name`.
///
/// The combined file is the carrier's bytes followed by the marker, the
/// big-endian manifest length, the manifest JSON, and every payload's raw
/// bytes in input order.  `output_dir` is created if missing.  Each payload
/// is read exactly once; everything is buffered in memory for the single
/// write pass.
///
/// Returns the output path; its existence has been re-checked when this
/// returns `Ok`.
pub fn embed(
    carrier: &Path,
    payloads: &[PathBuf],
    output_dir: &Path,
    output_name: &str,
) -> Result<PathBuf, EmbedError> {
    if payloads.is_empty() {
        return Err(EmbedError::NoPayloads);
    }
    let name = sanitized_name(output_name)?;
    if !carrier.is_file() {
        return Err(EmbedError::CarrierMissing(carrier.to_owned()));
    }
    let missing: Vec<PathBuf> = payloads
        .iter()
        .filter(|path| !path.is_file())
        .cloned()
        .collect();
    if !missing.is_empty() {
        return Err(EmbedError::PayloadsMissing(missing));
    }

    let output = output_dir.join(name);
    check_output_collision(&output, carrier, payloads)?;
    fs::create_dir_all(output_dir)?;

    let carrier_bytes = fs::read(carrier)?;
    let mut chunks: Vec<Vec<u8>> = Vec::with_capacity(payloads.len());
    let mut files: Vec<FileEntry> = Vec::with_capacity(payloads.len());
    for payload in payloads {
        let chunk = fs::read(payload)?;
        files.push(FileEntry {
            filename: base_name(payload),
            size: chunk.len() as u64,
        });
        chunks.push(chunk);
    }

    let metadata = Manifest::new(files)
        .to_bytes()
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
    if metadata.len() as u64 > MAX_METADATA_LEN {
        return Err(EmbedError::MetadataTooLarge(metadata.len()));
    }

    let mut out = File::create(&output)?;
    out.write_all(&carrier_bytes)?;
    write_tail(&mut out, &metadata)?;
    for chunk in &chunks {
        out.write_all(chunk)?;
    }
    drop(out);

    if !output.is_file() {
        return Err(EmbedError::WriteNotVerified(output));
    }
    Ok(output)
}

/// The output name must be a single path component: non-empty after
/// trimming, not `.`/`..`, no separators.
fn sanitized_name(raw: &str) -> Result<&str, EmbedError> {
    let name = raw.trim();
    if name.is_empty() || name == "." || name == ".." {
        return Err(EmbedError::InvalidOutputName(raw.to_owned()));
    }
    if name.chars().any(std::path::is_separator) {
        return Err(EmbedError::InvalidOutputName(raw.to_owned()));
    }
    Ok(name)
}

/// Refuse to overwrite the carrier or a payload with the combined file.
/// A nonexistent output cannot alias an existing input, so the resolved
/// comparison only runs when the output path is already present.
fn check_output_collision(
    output: &Path,
    carrier: &Path,
    payloads: &[PathBuf],
) -> Result<(), EmbedError> {
    if !output.exists() {
        return Ok(());
    }
    let resolved = fs::canonicalize(output)?;
    if resolved == fs::canonicalize(carrier)? {
        return Err(EmbedError::OutputCollidesWithInput(carrier.to_owned()));
    }
    for payload in payloads {
        if resolved == fs::canonicalize(payload)? {
            return Err(EmbedError::OutputCollidesWithInput(payload.clone()));
        }
    }
    Ok(())
}

/// Name a payload is recorded under: its final path component.  Directory
/// components never reach the manifest.
fn base_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|path| path.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
