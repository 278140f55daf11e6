//! Decoder: recover hidden files from a combined file.
//!
//! Extraction is read-only on the combined file and writes each recovered
//! file into the output directory.  The overwrite decision for an existing
//! target is injected by the caller: an interactive host asks the user, a
//! headless caller passes a constant.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::locate::find_valid_record;
use crate::manifest::{Manifest, ManifestError};

#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("combined file not found: {}", .0.display())]
    CombinedMissing(PathBuf),
    #[error("output path exists but is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("no hidden data signature found")]
    NoHiddenData,
    #[error(transparent)]
    Manifest(#[from] ManifestError),
    #[error("hidden file {index} ({name:?}) extends past the end of the payload")]
    EntryOutOfRange { index: usize, name: String },
    #[error("refused to overwrite existing file: {}", .0.display())]
    AlreadyExists(PathBuf),
    #[error("{extra} unexpected byte(s) left after the last hidden file")]
    TrailingBytes { extra: u64 },
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Recover every hidden file from `combined` into `output_dir`, in manifest
/// order.
///
/// `allow_overwrite` is consulted once per already-existing target; a
/// `false` answer aborts the run with [`ExtractError::AlreadyExists`],
/// leaving files written earlier in the same run in place.  `output_dir` is
/// created if absent.
///
/// Returns the written paths in manifest order.
pub fn extract<F>(
    combined: &Path,
    output_dir: &Path,
    mut allow_overwrite: F,
) -> Result<Vec<PathBuf>, ExtractError>
where
    F: FnMut(&Path) -> bool,
{
    if !combined.is_file() {
        return Err(ExtractError::CombinedMissing(combined.to_owned()));
    }
    if !output_dir.exists() {
        fs::create_dir_all(output_dir)?;
    } else if !output_dir.is_dir() {
        return Err(ExtractError::NotADirectory(output_dir.to_owned()));
    }

    let data = fs::read(combined)?;
    let (metadata, payload) =
        find_valid_record(&data, data.len()).ok_or(ExtractError::NoHiddenData)?;
    let manifest = Manifest::from_value(&metadata)?;

    let mut written = Vec::with_capacity(manifest.files.len());
    let mut offset: usize = 0;
    for (index, entry) in manifest.files.iter().enumerate() {
        let remaining = (payload.len() - offset) as u64;
        if entry.size > remaining {
            return Err(ExtractError::EntryOutOfRange {
                index,
                name: entry.filename.clone(),
            });
        }
        let size = entry.size as usize;
        let chunk = &payload[offset..offset + size];
        offset += size;

        let target = output_dir.join(output_name(&entry.filename, index + 1));
        if target.exists() && !allow_overwrite(&target) {
            return Err(ExtractError::AlreadyExists(target));
        }
        fs::write(&target, chunk)?;
        written.push(target);
    }

    if offset != payload.len() {
        return Err(ExtractError::TrailingBytes {
            extra: (payload.len() - offset) as u64,
        });
    }
    Ok(written)
}

/// Base name of the stored filename, or the `hidden_file_<n>` placeholder
/// when stripping leaves nothing usable (empty, `.`, `..`).  Stored
/// directory components are used for nothing else; a manifest can never
/// write outside the output directory.
fn output_name(stored: &str, number: usize) -> String {
    match Path::new(stored).file_name() {
        Some(name) => name.to_string_lossy().into_owned(),
        None => format!("hidden_file_{number}"),
    }
}
