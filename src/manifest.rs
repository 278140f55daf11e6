use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Serialize the manifest using the current "files" list layout.
/// Decode with backward compatibility: [`Manifest::from_value`] also accepts
/// the legacy single-file layout `{"filename": ..., "size": ...}` (written
/// by pre-multi-file versions) and normalizes it to a one-element list.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Manifest {
    pub files: Vec<FileEntry>,
    pub count: u64,
}

/// One hidden file: the name it was embedded under and its exact byte count.
/// The order of entries in [`Manifest::files`] defines how the payload
/// region is split back apart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FileEntry {
    pub filename: String,
    pub size: u64,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ManifestError {
    #[error("file manifest absent or invalid")]
    MissingFileList,
    #[error("manifest entry {index} has a malformed filename or size")]
    InvalidEntry { index: usize },
    #[error("manifest entry {index} declares a negative size")]
    NegativeSize { index: usize },
}

impl Manifest {
    pub fn new(files: Vec<FileEntry>) -> Self {
        let count = files.len() as u64;
        Self { files, count }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Normalize decoded tail metadata into a manifest.
    ///
    /// The current "files" list wins when present and non-empty; otherwise
    /// the legacy single-file layout is attempted.  `count` is never
    /// consulted.  Entry fields of the wrong JSON type and negative sizes
    /// are rejected per entry so the caller can tell a corrupt record apart
    /// from a manifest that matches neither layout.
    pub fn from_value(value: &Value) -> Result<Self, ManifestError> {
        if let Some(entries) = value.get("files").and_then(Value::as_array) {
            if !entries.is_empty() {
                let files = entries
                    .iter()
                    .enumerate()
                    .map(|(index, entry)| entry_from_value(index, entry))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Self::new(files));
            }
        }

        let filename = value.get("filename").and_then(Value::as_str);
        match (filename, value.get("size")) {
            (Some(filename), Some(size)) => {
                let size = match size.as_u64() {
                    Some(size) => size,
                    None if size.as_i64().is_some() => {
                        return Err(ManifestError::NegativeSize { index: 0 })
                    }
                    None => return Err(ManifestError::MissingFileList),
                };
                Ok(Self::new(vec![FileEntry {
                    filename: filename.to_owned(),
                    size,
                }]))
            }
            _ => Err(ManifestError::MissingFileList),
        }
    }
}

fn entry_from_value(index: usize, entry: &Value) -> Result<FileEntry, ManifestError> {
    let filename = entry
        .get("filename")
        .and_then(Value::as_str)
        .ok_or(ManifestError::InvalidEntry { index })?;
    let size = entry
        .get("size")
        .ok_or(ManifestError::InvalidEntry { index })?;
    let size = match size.as_u64() {
        Some(size) => size,
        None if size.as_i64().is_some() => return Err(ManifestError::NegativeSize { index }),
        None => return Err(ManifestError::InvalidEntry { index }),
    };
    Ok(FileEntry {
        filename: filename.to_owned(),
        size,
    })
}
