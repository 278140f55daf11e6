pub mod embed;
pub mod extract;
pub mod format;
pub mod locate;
pub mod manifest;

pub use embed::{embed, EmbedError};
pub use extract::{extract, ExtractError};
pub use locate::find_valid_record;
pub use manifest::{FileEntry, Manifest, ManifestError};
