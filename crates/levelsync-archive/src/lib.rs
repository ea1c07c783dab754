//! Level archive inspection.
//!
//! Levels ship as zip archives holding one or more `*.mp` level files. A
//! content key names a level file and, optionally, a version discriminator:
//! a prefix of the lowercase hex SHA-256 of that level file's bytes.

mod error;
mod zip_inspector;

pub use error::{Error, Result};
pub use zip_inspector::{LEVEL_EXTENSION, ZipInspector, level_digest};

use std::path::Path;

pub trait ArchiveInspector: Send + Sync {
    /// Whether `archive` holds `level` (matched case-insensitively on the
    /// entry's file name) at `version`. `None` matches any version.
    ///
    /// Unreadable or corrupt archives answer `false`.
    fn contains_level(&self, archive: &Path, level: &str, version: Option<&str>) -> bool;

    /// File names of the level files inside `archive`, in archive order.
    fn level_files(&self, archive: &Path) -> Result<Vec<String>>;
}
