//! File system seam for levelsync.
//!
//! Every side effect the reconciler performs on a content directory goes
//! through [`FileSystem`], so the decision logic can be driven against a
//! scratch directory or a fault-injecting wrapper in tests.
//!
//! The [`marker`] module owns the only on-disk convention levelsync
//! defines: the reversible `_OCT_Hidden` suffix for disabled copies.

mod error;
pub mod marker;
mod std_fs;

pub use error::{Error, Result};
pub use marker::{
    MARKER, disabled_name, is_disabled, is_disabled_archive, next_free_disabled_path,
    strip_marker,
};
pub use std_fs::StdFileSystem;

use std::path::{Path, PathBuf};

pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;

    fn dir_exists(&self, path: &Path) -> bool;

    /// Regular files directly inside `dir`, sorted by path.
    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>>;

    fn rename(&self, from: &Path, to: &Path) -> Result<()>;

    fn remove_file(&self, path: &Path) -> Result<()>;

    fn create_dir_all(&self, path: &Path) -> Result<()>;

    /// Create `path` empty, truncating any existing file.
    fn create_file(&self, path: &Path) -> Result<()>;

    /// Append `data` to an existing file, closing it again before returning.
    fn append(&self, path: &Path, data: &[u8]) -> Result<()>;

    /// Probe whether a file could be created at `path`.
    ///
    /// Never leaves a probe file behind and never removes a file that
    /// existed before the call.
    fn can_create(&self, path: &Path) -> bool;
}
