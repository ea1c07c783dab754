//! Active level registry.
//!
//! The reconciler only ever talks to a [`Registry`] through `list`, `add`
//! and `remove`, and locates entries with [`find_index`].

use std::path::{Path, PathBuf};
use std::sync::Arc;

use levelsync_archive::{ArchiveInspector, LEVEL_EXTENSION};
use levelsync_fs::{FileSystem, is_disabled};
use tracing::{debug, warn};

use crate::key::{ContentKey, display_name};

/// Where the bytes of an entry live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Storage {
    /// Inside a zip archive.
    Zip(PathBuf),
    /// A loose level file.
    Loose(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentEntry {
    /// Stable across versions.
    pub file_name:    String,
    pub display_name: String,
    pub storage:      Storage,
}

impl ContentEntry {
    pub fn loose(path: PathBuf) -> Self {
        let file_name = stem(&path);
        Self {
            display_name: display_name(&file_name),
            file_name,
            storage: Storage::Loose(path),
        }
    }

    /// Entry for `level_file` (e.g. `arena1.mp`) stored in `archive`.
    pub fn zipped(archive: PathBuf, level_file: &str) -> Self {
        let file_name = stem(Path::new(level_file));
        Self {
            display_name: display_name(&file_name),
            file_name,
            storage: Storage::Zip(archive),
        }
    }

    pub fn backing_path(&self) -> &Path {
        match &self.storage {
            Storage::Zip(p) | Storage::Loose(p) => p,
        }
    }
}

fn stem(path: &Path) -> String {
    path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default()
}

pub trait Registry: Send + Sync {
    fn list(&self) -> Vec<ContentEntry>;

    /// Register the level(s) stored at `path`.
    fn add(&mut self, path: &Path);

    /// Drop the entry at `index`. Out-of-range indices are ignored.
    fn remove(&mut self, index: usize);
}

/// Index of the first entry occupying `key`'s slot, whatever its version.
pub fn find_index(entries: &[ContentEntry], key: &ContentKey) -> Option<usize> {
    entries.iter().position(|e| key.matches(e))
}

/// Registry built from the enabled files of the level directories.
pub struct DirRegistry {
    fs:      Arc<dyn FileSystem>,
    archive: Arc<dyn ArchiveInspector>,
    entries: Vec<ContentEntry>,
}

impl DirRegistry {
    pub fn new(fs: Arc<dyn FileSystem>, archive: Arc<dyn ArchiveInspector>) -> Self {
        Self {
            fs,
            archive,
            entries: Vec::new(),
        }
    }

    /// Load every enabled `*.zip` and `*.mp` under `dirs`, in order.
    pub fn load(
        dirs: &[PathBuf],
        fs: Arc<dyn FileSystem>,
        archive: Arc<dyn ArchiveInspector>,
    ) -> Self {
        let mut registry = Self::new(fs, archive);
        for dir in dirs {
            if !registry.fs.dir_exists(dir) {
                continue;
            }
            let files = match registry.fs.list_files(dir) {
                Ok(files) => files,
                Err(e) => {
                    warn!("skipping level directory: {e}");
                    continue;
                }
            };
            for file in files.iter().filter(|f| !is_disabled(f)) {
                if kind(file).is_some() {
                    registry.add(file);
                }
            }
        }
        debug!("loaded {} levels", registry.entries.len());
        registry
    }
}

enum Kind {
    Zip,
    Level,
}

fn kind(path: &Path) -> Option<Kind> {
    let ext = path.extension()?.to_str()?;
    if ext.eq_ignore_ascii_case("zip") {
        Some(Kind::Zip)
    } else if ext.eq_ignore_ascii_case(LEVEL_EXTENSION) {
        Some(Kind::Level)
    } else {
        None
    }
}

impl Registry for DirRegistry {
    fn list(&self) -> Vec<ContentEntry> { self.entries.clone() }

    /// Levels already registered from the same file are skipped one by one,
    /// so re-adding an archive only fills in the levels it is missing.
    fn add(&mut self, path: &Path) {
        if !self.fs.exists(path) {
            warn!("cannot register {}: no such file", path.display());
            return;
        }
        let found: Vec<ContentEntry> = match kind(path) {
            Some(Kind::Zip) => match self.archive.level_files(path) {
                Ok(levels) => levels
                    .iter()
                    .map(|l| ContentEntry::zipped(path.to_path_buf(), l))
                    .collect(),
                Err(e) => {
                    warn!("cannot register {}: {e}", path.display());
                    return;
                }
            },
            Some(Kind::Level) => vec![ContentEntry::loose(path.to_path_buf())],
            None => {
                warn!("cannot register {}: not a level file", path.display());
                return;
            }
        };
        if found.is_empty() {
            warn!("{} holds no levels", path.display());
        }
        for entry in found {
            if self.entries.contains(&entry) {
                debug!("{} from {} is already registered", entry.file_name, path.display());
            } else {
                self.entries.push(entry);
            }
        }
    }

    fn remove(&mut self, index: usize) {
        if index < self.entries.len() {
            self.entries.remove(index);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_index_first_match() {
        let entries = vec![
            ContentEntry::loose(PathBuf::from("/a/other.mp")),
            ContentEntry::zipped(PathBuf::from("/a/arena1.zip"), "arena1.mp"),
            ContentEntry::loose(PathBuf::from("/b/arena1.mp")),
        ];
        assert_eq!(find_index(&entries, &ContentKey::from("arena1.mp:abc")), Some(1));
        assert_eq!(find_index(&entries, &ContentKey::from("arena2.mp:abc")), None);
    }

    #[test]
    fn test_zipped_entry_names() {
        let e = ContentEntry::zipped(PathBuf::from("/a/pack.zip"), "big_arena.MP");
        assert_eq!(e.file_name, "big_arena");
        assert_eq!(e.display_name, "BIG ARENA");
        assert_eq!(e.backing_path(), Path::new("/a/pack.zip"));
    }
}
