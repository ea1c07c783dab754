//! Local store scanning.

use std::path::{Path, PathBuf};

use levelsync_archive::{ArchiveInspector, LEVEL_EXTENSION};
use levelsync_fetch::StatusSink;
use levelsync_fs::{FileSystem, is_disabled_archive};

use crate::key::ContentKey;

/// Ordered candidate directories, searched first to last for both scanning
/// and download placement.
pub trait LevelDirectories: Send + Sync {
    fn candidates(&self) -> Vec<PathBuf>;
}

impl LevelDirectories for Vec<PathBuf> {
    fn candidates(&self) -> Vec<PathBuf> { self.clone() }
}

/// Read-only view over the level directories.
#[derive(Clone, Copy)]
pub struct LocalStore<'a> {
    pub fs:      &'a dyn FileSystem,
    pub archive: &'a dyn ArchiveInspector,
    pub dirs:    &'a dyn LevelDirectories,
    pub status:  &'a dyn StatusSink,
}

impl<'a> LocalStore<'a> {
    pub fn new(
        fs: &'a dyn FileSystem,
        archive: &'a dyn ArchiveInspector,
        dirs: &'a dyn LevelDirectories,
        status: &'a dyn StatusSink,
    ) -> Self {
        Self {
            fs,
            archive,
            dirs,
            status,
        }
    }

    /// First disabled archive, in directory order, whose contents hold
    /// exactly `key`'s version.
    ///
    /// A directory that cannot be read is logged and skipped.
    pub fn find_disabled(&self, key: &ContentKey) -> Option<PathBuf> {
        self.disabled_archives()
            .into_iter()
            .find(|path| self.contains(path, key))
    }

    /// Every disabled archive across the directories.
    pub fn disabled_archives(&self) -> Vec<PathBuf> {
        let mut found = Vec::new();
        for dir in self.dirs.candidates() {
            if !self.fs.dir_exists(&dir) {
                continue;
            }
            match self.fs.list_files(&dir) {
                Ok(files) => found.extend(files.into_iter().filter(|f| is_disabled_archive(f))),
                Err(e) => self
                    .status
                    .debug(&format!("FindDisabledLevel: reading {}: {e}", dir.display())),
            }
        }
        found
    }

    /// Whether the archive at `path` holds `key`'s level at `key`'s version.
    pub fn contains(&self, path: &Path, key: &ContentKey) -> bool {
        self.archive
            .contains_level(path, &level_file(key), key.version())
    }
}

/// Name of the level file a key refers to inside an archive. Keys written
/// without an extension refer to the `.mp` file.
pub fn level_file(key: &ContentKey) -> String {
    let name = key.file_name_ext();
    match Path::new(name).extension() {
        Some(_) => name.to_string(),
        None => format!("{name}.{LEVEL_EXTENSION}"),
    }
}
