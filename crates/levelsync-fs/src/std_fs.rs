use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::{Error, FileSystem, Result};

#[derive(Clone, Copy, Debug, Default)]
pub struct StdFileSystem;

impl StdFileSystem {
    pub fn new() -> Self { Self }
}

impl FileSystem for StdFileSystem {
    fn exists(&self, path: &Path) -> bool { path.exists() }

    fn dir_exists(&self, path: &Path) -> bool { path.is_dir() }

    fn list_files(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let read_dir = |source| Error::ReadDir {
            path: dir.to_path_buf(),
            source,
        };

        let mut files = Vec::new();
        for entry in fs::read_dir(dir).map_err(read_dir)? {
            let entry = entry.map_err(read_dir)?;
            if entry.file_type().map_err(read_dir)?.is_file() {
                files.push(entry.path());
            }
        }
        files.sort();
        Ok(files)
    }

    fn rename(&self, from: &Path, to: &Path) -> Result<()> {
        fs::rename(from, to).map_err(|source| Error::Rename {
            from: from.to_path_buf(),
            to: to.to_path_buf(),
            source,
        })
    }

    fn remove_file(&self, path: &Path) -> Result<()> {
        fs::remove_file(path).map_err(|source| Error::Remove {
            path: path.to_path_buf(),
            source,
        })
    }

    fn create_dir_all(&self, path: &Path) -> Result<()> {
        fs::create_dir_all(path).map_err(|source| Error::CreateDir {
            path: path.to_path_buf(),
            source,
        })
    }

    fn create_file(&self, path: &Path) -> Result<()> {
        fs::File::create(path).map(drop).map_err(|source| Error::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    fn append(&self, path: &Path, data: &[u8]) -> Result<()> {
        let write = |source| Error::Write {
            path: path.to_path_buf(),
            source,
        };
        let mut file = fs::OpenOptions::new().append(true).open(path).map_err(write)?;
        file.write_all(data).map_err(write)
    }

    fn can_create(&self, path: &Path) -> bool {
        let existed = path.exists();
        let probe = fs::OpenOptions::new().append(true).create(true).open(path);
        match probe {
            Ok(file) => {
                drop(file);
                if !existed && let Err(e) = fs::remove_file(path) {
                    tracing::debug!("failed to remove probe {}: {}", path.display(), e);
                }
                true
            }
            Err(e) => {
                tracing::debug!("cannot create {}: {}", path.display(), e);
                false
            }
        }
    }
}
