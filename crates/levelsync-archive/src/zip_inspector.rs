use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::debug;

use crate::{ArchiveInspector, Error, Result};

pub const LEVEL_EXTENSION: &str = "mp";

#[derive(Clone, Copy, Debug, Default)]
pub struct ZipInspector;

impl ZipInspector {
    pub fn new() -> Self { Self }

    fn open(path: &Path) -> Result<zip::ZipArchive<BufReader<File>>> {
        let file = File::open(path).map_err(|source| Error::Open {
            path: path.to_path_buf(),
            source,
        })?;
        zip::ZipArchive::new(BufReader::new(file)).map_err(|source| Error::Corrupted {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Hex digests of every entry named `level`.
    fn digests(path: &Path, level: &str) -> Result<Vec<String>> {
        let mut archive = Self::open(path)?;
        let mut digests = Vec::new();
        for index in 0..archive.len() {
            let mut entry = archive.by_index(index).map_err(|source| Error::Corrupted {
                path: path.to_path_buf(),
                source,
            })?;
            if entry.is_dir() {
                continue;
            }
            let Some(name) = entry_file_name(entry.enclosed_name()) else {
                continue;
            };
            if !name.eq_ignore_ascii_case(level) {
                continue;
            }
            let digest = level_digest(&mut entry).map_err(|source| Error::Read {
                path: path.to_path_buf(),
                entry: name.clone(),
                source,
            })?;
            digests.push(digest);
        }
        Ok(digests)
    }
}

impl ArchiveInspector for ZipInspector {
    fn contains_level(&self, archive: &Path, level: &str, version: Option<&str>) -> bool {
        match Self::digests(archive, level) {
            Ok(digests) => match version {
                None => !digests.is_empty(),
                Some(version) => {
                    let version = version.to_ascii_lowercase();
                    digests.iter().any(|d| d.starts_with(&version))
                }
            },
            Err(e) => {
                debug!("inspecting {}: {}", archive.display(), e);
                false
            }
        }
    }

    fn level_files(&self, archive: &Path) -> Result<Vec<String>> {
        let mut zip = Self::open(archive)?;
        let mut levels = Vec::new();
        for index in 0..zip.len() {
            let entry = zip.by_index(index).map_err(|source| Error::Corrupted {
                path: archive.to_path_buf(),
                source,
            })?;
            if entry.is_dir() {
                continue;
            }
            if let Some(name) = entry_file_name(entry.enclosed_name())
                && is_level_file(&name)
            {
                levels.push(name);
            }
        }
        Ok(levels)
    }
}

/// Lowercase hex SHA-256 of everything `reader` yields.
pub fn level_digest<R: Read>(reader: &mut R) -> io::Result<String> {
    let mut hasher = Sha256::new();
    io::copy(reader, &mut hasher)?;
    Ok(hex::encode(hasher.finalize()))
}

fn entry_file_name(path: Option<PathBuf>) -> Option<String> {
    path?.file_name()?.to_str().map(str::to_string)
}

fn is_level_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case(LEVEL_EXTENSION))
}
