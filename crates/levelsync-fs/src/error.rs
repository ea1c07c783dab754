use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to read directory {path}: {source}")]
    ReadDir { path: PathBuf, source: io::Error },

    #[error("failed to rename {from} to {to}: {source}")]
    Rename {
        from:   PathBuf,
        to:     PathBuf,
        source: io::Error,
    },

    #[error("failed to remove {path}: {source}")]
    Remove { path: PathBuf, source: io::Error },

    #[error("failed to create directory {path}: {source}")]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
}

impl Error {
    /// The underlying OS error, without the path decoration.
    pub fn io(&self) -> &io::Error {
        match self {
            Self::ReadDir { source, .. }
            | Self::Rename { source, .. }
            | Self::Remove { source, .. }
            | Self::CreateDir { source, .. }
            | Self::Write { source, .. } => source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
