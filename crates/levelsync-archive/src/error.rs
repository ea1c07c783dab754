use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to open archive {path}: {source}")]
    Open { path: PathBuf, source: io::Error },

    #[error("archive {path} is corrupted: {source}")]
    Corrupted {
        path:   PathBuf,
        source: zip::result::ZipError,
    },

    #[error("failed to read '{entry}' in {path}: {source}")]
    Read {
        path:   PathBuf,
        entry:  String,
        source: io::Error,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
