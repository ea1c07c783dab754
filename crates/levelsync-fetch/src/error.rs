//! Error types for levelsync-fetch.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// Connectivity problems, timeouts and broken body streams.
    #[error("network error: {0}")]
    Network(String),

    #[error("server responded with HTTP {status}")]
    Server { status: u16 },

    #[error("failed to build HTTP client: {0}")]
    Client(String),

    /// Writing or cleaning up the temp file failed.
    #[error(transparent)]
    Io(#[from] levelsync_fs::Error),

    /// The download finished but the temp file could not be moved into place.
    #[error("failed to move {temp} to {destination}: {source}")]
    Promote {
        temp:        PathBuf,
        destination: PathBuf,
        source:      levelsync_fs::Error,
    },
}

impl Error {
    /// Transport-level failures, as opposed to local file system ones.
    pub fn is_transport(&self) -> bool { matches!(self, Self::Network(_) | Self::Server { .. }) }
}

pub type Result<T> = std::result::Result<T, Error>;
