use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// How a level ended up enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Via {
    /// A disabled copy was renamed back.
    Enabled,
    Downloaded,
    /// The right version already sat at the download path.
    AlreadyPresent,
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Enabled => "enabled",
            Self::Downloaded => "downloaded",
            Self::AlreadyPresent => "already present",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Failure {
    #[error("level not found remotely")]
    NotFoundRemotely,
    #[error("another version occupies every download path")]
    LocalConflict,
    #[error("no writable level directory")]
    NoWritableDirectory,
    #[error("download failed")]
    Transport,
    #[error("file system error")]
    Filesystem,
    #[error("level not registered after acquisition")]
    NotRegistered,
    #[error("level store is inconsistent")]
    Inconsistent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Ready { path: PathBuf, via: Via, index: usize },
    Failed(Failure),
}

impl Outcome {
    pub fn is_ready(&self) -> bool { matches!(self, Self::Ready { .. }) }
}
