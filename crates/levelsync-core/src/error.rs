use std::path::PathBuf;

use thiserror::Error;

/// Faults after which the local store can no longer be trusted for this
/// acquisition. Nothing falls back to a download once one is raised.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("cannot disable {}: {source}", path.display())]
    Disable {
        path:   PathBuf,
        #[source]
        source: levelsync_fs::Error,
    },

    #[error("{} was enabled but no matching level is registered", path.display())]
    Inconsistent { path: PathBuf },
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
