//! Level acquisition and version reconciliation.
//!
//! Given a [`ContentKey`] naming one version of a level, [`LevelGetter`]
//! ends with exactly one enabled, registered copy of that version:
//!
//! 1. a disabled copy holding the version is renamed back into place, or
//! 2. the level is looked up remotely, downloaded to a temp file and
//!    promoted.
//!
//! Either way, the registered copy of any other version is disabled first
//! (renamed with the `_OCT_Hidden` marker, never deleted), and the registry
//! is checked afterwards.
//!
//! Collaborators are injected: [`Registry`], [`FileSystem`](levelsync_fs::FileSystem),
//! [`ArchiveInspector`](levelsync_archive::ArchiveInspector),
//! [`LevelDirectories`], [`HttpClient`](levelsync_fetch::HttpClient),
//! [`StatusSink`](status::StatusSink), [`Role`] and [`CompletionHandler`].

mod acquire;
mod error;
mod key;
mod notify;
mod outcome;
mod reconcile;
mod registry;
mod scan;

pub use levelsync_fetch::status;

pub use acquire::{LevelGetter, Placement, spawn_acquisition};
pub use error::{ReconcileError, Result};
pub use key::ContentKey;
pub use notify::{CompletionHandler, FnCompletion, NoopCompletion, Role};
pub use outcome::{Failure, Outcome, Via};
pub use reconcile::{Enabled, Reconciler};
pub use registry::{ContentEntry, DirRegistry, Registry, Storage, find_index};
pub use scan::{LevelDirectories, LocalStore, level_file};
