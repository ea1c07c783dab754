//! Version reconciliation: enabling disabled copies and retiring the
//! registered copy of another version.

use std::path::{Path, PathBuf};

use levelsync_fetch::status::DEFAULT_FLASH;
use levelsync_fs::{next_free_disabled_path, strip_marker};
use tracing::{debug, error};

use crate::error::{ReconcileError, Result};
use crate::key::ContentKey;
use crate::outcome::Via;
use crate::registry::{Registry, find_index};
use crate::scan::LocalStore;

/// Result of [`Reconciler::enable`] when nothing fatal happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Enabled {
    Restored { path: PathBuf, index: usize },
    /// No disabled copy holds this version.
    NotFound,
    /// A disabled copy exists but could not be moved back; download instead.
    RenameFailed,
}

pub struct Reconciler<'a> {
    store:    LocalStore<'a>,
    registry: &'a mut dyn Registry,
}

impl<'a> Reconciler<'a> {
    pub fn new(store: LocalStore<'a>, registry: &'a mut dyn Registry) -> Self {
        Self { store, registry }
    }

    /// Move a disabled copy of `key` back into place and register it.
    ///
    /// Whatever version currently occupies the slot is disabled first. A
    /// copy that renames fine but does not register is an
    /// [`Inconsistent`](ReconcileError::Inconsistent) store.
    pub fn enable(&mut self, key: &ContentKey) -> Result<Enabled> {
        let Some(disabled) = self.store.find_disabled(key) else {
            return Ok(Enabled::NotFound);
        };

        self.disable_different_version(key)?;

        let original = strip_marker(&disabled);
        let name = file_label(&original);
        if self.store.fs.exists(&original) {
            self.store
                .status
                .show(&format!("ENABLING {name} FAILED, FILE EXISTS"), false);
            return Ok(Enabled::RenameFailed);
        }
        if let Err(e) = self.store.fs.rename(&disabled, &original) {
            self.store.status.debug(&e.to_string());
            self.store
                .status
                .show(&format!("ENABLING {name} FAILED, {}", e.io()), false);
            return Ok(Enabled::RenameFailed);
        }

        match self.register_and_verify(&original, key, Via::Enabled) {
            Some(index) => Ok(Enabled::Restored {
                path: original,
                index,
            }),
            None => {
                error!("{} restored but not registered", original.display());
                Err(ReconcileError::Inconsistent { path: original })
            }
        }
    }

    /// Disable the registered level occupying `key`'s slot, if any, and
    /// drop it from the registry along with every other level stored in the
    /// same file. Returns the disabled path.
    ///
    /// A failed rename is returned as an error: the registry entry would
    /// otherwise point at a file about to be overwritten.
    pub fn disable_different_version(&mut self, key: &ContentKey) -> Result<Option<PathBuf>> {
        let entries = self.registry.list();
        let Some(index) = find_index(&entries, key) else {
            return Ok(None);
        };
        let current = entries[index].backing_path().to_path_buf();
        let name = file_label(&current);

        let disabled = next_free_disabled_path(self.store.fs, &current);
        if let Err(source) = self.store.fs.rename(&current, &disabled) {
            self.store.status.debug(&source.to_string());
            self.store
                .status
                .error(&format!("CANNOT DISABLE OTHER VERSION {name}"), DEFAULT_FLASH);
            return Err(ReconcileError::Disable {
                path: current,
                source,
            });
        }

        let stale: Vec<usize> = entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.backing_path() == current.as_path())
            .map(|(i, _)| i)
            .collect();
        for i in stale.into_iter().rev() {
            self.registry.remove(i);
        }
        self.store
            .status
            .show(&format!("OTHER VERSION {name} DISABLED"), false);
        debug!("disabled {} as {}", current.display(), disabled.display());
        Ok(Some(disabled))
    }

    /// Register `path` and confirm `key`'s slot is now filled. Shared by the
    /// enable and download branches; `via` picks the status wording.
    pub fn register_and_verify(&mut self, path: &Path, key: &ContentKey, via: Via) -> Option<usize> {
        self.registry.add(path);
        let index = find_index(&self.registry.list(), key);

        let name = file_label(path);
        let (verb, done, alert) = match via {
            Via::Enabled => ("ENABLING", "SUCCEEDED", false),
            Via::Downloaded | Via::AlreadyPresent => ("DOWNLOADING", "COMPLETED", true),
        };
        match index {
            Some(_) => self.store.status.show(&format!("{verb} {name} {done}"), alert),
            None => self
                .store
                .status
                .error(&format!("{verb} {name} FAILED, LEVEL NOT IN FILE"), DEFAULT_FLASH),
        }
        index
    }
}

pub(crate) fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
