//! The acquisition state machine.
//!
//! ```text
//! CheckLocal -> { EnableExisting | Acquire } -> VerifyRegistered -> Notify
//! ```
//!
//! [`LevelGetter::get_level`] suspends only while waiting on the lookup
//! service and on download chunks. Every file operation between those
//! points is a short synchronous step.

use std::path::PathBuf;
use std::sync::Arc;

use levelsync_archive::{ArchiveInspector, ZipInspector};
use levelsync_fetch::status::DEFAULT_FLASH;
use levelsync_fetch::{Downloader, HttpClient, Lookup, StatusSink, TracingStatus, temp_path};
use levelsync_fs::{FileSystem, StdFileSystem};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, instrument};

use crate::error::ReconcileError;
use crate::key::ContentKey;
use crate::notify::{CompletionHandler, NoopCompletion, Role};
use crate::outcome::{Failure, Outcome, Via};
use crate::reconcile::{Enabled, Reconciler};
use crate::registry::{Registry, find_index};
use crate::scan::{LevelDirectories, LocalStore};

/// Where a download would land.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placement {
    pub path:    PathBuf,
    /// The requested version is already at `path`.
    pub present: bool,
}

pub struct LevelGetter<C> {
    registry:   Box<dyn Registry>,
    fs:         Arc<dyn FileSystem>,
    archive:    Arc<dyn ArchiveInspector>,
    dirs:       Arc<dyn LevelDirectories>,
    status:     Arc<dyn StatusSink>,
    role:       Arc<dyn Role>,
    completion: Arc<dyn CompletionHandler>,
    lookup:     Lookup,
    downloader: Downloader,
    client:     C,
}

impl<C: HttpClient> LevelGetter<C> {
    /// A non-authoritative getter on the real file system, reporting to
    /// `tracing`.
    pub fn new(
        registry: impl Registry + 'static,
        dirs: impl LevelDirectories + 'static,
        client: C,
    ) -> Self {
        Self {
            registry: Box::new(registry),
            fs: Arc::new(StdFileSystem),
            archive: Arc::new(ZipInspector),
            dirs: Arc::new(dirs),
            status: Arc::new(TracingStatus),
            role: Arc::new(false),
            completion: Arc::new(NoopCompletion),
            lookup: Lookup::default(),
            downloader: Downloader::default(),
            client,
        }
    }

    pub fn with_fs(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn with_archive(mut self, archive: Arc<dyn ArchiveInspector>) -> Self {
        self.archive = archive;
        self
    }

    pub fn with_status(mut self, status: Arc<dyn StatusSink>) -> Self {
        self.status = status;
        self
    }

    pub fn with_role(mut self, role: Arc<dyn Role>) -> Self {
        self.role = role;
        self
    }

    pub fn with_completion(mut self, completion: Arc<dyn CompletionHandler>) -> Self {
        self.completion = completion;
        self
    }

    pub fn with_lookup(mut self, lookup: Lookup) -> Self {
        self.lookup = lookup;
        self
    }

    pub fn with_downloader(mut self, downloader: Downloader) -> Self {
        self.downloader = downloader;
        self
    }

    pub fn registry(&self) -> &dyn Registry { &*self.registry }

    /// Make `key` available as an enabled, registered level.
    ///
    /// Callers must not run two acquisitions for the same key at once.
    #[instrument(skip(self), fields(key = %key))]
    pub async fn get_level(&mut self, key: &ContentKey) -> Outcome {
        self.status.debug(&format!("DoGetLevel {key}"));
        let outcome = self.acquire(key).await;
        match &outcome {
            Outcome::Ready { path, via, .. } => info!("{key} ready at {} ({via})", path.display()),
            Outcome::Failed(failure) => info!("{key} not acquired: {failure}"),
        }
        self.notify(key, &outcome);
        outcome
    }

    async fn acquire(&mut self, key: &ContentKey) -> Outcome {
        match self.reconciler().enable(key) {
            Ok(Enabled::Restored { path, index }) => {
                return Outcome::Ready {
                    path,
                    via: Via::Enabled,
                    index,
                };
            }
            Ok(Enabled::NotFound) => {}
            Ok(Enabled::RenameFailed) => debug!("falling back to download for {key}"),
            Err(e) => {
                error!("aborting acquisition of {key}: {e}");
                return Outcome::Failed(match e {
                    ReconcileError::Disable { .. } => Failure::Filesystem,
                    ReconcileError::Inconsistent { .. } => Failure::Inconsistent,
                });
            }
        }

        let Some(url) = self
            .lookup
            .resolve(&self.client, key.as_str(), key.search_label(), &*self.status)
            .await
        else {
            return Outcome::Failed(Failure::NotFoundRemotely);
        };

        let Some(base) = download_name(&url) else {
            self.status
                .error(&format!("DOWNLOAD FAILED: NO FILE NAME IN {url}"), DEFAULT_FLASH);
            return Outcome::Failed(Failure::NotFoundRemotely);
        };

        let placement = match self.local_download_path(base, key) {
            Ok(placement) => placement,
            Err(failure) => return Outcome::Failed(failure),
        };

        let via = if placement.present {
            debug!("{} already holds {key}", placement.path.display());
            Via::AlreadyPresent
        } else {
            if self.reconciler().disable_different_version(key).is_err() {
                return Outcome::Failed(Failure::Filesystem);
            }
            self.status.show(&format!("DOWNLOADING {base}"), true);
            if let Err(e) = self
                .downloader
                .fetch(&self.client, &*self.fs, &url, &placement.path, &*self.status)
                .await
            {
                debug!("download of {url} failed: {e}");
                return Outcome::Failed(if e.is_transport() {
                    Failure::Transport
                } else {
                    Failure::Filesystem
                });
            }
            Via::Downloaded
        };

        match self.reconciler().register_and_verify(&placement.path, key, via) {
            Some(index) => Outcome::Ready {
                path: placement.path,
                via,
                index,
            },
            None => Outcome::Failed(Failure::NotRegistered),
        }
    }

    /// Pick where `base` (the URL's file name) should be downloaded to.
    ///
    /// Directories are tried in order. A directory is skipped when it holds
    /// another version under the same name that is not the registered copy
    /// of this slot; the registered copy is disabled before downloading, so
    /// its path is free to reuse.
    pub fn local_download_path(&self, base: &str, key: &ContentKey) -> Result<Placement, Failure> {
        let store = self.store();
        let current = {
            let entries = self.registry.list();
            find_index(&entries, key).map(|i| entries[i].backing_path().to_path_buf())
        };

        let mut conflict = false;
        for dir in self.dirs.candidates() {
            if let Err(e) = self.fs.create_dir_all(&dir) {
                debug!("{e}");
            }
            let path = dir.join(base);
            if self.fs.exists(&path) {
                if store.contains(&path, key) {
                    return Ok(Placement {
                        path,
                        present: true,
                    });
                }
                if current.as_deref() != Some(path.as_path()) {
                    let current = current
                        .as_deref()
                        .map_or_else(|| "none".to_string(), |p| p.display().to_string());
                    self.status
                        .debug(&format!("Download: {base} already exists, current file: {current}"));
                    conflict = true;
                    continue;
                }
            }
            if self.fs.can_create(&temp_path(&path)) {
                return Ok(Placement {
                    path,
                    present: false,
                });
            }
        }

        if conflict {
            self.status
                .error(&format!("DOWNLOAD FAILED: {base} ALREADY EXISTS"), DEFAULT_FLASH);
            Err(Failure::LocalConflict)
        } else {
            self.status
                .error("DOWNLOAD FAILED: NO WRITABLE DIRECTORY", DEFAULT_FLASH);
            Err(Failure::NoWritableDirectory)
        }
    }

    fn notify(&self, key: &ContentKey, outcome: &Outcome) {
        if !self.role.is_authoritative() {
            return;
        }
        let index = match outcome {
            Outcome::Ready { .. } => find_index(&self.registry.list(), key),
            Outcome::Failed(_) => None,
        };
        match index {
            Some(index) => self.completion.server_download_completed(index),
            None => self.completion.download_failed(),
        }
    }

    fn store(&self) -> LocalStore<'_> {
        LocalStore::new(&*self.fs, &*self.archive, &*self.dirs, &*self.status)
    }

    fn reconciler(&mut self) -> Reconciler<'_> {
        let store = LocalStore::new(&*self.fs, &*self.archive, &*self.dirs, &*self.status);
        Reconciler::new(store, &mut *self.registry)
    }
}

/// The file name a download of `url` is stored under: everything after the
/// last `/`, ignoring any query string. `None` unless that is a plain name
/// that stays inside the level directory.
fn download_name(url: &str) -> Option<&str> {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let name = path.rsplit('/').next().unwrap_or(path);
    match name {
        "" | "." | ".." => None,
        _ if name.contains(['\\', ':']) => None,
        _ => Some(name),
    }
}

/// Run `getter.get_level(key)` on the tokio runtime. The getter comes back
/// with the outcome so the host can reuse it for the next key.
pub fn spawn_acquisition<C>(
    mut getter: LevelGetter<C>,
    key: ContentKey,
) -> JoinHandle<(LevelGetter<C>, Outcome)>
where
    C: HttpClient + 'static,
{
    tokio::spawn(async move {
        let outcome = getter.get_level(&key).await;
        (getter, outcome)
    })
}
