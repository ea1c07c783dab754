use std::ffi::OsString;
use std::path::{Path, PathBuf};

use futures_util::StreamExt;
use levelsync_fs::FileSystem;
use tracing::debug;

use crate::error::{Error, Result};
use crate::http::{Body, HttpClient};
use crate::status::StatusSink;

pub const TEMP_SUFFIX: &str = ".tmp";

const DEFAULT_FLUSH_BYTES: usize = 64 * 1024;

/// `<destination>.tmp`, where a download is staged before promotion.
pub fn temp_path(destination: &Path) -> PathBuf {
    let mut name = OsString::from(destination.as_os_str());
    name.push(TEMP_SUFFIX);
    PathBuf::from(name)
}

/// Streams a URL into `<destination>.tmp` and renames it into place.
///
/// Chunks are buffered in memory and appended to the temp file in short
/// synchronous steps through the [`FileSystem`], so no file handle is held
/// open while waiting on the network.
#[derive(Debug, Clone)]
pub struct Downloader {
    flush_bytes: usize,
}

impl Default for Downloader {
    fn default() -> Self { Self::new() }
}

impl Downloader {
    pub fn new() -> Self {
        Self {
            flush_bytes: DEFAULT_FLUSH_BYTES,
        }
    }

    pub fn flush_bytes(mut self, flush_bytes: usize) -> Self {
        self.flush_bytes = flush_bytes.max(1);
        self
    }

    /// Download `url` to `destination`.
    ///
    /// On a transport or write failure the partial temp file is removed and
    /// `destination` is untouched. If only the final rename fails, the temp
    /// file is kept: its bytes are complete.
    pub async fn fetch<C: HttpClient>(
        &self,
        client: &C,
        fs: &dyn FileSystem,
        url: &str,
        destination: &Path,
        status: &dyn StatusSink,
    ) -> Result<PathBuf> {
        let label = destination
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| url.to_string());
        let temp = temp_path(destination);
        status.debug(&format!("Downloading {url} to {}", destination.display()));

        if let Err(e) = self.stream_to(client, fs, url, &temp, &label, status).await {
            if fs.exists(&temp) {
                match fs.remove_file(&temp) {
                    Ok(()) => debug!("removed partial download {}", temp.display()),
                    Err(rm) => status.debug(&rm.to_string()),
                }
            }
            let reason = match &e {
                Error::Network(_) => "NETWORK ERROR".to_string(),
                Error::Server { .. } => "SERVER ERROR".to_string(),
                Error::Io(source) => source.io().to_string(),
                other => other.to_string(),
            };
            status.debug(&e.to_string());
            status.show(&format!("DOWNLOADING {label} FAILED, {reason}"), true);
            return Err(e);
        }

        status.show(&format!("DOWNLOADING {label} ... INSTALLING"), true);
        if let Err(source) = fs.rename(&temp, destination) {
            status.debug(&source.to_string());
            status.show(&format!("DOWNLOADING {label} FAILED, {}", source.io()), true);
            return Err(Error::Promote {
                temp,
                destination: destination.to_path_buf(),
                source,
            });
        }
        Ok(destination.to_path_buf())
    }

    async fn stream_to<C: HttpClient>(
        &self,
        client: &C,
        fs: &dyn FileSystem,
        url: &str,
        temp: &Path,
        label: &str,
        status: &dyn StatusSink,
    ) -> Result<u64> {
        status.progress(label, 0.0);
        let Body { total, mut chunks } = client.stream(url).await?;

        fs.create_file(temp)?;

        let mut pending: Vec<u8> = Vec::with_capacity(self.flush_bytes);
        let mut received = 0u64;
        while let Some(chunk) = chunks.next().await {
            let chunk = chunk?;
            received += chunk.len() as u64;
            pending.extend_from_slice(&chunk);
            if pending.len() >= self.flush_bytes {
                flush(fs, temp, &mut pending)?;
            }
            status.progress(label, fraction(received, total));
        }
        flush(fs, temp, &mut pending)?;
        status.progress(label, 1.0);
        Ok(received)
    }
}

fn flush(fs: &dyn FileSystem, path: &Path, pending: &mut Vec<u8>) -> Result<()> {
    if pending.is_empty() {
        return Ok(());
    }
    fs.append(path, pending)?;
    pending.clear();
    Ok(())
}

fn fraction(received: u64, total: Option<u64>) -> f32 {
    match total {
        Some(0) | None => 0.0,
        Some(total) => (received as f64 / total as f64).min(1.0) as f32,
    }
}
