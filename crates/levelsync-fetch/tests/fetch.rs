//! Download and lookup behaviour against an in-memory transport.

use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use bytes::Bytes;
use levelsync_fetch::{
    Body, Downloader, Error, HttpClient, Lookup, Result, StatusSink, temp_path,
};
use levelsync_fs::StdFileSystem;
use tempfile::tempdir;

enum Reply {
    Chunks(Vec<&'static str>),
    /// Yields the chunks, then breaks the stream.
    Broken(Vec<&'static str>),
    Status(u16),
    Unreachable,
}

struct MockClient {
    lookup: std::result::Result<String, u16>,
    reply:  Reply,
    total:  Option<u64>,
    calls:  AtomicUsize,
    query:  Mutex<Vec<(String, String)>>,
}

impl MockClient {
    fn serving(reply: Reply) -> Self {
        Self {
            lookup: Ok(String::new()),
            reply,
            total: None,
            calls: AtomicUsize::new(0),
            query: Mutex::new(Vec::new()),
        }
    }

    fn lookup(body: &str) -> Self {
        Self {
            lookup: Ok(body.to_string()),
            ..Self::serving(Reply::Unreachable)
        }
    }
}

impl HttpClient for MockClient {
    async fn get_text(&self, _url: &str, query: &[(&str, &str)]) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.query
            .lock()
            .unwrap()
            .extend(query.iter().map(|(k, v)| (k.to_string(), v.to_string())));
        match &self.lookup {
            Ok(body) => Ok(body.clone()),
            Err(status) => Err(Error::Server { status: *status }),
        }
    }

    async fn stream(&self, _url: &str) -> Result<Body> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let items: Vec<Result<Bytes>> = match &self.reply {
            Reply::Chunks(chunks) => chunks.iter().map(|&c| Ok(Bytes::from_static(c.as_bytes()))).collect(),
            Reply::Broken(chunks) => chunks
                .iter()
                .map(|&c| Ok(Bytes::from_static(c.as_bytes())))
                .chain(std::iter::once(Err(Error::Network("connection reset".into()))))
                .collect(),
            Reply::Status(status) => return Err(Error::Server { status: *status }),
            Reply::Unreachable => return Err(Error::Network("connection refused".into())),
        };
        Ok(Body {
            total:  self.total,
            chunks: Box::pin(futures_util::stream::iter(items)),
        })
    }
}

#[derive(Default)]
struct Recorder {
    shown:    Mutex<Vec<String>>,
    errors:   Mutex<Vec<(String, f32)>>,
    progress: Mutex<Vec<f32>>,
}

impl StatusSink for Recorder {
    fn show(&self, message: &str, _alert: bool) { self.shown.lock().unwrap().push(message.to_string()) }

    fn error(&self, message: &str, flash: f32) {
        self.errors.lock().unwrap().push((message.to_string(), flash))
    }

    fn debug(&self, _message: &str) {}

    fn progress(&self, _label: &str, fraction: f32) { self.progress.lock().unwrap().push(fraction) }
}

#[tokio::test]
async fn test_download_promotes_temp_file() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("arena1.zip");
    let mut client = MockClient::serving(Reply::Chunks(vec!["abcd", "efgh"]));
    client.total = Some(8);
    let status = Recorder::default();

    let path = Downloader::new()
        .flush_bytes(4)
        .fetch(&client, &StdFileSystem, "https://host/arena1.zip", &dest, &status)
        .await
        .unwrap();

    assert_eq!(path, dest);
    assert_eq!(std::fs::read(&dest).unwrap(), b"abcdefgh");
    assert!(!temp_path(&dest).exists());
    assert_eq!(*status.progress.lock().unwrap(), vec![0.0, 0.5, 1.0, 1.0]);
    assert_eq!(
        status.shown.lock().unwrap().last().map(String::as_str),
        Some("DOWNLOADING arena1.zip ... INSTALLING")
    );
}

#[tokio::test]
async fn test_broken_stream_removes_partial_file() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("arena1.zip");
    let client = MockClient::serving(Reply::Broken(vec!["partial bytes"]));
    let status = Recorder::default();

    let err = Downloader::new()
        .flush_bytes(1)
        .fetch(&client, &StdFileSystem, "https://host/arena1.zip", &dest, &status)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Network(_)));
    assert!(err.is_transport());
    assert!(!dest.exists());
    assert!(!temp_path(&dest).exists());
    assert!(
        status
            .shown
            .lock()
            .unwrap()
            .contains(&"DOWNLOADING arena1.zip FAILED, NETWORK ERROR".to_string())
    );
}

#[tokio::test]
async fn test_server_error_leaves_existing_destination() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("arena1.zip");
    std::fs::write(&dest, b"old").unwrap();
    std::fs::write(temp_path(&dest), b"stale").unwrap();
    let client = MockClient::serving(Reply::Status(503));
    let status = Recorder::default();

    let err = Downloader::new()
        .fetch(&client, &StdFileSystem, "https://host/arena1.zip", &dest, &status)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Server { status: 503 }));
    assert_eq!(std::fs::read(&dest).unwrap(), b"old");
    assert!(!temp_path(&dest).exists());
    assert!(
        status
            .shown
            .lock()
            .unwrap()
            .contains(&"DOWNLOADING arena1.zip FAILED, SERVER ERROR".to_string())
    );
}

#[cfg(unix)]
#[tokio::test]
async fn test_failed_promotion_keeps_temp_file() {
    let dir = tempdir().unwrap();
    let dest = dir.path().join("arena1.zip");
    // a non-empty directory cannot be replaced by a file rename
    std::fs::create_dir(&dest).unwrap();
    std::fs::write(dest.join("occupant"), b"x").unwrap();
    let client = MockClient::serving(Reply::Chunks(vec!["complete"]));
    let status = Recorder::default();

    let err = Downloader::new()
        .fetch(&client, &StdFileSystem, "https://host/arena1.zip", &dest, &status)
        .await
        .unwrap_err();

    match err {
        Error::Promote { temp, .. } => {
            assert_eq!(temp, temp_path(&dest));
            assert_eq!(std::fs::read(&temp).unwrap(), b"complete");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn test_lookup_returns_url() {
    let client = MockClient::lookup(r#"{"url":"https://host/arena1.zip"}"#);
    let status = Recorder::default();

    let url = Lookup::default()
        .resolve(&client, "arena1.mp:abc123", "arena1", &status)
        .await;

    assert_eq!(url.as_deref(), Some("https://host/arena1.zip"));
    assert_eq!(
        *client.query.lock().unwrap(),
        vec![("level".to_string(), "arena1.mp:abc123".to_string())]
    );
    assert_eq!(status.shown.lock().unwrap()[0], "SEARCHING arena1");
    assert!(status.errors.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_lookup_without_url_is_not_found() {
    let client = MockClient::lookup(r#"{"error":"unknown level"}"#);
    let status = Recorder::default();

    let url = Lookup::default().resolve(&client, "arena1.mp:abc", "arena1", &status).await;

    assert_eq!(url, None);
    assert_eq!(
        *status.errors.lock().unwrap(),
        vec![("LEVEL NOT FOUND ON OVERLOADMAPS.COM".to_string(), 2.0)]
    );
}

#[tokio::test]
async fn test_lookup_malformed_body_fails_quietly() {
    let client = MockClient::lookup("<html>502 Bad Gateway</html>");
    let status = Recorder::default();

    let url = Lookup::new("http://maps.test/api/", "mpget")
        .resolve(&client, "arena1.mp:abc", "arena1", &status)
        .await;

    assert_eq!(url, None);
    assert_eq!(
        *status.errors.lock().unwrap(),
        vec![("MAPS.TEST LOOKUP FAILED".to_string(), 2.0)]
    );
}

#[tokio::test]
async fn test_lookup_transport_error() {
    let client = MockClient {
        lookup: Err(500),
        ..MockClient::serving(Reply::Unreachable)
    };
    let status = Recorder::default();

    let url = Lookup::default().resolve(&client, "arena1.mp:abc", "arena1", &status).await;

    assert_eq!(url, None);
    assert_eq!(client.calls.load(Ordering::SeqCst), 1);
    assert_eq!(status.errors.lock().unwrap()[0].0, "OVERLOADMAPS.COM LOOKUP FAILED");
}
