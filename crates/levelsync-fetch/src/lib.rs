//! Level lookup and download.
//!
//! - [`Lookup`] maps a content key to a download URL with a single request.
//! - [`Downloader`] streams that URL into `<destination>.tmp`, reporting
//!   progress, and promotes it with a rename.
//! - [`HttpClient`] is the transport seam; [`ReqwestClient`] is the
//!   production implementation.
//! - [`status`] carries user-facing status text and diagnostics.

mod download;
mod error;
mod http;
mod resolve;
pub mod status;

pub use download::{Downloader, TEMP_SUFFIX, temp_path};
pub use error::{Error, Result};
pub use http::{Body, BoxStream, ClientOptions, HttpClient};
#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
pub use resolve::{DEFAULT_ENDPOINT, DEFAULT_LOOKUP_URL, Lookup};
pub use status::{ChannelStatus, StatusEvent, StatusSink, TracingStatus};
