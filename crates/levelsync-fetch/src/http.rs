use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use bytes::Bytes;
use futures_util::Stream;

use crate::error::Result;

/// A boxed stream type for HTTP response bodies.
pub type BoxStream<'a, T> = Pin<Box<dyn Stream<Item = T> + Send + 'a>>;

/// A response body still on the wire.
pub struct Body {
    /// Content-Length, when the server sent one.
    pub total:  Option<u64>,
    pub chunks: BoxStream<'static, Result<Bytes>>,
}

/// Asynchronous HTTP client abstraction.
///
/// Implementations follow redirects and apply timeouts themselves. A
/// non-success status must surface as [`Error::Server`](crate::Error::Server)
/// and anything that prevents a response as
/// [`Error::Network`](crate::Error::Network).
pub trait HttpClient: Send + Sync {
    /// GET `url` with `query` appended and return the body as text.
    fn get_text(
        &self,
        url: &str,
        query: &[(&str, &str)],
    ) -> impl Future<Output = Result<String>> + Send;

    /// GET `url` and hand back the body as a stream of chunks.
    fn stream(&self, url: &str) -> impl Future<Output = Result<Body>> + Send;
}

/// Transport settings for [`ReqwestClient`].
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub timeout:         Duration,
    pub connect_timeout: Duration,
    pub user_agent:      String,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout:         Duration::from_secs(300),
            connect_timeout: Duration::from_secs(30),
            user_agent:      concat!("levelsync/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[cfg(feature = "reqwest")]
mod reqwest_impl {
    use futures_util::StreamExt;

    use super::*;
    use crate::error::Error;

    /// Production HTTP client implementation using reqwest.
    #[derive(Clone)]
    pub struct ReqwestClient {
        client: reqwest::Client,
    }

    impl ReqwestClient {
        pub fn new(options: &ClientOptions) -> Result<Self> {
            let client = reqwest::Client::builder()
                .timeout(options.timeout)
                .connect_timeout(options.connect_timeout)
                .user_agent(options.user_agent.clone())
                .redirect(reqwest::redirect::Policy::limited(10))
                .build()
                .map_err(|e| Error::Client(e.to_string()))?;
            Ok(Self { client })
        }
    }

    fn network(e: reqwest::Error) -> Error { Error::Network(e.to_string()) }

    fn check(response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            Ok(response)
        } else {
            Err(Error::Server {
                status: status.as_u16(),
            })
        }
    }

    impl HttpClient for ReqwestClient {
        async fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
            let response = self.client.get(url).query(query).send().await.map_err(network)?;
            check(response)?.text().await.map_err(network)
        }

        async fn stream(&self, url: &str) -> Result<Body> {
            let response = check(self.client.get(url).send().await.map_err(network)?)?;
            let total = response.content_length();
            let chunks = response.bytes_stream().map(|chunk| chunk.map_err(network));
            Ok(Body {
                total,
                chunks: Box::pin(chunks),
            })
        }
    }
}

#[cfg(feature = "reqwest")]
pub use reqwest_impl::ReqwestClient;
