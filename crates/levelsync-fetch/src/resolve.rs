//! Content key to download URL resolution.
//!
//! One round-trip to the lookup service, no retries. Every failure ends
//! in `None` after the reason has been reported.

use serde_json::Value;

use crate::http::HttpClient;
use crate::status::StatusSink;

pub const DEFAULT_LOOKUP_URL: &str = "https://www.overloadmaps.com/api/";
pub const DEFAULT_ENDPOINT: &str = "mpget";

const LOOKUP_FLASH: f32 = 2.0;

#[derive(Debug, Clone)]
pub struct Lookup {
    base_url: String,
    endpoint: String,
}

impl Default for Lookup {
    fn default() -> Self { Self::new(DEFAULT_LOOKUP_URL, DEFAULT_ENDPOINT) }
}

impl Lookup {
    pub fn new(base_url: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            endpoint: endpoint.into(),
        }
    }

    pub fn request_url(&self) -> String {
        if self.base_url.ends_with('/') {
            format!("{}{}", self.base_url, self.endpoint)
        } else {
            format!("{}/{}", self.base_url, self.endpoint)
        }
    }

    /// Upper-cased host of the lookup service, for status lines.
    pub fn service_name(&self) -> String { service_name(&self.base_url) }

    /// Ask the lookup service where `key` can be downloaded from.
    ///
    /// `label` is the short form of the key shown while searching.
    pub async fn resolve<C: HttpClient>(
        &self,
        client: &C,
        key: &str,
        label: &str,
        status: &dyn StatusSink,
    ) -> Option<String> {
        status.show(&format!("SEARCHING {label}"), true);

        let service = self.service_name();
        let body = match client.get_text(&self.request_url(), &[("level", key)]).await {
            Ok(body) => body,
            Err(e) => {
                status.debug(&format!("lookup of {key} failed: {e}"));
                status.error(&format!("{service} LOOKUP FAILED"), LOOKUP_FLASH);
                return None;
            }
        };

        match parse_response(&body) {
            Ok(Some(url)) => {
                status.debug(&format!("{key} resolves to {url}"));
                Some(url)
            }
            Ok(None) => {
                status.error(&format!("LEVEL NOT FOUND ON {service}"), LOOKUP_FLASH);
                None
            }
            Err(e) => {
                status.debug(&format!("malformed lookup response for {key}: {e}"));
                status.error(&format!("{service} LOOKUP FAILED"), LOOKUP_FLASH);
                None
            }
        }
    }
}

/// `Ok(None)` when the body is a JSON object without a usable `url`.
fn parse_response(body: &str) -> Result<Option<String>, String> {
    let value: Value = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let Value::Object(fields) = value else {
        return Err("response is not a JSON object".to_string());
    };
    Ok(fields
        .get("url")
        .and_then(Value::as_str)
        .filter(|url| !url.is_empty())
        .map(str::to_string))
}

fn service_name(base_url: &str) -> String {
    let rest = base_url.split_once("://").map_or(base_url, |(_, rest)| rest);
    let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    let host = host.rsplit_once('@').map_or(host, |(_, host)| host);
    let host = host.split(':').next().unwrap_or(host);
    host.strip_prefix("www.").unwrap_or(host).to_uppercase()
}
