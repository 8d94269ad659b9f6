//! HTTP transport for the wg-easy API.
//!
//! The transport performs a single request and classifies the outcome into
//! the [`ApiError`] taxonomy. It knows nothing about sessions; the session
//! layer attaches the cookie it wants sent.

use std::time::Duration;

use reqwest::header::{self, HeaderMap};
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;
use tracing::debug;

use super::ApiError;

/// HTTP request timeout in seconds.
/// wg-easy responses are small; anything slower than this is effectively down.
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// A successful (2xx) response: status, raw body, and response headers.
/// The login exchange needs the headers to pick up the session cookie.
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
    pub headers: HeaderMap,
}

/// Request execution seam.
///
/// Production code uses [`HttpTransport`]; session-layer tests substitute a
/// scripted implementation so the retry semantics can be exercised without a
/// server.
pub trait Transport: Send + Sync {
    fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        cookie: Option<&str>,
    ) -> impl std::future::Future<Output = Result<ApiResponse, ApiError>> + Send;
}

/// Transport backed by a shared `reqwest::Client`.
pub struct HttpTransport {
    http: Client,
    base_url: String,
}

impl HttpTransport {
    pub fn new(base_url: &str) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
        cookie: Option<&str>,
    ) -> Result<ApiResponse, ApiError> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self
            .http
            .request(method, &url)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;
        debug!(%status, url = %url, "response received");

        if status.is_success() {
            Ok(ApiResponse {
                status,
                body,
                headers,
            })
        } else {
            Err(ApiError::from_status(status, &body))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_stripped() {
        let transport = HttpTransport::new("http://wg.example.com:51821/").unwrap();
        assert_eq!(transport.base_url, "http://wg.example.com:51821");

        let transport = HttpTransport::new("http://wg.example.com:51821").unwrap();
        assert_eq!(transport.base_url, "http://wg.example.com:51821");
    }
}
