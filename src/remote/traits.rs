//! remote::traits
//!
//! Fetcher trait for the remote configuration endpoint.
//!
//! # Design
//!
//! `ConfigFetcher` is async because a check cycle suspends only at the
//! network fetch. Implementations return the raw status and body; deciding
//! what a non-success status means belongs to the engine, not the
//! transport.
//!
//! # Example
//!
//! ```
//! use nudge::remote::{ConfigFetcher, FetchMethod, FetchRequest, MockFetcher, FetchResponse};
//!
//! # tokio_test::block_on(async {
//! let fetcher = MockFetcher::new().respond_with(FetchResponse {
//!     status: 200,
//!     body: "{}".to_string(),
//! });
//!
//! let response = fetcher
//!     .fetch(FetchRequest {
//!         url: "https://config.example.com/api/v1/config".to_string(),
//!         method: FetchMethod::Post,
//!         headers: Default::default(),
//!     })
//!     .await
//!     .unwrap();
//!
//! assert!(response.is_success());
//! # });
//! ```

use std::collections::HashMap;
use std::fmt;

use async_trait::async_trait;
use thiserror::Error;

/// Errors from fetch operations.
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    /// The request never produced an HTTP response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The request could not be constructed (bad URL or header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response completed with a non-success status.
    #[error("unexpected response status {0}")]
    Status(u16),

    /// The in-flight request was cancelled by the host.
    #[error("request cancelled")]
    Cancelled,
}

/// HTTP method for the fetch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FetchMethod {
    Get,
    /// The default; the endpoint expects a POST with JSON headers.
    #[default]
    Post,
}

impl fmt::Display for FetchMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchMethod::Get => write!(f, "GET"),
            FetchMethod::Post => write!(f, "POST"),
        }
    }
}

/// A request to the remote configuration endpoint.
#[derive(Debug, Clone)]
pub struct FetchRequest {
    /// Fully assembled endpoint URL.
    pub url: String,
    /// Request method.
    pub method: FetchMethod,
    /// Caller-supplied headers, sent in addition to the JSON content
    /// headers every fetch carries.
    pub headers: HashMap<String, String>,
}

/// Raw response from the endpoint.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body as text.
    pub body: String,
}

impl FetchResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// The fetch seam between the engine and the network.
///
/// Implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait ConfigFetcher: Send + Sync {
    /// Perform the request, returning the raw status and body.
    ///
    /// # Errors
    ///
    /// - `Transport` when no HTTP response was produced
    /// - `InvalidRequest` when the URL or a header value is unusable
    /// - `Cancelled` when the host tore down the in-flight request
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_range_is_2xx() {
        let mut response = FetchResponse {
            status: 200,
            body: String::new(),
        };
        assert!(response.is_success());

        response.status = 204;
        assert!(response.is_success());

        response.status = 301;
        assert!(!response.is_success());

        response.status = 500;
        assert!(!response.is_success());
    }

    #[test]
    fn fetch_method_display() {
        assert_eq!(format!("{}", FetchMethod::Get), "GET");
        assert_eq!(format!("{}", FetchMethod::Post), "POST");
    }

    #[test]
    fn fetch_error_display() {
        assert_eq!(
            format!("{}", FetchError::Transport("connection refused".into())),
            "transport error: connection refused"
        );
        assert_eq!(
            format!("{}", FetchError::Status(503)),
            "unexpected response status 503"
        );
        assert_eq!(format!("{}", FetchError::Cancelled), "request cancelled");
    }
}
