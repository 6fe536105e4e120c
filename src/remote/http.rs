//! remote::http
//!
//! reqwest-backed fetcher for the remote configuration endpoint.
//!
//! # Design
//!
//! Each fetch sends the JSON content headers plus the caller-supplied
//! header map. The response is returned raw; the engine decides what to do
//! with non-success statuses.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use reqwest::Client;

use super::traits::{ConfigFetcher, FetchError, FetchMethod, FetchRequest, FetchResponse};

/// HTTP fetcher using a shared `reqwest` client.
#[derive(Debug, Clone, Default)]
pub struct HttpConfigFetcher {
    /// HTTP client; reused across checks for connection pooling.
    client: Client,
}

impl HttpConfigFetcher {
    /// Create a fetcher with a fresh client.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }

    /// Reuse an existing client.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Build the header map: JSON content headers plus caller headers.
    fn headers(request: &FetchRequest) -> Result<HeaderMap, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_static("application/json; charset=utf-8"),
        );
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        for (key, value) in &request.headers {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                FetchError::InvalidRequest(format!("invalid header name '{}': {}", key, e))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                FetchError::InvalidRequest(format!("invalid header value for '{}': {}", key, e))
            })?;
            headers.insert(name, value);
        }

        Ok(headers)
    }
}

#[async_trait]
impl ConfigFetcher for HttpConfigFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let headers = Self::headers(&request)?;

        let builder = match request.method {
            FetchMethod::Get => self.client.get(&request.url),
            FetchMethod::Post => self.client.post(&request.url),
        };

        let response = builder
            .headers(headers)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        Ok(FetchResponse { status, body })
    }
}

fn map_reqwest_error(error: reqwest::Error) -> FetchError {
    if error.is_builder() {
        FetchError::InvalidRequest(error.to_string())
    } else if error.is_timeout() {
        FetchError::Transport(format!("timed out: {}", error))
    } else {
        FetchError::Transport(error.to_string())
    }
}
