//! remote::mock
//!
//! Mock fetcher for deterministic testing.
//!
//! # Design
//!
//! The mock serves queued responses in order (the last one repeats) and
//! records every request for verification. Failure scenarios are queued
//! the same way as successes.
//!
//! # Example
//!
//! ```
//! use nudge::remote::{ConfigFetcher, FetchMethod, FetchRequest, FetchResponse, MockFetcher};
//!
//! # tokio_test::block_on(async {
//! let fetcher = MockFetcher::new().respond_with(FetchResponse {
//!     status: 200,
//!     body: r#"{"ok":true}"#.to_string(),
//! });
//!
//! let response = fetcher
//!     .fetch(FetchRequest {
//!         url: "https://config.example.com/api".to_string(),
//!         method: FetchMethod::Post,
//!         headers: Default::default(),
//!     })
//!     .await
//!     .unwrap();
//!
//! assert_eq!(response.status, 200);
//! assert_eq!(fetcher.request_count(), 1);
//! # });
//! ```

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use super::traits::{ConfigFetcher, FetchError, FetchRequest, FetchResponse};

/// Mock fetcher for tests.
///
/// Thread-safe via internal `Arc<Mutex<...>>` wrapping; clones share state.
#[derive(Debug, Clone, Default)]
pub struct MockFetcher {
    inner: Arc<Mutex<MockFetcherInner>>,
}

#[derive(Debug, Default)]
struct MockFetcherInner {
    /// Queued results, served front to back; the final one repeats.
    results: VecDeque<Result<FetchResponse, FetchError>>,
    /// Recorded requests for verification.
    requests: Vec<FetchRequest>,
}

impl MockFetcher {
    /// A mock with nothing queued; fetching fails until a response is
    /// queued.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn respond_with(self, response: FetchResponse) -> Self {
        self.inner
            .lock()
            .unwrap()
            .results
            .push_back(Ok(response));
        self
    }

    /// Queue a fetch error.
    pub fn fail_with(self, error: FetchError) -> Self {
        self.inner.lock().unwrap().results.push_back(Err(error));
        self
    }

    /// All recorded requests.
    pub fn requests(&self) -> Vec<FetchRequest> {
        self.inner.lock().unwrap().requests.clone()
    }

    /// Number of fetches performed.
    pub fn request_count(&self) -> usize {
        self.inner.lock().unwrap().requests.len()
    }
}

#[async_trait]
impl ConfigFetcher for MockFetcher {
    async fn fetch(&self, request: FetchRequest) -> Result<FetchResponse, FetchError> {
        let mut inner = self.inner.lock().unwrap();
        inner.requests.push(request);

        match inner.results.len() {
            0 => Err(FetchError::Transport("mock: no response queued".into())),
            1 => inner.results.front().cloned().unwrap_or_else(|| {
                Err(FetchError::Transport("mock: no response queued".into()))
            }),
            _ => inner.results.pop_front().unwrap_or_else(|| {
                Err(FetchError::Transport("mock: no response queued".into()))
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn request(url: &str) -> FetchRequest {
        FetchRequest {
            url: url.into(),
            method: Default::default(),
            headers: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn serves_queued_responses_in_order() {
        let fetcher = MockFetcher::new()
            .respond_with(FetchResponse {
                status: 200,
                body: "first".into(),
            })
            .respond_with(FetchResponse {
                status: 503,
                body: "second".into(),
            });

        let first = fetcher.fetch(request("https://a")).await.unwrap();
        assert_eq!(first.body, "first");

        let second = fetcher.fetch(request("https://a")).await.unwrap();
        assert_eq!(second.status, 503);

        // The last queued response repeats.
        let third = fetcher.fetch(request("https://a")).await.unwrap();
        assert_eq!(third.status, 503);
    }

    #[tokio::test]
    async fn serves_queued_errors() {
        let fetcher = MockFetcher::new().fail_with(FetchError::Cancelled);
        let result = fetcher.fetch(request("https://a")).await;
        assert!(matches!(result, Err(FetchError::Cancelled)));
    }

    #[tokio::test]
    async fn empty_queue_is_a_transport_error() {
        let fetcher = MockFetcher::new();
        let result = fetcher.fetch(request("https://a")).await;
        assert!(matches!(result, Err(FetchError::Transport(_))));
    }

    #[tokio::test]
    async fn records_requests() {
        let fetcher = MockFetcher::new().respond_with(FetchResponse {
            status: 200,
            body: String::new(),
        });

        fetcher
            .fetch(request("https://config.example.com/api"))
            .await
            .unwrap();

        let requests = fetcher.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://config.example.com/api");
    }
}
