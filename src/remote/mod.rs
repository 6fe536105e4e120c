//! remote
//!
//! Remote configuration endpoint access.
//!
//! # Design
//!
//! The network seam is the [`ConfigFetcher`] trait: the engine hands it a
//! URL, method, and headers and gets back the raw status and body (or a
//! transport error). Status interpretation and payload decoding stay on
//! the engine side, so fetcher implementations remain thin.
//!
//! [`HttpConfigFetcher`] is the production implementation; [`MockFetcher`]
//! is a deterministic double for tests.

pub mod http;
pub mod mock;
pub mod payload;
pub mod traits;

pub use http::HttpConfigFetcher;
pub use mock::MockFetcher;
pub use payload::{decode, DecodedPayload, PayloadError, RemoteVersionInfo};
pub use traits::{ConfigFetcher, FetchError, FetchMethod, FetchRequest, FetchResponse};
