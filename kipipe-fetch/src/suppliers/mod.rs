//! Supplier catalog adapters
//!
//! Every adapter answers one question: the raw JSON for a part number, or
//! nothing. Transport, authentication and decoding failures are logged and
//! reported as a miss, so callers never distinguish "not listed" from
//! "temporarily unreachable".

pub mod digikey;
pub mod mouser;

pub use digikey::DigiKeyClient;
pub use mouser::MouserClient;

use serde_json::Value;
use std::num::NonZeroU32;
use std::time::Duration;
use thiserror::Error;

const USER_AGENT: &str = concat!("kipipe/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Adapter failures (never leave the adapter)
#[derive(Debug, Error)]
pub enum SupplierError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("API error {0}: {1}")]
    Api(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<reqwest::Error> for SupplierError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SupplierError::Parse(err.to_string())
        } else {
            SupplierError::Network(err.to_string())
        }
    }
}

/// One supplier's catalog lookup
#[async_trait::async_trait]
pub trait SupplierAdapter: Send + Sync {
    /// Display name, also stored in the `supplier_*` columns
    fn name(&self) -> &str;

    /// Raw product JSON for `part_number`, `None` on a miss or any failure
    async fn fetch(&self, part_number: &str) -> Option<Value>;
}

/// Per-supplier request pacing, one request per period
pub(crate) type SupplierRateLimiter = governor::RateLimiter<
    governor::state::NotKeyed,
    governor::state::InMemoryState,
    governor::clock::DefaultClock,
>;

/// Limiter allowing one request every `min_interval`
pub(crate) fn rate_limiter(min_interval: Duration) -> SupplierRateLimiter {
    // A zero interval has no period; fall back to one request per second
    let quota = governor::Quota::with_period(min_interval)
        .unwrap_or_else(|| governor::Quota::per_second(NonZeroU32::MIN));
    governor::RateLimiter::direct(quota)
}

/// HTTP client shared by the adapters' construction
pub(crate) fn http_client() -> Result<reqwest::Client, SupplierError> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| SupplierError::Network(e.to_string()))
}

/// Error body of a failed response, for logging
pub(crate) async fn api_error(response: reqwest::Response) -> SupplierError {
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    SupplierError::Api(status, body)
}
