//! Mouser keyword search
//!
//! Mouser answers keyword searches with loose matches, so only a first
//! result whose manufacturer part number equals the request (ignoring case)
//! counts as a hit.

use super::{api_error, http_client, rate_limiter, SupplierAdapter, SupplierError, SupplierRateLimiter};
use serde_json::{json, Value};
use std::time::Duration;

pub const MOUSER_NAME: &str = "Mouser";

const SEARCH_URL: &str = "https://api.mouser.com/api/v1/search/keyword";
const RATE_LIMIT: Duration = Duration::from_millis(1000);

pub struct MouserClient {
    http_client: reqwest::Client,
    rate_limiter: SupplierRateLimiter,
    api_key: String,
}

impl MouserClient {
    pub fn new(api_key: String) -> Result<Self, SupplierError> {
        Ok(Self {
            http_client: http_client()?,
            rate_limiter: rate_limiter(RATE_LIMIT),
            api_key,
        })
    }

    async fn search(&self, part_number: &str) -> Result<Option<Value>, SupplierError> {
        self.rate_limiter.until_ready().await;

        tracing::debug!(part_number = %part_number, "Querying Mouser keyword search");

        let response = self
            .http_client
            .post(SEARCH_URL)
            .query(&[("apiKey", self.api_key.as_str())])
            .json(&json!({
                "SearchByKeywordRequest": { "keyword": part_number, "records": 1 }
            }))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(api_error(response).await);
        }

        let results: Value = response.json().await?;
        Ok(matching_part(results, part_number))
    }
}

/// First search result, if it is the requested part
fn matching_part(mut results: Value, part_number: &str) -> Option<Value> {
    let parts = results
        .get_mut("SearchResults")?
        .get_mut("Parts")?
        .as_array_mut()?;
    if parts.is_empty() {
        return None;
    }
    let part = parts.swap_remove(0);
    let listed = part.get("ManufacturerPartNumber")?.as_str()?;
    if listed.eq_ignore_ascii_case(part_number) {
        Some(part)
    } else {
        tracing::debug!(
            requested = %part_number,
            listed = %listed,
            "Mouser returned a different part"
        );
        None
    }
}

#[async_trait::async_trait]
impl SupplierAdapter for MouserClient {
    fn name(&self) -> &str {
        MOUSER_NAME
    }

    async fn fetch(&self, part_number: &str) -> Option<Value> {
        match self.search(part_number).await {
            Ok(Some(part)) => Some(part),
            Ok(None) => {
                tracing::info!(part_number = %part_number, "Not found on Mouser");
                None
            }
            Err(e) => {
                tracing::error!(part_number = %part_number, error = %e, "Mouser lookup failed");
                None
            }
        }
    }
}
