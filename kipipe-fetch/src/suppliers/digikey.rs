//! Digi-Key product search (v4)
//!
//! Client-credentials OAuth token, cached until shortly before it expires,
//! then a keyword search limited to one record.

use super::{api_error, http_client, rate_limiter, SupplierAdapter, SupplierError, SupplierRateLimiter};
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const DIGIKEY_NAME: &str = "Digi-Key";

const TOKEN_URL: &str = "https://api.digikey.com/v1/oauth2/token";
const SEARCH_URL: &str = "https://api.digikey.com/products/v4/search/keyword";
const RATE_LIMIT: Duration = Duration::from_millis(500);
/// Refresh this long before the server-reported expiry
const TOKEN_SLACK_SECS: u64 = 60;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    value: String,
    expires_at: Instant,
}

pub struct DigiKeyClient {
    http_client: reqwest::Client,
    rate_limiter: SupplierRateLimiter,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<CachedToken>>,
}

impl DigiKeyClient {
    pub fn new(client_id: String, client_secret: String) -> Result<Self, SupplierError> {
        Ok(Self {
            http_client: http_client()?,
            rate_limiter: rate_limiter(RATE_LIMIT),
            client_id,
            client_secret,
            token: Mutex::new(None),
        })
    }

    async fn access_token(&self) -> Result<String, SupplierError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref() {
            if Instant::now() < token.expires_at {
                return Ok(token.value.clone());
            }
        }

        let response = self
            .http_client
            .post(TOKEN_URL)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(SupplierError::Auth(format!("token request returned {}", status)));
        }

        let token: TokenResponse = response.json().await?;
        let lifetime = token
            .expires_in
            .unwrap_or(0)
            .saturating_sub(TOKEN_SLACK_SECS);

        tracing::debug!(lifetime_secs = lifetime, "Obtained Digi-Key access token");

        *cached = Some(CachedToken {
            value: token.access_token.clone(),
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        });

        Ok(token.access_token)
    }

    async fn search(&self, part_number: &str) -> Result<Option<Value>, SupplierError> {
        let token = self.access_token().await?;

        self.rate_limiter.until_ready().await;

        tracing::debug!(part_number = %part_number, "Querying Digi-Key keyword search");

        let response = self
            .http_client
            .post(SEARCH_URL)
            .bearer_auth(token)
            .header("X-DIGIKEY-Client-Id", &self.client_id)
            .header("X-DIGIKEY-Locale-Site", "US")
            .header("X-DIGIKEY-Locale-Language", "en")
            .json(&json!({ "Keywords": part_number, "RecordCount": 1 }))
            .send()
            .await?;

        let status = response.status();
        if status == 404 {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(api_error(response).await);
        }

        let results: Value = response.json().await?;
        Ok(first_product(results))
    }
}

/// First entry of the `Products` list
fn first_product(mut results: Value) -> Option<Value> {
    let products = results.get_mut("Products")?.as_array_mut()?;
    if products.is_empty() {
        None
    } else {
        Some(products.swap_remove(0))
    }
}

#[async_trait::async_trait]
impl SupplierAdapter for DigiKeyClient {
    fn name(&self) -> &str {
        DIGIKEY_NAME
    }

    async fn fetch(&self, part_number: &str) -> Option<Value> {
        match self.search(part_number).await {
            Ok(Some(product)) => Some(product),
            Ok(None) => {
                tracing::info!(part_number = %part_number, "Not found on Digi-Key");
                None
            }
            Err(e) => {
                tracing::error!(part_number = %part_number, error = %e, "Digi-Key lookup failed");
                None
            }
        }
    }
}
