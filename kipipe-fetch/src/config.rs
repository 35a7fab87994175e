//! Supplier credential resolution
//!
//! Environment variables take priority over the `[suppliers]` TOML section.
//! Empty values count as unset.

use kipipe_common::config::SupplierConfig;

pub const DIGIKEY_CLIENT_ID_ENV: &str = "DIGIKEY_CLIENT_ID";
pub const DIGIKEY_CLIENT_SECRET_ENV: &str = "DIGIKEY_CLIENT_SECRET";
pub const MOUSER_API_KEY_ENV: &str = "MOUSER_API_KEY";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigiKeyCredentials {
    pub client_id: String,
    pub client_secret: String,
}

/// Credentials available for each supplier (`None` = supplier disabled)
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SupplierCredentials {
    pub digikey: Option<DigiKeyCredentials>,
    pub mouser_api_key: Option<String>,
}

impl SupplierCredentials {
    pub fn resolve(config: &SupplierConfig) -> Self {
        let client_id = env_or(DIGIKEY_CLIENT_ID_ENV, config.digikey_client_id.as_deref());
        let client_secret = env_or(DIGIKEY_CLIENT_SECRET_ENV, config.digikey_client_secret.as_deref());

        let digikey = match (client_id, client_secret) {
            (Some(client_id), Some(client_secret)) => Some(DigiKeyCredentials {
                client_id,
                client_secret,
            }),
            (Some(_), None) | (None, Some(_)) => {
                tracing::warn!("Incomplete Digi-Key credentials, need both client id and secret");
                None
            }
            (None, None) => None,
        };

        Self {
            digikey,
            mouser_api_key: env_or(MOUSER_API_KEY_ENV, config.mouser_api_key.as_deref()),
        }
    }
}

fn env_or(var: &str, fallback: Option<&str>) -> Option<String> {
    std::env::var(var)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(|| fallback.filter(|v| !v.trim().is_empty()).map(str::to_string))
}
