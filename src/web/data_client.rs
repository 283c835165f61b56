use reqwest::Client;
use thiserror::Error;

use super::types::BoostedToken;

const DEXSCREENER_API_BASE: &str = "https://api.dexscreener.com";

#[derive(Debug, Error)]
pub enum DataClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Unexpected(String),
}

#[derive(Debug, Clone)]
pub struct DexScreenerClient {
    http: Client,
    base_url: String,
}

impl DexScreenerClient {
    pub fn new(http: Client) -> Self {
        Self::with_base_url(http, DEXSCREENER_API_BASE)
    }

    pub fn with_base_url(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Fetch the most recently boosted tokens across all chains.
    pub async fn get_latest_boosted(&self) -> Result<Vec<BoostedToken>, DataClientError> {
        let url = format!("{}/token-boosts/latest/v1", self.base_url);
        let resp = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?;

        let body: serde_json::Value = resp.json().await?;

        // The endpoint has served both a bare array and a single object.
        let tokens: Vec<BoostedToken> = match body {
            serde_json::Value::Array(_) => serde_json::from_value(body),
            serde_json::Value::Object(_) => serde_json::from_value(body).map(|t| vec![t]),
            other => {
                return Err(DataClientError::Unexpected(format!(
                    "expected array or object, got {other}"
                )))
            }
        }
        .map_err(|e| DataClientError::Unexpected(e.to_string()))?;

        Ok(tokens)
    }
}
