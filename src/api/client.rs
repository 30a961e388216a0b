//! HTTP client for the Messari data API
//!
//! Two read-only endpoint families are exposed: per-asset metric time-series
//! and per-asset metric snapshots. The asset key may be an id, slug, or
//! symbol; symbols are not unique and no client-side validation is done,
//! malformed keys are rejected server-side.

use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::error::{Error, Result};

/// Messari API base URL
const BASE_URL: &str = "https://data.messari.io";

/// Fixed per-request timeout in seconds
const TIMEOUT_SECS: u64 = 30;

/// Header carrying the optional API key
const API_KEY_HEADER: &str = "x-messari-api-key";

/// Path for the asset time-series endpoint
pub fn timeseries_path(asset_key: &str, metric_id: &str) -> String {
    format!(
        "/api/v1/assets/{}/metrics/{}/time-series",
        asset_key, metric_id
    )
}

/// Path for the asset metrics endpoint
pub fn metrics_path(asset_key: &str) -> String {
    format!("/api/v1/assets/{}/metrics", asset_key)
}

/// Messari API client
///
/// Requests are unauthenticated (rate-limited) unless an API key is given.
pub struct MessariClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl MessariClient {
    /// Create a client with the production base URL
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(BASE_URL, api_key)
    }

    /// Create a client against a custom base URL
    pub fn with_base_url(base_url: &str, api_key: Option<String>) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);

        let mut request = self.client.get(&url).query(params);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, body });
        }

        Ok(response.json::<Value>().await?)
    }

    /// Fetch historical time-series data for one asset
    ///
    /// `params` are passed through as query parameters
    /// (`start`, `end`, `interval`, `columns`).
    pub async fn get_asset_timeseries(
        &self,
        asset_key: &str,
        metric_id: &str,
        params: &[(&str, &str)],
    ) -> Result<Value> {
        self.get(&timeseries_path(asset_key, metric_id), params).await
    }

    /// Fetch the full metrics snapshot for one asset
    ///
    /// `fields` optionally pares down the returned fields (comma separated,
    /// drill down with a slash).
    pub async fn get_asset_metrics(
        &self,
        asset_key: &str,
        fields: Option<&str>,
    ) -> Result<Value> {
        let params: Vec<(&str, &str)> = match fields {
            Some(f) => vec![("fields", f)],
            None => Vec::new(),
        };
        self.get(&metrics_path(asset_key), &params).await
    }
}
