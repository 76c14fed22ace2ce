//! REST API client for the EXMO public endpoints

use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument};

use super::messages::*;
use crate::common::errors::{ClientError, Result};

/// REST API client for the EXMO public API
///
/// Only unauthenticated endpoints are exposed. Every call is a form-encoded
/// POST, the same way the exchange documents them.
#[derive(Debug, Clone)]
pub struct ExmoRestClient {
    /// HTTP client
    client: Client,
    /// Base URL, e.g. `https://api.exmo.com/v1.1`
    base_url: String,
}

impl ExmoRestClient {
    /// Create a new REST client with the default timeout
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(30))
    }

    /// Create a new REST client with custom timeout
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ClientError::Internal(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The book of current orders for the given pairs
    ///
    /// # Arguments
    /// * `pairs` - Currency pairs, e.g. `["BTC_USD"]`
    /// * `limit` - Number of displayed positions (exchange default 100, max 1000)
    #[instrument(skip(self))]
    pub async fn order_book(&self, pairs: &[String], limit: Option<u32>) -> Result<OrderBookResponse> {
        let mut form = vec![("pair", pairs.join(","))];
        if let Some(limit) = limit {
            form.push(("limit", limit.to_string()));
        }
        self.post("order_book", &form).await
    }

    /// Recent deals for the given pairs
    #[instrument(skip(self))]
    pub async fn trades(&self, pairs: &[String]) -> Result<TradesResponse> {
        let form = vec![("pair", pairs.join(","))];
        self.post("trades", &form).await
    }

    /// Price and volume statistics for every pair
    #[instrument(skip(self))]
    pub async fn ticker(&self) -> Result<TickerResponse> {
        let form: Vec<(&str, String)> = Vec::new();
        self.post("ticker", &form).await
    }

    // ========================================================================
    // Helper Methods
    // ========================================================================

    async fn post<T: DeserializeOwned>(&self, method: &str, form: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, method);
        debug!("Posting to EXMO: {}", url);

        let response = self
            .client
            .post(&url)
            .form(form)
            .send()
            .await
            .map_err(|e| map_transport_error(method, e))?;

        decode_response(method, response).await
    }
}

fn map_transport_error(method: &str, err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        ClientError::Timeout(format!("{} request timed out", method))
    } else {
        ClientError::HttpRequest(err)
    }
}

async fn decode_response<T: DeserializeOwned>(method: &str, response: Response) -> Result<T> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(ClientError::InvalidResponse(format!(
            "{} returned status {}: {}",
            method, status, body
        )));
    }

    let value: serde_json::Value = response
        .json()
        .await
        .map_err(|e| map_transport_error(method, e))?;

    // EXMO reports failures as `{"result": false, "error": "..."}` with a 200
    if let Some(false) = value.get("result").and_then(serde_json::Value::as_bool) {
        let error: ErrorResponse = serde_json::from_value(value)?;
        return Err(ClientError::InvalidResponse(format!(
            "{} failed: {}",
            method, error.error
        )));
    }

    Ok(serde_json::from_value(value)?)
}
