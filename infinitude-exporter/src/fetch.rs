//! HTTP fetch-and-decode shared by the collectors.

use std::time::Duration;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::trace;

use crate::error::{CollectError, Result};

/// Thin wrapper around a [`reqwest::Client`] that GETs a URL and decodes
/// the JSON body into a typed record.
///
/// The client is cheap to clone and holds no per-request state, so one
/// instance is shared by every collector and every concurrent scrape.
#[derive(Debug, Clone)]
pub struct JsonFetcher {
    client: Client,
}

impl JsonFetcher {
    /// Create a fetcher whose requests are bounded by `timeout`.
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self { client })
    }

    /// GET `url` and decode the response body into `T`.
    ///
    /// The body is always read to the end, including on non-success status
    /// codes, so the connection goes back to the pool.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| CollectError::fetch(url, e))?;

        let status = response.status();
        let status_check = response.error_for_status_ref().map(|_| ());

        let body = response
            .bytes()
            .await
            .map_err(|e| CollectError::fetch(url, e))?;

        status_check.map_err(|e| CollectError::fetch(url, e))?;

        trace!(url, %status, bytes = body.len(), "Fetched upstream document");

        serde_json::from_slice(&body).map_err(|e| CollectError::decode(url, e))
    }
}
