//! Outbound HTTP for all providers
//!
//! One GET per call, no retries. Non-success statuses are turned into
//! [`NexusError`]s through the provider's [`StatusTable`].

use crate::config::HttpConfig;
use crate::error::{ErrorKind, NexusError};
use crate::status_map::StatusTable;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    pub fn new(config: &HttpConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.into()))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| NexusError::config(format!("Failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }

    /// GET `url` and decode the JSON body into `T`.
    ///
    /// `url` must already carry its query string; secrets in it are never
    /// logged.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        table: &StatusTable,
        url: &str,
    ) -> crate::Result<T> {
        let provider = table.provider;
        let started = Instant::now();
        debug!(%provider, url = %redact(url), "Sending request");

        let response = self.client.get(url).send().await.map_err(|e| {
            warn!(%provider, "Request failed: {e}");
            if e.is_timeout() {
                NexusError::api(provider, ErrorKind::Timeout, None, e.to_string())
            } else {
                NexusError::network(provider, e.to_string())
            }
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| NexusError::network(provider, format!("Failed to read response body: {e}")))?;

        debug!(
            %provider,
            status = status.as_u16(),
            "Response received in {:.3}s",
            started.elapsed().as_secs_f64()
        );

        if !status.is_success() {
            let err = table.classify(status.as_u16(), &body);
            warn!(%provider, status = status.as_u16(), "Upstream returned an error: {err}");
            return Err(err);
        }

        serde_json::from_slice(&body).map_err(|e| {
            warn!(%provider, "Failed to parse response: {e}");
            NexusError::api(
                provider,
                ErrorKind::InvalidResponse,
                Some(status.as_u16()),
                format!("Invalid JSON response: {e}"),
            )
        })
    }
}

/// Strip query values whose names look like credentials
fn redact(url: &str) -> String {
    let Some((base, query)) = url.split_once('?') else {
        return url.to_string();
    };
    let query = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((name, _)) if name.eq_ignore_ascii_case("key") || name.eq_ignore_ascii_case("apikey") => {
                format!("{name}=***")
            }
            _ => pair.to_string(),
        })
        .collect::<Vec<_>>()
        .join("&");
    format!("{base}?{query}")
}
