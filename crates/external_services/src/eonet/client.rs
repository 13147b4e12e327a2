//! EONET REST API client.

use crate::eonet::types::{EventQuery, EventsResponse};
use crate::error::{Error, Result};
use std::time::Duration;
use tracing::{debug, info};

/// Base URL for the EONET v3 API.
pub const EONET_BASE_URL: &str = "https://eonet.gsfc.nasa.gov/api/v3";

/// EONET REST API client.
#[derive(Debug, Clone)]
pub struct EonetClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for EonetClient {
    fn default() -> Self {
        Self::new()
    }
}

impl EonetClient {
    /// Create a new EONET client with default settings.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: EONET_BASE_URL.to_string(),
        }
    }

    /// Create a new EONET client with custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Apply a request timeout. The feed has none by default.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// URL of the events endpoint.
    pub fn events_url(&self) -> String {
        format!("{}/events", self.base_url.trim_end_matches('/'))
    }

    /// Fetch events matching the query.
    ///
    /// Any non-2xx status is reported as [`Error::Api`].
    pub async fn fetch_events(&self, query: &EventQuery) -> Result<EventsResponse> {
        let url = self.events_url();
        let params = query.to_params();
        debug!("Fetching events from: {} {:?}", url, params);

        let response = self.http.get(&url).query(&params).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        let feed: EventsResponse = serde_json::from_str(&body)?;

        info!("Fetched {} events from EONET", feed.events.len());

        Ok(feed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = EonetClient::new();
        assert_eq!(client.base_url(), EONET_BASE_URL);
        assert_eq!(
            client.events_url(),
            "https://eonet.gsfc.nasa.gov/api/v3/events"
        );
    }

    #[test]
    fn test_client_with_custom_url() {
        let client = EonetClient::with_base_url("http://localhost:9000/api/");
        assert_eq!(client.events_url(), "http://localhost:9000/api/events");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let client = EonetClient::with_base_url("http://127.0.0.1:1");
        let err = client
            .fetch_events(&EventQuery::default())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Http(_)));
    }
}
