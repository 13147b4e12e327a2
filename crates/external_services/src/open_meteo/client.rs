//! Open-Meteo REST API client.

use crate::error::{Error, Result};
use crate::open_meteo::types::{ForecastResponse, CURRENT_FIELDS, DAILY_FIELDS, HOURLY_FIELDS};
use crate::open_meteo::weather::WeatherReport;
use std::time::Duration;
use tracing::debug;

/// Base URL for the Open-Meteo forecast endpoint.
pub const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Open-Meteo REST API client.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for OpenMeteoClient {
    fn default() -> Self {
        Self::new()
    }
}

impl OpenMeteoClient {
    /// Create a new Open-Meteo client with default settings.
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: OPEN_METEO_BASE_URL.to_string(),
        }
    }

    /// Create a new Open-Meteo client with custom base URL.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Apply a request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self> {
        self.http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(self)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Query string for a single location.
    pub fn forecast_params(latitude: f64, longitude: f64) -> Vec<(&'static str, String)> {
        vec![
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("daily", DAILY_FIELDS.to_string()),
            ("timezone", "auto".to_string()),
            ("wind_speed_unit", "ms".to_string()),
        ]
    }

    /// Fetch the raw forecast for a location.
    pub async fn fetch_forecast(&self, latitude: f64, longitude: f64) -> Result<ForecastResponse> {
        debug!("Fetching forecast for ({}, {})", latitude, longitude);

        let response = self
            .http
            .get(&self.base_url)
            .query(&Self::forecast_params(latitude, longitude))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::Api {
                status: status.as_u16(),
                message: response.text().await.unwrap_or_default(),
            });
        }

        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Fetch and convert the forecast into a display-ready report.
    pub async fn fetch_weather(&self, latitude: f64, longitude: f64) -> Result<WeatherReport> {
        let forecast = self.fetch_forecast(latitude, longitude).await?;
        WeatherReport::from_forecast(&forecast)
    }
}
