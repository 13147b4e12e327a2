//! Point weather lookup, by coordinates or by catalogued city.

use crate::cities::{find_city, City};
use crate::error::{Error, Result};
use crate::traits::WeatherSource;
use external_services::open_meteo::WeatherReport;
use metrics::counter;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

/// Weather for a named city.
#[derive(Debug, Clone, Serialize)]
pub struct CityWeather {
    pub city: &'static str,
    #[serde(flatten)]
    pub report: WeatherReport,
}

/// Weather lookups against a [`WeatherSource`].
///
/// Failures are scoped to the single lookup and never touch event state.
#[derive(Clone)]
pub struct WeatherService {
    source: Arc<dyn WeatherSource>,
}

impl WeatherService {
    pub fn new(source: Arc<dyn WeatherSource>) -> Self {
        Self { source }
    }

    /// Weather at an arbitrary position.
    pub async fn at(&self, latitude: f64, longitude: f64) -> Result<WeatherReport> {
        validate_position(latitude, longitude)?;

        match self.source.fetch_weather(latitude, longitude).await {
            Ok(report) => {
                counter!("hazard_weather_lookups_total", "outcome" => "ok").increment(1);
                info!(
                    "[{}] Weather at ({}, {}): {}",
                    self.source.source_name(),
                    latitude,
                    longitude,
                    report.current.description
                );
                Ok(report)
            }
            Err(e) => {
                counter!("hazard_weather_lookups_total", "outcome" => "error").increment(1);
                warn!(
                    "[{}] Weather lookup at ({}, {}) failed: {}",
                    self.source.source_name(),
                    latitude,
                    longitude,
                    e
                );
                Err(Error::Weather(e))
            }
        }
    }

    /// Weather for a city from the catalogue, matched case-insensitively.
    pub async fn for_city(&self, name: &str) -> Result<CityWeather> {
        let City {
            name,
            latitude,
            longitude,
        } = *find_city(name).ok_or_else(|| Error::UnknownCity(name.to_string()))?;

        let report = self.at(latitude, longitude).await?;
        Ok(CityWeather { city: name, report })
    }
}

fn validate_position(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) {
        return Err(Error::InvalidRequest(format!(
            "latitude {} out of range",
            latitude
        )));
    }
    if !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::InvalidRequest(format!(
            "longitude {} out of range",
            longitude
        )));
    }
    Ok(())
}
