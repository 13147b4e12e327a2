//! Open-Meteo wire types.

use serde::{Deserialize, Serialize};

/// Fields requested in the `current` block.
pub const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m,apparent_temperature,is_day,precipitation,rain,showers,snowfall,weather_code,cloud_cover,pressure_msl,wind_speed_10m,wind_direction_10m,wind_gusts_10m";

/// Fields requested in the `hourly` block.
pub const HOURLY_FIELDS: &str = "temperature_2m,precipitation_probability,weather_code";

/// Fields requested in the `daily` block.
pub const DAILY_FIELDS: &str = "weather_code,temperature_2m_max,temperature_2m_min,precipitation_sum";

/// Response body of the forecast endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub timezone: Option<String>,
    pub current: CurrentBlock,
    pub daily: DailyBlock,
}

/// `current` block. Wind speeds are in m/s (requested with `wind_speed_unit=ms`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CurrentBlock {
    pub time: String,
    pub temperature_2m: f64,
    pub relative_humidity_2m: f64,
    pub apparent_temperature: f64,
    pub is_day: u8,
    #[serde(default)]
    pub precipitation: f64,
    #[serde(default)]
    pub rain: f64,
    #[serde(default)]
    pub showers: f64,
    #[serde(default)]
    pub snowfall: f64,
    pub weather_code: u16,
    pub cloud_cover: f64,
    pub pressure_msl: f64,
    pub wind_speed_10m: f64,
    pub wind_direction_10m: f64,
    pub wind_gusts_10m: f64,
}

/// `daily` block, one entry per forecast day starting today.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyBlock {
    #[serde(default)]
    pub time: Vec<String>,
    pub weather_code: Vec<u16>,
    pub temperature_2m_max: Vec<f64>,
    pub temperature_2m_min: Vec<f64>,
    pub precipitation_sum: Vec<f64>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    /// Trimmed real response for Madrid.
    pub const MADRID: &str = r#"{
        "latitude": 40.42,
        "longitude": -3.7,
        "timezone": "Europe/Madrid",
        "current": {
            "time": "2024-07-01T12:00",
            "temperature_2m": 31.6,
            "relative_humidity_2m": 28,
            "apparent_temperature": 30.2,
            "is_day": 1,
            "precipitation": 0.0,
            "rain": 0.0,
            "showers": 0.0,
            "snowfall": 0.0,
            "weather_code": 2,
            "cloud_cover": 40,
            "pressure_msl": 1014.6,
            "wind_speed_10m": 4.5,
            "wind_direction_10m": 200,
            "wind_gusts_10m": 9.1
        },
        "hourly": {"time": [], "temperature_2m": [], "precipitation_probability": [], "weather_code": []},
        "daily": {
            "time": ["2024-07-01", "2024-07-02"],
            "weather_code": [2, 61],
            "temperature_2m_max": [34.4, 29.5],
            "temperature_2m_min": [19.6, 18.2],
            "precipitation_sum": [0.0, 3.2]
        }
    }"#;
}
