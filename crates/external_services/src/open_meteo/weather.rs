//! Display-ready weather report derived from a forecast response.

use crate::error::{Error, Result};
use crate::open_meteo::types::{DailyBlock, ForecastResponse};
use serde::{Deserialize, Serialize};

/// m/s to km/h.
const MS_TO_KMH: f64 = 3.6;

const COMPASS_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// Weather summary for a single location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeatherReport {
    pub source: String,
    pub latitude: f64,
    pub longitude: f64,
    pub current: CurrentConditions,
    pub forecast: Forecast,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentConditions {
    /// Degrees Celsius, rounded.
    pub temperature: i64,
    pub feels_like: i64,
    pub humidity: f64,
    /// km/h, rounded.
    pub wind_speed: i64,
    /// km/h, rounded.
    pub wind_gusts: i64,
    /// Degrees.
    pub wind_direction: f64,
    pub wind_direction_label: String,
    /// hPa, rounded.
    pub pressure: i64,
    pub cloud_cover: f64,
    pub precipitation: f64,
    pub rain: f64,
    pub snow: f64,
    pub weather_code: u16,
    pub description: String,
    pub is_day: bool,
    /// Local time reported by the API.
    pub time: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Forecast {
    pub today: DayForecast,
    pub tomorrow: DayForecast,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayForecast {
    pub max: i64,
    pub min: i64,
    pub precipitation: f64,
    pub weather_code: u16,
}

impl WeatherReport {
    /// Build a report from a raw forecast.
    ///
    /// Fails with [`Error::InvalidResponse`] when the daily block has fewer
    /// than two days.
    pub fn from_forecast(forecast: &ForecastResponse) -> Result<Self> {
        let current = &forecast.current;

        Ok(Self {
            source: "Open-Meteo".to_string(),
            latitude: forecast.latitude,
            longitude: forecast.longitude,
            current: CurrentConditions {
                temperature: round_half_up(current.temperature_2m),
                feels_like: round_half_up(current.apparent_temperature),
                humidity: current.relative_humidity_2m,
                wind_speed: round_half_up(current.wind_speed_10m * MS_TO_KMH),
                wind_gusts: round_half_up(current.wind_gusts_10m * MS_TO_KMH),
                wind_direction: current.wind_direction_10m,
                wind_direction_label: wind_direction_label(current.wind_direction_10m).to_string(),
                pressure: round_half_up(current.pressure_msl),
                cloud_cover: current.cloud_cover,
                precipitation: current.precipitation,
                rain: current.rain,
                snow: current.snowfall,
                weather_code: current.weather_code,
                description: weather_description(current.weather_code).to_string(),
                is_day: current.is_day != 0,
                time: current.time.clone(),
            },
            forecast: Forecast {
                today: day_forecast(&forecast.daily, 0)?,
                tomorrow: day_forecast(&forecast.daily, 1)?,
            },
        })
    }
}

fn day_forecast(daily: &DailyBlock, day: usize) -> Result<DayForecast> {
    let missing = || Error::InvalidResponse(format!("daily forecast is missing day {}", day));

    Ok(DayForecast {
        max: round_half_up(*daily.temperature_2m_max.get(day).ok_or_else(missing)?),
        min: round_half_up(*daily.temperature_2m_min.get(day).ok_or_else(missing)?),
        precipitation: *daily.precipitation_sum.get(day).ok_or_else(missing)?,
        weather_code: *daily.weather_code.get(day).ok_or_else(missing)?,
    })
}

/// Round to the nearest integer, halves towards positive infinity.
fn round_half_up(value: f64) -> i64 {
    (value + 0.5).floor() as i64
}

/// Human-readable description of a WMO weather code.
pub fn weather_description(code: u16) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 => "Fog",
        48 => "Depositing rime fog",
        51 => "Light drizzle",
        53 => "Moderate drizzle",
        55 => "Dense drizzle",
        56 => "Light freezing drizzle",
        57 => "Dense freezing drizzle",
        61 => "Moderate rain",
        63 => "Slight rain",
        65 => "Heavy rain",
        66 => "Light freezing rain",
        67 => "Heavy freezing rain",
        71 => "Slight snow fall",
        73 => "Moderate snow fall",
        75 => "Heavy snow fall",
        77 => "Snow grains",
        80 => "Slight rain showers",
        81 => "Moderate rain showers",
        82 => "Heavy rain showers",
        95 => "Thunderstorm",
        96 => "Thunderstorm with slight hail",
        99 => "Thunderstorm with heavy hail",
        _ => "Unknown Conditions",
    }
}

/// 16-point compass label for a bearing in degrees.
pub fn wind_direction_label(degrees: f64) -> &'static str {
    let index = round_half_up(degrees / 22.5).rem_euclid(16) as usize;
    COMPASS_POINTS[index]
}
