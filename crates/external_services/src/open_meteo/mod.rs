//! Open-Meteo forecast API client.
//!
//! Provides the REST client, wire types and the display-ready weather report.

pub mod client;
pub mod types;
pub mod weather;

pub use client::{OpenMeteoClient, OPEN_METEO_BASE_URL};
pub use types::{CurrentBlock, DailyBlock, ForecastResponse};
pub use weather::{
    weather_description, wind_direction_label, CurrentConditions, DayForecast, Forecast,
    WeatherReport,
};
