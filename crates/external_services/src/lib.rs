//! External data source clients.
//!
//! This library provides typed access to the two upstream APIs the hazard
//! dashboard consumes:
//! - EONET: NASA's Earth Observatory Natural Event Tracker (hazard events)
//! - Open-Meteo: current conditions and short-range forecast per coordinate
//!
//! # Example
//!
//! ```ignore
//! use external_services::eonet::{EonetClient, EventQuery};
//! use external_services::open_meteo::OpenMeteoClient;
//!
//! let eonet = EonetClient::new();
//! let feed = eonet.fetch_events(&EventQuery::default()).await?;
//!
//! let weather = OpenMeteoClient::new();
//! let report = weather.fetch_weather(40.4168, -3.7038).await?;
//! ```

pub mod eonet;
pub mod error;
pub mod open_meteo;

pub use error::{Error, Result};
