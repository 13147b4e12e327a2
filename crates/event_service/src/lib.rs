//! Hazard event service.
//!
//! Loads natural hazard events from the EONET feed, keeps the filtered views
//! in an in-memory store and serves them, together with point weather
//! lookups, over HTTP.

pub mod api;
pub mod cities;
pub mod config;
pub mod error;
pub mod filter;
pub mod loader;
pub mod store;
pub mod traits;
pub mod view;
pub mod weather;

pub use api::{create_router, AppState};
pub use config::ServiceConfig;
pub use error::{Error, Result};
pub use filter::{FilterCriteria, Selection};
pub use loader::{EventLoader, LoadReport};
pub use store::{EventStore, LoadOutcome};
pub use traits::{EventSource, WeatherSource};
pub use view::{SharedSnapshot, ViewSnapshot};
pub use weather::WeatherService;
