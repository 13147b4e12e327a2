//! NASA EONET (Earth Observatory Natural Event Tracker) client.
//!
//! Provides the REST client and wire types for the v3 events feed.

pub mod client;
pub mod types;

pub use client::{EonetClient, EONET_BASE_URL};
pub use types::{
    EventQuery, EventsResponse, FeedStatus, GeometryKind, RawCategory, RawEvent, RawGeometry,
    RawSource,
};

/// Number of events requested per load.
pub const DEFAULT_LIMIT: u32 = 100;
