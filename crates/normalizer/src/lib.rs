//! Normalizer for transforming raw hazard feed records into a unified schema.
//!
//! This crate provides a plugin-based architecture for normalizing hazard
//! events from upstream feeds. To add support for a new feed, implement the
//! `FeedAdapter` trait.
//!
//! # Architecture
//!
//! ```text
//! Raw records --> FeedAdapter ---------> Event
//!                 (resolve geometry,     (lat/lon, severity,
//!                  classify severity)     status, magnitude)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use normalizer::{EonetAdapter, NormalizerService};
//!
//! let service = NormalizerService::new(EonetAdapter::new());
//! let batch = service.normalize(&feed.events);
//! for event in &batch.events {
//!     println!("{} [{}]", event.title, event.severity);
//! }
//! ```

pub mod eonet;
pub mod error;
pub mod schema;
pub mod service;
pub mod severity;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

// Re-export core types
pub use error::{NormalizeError, Result};
pub use schema::{Coordinates, Event, EventStatus, Severity, UNKNOWN_CATEGORY};
pub use service::{NormalizedBatch, NormalizerService};
pub use traits::FeedAdapter;

// Re-export feed adapters
pub use eonet::EonetAdapter;
