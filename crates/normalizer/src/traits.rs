//! Core trait for feed adapters (plugin interface).
//!
//! To normalize a new hazard feed, implement the `FeedAdapter` trait.
//!
//! # Example
//!
//! ```ignore
//! pub struct GdacsAdapter;
//!
//! impl FeedAdapter for GdacsAdapter {
//!     const NAME: &'static str = "gdacs";
//!     type Raw = GdacsAlert;
//!
//!     fn record_id<'a>(&self, raw: &'a GdacsAlert) -> &'a str {
//!         &raw.identifier
//!     }
//!
//!     fn transform(&self, raw: &GdacsAlert, now: DateTime<Utc>) -> Result<Event> {
//!         // Map the alert onto the normalized schema
//!     }
//! }
//! ```

use crate::error::Result;
use crate::schema::Event;
use chrono::{DateTime, Utc};

/// Core trait for feed adapters.
///
/// The normalizer service is generic over this trait.
pub trait FeedAdapter: Send + Sync + 'static {
    /// Feed name (e.g., "eonet").
    const NAME: &'static str;

    /// Upstream record type.
    type Raw;

    /// Identifier of a raw record, used when reporting dropped records.
    fn record_id<'a>(&self, raw: &'a Self::Raw) -> &'a str;

    /// Transform one raw record into a normalized event.
    ///
    /// `now` is the evaluation time for anything time-dependent, such as
    /// recency. Fails with `MalformedRecord` when the record cannot be
    /// normalized; the caller drops it and continues with the batch.
    fn transform(&self, raw: &Self::Raw, now: DateTime<Utc>) -> Result<Event>;
}
