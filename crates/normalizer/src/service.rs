//! Generic normalizer service that works with any feed adapter.
//! Normalizes a whole feed batch, dropping malformed records.

use crate::error::NormalizeError;
use crate::schema::Event;
use crate::traits::FeedAdapter;
use chrono::{DateTime, Utc};
use metrics::counter;
use tracing::{debug, warn};

/// Result of normalizing one feed batch.
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    /// Normalized events, in feed order.
    pub events: Vec<Event>,
    /// Records that were dropped, with the reason.
    pub dropped: Vec<NormalizeError>,
}

impl NormalizedBatch {
    pub fn dropped_count(&self) -> usize {
        self.dropped.len()
    }
}

/// Generic normalizer service.
///
/// The service is parameterized by a `FeedAdapter` which defines how to
/// transform records of a specific feed.
#[derive(Debug, Clone, Default)]
pub struct NormalizerService<A: FeedAdapter> {
    adapter: A,
}

impl<A: FeedAdapter> NormalizerService<A> {
    /// Create a new normalizer service with the given adapter.
    pub fn new(adapter: A) -> Self {
        Self { adapter }
    }

    /// Normalize a batch at the current wall-clock time.
    pub fn normalize(&self, records: &[A::Raw]) -> NormalizedBatch {
        self.normalize_at(records, Utc::now())
    }

    /// Normalize a batch at evaluation time `now`.
    ///
    /// A malformed record is logged and dropped; it never aborts the batch.
    pub fn normalize_at(&self, records: &[A::Raw], now: DateTime<Utc>) -> NormalizedBatch {
        let mut batch = NormalizedBatch {
            events: Vec::with_capacity(records.len()),
            dropped: Vec::new(),
        };

        for raw in records {
            match self.adapter.transform(raw, now) {
                Ok(event) => batch.events.push(event),
                Err(e) => {
                    warn!(
                        "[{}] Dropping record {}: {}",
                        A::NAME,
                        self.adapter.record_id(raw),
                        e
                    );
                    counter!("hazard_records_dropped_total", "feed" => A::NAME).increment(1);
                    batch.dropped.push(e);
                }
            }
        }

        counter!("hazard_records_normalized_total", "feed" => A::NAME)
            .increment(batch.events.len() as u64);

        debug!(
            "[{}] Normalized {} records ({} dropped)",
            A::NAME,
            batch.events.len(),
            batch.dropped.len()
        );

        batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eonet::EonetAdapter;
    use crate::severity::parse_timestamp;
    use crate::test_support::raw_event;

    #[test]
    fn test_malformed_record_does_not_abort_batch() {
        let now = parse_timestamp("2024-07-10T12:00:00Z").unwrap();
        let records = vec![
            raw_event("wildfires").id("A").point(now, 1.0, 2.0).build(),
            raw_event("wildfires").id("B").build(),
            raw_event("floods").id("C").point(now, 3.0, 4.0).build(),
        ];

        let service = NormalizerService::new(EonetAdapter::new());
        let batch = service.normalize_at(&records, now);

        let ids: Vec<&str> = batch.events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["A", "C"]);
        assert_eq!(batch.dropped_count(), 1);
        assert_eq!(batch.dropped[0], NormalizeError::malformed("B", "no geometry records"));
    }

    #[test]
    fn test_empty_batch() {
        let service = NormalizerService::new(EonetAdapter::new());
        let batch = service.normalize(&[]);
        assert!(batch.events.is_empty());
        assert!(batch.dropped.is_empty());
    }
}
