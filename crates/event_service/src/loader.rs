//! Fetches the hazard feed and publishes it into the store.

use crate::error::{Error, Result};
use crate::store::{EventStore, LoadOutcome};
use crate::traits::EventSource;
use external_services::eonet::DEFAULT_LIMIT;
use metrics::counter;
use normalizer::{EonetAdapter, NormalizerService};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{error, info};

/// Summary of one load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    pub sequence: u64,
    /// Events normalized from the response.
    pub loaded: usize,
    /// Records dropped as malformed.
    pub dropped: usize,
    pub outcome: LoadOutcome,
}

/// Loads events from an upstream source into an [`EventStore`].
#[derive(Clone)]
pub struct EventLoader {
    store: EventStore,
    source: Arc<dyn EventSource>,
    normalizer: NormalizerService<EonetAdapter>,
    limit: u32,
}

impl EventLoader {
    pub fn new(store: EventStore, source: Arc<dyn EventSource>) -> Self {
        Self {
            store,
            source,
            normalizer: NormalizerService::new(EonetAdapter::new()),
            limit: DEFAULT_LIMIT,
        }
    }

    /// Maximum number of events requested per load.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    /// Fetch the feed for the current criteria and replace the event set.
    ///
    /// On failure the previously loaded events stay in place and the error
    /// is recorded on the store. A response that arrives after a newer load
    /// was issued is discarded.
    pub async fn load(&self) -> Result<LoadReport> {
        let ticket = self.store.begin_load();
        let query = self.store.criteria().upstream_query(self.limit);
        let source = self.source.source_name();

        info!(
            "[{}] Load #{}: status={} days={:?} category={:?}",
            source,
            ticket.sequence(),
            query.status.as_str(),
            query.days,
            query.category
        );

        let raw = match self.source.fetch_events(&query).await {
            Ok(raw) => raw,
            Err(e) => {
                error!("[{}] Load #{} failed: {}", source, ticket.sequence(), e);
                counter!("hazard_feed_loads_total", "outcome" => "error").increment(1);
                self.store.fail_load(ticket, e.to_string());
                return Err(Error::Feed(e));
            }
        };

        let batch = self.normalizer.normalize(&raw);
        let loaded = batch.events.len();
        let dropped = batch.dropped_count();
        let outcome = self.store.complete_load(ticket, batch.events);

        counter!("hazard_feed_loads_total", "outcome" => outcome.as_str()).increment(1);

        Ok(LoadReport {
            sequence: ticket.sequence(),
            loaded,
            dropped,
            outcome,
        })
    }

    /// Reload every `interval` until a shutdown signal arrives.
    pub async fn run_periodic(self, interval: Duration, mut shutdown_rx: mpsc::Receiver<()>) {
        info!(
            "Background refresh task started (interval: {}s)",
            interval.as_secs()
        );

        loop {
            tokio::select! {
                biased;

                _ = shutdown_rx.recv() => {
                    info!("Background refresh received shutdown signal");
                    break;
                }

                _ = tokio::time::sleep(interval) => {
                    // Failures are already recorded on the store.
                    let _ = self.load().await;
                }
            }
        }

        info!("Background refresh stopped");
    }
}
