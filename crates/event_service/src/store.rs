//! In-memory hazard event state.
//!
//! The store owns the full event set, the active filter criteria, the active
//! search term and the derived filtered view. Every mutation recomputes the
//! filtered view and publishes one immutable [`ViewSnapshot`] on a `watch`
//! channel, so subscribers never observe a half-applied update.
//!
//! Reloads are sequence-numbered: a response is applied only if it belongs to
//! the most recently issued load, so overlapping reloads resolve to the last
//! one issued rather than the last one to complete.

use crate::filter::{apply_filters, search, FilterCriteria};
use crate::view::{SharedSnapshot, SnapshotParts, ViewMode, ViewSnapshot};
use chrono::{DateTime, Utc};
use metrics::{counter, gauge};
use normalizer::Event;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, info, warn};

/// Ticket for one issued load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn sequence(&self) -> u64 {
        self.0
    }
}

/// What happened to a load response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was the latest issued and now backs the view.
    Applied,
    /// A newer load was issued; the response was discarded.
    Stale,
}

impl LoadOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoadOutcome::Applied => "applied",
            LoadOutcome::Stale => "stale",
        }
    }
}

/// Shared hazard event store.
#[derive(Debug, Clone)]
pub struct EventStore {
    inner: Arc<StoreInner>,
}

#[derive(Debug)]
struct StoreInner {
    state: Mutex<StoreState>,
    snapshots: watch::Sender<SharedSnapshot>,
    /// Highest sequence number issued so far.
    issued: AtomicU64,
}

#[derive(Debug, Default)]
struct StoreState {
    /// Full event set of the last applied load. Replaced wholesale.
    events: Arc<Vec<Event>>,
    /// Derived view. Replaced wholesale on every pass.
    filtered: Vec<Event>,
    criteria: FilterCriteria,
    /// Active search term; `None` when the criteria filter is in effect.
    search_term: Option<String>,
    /// Sequence number of the load backing `events`.
    applied_sequence: u64,
    loading: bool,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

impl StoreState {
    fn recompute(&mut self) {
        self.filtered = match &self.search_term {
            Some(term) => search(&self.events, term, &self.criteria),
            None => apply_filters(&self.events, &self.criteria),
        };
    }

    fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot::build(SnapshotParts {
            load_sequence: self.applied_sequence,
            events: &self.events,
            filtered: &self.filtered,
            criteria: &self.criteria,
            mode: match &self.search_term {
                Some(term) => ViewMode::Search { term: term.clone() },
                None => ViewMode::Filters,
            },
            loading: self.loading,
            last_updated: self.last_updated,
            last_error: self.last_error.as_deref(),
        })
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

impl EventStore {
    /// Create an empty store with default criteria.
    pub fn new() -> Self {
        Self::with_criteria(FilterCriteria::default())
    }

    /// Create an empty store with the given initial criteria.
    pub fn with_criteria(criteria: FilterCriteria) -> Self {
        let state = StoreState {
            criteria,
            ..Default::default()
        };
        let (snapshots, _) = watch::channel(Arc::new(state.snapshot()));

        Self {
            inner: Arc::new(StoreInner {
                state: Mutex::new(state),
                snapshots,
                issued: AtomicU64::new(0),
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish the current state. Called with the lock held so snapshots are
    /// published in mutation order.
    fn publish(&self, state: &StoreState) -> SharedSnapshot {
        let snapshot = Arc::new(state.snapshot());
        self.inner.snapshots.send_replace(snapshot.clone());
        snapshot
    }

    // ------------------------------------------------------------------------
    // Loads
    // ------------------------------------------------------------------------

    /// Issue a new load. Any load issued earlier becomes stale.
    pub fn begin_load(&self) -> LoadTicket {
        let mut state = self.lock();
        let sequence = self.inner.issued.fetch_add(1, Ordering::SeqCst) + 1;
        state.loading = true;
        self.publish(&state);
        debug!("Issued load #{}", sequence);
        LoadTicket(sequence)
    }

    fn is_latest(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.inner.issued.load(Ordering::SeqCst)
    }

    /// Replace the event set with the result of `ticket`'s load.
    ///
    /// Discarded when a newer load has been issued since.
    pub fn complete_load(&self, ticket: LoadTicket, events: Vec<Event>) -> LoadOutcome {
        let mut state = self.lock();

        if !self.is_latest(ticket) {
            debug!(
                "Discarding stale load #{} ({} events)",
                ticket.0,
                events.len()
            );
            counter!("hazard_stale_responses_total").increment(1);
            return LoadOutcome::Stale;
        }

        let count = events.len();
        state.events = Arc::new(events);
        state.applied_sequence = ticket.0;
        state.loading = false;
        state.last_updated = Some(Utc::now());
        state.last_error = None;
        state.recompute();
        self.publish(&state);

        gauge!("hazard_events_loaded").set(count as f64);
        info!(
            "Applied load #{}: {} events, {} shown",
            ticket.0,
            count,
            state.filtered.len()
        );

        LoadOutcome::Applied
    }

    /// Record a failed load. The previous event set is kept.
    pub fn fail_load(&self, ticket: LoadTicket, message: impl Into<String>) -> LoadOutcome {
        let mut state = self.lock();
        let message = message.into();

        if !self.is_latest(ticket) {
            debug!("Ignoring failure of stale load #{}: {}", ticket.0, message);
            counter!("hazard_stale_responses_total").increment(1);
            return LoadOutcome::Stale;
        }

        warn!(
            "Load #{} failed, keeping {} previously loaded events: {}",
            ticket.0,
            state.events.len(),
            message
        );
        state.loading = false;
        state.last_error = Some(message);
        self.publish(&state);

        LoadOutcome::Applied
    }

    // ------------------------------------------------------------------------
    // Filters and search
    // ------------------------------------------------------------------------

    /// Replace the filter criteria. Clears any active search.
    pub fn set_filter(&self, criteria: FilterCriteria) -> SharedSnapshot {
        let mut state = self.lock();
        state.criteria = criteria;
        state.search_term = None;
        state.recompute();
        debug!("Filters updated: {} events shown", state.filtered.len());
        self.publish(&state)
    }

    /// Search the full event set. An empty term restores the criteria filter.
    pub fn search(&self, term: &str) -> SharedSnapshot {
        let mut state = self.lock();
        state.search_term = if term.is_empty() {
            None
        } else {
            Some(term.to_string())
        };
        state.recompute();
        debug!(
            "Search '{}': {} events shown",
            term,
            state.filtered.len()
        );
        self.publish(&state)
    }

    // ------------------------------------------------------------------------
    // Reads
    // ------------------------------------------------------------------------

    /// Subscribe to snapshots. The receiver starts at the current snapshot.
    pub fn subscribe(&self) -> watch::Receiver<SharedSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Latest published snapshot.
    pub fn snapshot(&self) -> SharedSnapshot {
        self.inner.snapshots.borrow().clone()
    }

    pub fn criteria(&self) -> FilterCriteria {
        self.lock().criteria.clone()
    }

    /// Full event set of the last applied load.
    pub fn events(&self) -> Arc<Vec<Event>> {
        self.lock().events.clone()
    }

    /// Look up an event in the full set, regardless of filters.
    pub fn find(&self, id: &str) -> Option<Event> {
        self.lock().events.iter().find(|e| e.id == id).cloned()
    }
}
