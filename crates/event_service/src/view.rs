//! Immutable view snapshots handed to subscribers and the HTTP API.

use crate::filter::{list_view, map_view, FilterCriteria, MapMarker};
use chrono::{DateTime, Utc};
use normalizer::schema::category;
use normalizer::{Event, Severity};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Categories with a dedicated counter in the sidebar.
pub const COUNTED_CATEGORIES: [&str; 5] = [
    category::WILDFIRES,
    category::SEVERE_STORMS,
    category::EARTHQUAKES,
    category::FLOODS,
    category::VOLCANOES,
];

/// Dashboard counters over the filtered set.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct DashboardMetrics {
    pub total: usize,
    pub critical: usize,
    pub wildfires: usize,
    pub earthquakes: usize,
}

impl DashboardMetrics {
    pub fn from_events(events: &[Event]) -> Self {
        let count_category = |id: &str| events.iter().filter(|e| e.category == id).count();

        Self {
            total: events.len(),
            critical: events
                .iter()
                .filter(|e| e.severity == Severity::Critical)
                .count(),
            wildfires: count_category(category::WILDFIRES),
            earthquakes: count_category(category::EARTHQUAKES),
        }
    }
}

/// Per-category counts over the full event set, independent of filters.
pub fn category_counts(events: &[Event]) -> HashMap<String, usize> {
    let mut counts: HashMap<String, usize> = COUNTED_CATEGORIES
        .iter()
        .map(|c| (c.to_string(), 0))
        .collect();

    for event in events {
        if let Some(count) = counts.get_mut(&event.category) {
            *count += 1;
        }
    }

    counts
}

/// How the filtered set was derived.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ViewMode {
    Filters,
    Search { term: String },
}

/// One consistent view of the store. Every surface reads the same snapshot.
#[derive(Debug, Clone, Serialize)]
pub struct ViewSnapshot {
    /// Sequence number of the load that produced the event set (0 before
    /// the first successful load).
    pub load_sequence: u64,
    pub criteria: FilterCriteria,
    pub mode: ViewMode,
    /// Every filtered event, in feed order.
    pub filtered: Vec<Event>,
    /// List view: most recent first, truncated.
    pub list: Vec<Event>,
    /// Map view: every filtered event with coordinates.
    pub markers: Vec<MapMarker>,
    pub metrics: DashboardMetrics,
    pub category_counts: HashMap<String, usize>,
    /// Size of the full event set.
    pub total_loaded: usize,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<String>,
}

impl ViewSnapshot {
    /// Derive every view from the full event set and the filtered subset.
    pub fn build(state: SnapshotParts<'_>) -> Self {
        Self {
            load_sequence: state.load_sequence,
            criteria: state.criteria.clone(),
            mode: state.mode,
            list: list_view(state.filtered),
            markers: map_view(state.filtered),
            metrics: DashboardMetrics::from_events(state.filtered),
            category_counts: category_counts(state.events),
            filtered: state.filtered.to_vec(),
            total_loaded: state.events.len(),
            loading: state.loading,
            last_updated: state.last_updated,
            last_error: state.last_error.map(str::to_string),
        }
    }

    /// Whether the filtered view is empty (an explicit empty state, not an error).
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}

impl Default for ViewSnapshot {
    fn default() -> Self {
        Self::build(SnapshotParts {
            load_sequence: 0,
            events: &[],
            filtered: &[],
            criteria: &FilterCriteria::default(),
            mode: ViewMode::Filters,
            loading: false,
            last_updated: None,
            last_error: None,
        })
    }
}

/// Borrowed inputs for [`ViewSnapshot::build`].
pub struct SnapshotParts<'a> {
    pub load_sequence: u64,
    pub events: &'a [Event],
    pub filtered: &'a [Event],
    pub criteria: &'a FilterCriteria,
    pub mode: ViewMode,
    pub loading: bool,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_error: Option<&'a str>,
}

/// Shared handle to a snapshot.
pub type SharedSnapshot = Arc<ViewSnapshot>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::fixtures::mixed_events;
    use crate::filter::{apply_filters, Selection};

    #[test]
    fn test_dashboard_metrics() {
        let events = mixed_events();
        let metrics = DashboardMetrics::from_events(&events);
        assert_eq!(
            metrics,
            DashboardMetrics {
                total: 5,
                critical: 2,
                wildfires: 2,
                earthquakes: 1,
            }
        );
    }

    #[test]
    fn test_category_counts_cover_full_set() {
        let events = mixed_events();
        let counts = category_counts(&events);
        assert_eq!(counts["wildfires"], 2);
        assert_eq!(counts["severeStorms"], 0);
        assert_eq!(counts["volcanoes"], 1);
        assert_eq!(counts.len(), COUNTED_CATEGORIES.len());
    }

    #[test]
    fn test_snapshot_counts_use_full_set_and_metrics_use_filtered() {
        let events = mixed_events();
        let criteria = FilterCriteria {
            category: Selection::Only("volcanoes".to_string()),
            ..FilterCriteria::all()
        };
        let filtered = apply_filters(&events, &criteria);

        let snapshot = ViewSnapshot::build(SnapshotParts {
            load_sequence: 3,
            events: &events,
            filtered: &filtered,
            criteria: &criteria,
            mode: ViewMode::Filters,
            loading: false,
            last_updated: None,
            last_error: None,
        });

        assert_eq!(snapshot.metrics.total, 1);
        assert_eq!(snapshot.category_counts["wildfires"], 2);
        assert_eq!(snapshot.total_loaded, 5);
        assert_eq!(snapshot.markers.len(), 1);
        assert!(!snapshot.is_empty());
    }

    #[test]
    fn test_default_snapshot_is_empty_state() {
        let snapshot = ViewSnapshot::default();
        assert!(snapshot.is_empty());
        assert!(snapshot.list.is_empty());
        assert_eq!(snapshot.metrics, DashboardMetrics::default());
        assert!(snapshot.last_error.is_none());
    }
}
