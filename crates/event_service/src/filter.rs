//! Filter engine: criteria, criteria filtering, free-text search and the
//! list/map projections every view consumes.

use external_services::eonet::{EventQuery, FeedStatus, DEFAULT_LIMIT};
use normalizer::{Coordinates, Event, EventStatus, Severity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Number of events shown in the list view.
pub const LIST_LIMIT: usize = 20;

/// Default upstream date range, in days.
pub const DEFAULT_DATE_RANGE_DAYS: u32 = 30;

/// Either every value, or a single one.
///
/// Serialized as `"all"` or as the value's own string form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "String",
    into = "String",
    bound(
        serialize = "T: fmt::Display + Clone",
        deserialize = "T: FromStr, <T as FromStr>::Err: fmt::Display"
    )
)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    /// Whether `value` passes this selection.
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

impl<T> Selection<T> {
    pub fn as_only(&self) -> Option<&T> {
        match self {
            Selection::All => None,
            Selection::Only(value) => Some(value),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str("all"),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

impl<T> FromStr for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Selection::All);
        }
        s.parse::<T>().map(Selection::Only).map_err(|e| e.to_string())
    }
}

impl<T> TryFrom<String> for Selection<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl<T: fmt::Display> From<Selection<T>> for String {
    fn from(selection: Selection<T>) -> Self {
        selection.to_string()
    }
}

/// Active filter criteria.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterCriteria {
    /// Category id or `all`.
    #[serde(default)]
    pub category: Selection<String>,
    /// `open`, `closed` or `all`.
    #[serde(default)]
    pub status: Selection<EventStatus>,
    /// Severity tier or `all`.
    #[serde(default)]
    pub severity: Selection<Severity>,
    /// Upstream date range. Only affects what is fetched, never what is
    /// shown from already fetched data.
    #[serde(default)]
    pub date_range_days: Option<u32>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            category: Selection::All,
            status: Selection::Only(EventStatus::Open),
            severity: Selection::All,
            date_range_days: Some(DEFAULT_DATE_RANGE_DAYS),
        }
    }
}

impl FilterCriteria {
    /// Criteria that keep every event.
    pub fn all() -> Self {
        Self {
            category: Selection::All,
            status: Selection::All,
            severity: Selection::All,
            date_range_days: None,
        }
    }

    /// Whether a single event passes the criteria.
    pub fn matches(&self, event: &Event) -> bool {
        self.category.admits(&event.category)
            && self.status.admits(&event.status)
            && self.severity.admits(&event.severity)
    }

    /// Upstream query for these criteria.
    ///
    /// The feed has no "all" status, so `all` is requested as `open`.
    pub fn upstream_query(&self, limit: u32) -> EventQuery {
        let status = match self.status {
            Selection::Only(EventStatus::Closed) => FeedStatus::Closed,
            Selection::Only(EventStatus::Open) | Selection::All => FeedStatus::Open,
        };

        EventQuery {
            status,
            limit,
            category: self.category.as_only().cloned(),
            days: self.date_range_days.filter(|d| *d > 0),
        }
    }
}

impl From<&FilterCriteria> for EventQuery {
    fn from(criteria: &FilterCriteria) -> Self {
        criteria.upstream_query(DEFAULT_LIMIT)
    }
}

/// Keep events passing every criterion, preserving input order.
pub fn apply_filters(events: &[Event], criteria: &FilterCriteria) -> Vec<Event> {
    events
        .iter()
        .filter(|event| criteria.matches(event))
        .cloned()
        .collect()
}

/// Case-insensitive substring search over title, category and description.
///
/// An empty term falls back to [`apply_filters`] with `criteria`. A non-empty
/// term ignores `criteria` entirely; search and criteria are never combined.
pub fn search(events: &[Event], term: &str, criteria: &FilterCriteria) -> Vec<Event> {
    if term.is_empty() {
        return apply_filters(events, criteria);
    }

    let needle = term.to_lowercase();
    events
        .iter()
        .filter(|event| {
            event.title.to_lowercase().contains(&needle)
                || event.category.to_lowercase().contains(&needle)
                || event.description.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// The [`LIST_LIMIT`] most recent events, newest first.
pub fn list_view(filtered: &[Event]) -> Vec<Event> {
    let mut sorted = filtered.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(LIST_LIMIT);
    sorted
}

/// A map marker for one event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MapMarker {
    pub id: String,
    pub title: String,
    pub category: String,
    pub severity: Severity,
    pub status: EventStatus,
    pub coordinates: Coordinates,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<String>,
}

/// Markers for every filtered event with coordinates, in filtered order.
pub fn map_view(filtered: &[Event]) -> Vec<MapMarker> {
    filtered
        .iter()
        .filter_map(|event| {
            event.coordinates.map(|coordinates| MapMarker {
                id: event.id.clone(),
                title: event.title.clone(),
                category: event.category.clone(),
                severity: event.severity,
                status: event.status,
                coordinates,
                magnitude: event.magnitude.clone(),
            })
        })
        .collect()
}
