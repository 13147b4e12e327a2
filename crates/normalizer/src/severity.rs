//! Severity classification of raw feed records.
//!
//! Rules are evaluated in order and the first match wins:
//!
//! | # | condition                                              | tier     |
//! |---|--------------------------------------------------------|----------|
//! | 1 | earthquake with any magnitude > 7.0                    | critical |
//! | 2 | severe storm, more than 2 sources, recent              | critical |
//! | 3 | volcano, recent                                        | critical |
//! | 4 | wildfire or flood, more than 2 sources, recent         | high     |
//! | 5 | earthquake with any magnitude > 5.0                    | high     |
//! | 6 | recent, more than 2 sources                            | medium   |
//! | 7 | anything else                                          | low      |
//!
//! "Recent" depends on the evaluation time, so the same record can be
//! classified differently as time passes.

use crate::schema::{category, Severity};
use chrono::{DateTime, Utc};
use external_services::eonet::RawEvent;
use std::collections::HashSet;

/// Window, in calendar days, within which a geometry record counts as recent.
pub const RECENT_WINDOW_DAYS: f64 = 7.0;

/// Sources needed, strictly exceeded, for corroboration.
pub const MULTI_SOURCE_THRESHOLD: usize = 2;

pub const CRITICAL_MAGNITUDE: f64 = 7.0;
pub const HIGH_MAGNITUDE: f64 = 5.0;

const SECONDS_PER_DAY: f64 = 86_400.0;

/// Classify a raw record at evaluation time `now`.
pub fn classify(event: &RawEvent, now: DateTime<Utc>) -> Severity {
    let kind = event.primary_category().unwrap_or_default();
    let multi_source = distinct_sources(event) > MULTI_SOURCE_THRESHOLD;
    let recent = is_recent(event, now);

    if kind == category::EARTHQUAKES && max_magnitude_exceeds(event, CRITICAL_MAGNITUDE) {
        return Severity::Critical;
    }
    if kind == category::SEVERE_STORMS && multi_source && recent {
        return Severity::Critical;
    }
    if kind == category::VOLCANOES && recent {
        return Severity::Critical;
    }
    if (kind == category::WILDFIRES || kind == category::FLOODS) && multi_source && recent
    {
        return Severity::High;
    }
    if kind == category::EARTHQUAKES && max_magnitude_exceeds(event, HIGH_MAGNITUDE) {
        return Severity::High;
    }
    if recent && multi_source {
        return Severity::Medium;
    }

    Severity::Low
}

/// Number of distinct source identifiers.
pub fn distinct_sources(event: &RawEvent) -> usize {
    event
        .sources
        .iter()
        .map(|s| s.id.as_str())
        .collect::<HashSet<_>>()
        .len()
}

/// Whether any geometry record is less than [`RECENT_WINDOW_DAYS`] old.
///
/// Records with unparseable dates never count.
pub fn is_recent(event: &RawEvent, now: DateTime<Utc>) -> bool {
    event.geometry.iter().any(|g| {
        parse_timestamp(&g.date)
            .map(|date| age_in_days(date, now) < RECENT_WINDOW_DAYS)
            .unwrap_or(false)
    })
}

fn max_magnitude_exceeds(event: &RawEvent, threshold: f64) -> bool {
    event
        .geometry
        .iter()
        .any(|g| g.magnitude_value.is_some_and(|m| m > threshold))
}

fn age_in_days(date: DateTime<Utc>, now: DateTime<Utc>) -> f64 {
    (now - date).num_milliseconds() as f64 / 1000.0 / SECONDS_PER_DAY
}

/// Parse a feed timestamp (RFC 3339).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|d| d.with_timezone(&Utc))
}
