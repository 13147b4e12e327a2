//! EONET feed adapter implementation.

use crate::error::{NormalizeError, Result};
use crate::schema::{Coordinates, Event, EventStatus, UNKNOWN_CATEGORY};
use crate::severity::{classify, parse_timestamp};
use crate::traits::FeedAdapter;
use chrono::{DateTime, Utc};
use external_services::eonet::{GeometryKind, RawEvent, RawGeometry};
use serde_json::Value;

/// Deepest nesting searched for a vertex (MultiPolygon: polygon > ring > vertex).
const MAX_RING_DEPTH: usize = 3;

/// EONET feed adapter.
///
/// Resolves each record's latest geometry into a single position and derives
/// its severity at normalization time.
#[derive(Debug, Default, Clone)]
pub struct EonetAdapter;

impl EonetAdapter {
    /// Create a new EONET adapter.
    pub fn new() -> Self {
        Self
    }
}

impl FeedAdapter for EonetAdapter {
    const NAME: &'static str = "eonet";
    type Raw = RawEvent;

    fn record_id<'a>(&self, raw: &'a RawEvent) -> &'a str {
        &raw.id
    }

    fn transform(&self, raw: &RawEvent, now: DateTime<Utc>) -> Result<Event> {
        let latest = raw
            .latest_geometry()
            .ok_or_else(|| NormalizeError::malformed(&raw.id, "no geometry records"))?;

        let date = parse_timestamp(&latest.date).ok_or_else(|| {
            NormalizeError::malformed(&raw.id, format!("invalid geometry date '{}'", latest.date))
        })?;

        let closed = raw.closed.clone().filter(|c| !c.is_empty());
        let status = if closed.is_some() {
            EventStatus::Closed
        } else {
            EventStatus::Open
        };

        Ok(Event {
            id: raw.id.clone(),
            title: raw.title.clone(),
            description: raw.description.clone().unwrap_or_default(),
            category: raw
                .primary_category()
                .unwrap_or(UNKNOWN_CATEGORY)
                .to_string(),
            coordinates: resolve_coordinates(latest),
            severity: classify(raw, now),
            status,
            date,
            magnitude: format_magnitude(latest),
            sources: raw.sources.iter().map(|s| s.id.clone()).collect(),
            link: raw.link.clone(),
            closed,
        })
    }
}

// ============================================================================
// Geometry helpers (private)
// ============================================================================

/// Position of a geometry record, swapped from `[lon, lat]` to lat/lon.
///
/// Points use their coordinates directly; polygons use the first vertex of
/// the first ring.
fn resolve_coordinates(geometry: &RawGeometry) -> Option<Coordinates> {
    match geometry.kind {
        GeometryKind::Point => lon_lat_pair(&geometry.coordinates),
        GeometryKind::Polygon | GeometryKind::Other => {
            first_vertex(&geometry.coordinates, MAX_RING_DEPTH)
        }
    }
}

fn first_vertex(value: &Value, depth: usize) -> Option<Coordinates> {
    if let Some(coords) = lon_lat_pair(value) {
        return Some(coords);
    }
    if depth == 0 {
        return None;
    }
    value
        .as_array()
        .and_then(|items| items.first())
        .and_then(|first| first_vertex(first, depth - 1))
}

fn lon_lat_pair(value: &Value) -> Option<Coordinates> {
    match value.as_array()?.as_slice() {
        [lon, lat] => Some(Coordinates::from_lon_lat(lon.as_f64()?, lat.as_f64()?)),
        _ => None,
    }
}

/// `"<value> <unit>"`, trimmed. `None` when the record has no magnitude or
/// reports it as zero.
fn format_magnitude(geometry: &RawGeometry) -> Option<String> {
    let value = geometry
        .magnitude_value
        .filter(|v| *v != 0.0 && !v.is_nan())?;
    let unit = geometry.magnitude_unit.as_deref().unwrap_or_default();
    Some(format!("{} {}", value, unit).trim().to_string())
}

// ============================================================================
// Tests
// ============================================================================
