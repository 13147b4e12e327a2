//! Builders for raw feed records, shared by unit tests across the workspace.

use chrono::{DateTime, SecondsFormat, Utc};
use external_services::eonet::{GeometryKind, RawCategory, RawEvent, RawGeometry, RawSource};

/// Start a builder for a record in `category`.
pub fn raw_event(category: &str) -> RawEventBuilder {
    RawEventBuilder::new(category)
}

#[derive(Debug, Clone)]
pub struct RawEventBuilder {
    event: RawEvent,
}

impl RawEventBuilder {
    pub fn new(category: &str) -> Self {
        Self {
            event: RawEvent {
                id: format!("EONET_{}", category),
                title: format!("Test {}", category),
                description: None,
                link: format!("https://eonet.gsfc.nasa.gov/api/v3/events/EONET_{}", category),
                closed: None,
                categories: vec![RawCategory {
                    id: category.to_string(),
                    title: None,
                }],
                sources: Vec::new(),
                geometry: Vec::new(),
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.event.id = id.to_string();
        self
    }

    pub fn title(mut self, title: &str) -> Self {
        self.event.title = title.to_string();
        self
    }

    pub fn description(mut self, description: &str) -> Self {
        self.event.description = Some(description.to_string());
        self
    }

    pub fn closed(mut self, closed: &str) -> Self {
        self.event.closed = Some(closed.to_string());
        self
    }

    pub fn sources(mut self, ids: &[&str]) -> Self {
        self.event.sources = ids
            .iter()
            .map(|id| RawSource {
                id: id.to_string(),
                url: None,
            })
            .collect();
        self
    }

    /// Append a point geometry at `date`, `coordinates` in `[lon, lat]` order.
    pub fn point(mut self, date: DateTime<Utc>, lon: f64, lat: f64) -> Self {
        self.event.geometry.push(RawGeometry {
            date: format_timestamp(date),
            kind: GeometryKind::Point,
            coordinates: serde_json::json!([lon, lat]),
            magnitude_value: None,
            magnitude_unit: None,
        });
        self
    }

    /// Append a point geometry at `date` with an optional magnitude.
    pub fn point_at(self, date: DateTime<Utc>, magnitude: Option<f64>) -> Self {
        let mut builder = self.point(date, 10.0, 20.0);
        if let Some(geometry) = builder.event.geometry.last_mut() {
            geometry.magnitude_value = magnitude;
        }
        builder
    }

    /// Set the magnitude of the latest geometry record.
    pub fn magnitude(mut self, value: f64, unit: Option<&str>) -> Self {
        if let Some(geometry) = self.event.geometry.last_mut() {
            geometry.magnitude_value = Some(value);
            geometry.magnitude_unit = unit.map(str::to_string);
        }
        self
    }

    /// Append a polygon geometry with raw `coordinates`.
    pub fn polygon(mut self, date: DateTime<Utc>, coordinates: serde_json::Value) -> Self {
        self.event.geometry.push(RawGeometry {
            date: format_timestamp(date),
            kind: GeometryKind::Polygon,
            coordinates,
            magnitude_value: None,
            magnitude_unit: None,
        });
        self
    }

    /// Append a point geometry with an arbitrary date string and coordinates.
    pub fn raw_point(mut self, date: &str, coordinates: serde_json::Value) -> Self {
        self.event.geometry.push(RawGeometry {
            date: date.to_string(),
            kind: GeometryKind::Point,
            coordinates,
            magnitude_value: None,
            magnitude_unit: None,
        });
        self
    }

    pub fn build(self) -> RawEvent {
        self.event
    }
}

fn format_timestamp(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}
