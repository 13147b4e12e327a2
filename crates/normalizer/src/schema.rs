//! Normalized hazard event schema definitions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Category assigned when the raw record carries none.
pub const UNKNOWN_CATEGORY: &str = "unknown";

/// Feed category ids with dedicated handling.
pub mod category {
    pub const WILDFIRES: &str = "wildfires";
    pub const SEVERE_STORMS: &str = "severeStorms";
    pub const EARTHQUAKES: &str = "earthquakes";
    pub const FLOODS: &str = "floods";
    pub const VOLCANOES: &str = "volcanoes";
}

/// Derived urgency classification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

impl Severity {
    pub const ALL: [Severity; 4] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Critical => "critical",
            Severity::High => "high",
            Severity::Medium => "medium",
            Severity::Low => "low",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "critical" => Ok(Severity::Critical),
            "high" => Ok(Severity::High),
            "medium" => Ok(Severity::Medium),
            "low" => Ok(Severity::Low),
            other => Err(format!("unknown severity: {}", other)),
        }
    }
}

/// Open/closed state of an event.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Open,
    Closed,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Open => "open",
            EventStatus::Closed => "closed",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "open" => Ok(EventStatus::Open),
            "closed" => Ok(EventStatus::Closed),
            other => Err(format!("unknown status: {}", other)),
        }
    }
}

/// Position in degrees, latitude first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinates {
    /// Build from the feed's `[lon, lat]` order.
    pub fn from_lon_lat(lon: f64, lat: f64) -> Self {
        Self { lat, lon }
    }

    /// `[lat, lon]` pair as map widgets expect it.
    pub fn as_lat_lon(&self) -> [f64; 2] {
        [self.lat, self.lon]
    }
}

/// Normalized hazard event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Event {
    /// Feed identifier, stable across reloads.
    pub id: String,
    pub title: String,
    /// Empty when the feed has no description.
    pub description: String,
    /// First category id, or [`UNKNOWN_CATEGORY`].
    pub category: String,
    /// Latest position. `None` when the latest geometry could not be parsed;
    /// such events are listed but never placed on a map.
    pub coordinates: Option<Coordinates>,
    /// Computed once per load cycle.
    pub severity: Severity,
    pub status: EventStatus,
    /// Timestamp of the latest geometry record.
    pub date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub magnitude: Option<String>,
    pub sources: Vec<String>,
    pub link: String,
    pub closed: Option<String>,
}

impl Event {
    /// Whether the event can be rendered as a map marker.
    pub fn is_mappable(&self) -> bool {
        self.coordinates.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_round_trip_names() {
        for severity in Severity::ALL {
            assert_eq!(severity.as_str().parse::<Severity>().unwrap(), severity);
        }
        assert!("extreme".parse::<Severity>().is_err());
    }

    #[test]
    fn test_severity_serde_lowercase() {
        let json = serde_json::to_string(&Severity::Critical).unwrap();
        assert_eq!(json, "\"critical\"");
    }

    #[test]
    fn test_coordinates_axis_order() {
        let coords = Coordinates::from_lon_lat(-118.5, 35.2);
        assert_eq!(coords.as_lat_lon(), [35.2, -118.5]);
    }
}
