//! EONET v3 data types.

use serde::{Deserialize, Deserializer, Serialize};

/// Treat an explicit `null` like a missing key.
///
/// The feed publishes `null` for absent values, and one such record must not
/// fail the whole response.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Response body of `GET /events`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventsResponse {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub events: Vec<RawEvent>,
}

/// Event record as published by the feed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub link: String,
    /// Closing timestamp (ISO 8601), `null` while the event is open.
    #[serde(default)]
    pub closed: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub categories: Vec<RawCategory>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub sources: Vec<RawSource>,
    /// Chronological geometry history, oldest first.
    #[serde(default, deserialize_with = "null_as_default")]
    pub geometry: Vec<RawGeometry>,
}

impl RawEvent {
    /// Id of the first category, if any.
    pub fn primary_category(&self) -> Option<&str> {
        self.categories.first().map(|c| c.id.as_str())
    }

    /// Most recent geometry record.
    pub fn latest_geometry(&self) -> Option<&RawGeometry> {
        self.geometry.last()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCategory {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawSource {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default)]
    pub url: Option<String>,
}

/// Geometry kind of a geometry record.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum GeometryKind {
    Point,
    Polygon,
    #[default]
    #[serde(other)]
    Other,
}

/// One time-stamped position/shape entry within an event's history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGeometry {
    /// Observation timestamp (ISO 8601). Empty when the feed omits it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(rename = "type", default, deserialize_with = "null_as_default")]
    pub kind: GeometryKind,
    /// `[lon, lat]` for points, rings of `[lon, lat]` for polygons.
    #[serde(default)]
    pub coordinates: serde_json::Value,
    #[serde(rename = "magnitudeValue", default)]
    pub magnitude_value: Option<f64>,
    #[serde(rename = "magnitudeUnit", default)]
    pub magnitude_unit: Option<String>,
}

/// Status parameter accepted by the feed.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FeedStatus {
    #[default]
    Open,
    Closed,
}

impl FeedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FeedStatus::Open => "open",
            FeedStatus::Closed => "closed",
        }
    }
}

/// Query parameters for `GET /events`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventQuery {
    pub status: FeedStatus,
    pub limit: u32,
    pub category: Option<String>,
    pub days: Option<u32>,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            status: FeedStatus::Open,
            limit: super::DEFAULT_LIMIT,
            category: None,
            days: None,
        }
    }
}

impl EventQuery {
    /// Query string pairs in the order the feed documents them.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("status", self.status.as_str().to_string()),
            ("limit", self.limit.to_string()),
        ];
        if let Some(category) = &self.category {
            params.push(("category", category.clone()));
        }
        if let Some(days) = self.days {
            params.push(("days", days.to_string()));
        }
        params
    }
}
