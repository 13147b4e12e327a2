//! HTTP API for the event service.
//!
//! Endpoints:
//! - `GET /health` - Health check
//! - `GET /events` - Every event in the current view
//! - `GET /events/list` - The most recent events in the current view
//! - `GET /events/map` - Map markers for the current view
//! - `GET /events/{id}` - Event details, regardless of filters
//! - `GET /summary` - Dashboard counters and load status
//! - `GET /filters`, `PUT /filters` - Read or replace the filter criteria
//! - `GET /search?q=` - Free-text search over the loaded events
//! - `POST /refresh` - Reload the feed
//! - `GET /cities` - Cities available for weather lookup
//! - `GET /weather?lat=&lon=` - Weather at a position
//! - `GET /weather/city/{name}` - Weather for a city

use crate::cities::{City, CITIES};
use crate::error::Error;
use crate::filter::{FilterCriteria, MapMarker};
use crate::loader::EventLoader;
use crate::store::EventStore;
use crate::view::{DashboardMetrics, ViewMode, ViewSnapshot};
use crate::weather::{CityWeather, WeatherService};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use external_services::open_meteo::WeatherReport;
use normalizer::Event;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Application state shared across handlers.
pub struct AppState {
    pub store: EventStore,
    pub loader: EventLoader,
    pub weather: WeatherService,
}

/// Create the HTTP router.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        // Event views
        .route("/events", get(events_handler))
        .route("/events/list", get(list_handler))
        .route("/events/map", get(map_handler))
        .route("/events/{id}", get(event_details_handler))
        .route("/summary", get(summary_handler))
        // Filters and search
        .route("/filters", get(get_filters_handler).put(set_filters_handler))
        .route("/search", get(search_handler))
        .route("/refresh", post(refresh_handler))
        // Weather
        .route("/cities", get(cities_handler))
        .route("/weather", get(weather_handler))
        .route("/weather/city/{name}", get(city_weather_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    retryable: bool,
}

/// Error returned by handlers.
pub struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            Error::NotFound(_) | Error::UnknownCity(_) => StatusCode::NOT_FOUND,
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Feed(_) | Error::Weather(_) => StatusCode::BAD_GATEWAY,
        };

        let body = ErrorResponse {
            error: self.0.to_string(),
            retryable: self.0.is_retryable(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = std::result::Result<Json<T>, ApiError>;

// =============================================================================
// Response Types
// =============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    events_loaded: usize,
    last_updated: Option<DateTime<Utc>>,
}

#[derive(Serialize)]
struct EventsResponse {
    #[serde(flatten)]
    mode: ViewMode,
    events: Vec<Event>,
    count: usize,
}

impl From<&ViewSnapshot> for EventsResponse {
    fn from(snapshot: &ViewSnapshot) -> Self {
        Self {
            mode: snapshot.mode.clone(),
            events: snapshot.filtered.clone(),
            count: snapshot.filtered.len(),
        }
    }
}

#[derive(Serialize)]
struct ListResponse {
    events: Vec<Event>,
    count: usize,
    /// Size of the whole filtered view.
    total: usize,
    /// No event matches the active criteria or search.
    empty: bool,
}

#[derive(Serialize)]
struct MapResponse {
    markers: Vec<MapMarker>,
    count: usize,
}

#[derive(Serialize)]
struct SummaryResponse {
    metrics: DashboardMetrics,
    category_counts: HashMap<String, usize>,
    total_loaded: usize,
    load_sequence: u64,
    loading: bool,
    last_updated: Option<DateTime<Utc>>,
    last_error: Option<String>,
}

#[derive(Serialize)]
struct RefreshResponse {
    status: String,
    sequence: u64,
    loaded: usize,
    dropped: usize,
}

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

#[derive(Debug, Deserialize)]
struct WeatherParams {
    lat: f64,
    lon: f64,
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint.
async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let snapshot = state.store.snapshot();
    Json(HealthResponse {
        status: "ok".to_string(),
        events_loaded: snapshot.total_loaded,
        last_updated: snapshot.last_updated,
    })
}

/// Every event in the current view, in feed order.
async fn events_handler(State(state): State<Arc<AppState>>) -> Json<EventsResponse> {
    let snapshot = state.store.snapshot();
    Json(EventsResponse::from(snapshot.as_ref()))
}

async fn list_handler(State(state): State<Arc<AppState>>) -> Json<ListResponse> {
    let snapshot = state.store.snapshot();
    Json(ListResponse {
        events: snapshot.list.clone(),
        count: snapshot.list.len(),
        total: snapshot.filtered.len(),
        empty: snapshot.is_empty(),
    })
}

async fn map_handler(State(state): State<Arc<AppState>>) -> Json<MapResponse> {
    let snapshot = state.store.snapshot();
    Json(MapResponse {
        markers: snapshot.markers.clone(),
        count: snapshot.markers.len(),
    })
}

async fn event_details_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Event> {
    state
        .store
        .find(&id)
        .map(Json)
        .ok_or_else(|| Error::NotFound(id).into())
}

async fn summary_handler(State(state): State<Arc<AppState>>) -> Json<SummaryResponse> {
    let snapshot = state.store.snapshot();
    Json(SummaryResponse {
        metrics: snapshot.metrics.clone(),
        category_counts: snapshot.category_counts.clone(),
        total_loaded: snapshot.total_loaded,
        load_sequence: snapshot.load_sequence,
        loading: snapshot.loading,
        last_updated: snapshot.last_updated,
        last_error: snapshot.last_error.clone(),
    })
}

async fn get_filters_handler(State(state): State<Arc<AppState>>) -> Json<FilterCriteria> {
    Json(state.store.criteria())
}

/// Replace the criteria. Takes effect on the loaded events immediately; the
/// upstream query changes on the next refresh.
async fn set_filters_handler(
    State(state): State<Arc<AppState>>,
    Json(criteria): Json<FilterCriteria>,
) -> Json<EventsResponse> {
    let snapshot = state.store.set_filter(criteria);
    Json(EventsResponse::from(snapshot.as_ref()))
}

async fn search_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Json<EventsResponse> {
    let snapshot = state.store.search(&params.q);
    Json(EventsResponse::from(snapshot.as_ref()))
}

async fn refresh_handler(State(state): State<Arc<AppState>>) -> ApiResult<RefreshResponse> {
    let report = state.loader.load().await.map_err(|e| {
        error!("Manual refresh failed: {}", e);
        ApiError::from(e)
    })?;

    Ok(Json(RefreshResponse {
        status: report.outcome.as_str().to_string(),
        sequence: report.sequence,
        loaded: report.loaded,
        dropped: report.dropped,
    }))
}

async fn cities_handler() -> Json<&'static [City]> {
    Json(CITIES.as_slice())
}

async fn weather_handler(
    State(state): State<Arc<AppState>>,
    Query(params): Query<WeatherParams>,
) -> ApiResult<WeatherReport> {
    let report = state.weather.at(params.lat, params.lon).await?;
    Ok(Json(report))
}

async fn city_weather_handler(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<CityWeather> {
    let weather = state.weather.for_city(&name).await?;
    Ok(Json(weather))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::fixtures::mixed_events;
    use crate::traits::fakes::{FakeEventSource, FakeWeatherSource};
    use axum::body::Body;
    use axum::http::{header, Method, Request};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct Harness {
        state: Arc<AppState>,
        feed: Arc<FakeEventSource>,
    }

    fn harness(weather: FakeWeatherSource) -> Harness {
        let store = EventStore::with_criteria(FilterCriteria::all());
        let feed = Arc::new(FakeEventSource::new());
        let loader = EventLoader::new(store.clone(), feed.clone());
        let state = Arc::new(AppState {
            store,
            loader,
            weather: WeatherService::new(Arc::new(weather)),
        });
        Harness { state, feed }
    }

    fn loaded_harness() -> Harness {
        let harness = harness(FakeWeatherSource::new());
        let ticket = harness.state.store.begin_load();
        harness.state.store.complete_load(ticket, mixed_events());
        harness
    }

    async fn send(state: &Arc<AppState>, request: Request<Body>) -> (StatusCode, Value) {
        let response = create_router(state.clone()).oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, Value) {
        send(state, Request::get(uri).body(Body::empty()).unwrap()).await
    }

    #[tokio::test]
    async fn test_health() {
        let h = loaded_harness();
        let (status, body) = get(&h.state, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["events_loaded"], 5);
    }

    #[tokio::test]
    async fn test_events_and_views() {
        let h = loaded_harness();

        let (status, body) = get(&h.state, "/events").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 5);
        assert_eq!(body["mode"], "filters");

        let (_, body) = get(&h.state, "/events/list").await;
        assert_eq!(body["count"], 5);
        assert_eq!(body["empty"], false);

        let (_, body) = get(&h.state, "/events/map").await;
        assert_eq!(body["count"], 5);
        assert!(body["markers"][0]["coordinates"]["lat"].is_number());
    }

    #[tokio::test]
    async fn test_event_details() {
        let h = loaded_harness();

        let (status, body) = get(&h.state, "/events/2").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["category"], "earthquakes");
        assert_eq!(body["severity"], "critical");

        let (status, body) = get(&h.state, "/events/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"], "Event not found: nope");
    }

    #[tokio::test]
    async fn test_put_filters_updates_every_view() {
        let h = loaded_harness();
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/filters")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                json!({"category": "all", "status": "open", "severity": "critical"}).to_string(),
            ))
            .unwrap();

        let (status, body) = send(&h.state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 2);

        let (_, body) = get(&h.state, "/filters").await;
        assert_eq!(body["severity"], "critical");
        assert_eq!(body["status"], "open");

        let (_, body) = get(&h.state, "/summary").await;
        assert_eq!(body["metrics"]["critical"], 2);
        assert_eq!(body["metrics"]["total"], 2);
        assert_eq!(body["category_counts"]["wildfires"], 2);
        assert_eq!(body["total_loaded"], 5);
    }

    #[tokio::test]
    async fn test_put_filters_rejects_unknown_severity() {
        let h = loaded_harness();
        let request = Request::builder()
            .method(Method::PUT)
            .uri("/filters")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({"severity": "extreme"}).to_string()))
            .unwrap();

        let (status, _) = send(&h.state, request).await;
        assert!(status.is_client_error());
        assert_eq!(h.state.store.criteria(), FilterCriteria::all());
    }

    #[tokio::test]
    async fn test_search() {
        let h = loaded_harness();

        let (_, body) = get(&h.state, "/search?q=volcano").await;
        assert_eq!(body["count"], 1);
        assert_eq!(body["mode"], "search");
        assert_eq!(body["term"], "volcano");

        let (_, body) = get(&h.state, "/search?q=").await;
        assert_eq!(body["mode"], "filters");
        assert_eq!(body["count"], 5);

        // Whitespace is a real term, not a reset to the filters.
        let (_, body) = get(&h.state, "/search?q=%20").await;
        assert_eq!(body["mode"], "search");
        assert_eq!(body["term"], " ");
        assert_eq!(body["count"], 5);
    }

    #[tokio::test]
    async fn test_refresh_failure_is_bad_gateway() {
        let h = loaded_harness();
        h.feed.push_err(external_services::Error::Api {
            status: 503,
            message: "Service Unavailable".to_string(),
        });

        let request = Request::post("/refresh").body(Body::empty()).unwrap();
        let (status, body) = send(&h.state, request).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["retryable"], true);

        // Previously loaded events are still served.
        let (_, body) = get(&h.state, "/summary").await;
        assert_eq!(body["total_loaded"], 5);
        assert!(body["last_error"].as_str().unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_refresh_applies_new_feed() {
        let h = harness(FakeWeatherSource::new());
        h.feed.push_ok(Vec::new());

        let request = Request::post("/refresh").body(Body::empty()).unwrap();
        let (status, body) = send(&h.state, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "applied");
        assert_eq!(body["loaded"], 0);

        let (_, body) = get(&h.state, "/events/list").await;
        assert_eq!(body["empty"], true);
    }

    #[tokio::test]
    async fn test_cities() {
        let h = loaded_harness();
        let (_, body) = get(&h.state, "/cities").await;
        assert_eq!(body.as_array().unwrap().len(), 10);
        assert_eq!(body[0]["name"], "Madrid");
    }

    #[tokio::test]
    async fn test_weather_lookups() {
        let h = loaded_harness();

        let (status, body) = get(&h.state, "/weather?lat=35.2&lon=-118.5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["current"]["description"], "Overcast");

        let (status, body) = get(&h.state, "/weather/city/tokyo").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["city"], "Tokyo");
        assert_eq!(body["latitude"], 35.6762);

        let (status, _) = get(&h.state, "/weather/city/atlantis").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = get(&h.state, "/weather?lat=95&lon=0").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_weather_failure_leaves_events_untouched() {
        let h = harness(FakeWeatherSource::failing(500));
        let ticket = h.state.store.begin_load();
        h.state.store.complete_load(ticket, mixed_events());

        let (status, body) = get(&h.state, "/weather/city/Madrid").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["retryable"], true);

        let (_, body) = get(&h.state, "/summary").await;
        assert_eq!(body["total_loaded"], 5);
        assert!(body["last_error"].is_null());
    }
}
