//! Event service entry point.
//!
//! Loads hazard events from EONET into the in-memory store, reloads them
//! periodically and exposes the filtered views and weather lookups over HTTP.

use anyhow::Result;
use event_service::{
    create_router, AppState, EventLoader, EventStore, ServiceConfig, WeatherService,
};
use external_services::eonet::EonetClient;
use external_services::open_meteo::OpenMeteoClient;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting event service...");

    let config = ServiceConfig::from_env();

    // Initialize Prometheus metrics
    PrometheusBuilder::new()
        .with_http_listener(([0, 0, 0, 0], config.metrics_port))
        .install()?;

    info!(
        "Prometheus metrics available at http://0.0.0.0:{}/metrics",
        config.metrics_port
    );

    // Upstream clients
    let mut eonet = EonetClient::with_base_url(&config.eonet_base_url);
    let mut open_meteo = OpenMeteoClient::with_base_url(&config.open_meteo_base_url);
    if let Some(timeout) = config.http_timeout() {
        eonet = eonet.with_timeout(timeout)?;
        open_meteo = open_meteo.with_timeout(timeout)?;
    }
    info!("EONET feed: {}", eonet.events_url());
    info!("Open-Meteo: {}", open_meteo.base_url());

    let store = EventStore::with_criteria(config.initial_criteria());
    let loader = EventLoader::new(store.clone(), Arc::new(eonet)).with_limit(config.event_limit);
    let weather = WeatherService::new(Arc::new(open_meteo));

    // Initial load; the service starts even if the feed is down.
    match loader.load().await {
        Ok(report) => info!(
            "Initial load: {} events ({} dropped)",
            report.loaded, report.dropped
        ),
        Err(e) => warn!("Initial load failed, serving empty view: {}", e),
    }

    // Spawn background refresh task
    let (refresh_shutdown_tx, refresh_shutdown_rx) = mpsc::channel(1);
    let refresh_handle = match config.refresh_interval() {
        Some(interval) => Some(tokio::spawn(
            loader.clone().run_periodic(interval, refresh_shutdown_rx),
        )),
        None => {
            info!("Background refresh disabled (REFRESH_INTERVAL_SECS=0)");
            None
        }
    };

    // Create HTTP server
    let state = Arc::new(AppState {
        store,
        loader,
        weather,
    });
    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.http_port));
    let listener = TcpListener::bind(addr).await?;
    info!("HTTP API listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /health                - Health check");
    info!("  GET  /events                - Filtered events");
    info!("  GET  /events/list           - Most recent filtered events");
    info!("  GET  /events/map            - Map markers");
    info!("  GET  /events/{{id}}           - Event details");
    info!("  GET  /summary               - Dashboard counters");
    info!("  GET  /filters               - Current filter criteria");
    info!("  PUT  /filters               - Replace filter criteria");
    info!("  GET  /search?q=             - Free-text search");
    info!("  POST /refresh               - Reload the feed");
    info!("  GET  /cities                - Weather cities");
    info!("  GET  /weather?lat=&lon=     - Weather at a position");
    info!("  GET  /weather/city/{{name}}   - Weather for a city");

    // Run server with graceful shutdown
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Stop background refresh
    if let Some(handle) = refresh_handle {
        info!("Stopping background refresh...");
        let _ = refresh_shutdown_tx.send(()).await;
        if let Err(e) = handle.await {
            error!("Background refresh task failed: {:?}", e);
        }
    }

    info!("Event service stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C"),
        _ = terminate => info!("Received terminate signal"),
    }
}
