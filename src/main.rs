// Main entry point - Dependency injection and server setup
mod domain;
mod application;
mod infrastructure;
mod presentation;
#[cfg(test)]
mod test_support;

use std::sync::Arc;

use anyhow::Context;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::application::dashboard_service::{Dashboard, PanelSources, RefreshIntervals};
use crate::infrastructure::config::load_config;
use crate::infrastructure::http_client::JsonClient;
use crate::infrastructure::iss_client::IssSource;
use crate::infrastructure::nasa_client::{ApodSource, NasaClient, NeoFeedSource};
use crate::infrastructure::synthetic::{MarsWeatherGenerator, TelemetryGenerator};
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::routes;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = load_config()?;
    tracing::debug!(?config, "configuration loaded");

    // Create sources (infrastructure layer)
    let http = JsonClient::new(config.http.timeout())?;
    let nasa = NasaClient::new(http.clone(), &config.nasa.base_url, &config.nasa.api_key);
    let sources = PanelSources {
        telemetry: Arc::new(TelemetryGenerator::new()),
        iss: Arc::new(IssSource::new(http, &config.iss.url)),
        mars_weather: Arc::new(MarsWeatherGenerator::new()),
        apod: Arc::new(ApodSource::new(nasa.clone())),
        asteroids: Arc::new(NeoFeedSource::new(nasa)),
    };

    // Create the dashboard (application layer)
    let dashboard = Arc::new(Dashboard::new(
        sources,
        RefreshIntervals::from(&config.refresh),
    ));
    dashboard.start().await;

    // Build router (presentation layer)
    // Compression is negotiated per response by the handlers, so no
    // CompressionLayer here.
    let state = Arc::new(AppState {
        dashboard: dashboard.clone(),
    });
    let router = routes(state).layer(TraceLayer::new_for_http());

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.server.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    tracing::info!(addr = %config.server.bind, "starting mission-control-telemetry");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    dashboard.shutdown().await;
    tracing::info!("stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
