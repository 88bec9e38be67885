//! HTTP facade exposing the pipeline routing engine over JSON.
//!
//! Thin by design: handlers parse, validate, delegate to `pipeline-core`,
//! and serialize. No routing logic lives in this crate.

mod handlers;
mod state;

use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let state = AppState::new();

    let app = Router::new()
        .route("/api/calculate_route", post(handlers::calculate_route))
        .route("/api/terrain", get(handlers::terrain))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let addr: SocketAddr = std::env::var("PIPELINE_SERVER_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:8080".to_string())
        .parse()?;

    tracing::info!(%addr, "starting pipeline-server");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
