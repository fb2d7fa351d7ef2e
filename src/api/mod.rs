//! HTTP layer exposing the intent prediction service.

pub mod routes;
pub mod types;

use std::net::SocketAddr;

use anyhow::Result;
use axum::{
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::service::IntentService;

#[derive(Clone)]
pub struct AppState {
    pub service: IntentService,
    pub min_no_funder_confidence: f64,
}

/// Routes without a bound listener, so tests can drive them directly.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/predict", post(routes::predict))
        .route("/gate", post(routes::gate))
        .route("/health", get(routes::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn serve(state: AppState, host: String, port: u16) -> Result<()> {
    let addr: SocketAddr = format!("{host}:{port}").parse()?;
    let app = router(state);
    info!(%addr, "serving funder-intent API");
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("shutdown signal received");
    }
}
