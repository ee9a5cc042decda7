//! HTTP API: Axum server exposing eligibility checks.
//!
//! Serves JSON endpoints for the loan form and trend chart.
//! CORS enabled for local development.

pub mod routes;

use anyhow::{Context, Result};
use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

pub use routes::{ApiState, AppState};

/// Build the Axum router with all routes and middleware.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/api/assess", post(routes::assess))
        .route("/api/customers", get(routes::list_customers))
        .route("/api/customers/:id/trend", get(routes::customer_trend))
        .route("/health", get(routes::health))
        .layer(cors)
        .with_state(state)
}

/// Run the API server until Ctrl+C.
pub async fn serve(state: AppState, addr: SocketAddr) -> Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind API address {addr}"))?;

    info!(%addr, "API server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutdown signal received.");
        })
        .await
        .context("API server error")?;

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
