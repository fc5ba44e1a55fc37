// SPDX-License-Identifier: MIT

//! The metrics HTTP exposition server (spec.md §4.6): `GET /metrics` in
//! Prometheus text format, `GET /healthz` for liveness, torn down via
//! `axum::serve(..).with_graceful_shutdown(..)`.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::MetricsError;
use crate::registry::PrometheusMetrics;

#[derive(Clone)]
struct AppState {
    metrics: Arc<PrometheusMetrics>,
}

async fn metrics_handler(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.gather_text(),
    )
}

async fn healthz_handler() -> impl IntoResponse {
    StatusCode::OK
}

fn router(metrics: Arc<PrometheusMetrics>) -> Router {
    Router::new()
        .route("/metrics", get(metrics_handler))
        .route("/healthz", get(healthz_handler))
        .with_state(AppState { metrics })
}

/// Serves `/metrics` and `/healthz` until `graceful` is cancelled, then
/// drains in-flight requests before returning — the "metrics
/// `ListenAndServe`" sub-service from spec.md §4.1.
pub async fn serve(
    addr: SocketAddr,
    metrics: Arc<PrometheusMetrics>,
    graceful: CancellationToken,
) -> Result<(), MetricsError> {
    let listener = TcpListener::bind(addr)
        .await
        .map_err(|source| MetricsError::Bind { addr, source })?;
    info!(%addr, "metrics server listening");

    axum::serve(listener, router(metrics))
        .with_graceful_shutdown(async move { graceful.cancelled().await })
        .await
        .map_err(MetricsError::Serve)
}

#[cfg(test)]
#[path = "server_tests.rs"]
mod tests;
