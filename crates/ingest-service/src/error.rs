// SPDX-License-Identifier: MIT

/// Matches spec.md §7's four error kinds at the orchestrator boundary,
/// following the teacher's one-`thiserror`-enum-per-module convention.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("worker pool failed: {0}")]
    Pool(#[source] ingest_pool::PoolError),

    #[error("metrics server failed: {0}")]
    Metrics(#[source] ingest_metrics::MetricsError),

    #[error("sub-service task panicked: {0}")]
    TaskPanicked(String),

    #[error("teardown exceeded the degraded-state window")]
    TeardownTimeout,

    #[error("service is already closed")]
    Closed,
}

impl From<ingest_pool::PoolError> for ServiceError {
    fn from(e: ingest_pool::PoolError) -> Self {
        ServiceError::Pool(e)
    }
}

impl From<ingest_metrics::MetricsError> for ServiceError {
    fn from(e: ingest_metrics::MetricsError) -> Self {
        ServiceError::Metrics(e)
    }
}
