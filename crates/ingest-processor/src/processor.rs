// SPDX-License-Identifier: MIT

//! The Report Processor contract (spec.md §4.4).

use async_trait::async_trait;
use ingest_core::ApplicationId;
use tokio_util::sync::CancellationToken;

/// One pass over an application's pending report files. Implementations
/// choose their own batch size and need not be safe to call concurrently
/// for the same `app` — the supervisor guarantees a single worker per
/// application — but must be safe to call concurrently across distinct
/// `app` values.
#[async_trait]
pub trait Processor: Send + Sync {
    async fn process(&self, ctx: CancellationToken, app: &ApplicationId) -> Result<(), ProcessorError>;
}

/// Errors a [`Processor`] may return. Only [`ProcessorError::StoreUnavailable`]
/// and [`ProcessorError::Unscannable`] should drive the worker loop's
/// backoff; [`ProcessorError::Cancelled`] is treated as a normal exit.
#[derive(Debug, thiserror::Error)]
pub enum ProcessorError {
    #[error("report store unavailable: {0}")]
    StoreUnavailable(#[source] ingest_store::StoreError),

    #[error("report directory not scannable: {0}")]
    Unscannable(#[source] std::io::Error),

    #[error("processing cancelled")]
    Cancelled,
}

impl ProcessorError {
    /// True for the cancellation case the worker loop must not back off on.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, ProcessorError::Cancelled)
    }
}
