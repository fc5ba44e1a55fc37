// SPDX-License-Identifier: MIT

use crate::gauge::GaugeError;

/// Fatal errors from [`crate::Supervisor::run`]. All of these end the run
/// loop; the caller (the service orchestrator) decides whether that
/// cascades into a full shutdown.
#[derive(Debug, thiserror::Error)]
pub enum PoolError {
    #[error("failed to register active_workers gauge: {0}")]
    GaugeRegistration(#[source] GaugeError),

    #[error("failed to open configuration watch: {0}")]
    WatchOpen(#[source] ingest_config::ConfigError),

    #[error("configuration reload channel closed unexpectedly")]
    ReloadChannelClosed,

    #[error("configuration watch error channel closed unexpectedly")]
    WatchErrorChannelClosed,
}
