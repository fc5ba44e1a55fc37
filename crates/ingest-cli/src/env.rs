// SPDX-License-Identifier: MIT

//! Centralized environment variable access for the `ingestd` binary.
//! Library crates never read `std::env` directly; every process-level
//! tunable is resolved here (spec.md §9).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

/// State directory: `INGEST_STATE_DIR` > `XDG_STATE_HOME/ingest` >
/// `~/.local/state/ingest`.
pub fn state_dir() -> Result<PathBuf, EnvError> {
    if let Ok(dir) = std::env::var("INGEST_STATE_DIR") {
        return Ok(PathBuf::from(dir));
    }
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Ok(PathBuf::from(xdg).join("ingest"));
    }
    let home = std::env::var("HOME").map_err(|_| EnvError::NoStateDir)?;
    Ok(PathBuf::from(home).join(".local/state/ingest"))
}

/// Address the Prometheus metrics server binds to.
pub fn metrics_addr() -> Result<SocketAddr, EnvError> {
    match std::env::var("INGEST_METRICS_ADDR") {
        Ok(raw) => raw.parse().map_err(|_| EnvError::InvalidMetricsAddr(raw)),
        Err(_) => Ok(([0, 0, 0, 0], 9100).into()),
    }
}

/// Supervisor reload-debounce override.
pub fn debounce() -> Option<Duration> {
    std::env::var("INGEST_DEBOUNCE_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Worker backoff base override.
pub fn backoff_base_ms() -> Option<Duration> {
    std::env::var("INGEST_BACKOFF_BASE_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Worker backoff cap override.
pub fn backoff_max_ms() -> Option<Duration> {
    std::env::var("INGEST_BACKOFF_MAX_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Degraded-teardown window override.
pub fn max_degraded_duration() -> Option<Duration> {
    std::env::var("INGEST_MAX_DEGRADED_MS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .map(Duration::from_millis)
}

/// Log directory for the rotated daemon log file, if file logging is
/// requested. Falls back to stderr-only logging when unset.
pub fn log_dir() -> Option<PathBuf> {
    std::env::var("INGEST_LOG_DIR").ok().map(PathBuf::from)
}

#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    #[error("could not determine a state directory: HOME is not set")]
    NoStateDir,

    #[error("INGEST_METRICS_ADDR is not a valid socket address: {0}")]
    InvalidMetricsAddr(String),
}
