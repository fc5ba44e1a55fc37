// SPDX-License-Identifier: MIT

//! Logging initialization for the `ingestd` binary. Library crates only
//! ever call `tracing::{info,warn,error,debug}!`; the subscriber is
//! installed exactly once, here, at the binary boundary.

use std::path::Path;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Guard that must be held for the process lifetime to keep the
/// non-blocking file appender flushing; dropping it early silently stops
/// log delivery.
pub struct LoggingGuard(#[allow(dead_code)] Option<tracing_appender::non_blocking::WorkerGuard>);

/// Installs a `tracing` subscriber filtered by `RUST_LOG` (default
/// `info`). When `log_dir` is set, logs are written there via a
/// non-blocking rolling appender in addition to stderr; otherwise stderr
/// only.
pub fn init(log_dir: Option<&Path>) -> LoggingGuard {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    match log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "ingestd.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(appender);
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
                .init();
            LoggingGuard(Some(guard))
        }
        None => {
            tracing_subscriber::registry()
                .with(filter)
                .with(fmt::layer().with_writer(std::io::stderr))
                .init();
            LoggingGuard(None)
        }
    }
}
