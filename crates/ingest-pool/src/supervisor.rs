// SPDX-License-Identifier: MIT

//! The reload-aware Supervisor (spec.md §4.1): diffs the current
//! allow-list against the running worker table, debounces reload bursts,
//! and cancels removed workers before spawning added ones.

use std::sync::Arc;
use std::time::Duration;

use ingest_config::ConfigManager;
use ingest_core::ApplicationId;
use ingest_processor::Processor;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::backoff::BackoffConfig;
use crate::error::PoolError;
use crate::gauge::{ActiveWorkerGauge, GaugeRegistry};
use crate::worker::run_worker;
use crate::worker_table::{WorkerHandle, WorkerTable};

const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(5);

/// Owns the set of running per-application workers and keeps it in sync
/// with the config manager's allow-list. One `Supervisor` runs for the
/// lifetime of the graceful shutdown context passed to [`Supervisor::run`].
pub struct Supervisor {
    config: Arc<dyn ConfigManager>,
    processor: Arc<dyn Processor>,
    gauge: Arc<dyn ActiveWorkerGauge>,
    table: WorkerTable,
    debounce: Duration,
    backoff: BackoffConfig,
}

impl Supervisor {
    /// Registers the `ingest_active_workers` gauge immediately, failing
    /// fast on a name collision rather than deferring the check to
    /// [`Supervisor::run`] (spec.md §4.2 step 1).
    pub fn new(
        config: Arc<dyn ConfigManager>,
        processor: Arc<dyn Processor>,
        gauge_registry: &dyn GaugeRegistry,
    ) -> Result<Self, PoolError> {
        let gauge = gauge_registry
            .register_active_workers()
            .map_err(PoolError::GaugeRegistration)?;
        Ok(Self {
            config,
            processor,
            gauge,
            table: WorkerTable::default(),
            debounce: DEFAULT_DEBOUNCE,
            backoff: BackoffConfig::default(),
        })
    }

    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    pub fn with_backoff(mut self, backoff: BackoffConfig) -> Self {
        self.backoff = backoff;
        self
    }

    /// Number of workers currently in the table. Exposed for tests and
    /// diagnostics; not part of the metrics surface.
    pub fn worker_count(&self) -> usize {
        self.table.lock().len()
    }

    /// Runs until `ctx` is cancelled (graceful shutdown: waits for every
    /// worker to return before returning `Ok`) or a fatal condition is
    /// hit (a closed reload/error channel).
    pub async fn run(&self, ctx: CancellationToken) -> Result<(), PoolError> {
        let (mut reload_rx, mut err_rx) = self
            .config
            .watch(ctx.clone())
            .await
            .map_err(PoolError::WatchOpen)?;

        self.sync(&ctx);

        let mut debounce_deadline: Option<tokio::time::Instant> = None;

        loop {
            tokio::select! {
                _ = ctx.cancelled() => {
                    self.wait_for_workers().await;
                    return Ok(());
                }
                maybe = reload_rx.recv() => {
                    match maybe {
                        Some(()) => {
                            // Reset (not accumulate): a burst of reloads
                            // collapses into one sync a quiet period after
                            // the last of them.
                            debounce_deadline = Some(tokio::time::Instant::now() + self.debounce);
                        }
                        None => return Err(PoolError::ReloadChannelClosed),
                    }
                }
                maybe = err_rx.recv() => {
                    match maybe {
                        Some(e) => warn!(error = %e, "configuration watch reported an error"),
                        None => return Err(PoolError::WatchErrorChannelClosed),
                    }
                }
                _ = sleep_until_opt(debounce_deadline) => {
                    debounce_deadline = None;
                    self.sync(&ctx);
                }
            }
        }
    }

    /// Cancels workers no longer on the allow-list, then spawns workers
    /// for newly-allowed applications. Cancellation is issued before any
    /// new spawn so a removed-then-re-added application never transiently
    /// runs two workers at once.
    fn sync(&self, ctx: &CancellationToken) {
        let allow_list = self.config.allow_list();
        let mut table = self.table.lock();

        let to_cancel: Vec<ApplicationId> = table
            .keys()
            .filter(|app| !allow_list.contains(app))
            .cloned()
            .collect();
        for app in to_cancel {
            if let Some(handle) = table.remove(&app) {
                handle.cancel.cancel();
                info!(app = %app, "cancelled worker no longer on the allow-list");
            }
        }

        if ctx.is_cancelled() {
            return;
        }

        for app in allow_list.iter() {
            if table.contains_key(app) {
                continue;
            }
            let worker_ctx = ctx.child_token();
            let join = tokio::spawn(run_worker(
                worker_ctx.clone(),
                app.clone(),
                self.processor.clone(),
                self.gauge.clone(),
                self.backoff,
            ));
            table.insert(
                app.clone(),
                WorkerHandle {
                    cancel: worker_ctx,
                    join,
                },
            );
            info!(app = %app, "spawned worker");
        }
    }

    async fn wait_for_workers(&self) {
        let handles: Vec<JoinHandle<()>> = {
            let mut table = self.table.lock();
            table.drain().map(|(_, h)| h.join).collect()
        };
        for handle in handles {
            let _ = handle.await;
        }
    }
}

async fn sleep_until_opt(deadline: Option<tokio::time::Instant>) {
    match deadline {
        Some(d) => tokio::time::sleep_until(d).await,
        None => std::future::pending().await,
    }
}

#[cfg(test)]
#[path = "supervisor_tests.rs"]
mod tests;
