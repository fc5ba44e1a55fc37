// SPDX-License-Identifier: MIT

//! The per-application Worker Loop (spec.md §4.2): repeatedly invoke the
//! processor, reset backoff on success, sleep with full jitter on
//! failure, and exit promptly on cancellation.

use std::sync::Arc;
use std::time::Duration;

use ingest_core::ApplicationId;
use ingest_processor::Processor;
use rand::SeedableRng;
use rand::rngs::StdRng;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::backoff::{full_jitter, BackoffConfig};
use crate::gauge::{ActiveGuard, ActiveWorkerGauge};

pub(crate) async fn run_worker(
    ctx: CancellationToken,
    app: ApplicationId,
    processor: Arc<dyn Processor>,
    gauge: Arc<dyn ActiveWorkerGauge>,
    backoff: BackoffConfig,
) {
    let _guard = ActiveGuard::new(gauge);
    // Seeded per worker so concurrent workers recovering from a shared
    // outage don't retry in lockstep.
    let mut rng = StdRng::from_os_rng();
    let mut ceiling = backoff.base;

    loop {
        if ctx.is_cancelled() {
            break;
        }

        match processor.process(ctx.clone(), &app).await {
            Ok(()) => {
                ceiling = backoff.base;
            }
            Err(e) if e.is_cancelled() => break,
            Err(e) => {
                warn!(app = %app, error = %e, "processor error, backing off");
                let sleep_for = full_jitter(ceiling, &mut rng);
                tokio::select! {
                    _ = ctx.cancelled() => break,
                    _ = tokio::time::sleep(sleep_for) => {}
                }
                ceiling = backoff.doubled(ceiling);
            }
        }
    }

    info!(app = %app, "worker stopped");
}

#[cfg(test)]
#[path = "worker_tests.rs"]
mod tests;
