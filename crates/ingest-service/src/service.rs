// SPDX-License-Identifier: MIT

//! The Service Orchestrator (spec.md §4.1): owns the hard/graceful
//! `CancellationToken` pair, runs the supervisor and metrics server as
//! sibling sub-services, and bounds teardown by `maxDegradedDuration`.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use ingest_metrics::PrometheusMetrics;
use ingest_pool::Supervisor;
use parking_lot::Mutex;
use tokio::sync::Notify;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::error::ServiceError;

pub const DEFAULT_MAX_DEGRADED_DURATION: Duration = Duration::from_secs(120);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Idle,
    Running,
    Closed,
}

/// Wires a [`Supervisor`] and the metrics HTTP server together under one
/// shutdown contract. One `Service` is meant to be `run()` exactly once.
pub struct Service {
    supervisor: Arc<Supervisor>,
    metrics: Arc<PrometheusMetrics>,
    metrics_addr: SocketAddr,
    max_degraded_duration: Duration,
    hard: CancellationToken,
    graceful: CancellationToken,
    state: Mutex<State>,
    done: Notify,
}

impl Service {
    pub fn new(supervisor: Arc<Supervisor>, metrics: Arc<PrometheusMetrics>, metrics_addr: SocketAddr) -> Self {
        let hard = CancellationToken::new();
        let graceful = hard.child_token();
        Self {
            supervisor,
            metrics,
            metrics_addr,
            max_degraded_duration: DEFAULT_MAX_DEGRADED_DURATION,
            hard,
            graceful,
            state: Mutex::new(State::Idle),
            done: Notify::new(),
        }
    }

    pub fn with_max_degraded_duration(mut self, d: Duration) -> Self {
        self.max_degraded_duration = d;
        self
    }

    /// Starts the supervisor and metrics server and returns only once both
    /// have stopped, or the degraded-teardown window elapses first. Must
    /// be driven to completion by a call to [`Service::quit`] (or a
    /// sub-service failure); it does not return on its own otherwise.
    pub async fn run(&self) -> Result<(), ServiceError> {
        self.begin()?;

        let mut set: JoinSet<Result<(), ServiceError>> = JoinSet::new();

        {
            let supervisor = self.supervisor.clone();
            let ctx = self.graceful.clone();
            set.spawn(async move { supervisor.run(ctx).await.map_err(ServiceError::from) });
        }
        {
            let metrics = self.metrics.clone();
            let addr = self.metrics_addr;
            let ctx = self.graceful.clone();
            set.spawn(async move { ingest_metrics::serve(addr, metrics, ctx).await.map_err(ServiceError::from) });
        }

        let mut errors = Vec::new();

        record(&mut errors, set.join_next().await);
        // Whatever caused the first sub-service to stop — a clean
        // cancellation or a failure — the other must wind down too.
        self.graceful.cancel();

        let timed_out = match tokio::time::timeout(self.max_degraded_duration, set.join_next()).await {
            Ok(second) => {
                record(&mut errors, second);
                false
            }
            Err(_) => true,
        };

        if timed_out {
            error!("teardown exceeded the degraded-state window");
        }
        for e in &errors {
            error!(error = %e, "sub-service error");
        }

        self.finish();

        if timed_out {
            return Err(ServiceError::TeardownTimeout);
        }
        match errors.into_iter().next() {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Requests shutdown and blocks until [`Service::run`] has returned.
    /// `force = false` cancels only the graceful context (in-flight
    /// `process` passes finish); `force = true` cancels the hard context,
    /// which cancels the graceful context as its child.
    pub async fn quit(&self, force: bool) {
        info!(force, "shutdown requested");
        if force {
            self.hard.cancel();
        } else {
            self.graceful.cancel();
        }

        loop {
            let done = self.done.notified();
            if *self.state.lock() == State::Closed {
                return;
            }
            done.await;
        }
    }

    fn begin(&self) -> Result<(), ServiceError> {
        let mut state = self.state.lock();
        match *state {
            State::Idle => {
                *state = State::Running;
                Ok(())
            }
            State::Running | State::Closed => Err(ServiceError::Closed),
        }
    }

    fn finish(&self) {
        self.hard.cancel();
        *self.state.lock() = State::Closed;
        self.done.notify_waiters();
    }
}

fn record(
    errors: &mut Vec<ServiceError>,
    result: Option<Result<Result<(), ServiceError>, tokio::task::JoinError>>,
) {
    match result {
        None | Some(Ok(Ok(()))) => {}
        Some(Ok(Err(e))) => errors.push(e),
        Some(Err(join_err)) => errors.push(ServiceError::TaskPanicked(join_err.to_string())),
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;
