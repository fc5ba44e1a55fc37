// SPDX-License-Identifier: MIT

//! The active-worker gauge abstraction (spec.md §4.3). The pool only needs
//! an incr/decr counter with fail-fast registration; `ingest-metrics`
//! supplies the Prometheus-backed implementation so this crate never
//! depends on the `prometheus` crate directly.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// A single gauge the supervisor increments while a worker is active and
/// decrements when it stops, regardless of why it stopped.
pub trait ActiveWorkerGauge: Send + Sync {
    fn inc(&self);
    fn dec(&self);
}

/// Registers the gauge named in spec.md §4.3 (`ingest_active_workers`).
/// Implementations must fail, not silently reuse, on a name collision —
/// the run loop treats registration as a fatal startup error.
pub trait GaugeRegistry: Send + Sync {
    fn register_active_workers(&self) -> Result<Arc<dyn ActiveWorkerGauge>, GaugeError>;
}

#[derive(Debug, thiserror::Error)]
#[error("active_workers gauge already registered: {0}")]
pub struct GaugeError(pub String);

/// In-memory gauge for tests and for callers that don't expose metrics.
#[derive(Default)]
pub struct CountingGauge(AtomicI64);

impl CountingGauge {
    pub fn new() -> Self {
        Self(AtomicI64::new(0))
    }

    pub fn get(&self) -> i64 {
        self.0.load(Ordering::SeqCst)
    }
}

impl ActiveWorkerGauge for CountingGauge {
    fn inc(&self) {
        self.0.fetch_add(1, Ordering::SeqCst);
    }

    fn dec(&self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Always succeeds; useful for a [`GaugeRegistry`] in tests.
pub struct CountingGaugeRegistry(Arc<CountingGauge>);

impl CountingGaugeRegistry {
    pub fn new() -> Self {
        Self(Arc::new(CountingGauge::new()))
    }

    pub fn gauge(&self) -> Arc<CountingGauge> {
        self.0.clone()
    }
}

impl Default for CountingGaugeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl GaugeRegistry for CountingGaugeRegistry {
    fn register_active_workers(&self) -> Result<Arc<dyn ActiveWorkerGauge>, GaugeError> {
        Ok(self.0.clone())
    }
}

/// RAII increment/decrement: held for the lifetime of a worker's run,
/// dropped whether the worker returns normally, is cancelled, or panics.
pub(crate) struct ActiveGuard {
    gauge: Arc<dyn ActiveWorkerGauge>,
}

impl ActiveGuard {
    pub(crate) fn new(gauge: Arc<dyn ActiveWorkerGauge>) -> Self {
        gauge.inc();
        Self { gauge }
    }
}

impl Drop for ActiveGuard {
    fn drop(&mut self) {
        self.gauge.dec();
    }
}
