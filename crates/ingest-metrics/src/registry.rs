// SPDX-License-Identifier: MIT

//! Prometheus-backed implementation of the [`ingest_pool`] gauge traits
//! (spec.md §4.6, §6).

use std::sync::Arc;

use ingest_pool::{ActiveWorkerGauge, GaugeError, GaugeRegistry};
use prometheus::{Encoder, IntGauge, Opts, Registry, TextEncoder};

use crate::error::MetricsError;

pub const ACTIVE_WORKERS_GAUGE_NAME: &str = "ingest_active_workers";
pub const ACTIVE_WORKERS_GAUGE_HELP: &str = "Number of active workers in the ingest service.";

struct PrometheusActiveWorkerGauge(IntGauge);

impl ActiveWorkerGauge for PrometheusActiveWorkerGauge {
    fn inc(&self) {
        self.0.inc();
    }

    fn dec(&self) {
        self.0.dec();
    }
}

/// Owns the service's `prometheus::Registry` and renders it to the text
/// exposition format for the `/metrics` handler.
pub struct PrometheusMetrics {
    registry: Registry,
}

impl PrometheusMetrics {
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Renders every registered metric in Prometheus text format.
    pub fn gather_text(&self) -> String {
        let families = self.registry.gather();
        let mut buf = Vec::new();
        let encoder = TextEncoder::new();
        // `TextEncoder::encode` only fails on a broken writer; a `Vec` never
        // fails to write, so this is infallible in practice.
        let _ = encoder.encode(&families, &mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Registers the `ingest_active_workers` gauge named in spec.md §6.
    /// Fails fast (rather than returning the already-registered metric) on
    /// a duplicate registration, per §4.2 step 1.
    pub fn register_active_workers_gauge(&self) -> Result<IntGauge, MetricsError> {
        let gauge = IntGauge::with_opts(Opts::new(ACTIVE_WORKERS_GAUGE_NAME, ACTIVE_WORKERS_GAUGE_HELP))
            .map_err(|e| MetricsError::AlreadyRegistered(e.to_string()))?;
        self.registry
            .register(Box::new(gauge.clone()))
            .map_err(|e| MetricsError::AlreadyRegistered(e.to_string()))?;
        Ok(gauge)
    }
}

impl Default for PrometheusMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl GaugeRegistry for PrometheusMetrics {
    fn register_active_workers(&self) -> Result<Arc<dyn ActiveWorkerGauge>, GaugeError> {
        let gauge = self
            .register_active_workers_gauge()
            .map_err(|e| GaugeError(e.to_string()))?;
        Ok(Arc::new(PrometheusActiveWorkerGauge(gauge)))
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
