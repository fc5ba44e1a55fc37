// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ingest-metrics: the Prometheus registry and HTTP exposition server
//! (spec.md §4.6, §6).

mod error;
mod registry;
mod server;

pub use error::MetricsError;
pub use registry::{PrometheusMetrics, ACTIVE_WORKERS_GAUGE_HELP, ACTIVE_WORKERS_GAUGE_NAME};
pub use server::serve;
