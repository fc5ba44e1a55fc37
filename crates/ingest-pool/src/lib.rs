// SPDX-License-Identifier: MIT

#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! ingest-pool: the dynamic worker pool (spec.md §4.1, §4.2) — the
//! reload-aware [`Supervisor`] and its per-application worker loop.

mod backoff;
mod error;
mod gauge;
mod supervisor;
mod worker;
mod worker_table;

#[cfg(test)]
mod test_support;

pub use backoff::BackoffConfig;
pub use error::PoolError;
pub use gauge::{ActiveWorkerGauge, CountingGauge, CountingGaugeRegistry, GaugeError, GaugeRegistry};
pub use supervisor::Supervisor;
