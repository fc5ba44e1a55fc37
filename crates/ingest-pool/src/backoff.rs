// SPDX-License-Identifier: MIT

//! Full-jitter exponential backoff for the worker loop (spec.md §4.2).

use rand::Rng;
use std::time::Duration;

pub(crate) const DEFAULT_BASE: Duration = Duration::from_secs(5);
pub(crate) const DEFAULT_MAX: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy)]
pub struct BackoffConfig {
    pub base: Duration,
    pub max: Duration,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE,
            max: DEFAULT_MAX,
        }
    }
}

impl BackoffConfig {
    /// The ceiling for the *next* attempt after a failure at `current`:
    /// doubles, capped at `max`. `current` is expected to start at `base`.
    pub(crate) fn doubled(&self, current: Duration) -> Duration {
        std::cmp::min(current.saturating_mul(2), self.max)
    }
}

/// Picks a sleep uniformly from `[0, ceiling)` — "full jitter" per spec.md
/// §4.2, avoiding synchronized retries across workers recovering from a
/// shared failure.
pub(crate) fn full_jitter(ceiling: Duration, rng: &mut impl Rng) -> Duration {
    if ceiling.is_zero() {
        return Duration::ZERO;
    }
    let nanos = ceiling.as_nanos().min(u64::MAX as u128) as u64;
    Duration::from_nanos(rng.random_range(0..nanos))
}

#[cfg(test)]
#[path = "backoff_tests.rs"]
mod tests;
