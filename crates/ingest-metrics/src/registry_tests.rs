// SPDX-License-Identifier: MIT

use super::*;

#[test]
fn registering_the_active_workers_gauge_appears_in_gathered_text() {
    let metrics = PrometheusMetrics::new();
    let gauge = metrics.register_active_workers_gauge().expect("register");
    gauge.inc();
    gauge.inc();

    let text = metrics.gather_text();
    assert!(text.contains(ACTIVE_WORKERS_GAUGE_NAME));
    assert!(text.contains(ACTIVE_WORKERS_GAUGE_HELP));
    assert!(text.contains("2"));
}

#[test]
fn registering_the_same_gauge_twice_fails_fast() {
    let metrics = PrometheusMetrics::new();
    metrics.register_active_workers_gauge().expect("first registration");
    let second = metrics.register_active_workers_gauge();
    assert!(matches!(second, Err(MetricsError::AlreadyRegistered(_))));
}

#[test]
fn gauge_registry_trait_impl_inc_dec_round_trips() {
    let metrics = PrometheusMetrics::new();
    let gauge = GaugeRegistry::register_active_workers(&metrics).expect("register");
    gauge.inc();
    gauge.inc();
    gauge.dec();

    let text = metrics.gather_text();
    assert!(text.contains("ingest_active_workers 1"));
}
