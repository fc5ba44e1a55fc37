// SPDX-License-Identifier: MIT

use super::*;
use rand::SeedableRng;
use rand::rngs::StdRng;

#[test]
fn doubled_doubles_until_the_cap() {
    let cfg = BackoffConfig {
        base: Duration::from_secs(5),
        max: Duration::from_secs(30),
    };
    assert_eq!(cfg.doubled(Duration::from_secs(5)), Duration::from_secs(10));
    assert_eq!(cfg.doubled(Duration::from_secs(10)), Duration::from_secs(20));
    assert_eq!(cfg.doubled(Duration::from_secs(20)), Duration::from_secs(30));
    assert_eq!(cfg.doubled(Duration::from_secs(30)), Duration::from_secs(30));
}

#[test]
fn full_jitter_never_reaches_the_ceiling() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..200 {
        let ceiling = Duration::from_millis(750);
        let sleep = full_jitter(ceiling, &mut rng);
        assert!(sleep < ceiling, "sampled range is half-open: [0, ceiling)");
    }
}

#[test]
fn full_jitter_of_zero_ceiling_is_zero() {
    let mut rng = StdRng::seed_from_u64(7);
    assert_eq!(full_jitter(Duration::ZERO, &mut rng), Duration::ZERO);
}

#[test]
fn full_jitter_explores_the_range_rather_than_a_fixed_point() {
    let mut rng = StdRng::seed_from_u64(99);
    let ceiling = Duration::from_secs(30);
    let samples: Vec<_> = (0..50).map(|_| full_jitter(ceiling, &mut rng)).collect();
    let distinct = samples.iter().collect::<std::collections::HashSet<_>>().len();
    assert!(distinct > 10, "expected varied jitter samples, got {distinct} distinct values");
}
