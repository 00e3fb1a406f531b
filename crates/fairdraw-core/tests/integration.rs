//! Integration tests for fairdraw-core.
//!
//! These tests exercise the public draw pipeline end to end:
//! seed → stream → extraction / sampling / selection → statistical checks.

use fairdraw_core::{
    BaseItem, DrawError, EntropyStream, GenericItem, Randomness, SeedValue, SelectionConfig,
    beta_string, encode_values, hash_values,
};
use fairdraw_tests::{TestResult, chi_squared_expected, proportion_within, run_uniformity_battery};

fn derived_seed(i: u64) -> Vec<u8> {
    hash_values(&[SeedValue::U64(i)]).unwrap().to_vec()
}

fn assert_not_failing(results: &[TestResult], context: &str) {
    for r in results {
        assert_ne!(r.grade, 'F', "{context}: {} failed ({})", r.name, r.details);
    }
}

#[test]
fn same_seed_replays_every_operation() {
    let run = || {
        let mut s = EntropyStream::new(b"replay".to_vec());
        let items = [BaseItem::finite(3), BaseItem::weighted_infinite(0.5)];
        let mut config = SelectionConfig::new(&items, 4);
        (
            s.uint64().unwrap(),
            s.probability().unwrap(),
            s.pick(10, 37).unwrap(),
            s.pick_distinct(5, 9).unwrap(),
            s.selection(&mut config)
                .unwrap()
                .iter()
                .map(|r| (r.index(), r.instance()))
                .collect::<Vec<_>>(),
            s.int16().unwrap(),
            s.cursor(),
        )
    };
    assert_eq!(run(), run());
}

#[test]
fn different_seeds_diverge() {
    let a = EntropyStream::new(derived_seed(1)).bytes(256).unwrap();
    let b = EntropyStream::new(derived_seed(2)).bytes(256).unwrap();
    assert_ne!(a, b);
}

#[test]
fn split_reads_match_one_large_read() {
    for seed_len in [0usize, 1, 7, 64, 100] {
        let seed: Vec<u8> = (0..seed_len as u8).collect();
        let whole = EntropyStream::new(seed.clone()).bytes(500).unwrap();

        for chunk in [1usize, 3, 8, 63, 64, 65, 499] {
            let mut s = EntropyStream::new(seed.clone());
            let mut pieces = Vec::new();
            while pieces.len() < 500 {
                let n = chunk.min(500 - pieces.len());
                pieces.extend(s.bytes(n).unwrap());
            }
            assert_eq!(pieces, whole, "seed_len={seed_len}, chunk={chunk}");
        }
    }
}

#[test]
fn growth_depends_on_seed_only() {
    let mut early = EntropyStream::new(b"growth".to_vec());
    early.bytes(1000).unwrap();

    let mut late = EntropyStream::new(b"growth".to_vec());
    late.uint8().unwrap();
    late.bits(13).unwrap();
    late.bytes(986).unwrap();

    assert_eq!(late.cursor(), 1000);
    assert_eq!(early.bytes(64).unwrap(), late.bytes(64).unwrap());
}

#[test]
fn bounded_numbers_are_uniform() {
    for magnitude in [2u64, 3, 5, 6, 7, 10, 13, 100] {
        let mut samples = Vec::new();
        for i in 0..200 {
            let mut s = EntropyStream::new(derived_seed(i));
            samples.extend(s.pick(50, magnitude).unwrap());
        }
        let results = run_uniformity_battery(&samples, magnitude);
        assert_not_failing(&results, &format!("magnitude {magnitude}"));
    }
}

#[test]
fn distinct_picks_cover_range_evenly() {
    let magnitude = 10u64;
    let mut picked = Vec::new();
    for i in 0..2000 {
        let mut s = EntropyStream::new(derived_seed(i));
        picked.extend(s.pick_distinct(4, magnitude).unwrap());
    }
    assert_not_failing(&run_uniformity_battery(&picked, magnitude), "distinct picks");
}

#[test]
#[ignore] // Run with: cargo test -- --ignored
fn no_modulo_bias_across_magnitudes() {
    for magnitude in 2u64..=64 {
        let mut samples = Vec::new();
        for i in 0..1000 {
            let mut s = EntropyStream::new(derived_seed(i));
            samples.extend(s.pick(100, magnitude).unwrap());
        }
        let results = run_uniformity_battery(&samples, magnitude);
        assert_not_failing(&results, &format!("magnitude {magnitude}"));
    }
}

#[test]
fn pick_distinct_rejects_oversized_request() {
    let mut s = EntropyStream::new(derived_seed(0));
    assert_eq!(
        s.pick_distinct(6, 5),
        Err(DrawError::RangeExceeded {
            requested: 6,
            available: 5
        })
    );
}

#[test]
fn selection_follows_supply_weighting() {
    let items = [
        GenericItem::new("three", BaseItem::finite(3)),
        GenericItem::new("one", BaseItem::finite(1)),
    ];
    let iterations: u64 = 100_000;
    let mut counts = [0u64; 2];
    for i in 0..iterations {
        let seed = encode_values(&[SeedValue::U64(u64::MAX / iterations * i)]).unwrap();
        let mut config = SelectionConfig::new(&items, 1);
        let result = EntropyStream::new(seed).selection(&mut config).unwrap()[0];
        counts[result.index()] += 1;
    }

    assert!(proportion_within(counts[0], iterations, 0.75, 0.05).passed, "{counts:?}");
    assert!(proportion_within(counts[1], iterations, 0.25, 0.05).passed, "{counts:?}");
}

#[test]
fn selection_weights_match_chi_squared() {
    let items = [
        BaseItem::weighted_infinite(1.0),
        BaseItem::weighted_infinite(2.0),
        BaseItem::new(1.0, fairdraw_core::Supply::Unbounded(3)),
    ];
    let mut counts = [0u64; 3];
    for i in 0..300 {
        let mut config = SelectionConfig::new(&items, 20);
        for r in EntropyStream::new(derived_seed(i)).selection(&mut config).unwrap() {
            counts[r.index()] += 1;
        }
    }
    let result = chi_squared_expected(&counts, &[1.0, 2.0, 3.0]);
    assert_ne!(result.grade, 'F', "{counts:?}: {}", result.details);
}

#[test]
fn selection_supply_is_exact() {
    let items = [BaseItem::finite(4), BaseItem::weighted_finite(3.0, 2), BaseItem::single()];
    let mut config = SelectionConfig::new(&items, 1);
    let mut s = EntropyStream::new(derived_seed(7));

    let mut seen = Vec::new();
    for _ in 0..7 {
        let r = s.selection(&mut config).unwrap()[0];
        seen.push((r.index(), r.instance()));
    }
    seen.sort_unstable();
    assert_eq!(
        seen,
        vec![(0, 1), (0, 2), (0, 3), (0, 4), (1, 1), (1, 2), (2, 1)]
    );
    assert_eq!(s.selection(&mut config).unwrap_err(), DrawError::Exhausted);
}

#[test]
fn reset_replays_identically() {
    let items = [BaseItem::finite(2), BaseItem::weighted_finite(2.0, 3)];
    let mut config = SelectionConfig::new(&items, 5);

    let first: Vec<_> = EntropyStream::new(derived_seed(3))
        .selection(&mut config)
        .unwrap()
        .iter()
        .map(|r| (r.index(), r.instance()))
        .collect();

    config.reset();
    config.reset();
    let second: Vec<_> = EntropyStream::new(derived_seed(3))
        .selection(&mut config)
        .unwrap()
        .iter()
        .map(|r| (r.index(), r.instance()))
        .collect();

    assert_eq!(first, second);
}

#[test]
fn beta_strings_land_on_selection_boundaries() {
    let items = [BaseItem::single(), BaseItem::single()];
    let pick = |i, n| {
        let mut config = SelectionConfig::new(&items, 1);
        let seed = beta_string(i, n).unwrap();
        EntropyStream::new(seed.to_vec()).selection(&mut config).unwrap()[0].index()
    };
    assert_eq!(pick(1, 4), 0);
    assert_eq!(pick(1, 2), 0);
    assert_eq!(pick(3, 4), 1);
    assert_eq!(pick(1, 1), 1);
}

#[test]
fn commitment_of_u64_zero() {
    let digest = hash_values(&[SeedValue::U64(0)]).unwrap();
    assert_eq!(
        fairdraw_core::seed_to_hex(&digest),
        "af5570f5a1810b7af78caf4bc70a660f0df51e42baf91d4de5b2328de0e83dfc"
    );
}
