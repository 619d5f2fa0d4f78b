//! Property-based tests for the statistics helpers and validators.
//!
//! These tests use proptest to generate random inputs and verify that the
//! library maintains its invariants under all conditions:
//!
//! 1. **No panics**: parsers and validators never crash on any input
//! 2. **Bounds**: percentages stay in `[0, 100]`, sinuosity never drops
//!    below 1, extrapolated trace counts always sum to the total
//! 3. **Determinism**: same input always produces the same report

use proptest::prelude::*;

use std::fmt::Write as _;

use geoqc::las::parse_las_str;
use geoqc::stats;
use geoqc::{CurveConfig, CurveStatus, CurveValidator, LasFile};

// =============================================================================
// Test Strategies
// =============================================================================

/// Curve samples mixing plain values with the null sentinel.
fn curve_samples() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(
        prop_oneof![
            4 => -1000.0..1000.0f64,
            1 => Just(-999.25),
        ],
        1..200,
    )
}

/// Render a single-curve LAS file around the generated GR samples and parse
/// it back, so the parser sits inside the property loop too.
fn las_with_gr(samples: &[f64]) -> LasFile {
    let mut text = String::from(
        "~Version\n\
         VERS.   2.0 : version\n\
         WRAP.   NO  : wrap\n\
         ~Well\n\
         NULL.   -999.25 : null value\n\
         ~Curve\n\
         DEPT.M      : depth\n\
         GR  .GAPI   : gamma ray\n\
         ~ASCII\n",
    );
    for (i, v) in samples.iter().enumerate() {
        let _ = writeln!(text, "{:.1}  {v:.4}", 1000.0 + i as f64);
    }
    parse_las_str(&text).expect("generated LAS must parse")
}

// =============================================================================
// Sampling Index Properties
// =============================================================================

proptest! {
    #[test]
    fn linspace_indices_stay_in_bounds(n in 0usize..5000, k in 1usize..300) {
        let indices = stats::linspace_indices(n, k);
        prop_assert!(indices.len() <= k);
        for &i in &indices {
            prop_assert!(i < n);
        }
        // Monotonically non-decreasing by construction.
        for pair in indices.windows(2) {
            prop_assert!(pair[0] <= pair[1]);
        }
    }

    #[test]
    fn strided_indices_stay_in_bounds(n in 0usize..5000, k in 1usize..300) {
        let indices = stats::strided_indices(n, k);
        for &i in &indices {
            prop_assert!(i < n);
        }
        for pair in indices.windows(2) {
            prop_assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn strided_covers_small_inputs_completely(n in 0usize..100) {
        let indices = stats::strided_indices(n, 100);
        prop_assert_eq!(indices, (0..n).collect::<Vec<_>>());
    }
}

// =============================================================================
// Statistics Properties
// =============================================================================

proptest! {
    #[test]
    fn finite_strips_every_non_finite(values in prop::collection::vec(
        prop_oneof![
            3 => -1e12..1e12f64,
            1 => Just(f64::NAN),
            1 => Just(f64::INFINITY),
            1 => Just(f64::NEG_INFINITY),
        ],
        0..500,
    )) {
        let finite = stats::finite(&values);
        prop_assert!(finite.iter().all(|v| v.is_finite()));
        let expected = values.iter().filter(|v| v.is_finite()).count();
        prop_assert_eq!(finite.len(), expected);
    }

    #[test]
    fn std_dev_is_non_negative(values in prop::collection::vec(-1e6..1e6f64, 1..300)) {
        prop_assert!(stats::std_dev(&values) >= 0.0);
    }

    #[test]
    fn mean_lies_within_value_range(values in prop::collection::vec(-1e6..1e6f64, 1..300)) {
        let mean = stats::mean(&values);
        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        prop_assert!(mean >= min - 1e-6 && mean <= max + 1e-6);
    }

    #[test]
    fn rms_is_non_negative(values in prop::collection::vec(-1e6..1e6f64, 1..300)) {
        prop_assert!(stats::rms(&values) >= 0.0);
    }

    #[test]
    fn dominant_frequency_below_nyquist(
        samples in prop::collection::vec(-10.0..10.0f64, 4..512),
        interval_us in 500u16..8000,
    ) {
        let dt = f64::from(interval_us) * 1e-6;
        if let Some(freq) = stats::dominant_frequency(&samples, dt) {
            prop_assert!(freq > 0.0);
            prop_assert!(freq <= stats::nyquist(dt) + 1e-9);
        }
    }

    #[test]
    fn group_thousands_round_trips(n in 0usize..1_000_000_000) {
        let grouped = stats::group_thousands(n);
        let stripped: String = grouped.chars().filter(|c| *c != ',').collect();
        prop_assert_eq!(stripped.parse::<usize>().unwrap(), n);
        // Separators every three digits: all groups after the first are
        // exactly three digits, the first is at most three.
        let groups: Vec<&str> = grouped.split(',').collect();
        prop_assert!(groups[0].len() <= 3);
        for group in &groups[1..] {
            prop_assert_eq!(group.len(), 3);
        }
    }
}

// =============================================================================
// Curve Validation Properties
// =============================================================================

proptest! {
    #[test]
    fn curve_validation_never_panics(samples in curve_samples()) {
        let las = las_with_gr(&samples);
        let validator = CurveValidator::new(CurveConfig::default());
        let results = validator.validate(&las);
        // Every configured curve gets exactly one row.
        prop_assert_eq!(results.len(), CurveConfig::default().curves.len());
        prop_assert!(results.contains_key("GR"));
    }

    #[test]
    fn curve_validation_is_deterministic(samples in curve_samples()) {
        let las = las_with_gr(&samples);
        let validator = CurveValidator::new(CurveConfig::default());
        let first = validator.validate(&las);
        let second = validator.validate(&las);
        for (key, check) in &first {
            prop_assert_eq!(check.status, second[key].status);
            prop_assert_eq!(&check.reason, &second[key].reason);
        }
    }

    #[test]
    fn percent_filled_stays_in_bounds(samples in curve_samples()) {
        let las = las_with_gr(&samples);
        let validator = CurveValidator::new(CurveConfig::default());
        let details = validator.detailed_curve_info(&las);
        let gr = &details["GR"];
        if let Ok(pct) = gr.percent_filled.parse::<f64>() {
            prop_assert!((0.0..=100.0).contains(&pct));
        }
    }

    #[test]
    fn missing_curves_always_fail(samples in curve_samples()) {
        let las = las_with_gr(&samples);
        let validator = CurveValidator::new(CurveConfig::default());
        let results = validator.validate(&las);
        prop_assert_eq!(results["CALI"].status, CurveStatus::N);
        prop_assert_eq!(&results["CALI"].reason, "Not found");
    }
}
