//! Property-based tests for the response-curve math.
//!
//! These verify properties that should hold across the whole parameter
//! space, not just the hand-picked values in the unit tests.

use openpad_curves::{apportion, motion_residue, power_response, threshold_crossed};
use openpad_device_types::{MouseAxis, Shape};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    // --- Power response ---

    #[test]
    fn prop_power_response_preserves_sign(
        value in -1000.0f64..1000.0,
        multiplier in 0.01f64..64.0,
        exponent in 0.1f64..4.0,
    ) {
        let out = power_response(value, multiplier, exponent);
        if value > 0.0 {
            prop_assert!(out >= 0.0, "positive input gave {out}");
        } else if value < 0.0 {
            prop_assert!(out <= 0.0, "negative input gave {out}");
        } else {
            prop_assert_eq!(out, 0.0);
        }
    }

    #[test]
    fn prop_power_response_odd_symmetry(
        value in 0.001f64..1000.0,
        multiplier in 0.01f64..64.0,
        exponent in 0.1f64..4.0,
    ) {
        let pos = power_response(value, multiplier, exponent);
        let neg = power_response(-value, multiplier, exponent);
        prop_assert!((pos + neg).abs() < 1e-9 * pos.abs().max(1.0));
    }

    #[test]
    fn prop_power_response_monotonic_in_magnitude(
        low in 0.001f64..500.0,
        delta in 0.001f64..500.0,
        multiplier in 0.01f64..64.0,
        exponent in 0.1f64..4.0,
    ) {
        let high = low + delta;
        prop_assert!(
            power_response(high, multiplier, exponent)
                >= power_response(low, multiplier, exponent)
        );
    }

    // --- Thresholding ---

    #[test]
    fn prop_threshold_sign_must_match(value in 0.001f64..1e6, threshold in 1i32..100_000) {
        // A positive threshold never fires for negative values and vice versa.
        prop_assert!(!threshold_crossed(-value, threshold));
        prop_assert!(!threshold_crossed(value, -threshold));
    }

    // --- Dead-zone apportioning ---

    #[test]
    fn prop_apportion_circle_preserves_radius(
        dz in 0.0f64..1000.0,
        x in (-1e6f64..1e6).prop_filter("non-zero", |v| v.abs() > 1e-6),
        y in (-1e6f64..1e6).prop_filter("non-zero", |v| v.abs() > 1e-6),
    ) {
        let dzx = apportion(dz, x, y, MouseAxis::X, Shape::Circle);
        let dzy = apportion(dz, x, y, MouseAxis::Y, Shape::Circle);
        prop_assert!((dzx * dzx + dzy * dzy - dz * dz).abs() < 1e-6 * dz.max(1.0));
    }

    #[test]
    fn prop_apportion_never_exceeds_dead_zone(
        dz in 0.0f64..1000.0,
        x in -1e6f64..1e6,
        y in -1e6f64..1e6,
    ) {
        for which in [MouseAxis::X, MouseAxis::Y] {
            for shape in [Shape::Rectangle, Shape::Circle] {
                let part = apportion(dz, x, y, which, shape);
                prop_assert!(part <= dz + 1e-9);
                prop_assert!(part >= 0.0);
            }
        }
    }

    // --- Residue ---

    #[test]
    fn prop_residue_bounded_by_motion(
        val in 0.01f64..1e4,
        truncated in 0.0f64..1.0,
        multiplier in 0.5f64..64.0,
        exponent in 0.5f64..2.0,
    ) {
        // ztrunk is the curve output minus up to one unit of truncation.
        let full = power_response(val, multiplier, exponent);
        let ztrunk = (full - truncated).max(0.0);
        let residue = motion_residue(val, ztrunk, multiplier, exponent);
        prop_assert!(residue >= 0.0, "residue {residue} negative for positive motion");
        prop_assert!(residue <= val + 1e-9, "residue {residue} exceeds motion {val}");
    }

    #[test]
    fn prop_residue_snaps_noise_to_zero(
        val in 0.01f64..1e4,
        multiplier in 0.5f64..64.0,
    ) {
        // Exactly-honored motion leaves no residue (linear curve).
        let ztrunk = val * multiplier;
        prop_assert_eq!(motion_residue(val, ztrunk, multiplier, 1.0), 0.0);
    }
}
