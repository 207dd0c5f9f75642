//! Property-based tests for ranges and curves.
//!
//! These tests verify algebraic properties that should hold for any input.

use std::f32::consts::PI;

use pienoon_motive::{
    CompactSpline, Curve, CubicCurve, CubicInit, QuadraticCurve, RangeF32, SplineAddMethod,
    SplineIndex,
};
use proptest::prelude::*;
use quickcheck_macros::quickcheck;

const TOLERANCE: f32 = 1e-3;

fn sanitize_f32(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}

fn angles() -> RangeF32 {
    RangeF32::new(-PI, PI)
}

#[quickcheck]
fn prop_clamp_stays_in_range(a: f32, b: f32, x: f32) -> bool {
    let range = RangeF32::create_valid(sanitize_f32(a, 0.0), sanitize_f32(b, 1.0));
    let clamped = range.clamp(sanitize_f32(x, 0.5));
    range.contains(clamped)
}

#[quickcheck]
#[allow(clippy::float_cmp)]
fn prop_clamp_moves_only_outside_values(a: f32, b: f32, x: f32) -> bool {
    let range = RangeF32::create_valid(sanitize_f32(a, 0.0), sanitize_f32(b, 1.0));
    let x = sanitize_f32(x, 0.5);
    (range.clamp(x) == x) == range.contains(x)
}

#[quickcheck]
fn prop_intersect_is_commutative(a: f32, b: f32, c: f32, d: f32) -> bool {
    let r1 = RangeF32::create_valid(sanitize_f32(a, 0.0), sanitize_f32(b, 1.0));
    let r2 = RangeF32::create_valid(sanitize_f32(c, 0.0), sanitize_f32(d, 1.0));
    RangeF32::intersect(&r1, &r2) == RangeF32::intersect(&r2, &r1)
}

#[quickcheck]
fn prop_intersect_is_associative(bounds: (f32, f32, f32, f32, f32, f32)) -> bool {
    let (a, b, c, d, e, f) = bounds;
    let r1 = RangeF32::create_valid(sanitize_f32(a, 0.0), sanitize_f32(b, 1.0));
    let r2 = RangeF32::create_valid(sanitize_f32(c, 0.0), sanitize_f32(d, 1.0));
    let r3 = RangeF32::create_valid(sanitize_f32(e, 0.0), sanitize_f32(f, 1.0));
    RangeF32::intersect(&RangeF32::intersect(&r1, &r2), &r3)
        == RangeF32::intersect(&r1, &RangeF32::intersect(&r2, &r3))
}

#[quickcheck]
fn prop_include_contains_value(a: f32, b: f32, x: f32) -> bool {
    let range = RangeF32::create_valid(sanitize_f32(a, 0.0), sanitize_f32(b, 1.0));
    let x = sanitize_f32(x, 0.5);
    range.include(x).contains(x)
}

proptest! {
    #[test]
    fn prop_normalize_wild_value_lands_in_range(x in -1000.0f32..1000.0) {
        let normalized = angles().normalize_wild_value(x);
        prop_assert!(normalized > -PI - TOLERANCE && normalized <= PI + TOLERANCE);
        // Same angle: the difference is a whole number of turns.
        let turns = (x - normalized) / (2.0 * PI);
        prop_assert!((turns - turns.round()).abs() < TOLERANCE * (1.0 + x.abs()));
    }

    #[test]
    fn prop_mod_diff_close_is_shortest(a in -PI..PI, b in -PI..PI) {
        let range = angles();
        let close = range.mod_diff_close(a, b);
        prop_assert!(close.abs() <= PI + TOLERANCE);
        let far = range.mod_diff_far(a, b);
        prop_assert!(far.abs() >= PI - TOLERANCE);
        prop_assert!((close.abs() + far.abs() - range.length()).abs() < TOLERANCE);
    }

    #[test]
    fn prop_mod_diff_directions_span_one_turn(a in -PI..PI, b in -PI..PI) {
        let range = angles();
        let positive = range.mod_diff_positive(a, b);
        let negative = range.mod_diff_negative(a, b);
        prop_assert!(positive >= 0.0);
        prop_assert!(negative < 0.0);
        prop_assert!((positive - negative - 2.0 * PI).abs() < TOLERANCE);

        // Exactly one direction agrees with the shortest difference.
        let close = range.mod_diff_close(a, b);
        prop_assert!(
            (positive - close).abs() < f32::EPSILON || (negative - close).abs() < f32::EPSILON
        );
        prop_assert!((positive - close).abs() >= PI || (negative - close).abs() >= PI);
    }

    #[test]
    fn prop_quadratic_recovers_known_roots(
        r1 in -10.0f32..10.0,
        gap in 0.5f32..10.0,
        scale in prop_oneof![-4.0f32..-0.25, 0.25f32..4.0],
    ) {
        let r2 = r1 + gap;
        let curve = QuadraticCurve::new(scale, -scale * (r1 + r2), scale * r1 * r2);
        let roots = curve.roots();
        prop_assert_eq!(roots.len(), 2);
        prop_assert!((roots[0] - r1).abs() < TOLERANCE * 10.0);
        prop_assert!((roots[1] - r2).abs() < TOLERANCE * 10.0);
        for root in roots {
            prop_assert!(curve.evaluate(root).abs() < curve.epsilon() * 64.0);
        }
    }

    #[test]
    fn prop_quadratic_sign_ranges_have_matching_sign(
        c2 in -5.0f32..5.0,
        c1 in -5.0f32..5.0,
        c0 in -5.0f32..5.0,
    ) {
        let curve = QuadraticCurve::new(c2, c1, c0);
        let limits = RangeF32::new(-3.0, 3.0);
        for range in curve.ranges_above_zero(&limits) {
            prop_assert!(range.is_valid());
            prop_assert!(curve.evaluate(range.middle()) > 0.0);
        }
        for range in curve.ranges_below_zero(&limits) {
            prop_assert!(range.is_valid());
            prop_assert!(curve.evaluate(range.middle()) < 0.0);
        }
    }

    #[test]
    fn prop_cubic_matches_endpoints(
        y0 in -100.0f32..100.0,
        s0 in -10.0f32..10.0,
        y1 in -100.0f32..100.0,
        s1 in -10.0f32..10.0,
        w in 0.1f32..10.0,
    ) {
        let curve = CubicCurve::from(CubicInit::new(y0, s0, y1, s1, w));
        let scale = 1.0 + y0.abs() + y1.abs() + w * (s0.abs() + s1.abs());
        prop_assert!((curve.evaluate(0.0) - y0).abs() < TOLERANCE);
        prop_assert!((curve.derivative(0.0) - s0).abs() < TOLERANCE);
        prop_assert!((curve.evaluate(w) - y1).abs() < TOLERANCE * scale);
        prop_assert!((curve.derivative(w) - s1).abs() < TOLERANCE * scale / w);
    }

    #[test]
    fn prop_spline_ys_match_slow_evaluation(
        ys in prop::collection::vec(-1.0f32..1.0, 2..6),
        start_x in -1.0f32..6.0,
    ) {
        let mut spline = CompactSpline::new(RangeF32::new(-2.0, 2.0), 0.01, ys.len())
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        for (i, y) in ys.iter().enumerate() {
            spline
                .add_node(i as f32, *y, 0.0, SplineAddMethod::EnsureCubicWellBehaved)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
        }
        let fast = spline.ys(start_x, 0.1, 20);
        for (i, y) in fast.iter().enumerate() {
            let x = start_x + 0.1 * i as f32;
            prop_assert!((y - spline.y_calculated_slowly(x)).abs() < 1e-5);
        }
    }

    #[test]
    fn prop_well_behaved_segments_curve_one_way(
        nodes in prop::collection::vec((-1.0f32..1.0, -2.0f32..2.0), 2..5),
    ) {
        // Keep away from curvature that quantization alone could flip: each
        // segment is either clearly one-way or has its inflection well inside.
        for pair in nodes.windows(2) {
            let &[(y0, s0), (y1, s1)] = pair else {
                continue;
            };
            let source = CubicCurve::from(CubicInit::new(y0, s0, y1, s1, 1.0));
            let start = source.second_derivative(0.0);
            let end = source.second_derivative(1.0);
            if start * end > 0.0 {
                prop_assume!(start.abs().min(end.abs()) >= 0.25);
            } else {
                let c3 = source.coeff(3);
                prop_assume!(c3.abs() >= 0.5);
                let inflection = -source.coeff(2) / (3.0 * c3);
                prop_assume!((0.25..=0.75).contains(&inflection));
            }
        }

        let mut spline = CompactSpline::new(RangeF32::new(-4.0, 4.0), 0.01, nodes.len() * 2)
            .map_err(|e| TestCaseError::fail(e.to_string()))?;
        for (i, (y, derivative)) in nodes.iter().enumerate() {
            spline
                .add_node(i as f32, *y, *derivative, SplineAddMethod::EnsureCubicWellBehaved)
                .map_err(|e| TestCaseError::fail(e.to_string()))?;
        }
        for i in 0..spline.num_nodes() - 1 {
            let init = spline.create_cubic_init(SplineIndex::Node(i));
            let curve = CubicCurve::from(init);
            prop_assert!(
                curve.uniform_curvature(&RangeF32::new(0.0, init.width_x)),
                "segment {} of {:?} changes curvature",
                i,
                spline.nodes()
            );
        }
    }
}
