//! Quadratic polynomials: evaluation, roots and sign decomposition.

use std::fmt;
use std::iter;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::curve::{Curve, EPSILON_SCALE, coefficient_epsilon, write_polynomial};
use crate::error::{CurveResult, ensure_finite};
use crate::range::RangeF32;

/// Real roots of a quadratic, ascending. At most two.
pub type QuadraticRoots = ArrayVec<f32, 2>;

/// Sub-intervals produced by splitting a range at a quadratic's roots.
///
/// Two roots cut a range into at most three pieces.
pub type SignRanges = ArrayVec<RangeF32, 3>;

/// Parameters for a quadratic through `(0, start_y)` and `(1, end_y)` that
/// leaves `x = 0` with slope `start_derivative`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct QuadraticInitWithStartDerivative {
    /// `f(0)`
    pub start_y: f32,
    /// `f'(0)`
    pub start_derivative: f32,
    /// `f(1)`
    pub end_y: f32,
}

impl QuadraticInitWithStartDerivative {
    /// Create init parameters.
    pub const fn new(start_y: f32, start_derivative: f32, end_y: f32) -> Self {
        Self {
            start_y,
            start_derivative,
            end_y,
        }
    }

    /// Reject non-finite parameters, e.g. after loading from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NonFinite`](crate::CurveError::NonFinite) naming
    /// the first offending field.
    pub fn validate(&self) -> CurveResult<()> {
        ensure_finite("start_y", self.start_y)?;
        ensure_finite("start_derivative", self.start_derivative)?;
        ensure_finite("end_y", self.end_y)?;
        Ok(())
    }
}

/// The polynomial `c2*x^2 + c1*x + c0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct QuadraticCurve {
    /// `c[i]` is the coefficient of `x^i`.
    c: [f32; 3],
}

impl QuadraticCurve {
    /// Create from coefficients, highest power first.
    pub const fn new(c2: f32, c1: f32, c0: f32) -> Self {
        Self { c: [c0, c1, c2] }
    }

    /// Create from coefficients indexed by power: `c[i]` multiplies `x^i`.
    pub const fn from_coefficients(c: [f32; 3]) -> Self {
        Self { c }
    }

    /// Fit `f(0) = start_y`, `f'(0) = start_derivative`, `f(1) = end_y`.
    pub fn from_init(init: &QuadraticInitWithStartDerivative) -> Self {
        // f(1) = c2 + c1 + c0 = end_y, with c0 and c1 fixed by the start.
        let c0 = init.start_y;
        let c1 = init.start_derivative;
        Self::new(init.end_y - c1 - c0, c1, c0)
    }

    /// Coefficient of `x^i`; zero for powers above two.
    pub fn coeff(&self, i: usize) -> f32 {
        self.c.get(i).copied().unwrap_or(0.0)
    }

    /// Number of coefficients (three).
    pub const fn num_coeff(&self) -> usize {
        3
    }

    /// Discriminant `c1^2 - 4*c2*c0`.
    #[inline]
    pub fn discriminant(&self) -> f32 {
        let [c0, c1, c2] = self.c;
        c1 * c1 - 4.0 * c2 * c0
    }

    /// [`QuadraticCurve::discriminant`], snapped to zero when its magnitude is
    /// below `epsilon`.
    ///
    /// Rounding often leaves the discriminant of a tangent parabola slightly
    /// off zero, which would otherwise turn one root into zero or two.
    pub fn reliable_discriminant(&self, epsilon: f32) -> f32 {
        let discriminant = self.discriminant();
        if discriminant.abs() < epsilon { 0.0 } else { discriminant }
    }

    /// The `x` where the slope is zero.
    ///
    /// Only defined for a true parabola: `|c2|` must be at least
    /// [`Curve::epsilon`]. Debug builds assert this.
    pub fn critical_point(&self) -> f32 {
        let [_, c1, c2] = self.c;
        debug_assert!(
            c2.abs() >= self.epsilon(),
            "critical point of a degenerate quadratic {self}"
        );
        // 0 = f'(x) = 2*c2*x + c1
        -(c1 / c2) * 0.5
    }

    /// The `x` values where the curve is zero, ascending.
    ///
    /// A curve with a negligible `x^2` term is solved as a line; a negligible
    /// line (a constant) has no roots, even when the constant is zero.
    pub fn roots(&self) -> QuadraticRoots {
        let mut roots = QuadraticRoots::new();
        let [c0, c1, c2] = self.c;
        let epsilon = self.epsilon();

        // An all-zero curve has a zero epsilon, so test for exact zeros too.
        if c2.abs() < epsilon || c2 == 0.0 {
            if c1.abs() >= epsilon && c1 != 0.0 {
                roots.push(-c0 / c1);
            }
            return roots;
        }

        // Rounding error in c1^2 - 4*c2*c0 is relative to the size of its terms.
        let noise = (c1 * c1 + (4.0 * c2 * c0).abs()) * EPSILON_SCALE * 4.0;
        let discriminant = self.reliable_discriminant(noise);
        if discriminant < 0.0 {
            return roots;
        }
        if discriminant > 0.0 {
            // q shares the sign of c1, so c1 + sign(c1)*sqrt(d) never cancels.
            let q = -0.5 * (c1 + discriminant.sqrt().copysign(c1));
            let a = q / c2;
            let b = c0 / q;
            roots.push(a.min(b));
            roots.push(a.max(b));
        } else {
            roots.push(self.critical_point());
        }
        roots
    }

    /// Roots within `x_limits` (inclusive), ascending.
    pub fn roots_in_range(&self, x_limits: &RangeF32) -> QuadraticRoots {
        self.roots()
            .into_iter()
            .filter(|&root| x_limits.contains(root))
            .collect()
    }

    /// Sub-ranges of `x_limits` on which the curve's sign matches `sign`.
    ///
    /// Only the sign of `sign` matters. Neighbouring pieces with the same sign
    /// (either side of a tangent root) are merged.
    pub fn ranges_matching_sign(&self, x_limits: &RangeF32, sign: f32) -> SignRanges {
        let mut matching = SignRanges::new();
        if !x_limits.is_valid() {
            return matching;
        }

        let roots = self.roots_in_range(x_limits);
        let has_roots = !roots.is_empty();
        let mut start = x_limits.start();
        for end in roots.into_iter().chain(iter::once(x_limits.end())) {
            // A root on a bound leaves an empty piece; skip it.
            if has_roots && end <= start {
                continue;
            }
            let mid_value = self.evaluate((start + end) * 0.5);
            if mid_value * sign > 0.0 {
                match matching.last_mut() {
                    Some(last) if last.end() >= start => last.set_end(end),
                    _ => matching.push(RangeF32::new(start, end)),
                }
            }
            start = end;
        }
        matching
    }

    /// Sub-ranges of `x_limits` on which the curve is positive.
    pub fn ranges_above_zero(&self, x_limits: &RangeF32) -> SignRanges {
        self.ranges_matching_sign(x_limits, 1.0)
    }

    /// Sub-ranges of `x_limits` on which the curve is negative.
    pub fn ranges_below_zero(&self, x_limits: &RangeF32) -> SignRanges {
        self.ranges_matching_sign(x_limits, -1.0)
    }
}

impl Curve for QuadraticCurve {
    #[inline]
    fn evaluate(&self, x: f32) -> f32 {
        let [c0, c1, c2] = self.c;
        (c2 * x + c1) * x + c0
    }

    #[inline]
    fn derivative(&self, x: f32) -> f32 {
        2.0 * self.c[2] * x + self.c[1]
    }

    #[inline]
    fn second_derivative(&self, _x: f32) -> f32 {
        2.0 * self.c[2]
    }

    #[inline]
    fn third_derivative(&self, _x: f32) -> f32 {
        0.0
    }

    fn epsilon(&self) -> f32 {
        coefficient_epsilon(&self.c)
    }
}

impl From<QuadraticInitWithStartDerivative> for QuadraticCurve {
    fn from(init: QuadraticInitWithStartDerivative) -> Self {
        Self::from_init(&init)
    }
}

impl fmt::Display for QuadraticCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_polynomial(f, &self.c)
    }
}
