//! Cubic polynomials fit to endpoint values and slopes.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::curve::{Curve, clamp_near_zero, coefficient_epsilon, write_polynomial};
use crate::error::{CurveError, CurveResult, ensure_finite};
use crate::range::RangeF32;

/// Endpoint constraints for a cubic over `[0, width_x]`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CubicInit {
    /// `f(0)`
    pub start_y: f32,
    /// `f'(0)`
    pub start_derivative: f32,
    /// `f(width_x)`
    pub end_y: f32,
    /// `f'(width_x)`
    pub end_derivative: f32,
    /// Length of the domain. Must be positive.
    pub width_x: f32,
}

impl CubicInit {
    /// Create init parameters.
    pub const fn new(
        start_y: f32,
        start_derivative: f32,
        end_y: f32,
        end_derivative: f32,
        width_x: f32,
    ) -> Self {
        Self {
            start_y,
            start_derivative,
            end_y,
            end_derivative,
            width_x,
        }
    }

    /// Check that every parameter is finite and `width_x` is positive.
    ///
    /// # Errors
    ///
    /// Returns [`CurveError::NonFinite`] or [`CurveError::NonPositiveWidth`].
    pub fn validate(&self) -> CurveResult<()> {
        ensure_finite("start_y", self.start_y)?;
        ensure_finite("start_derivative", self.start_derivative)?;
        ensure_finite("end_y", self.end_y)?;
        ensure_finite("end_derivative", self.end_derivative)?;
        let width_x = ensure_finite("width_x", self.width_x)?;
        if width_x <= 0.0 {
            return Err(CurveError::NonPositiveWidth(width_x));
        }
        Ok(())
    }
}

/// The polynomial `c3*x^3 + c2*x^2 + c1*x + c0`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct CubicCurve {
    /// `c[i]` is the coefficient of `x^i`.
    c: [f32; 4],
}

impl CubicCurve {
    /// Create from coefficients, highest power first.
    pub const fn new(c3: f32, c2: f32, c1: f32, c0: f32) -> Self {
        Self {
            c: [c0, c1, c2, c3],
        }
    }

    /// Create from coefficients indexed by power: `c[i]` multiplies `x^i`.
    pub const fn from_coefficients(c: [f32; 4]) -> Self {
        Self { c }
    }

    /// Fit the unique cubic matching `init`'s endpoint values and slopes.
    ///
    /// `width_x` must be positive; debug builds assert it. Use
    /// [`CubicInit::validate`] or [`CubicCurve::try_from_init`] for
    /// parameters that are not known to be sane.
    pub fn from_init(init: &CubicInit) -> Self {
        debug_assert!(init.width_x > 0.0, "cubic width must be positive: {init:?}");
        let CubicInit {
            start_y: y0,
            start_derivative: s0,
            end_y: y1,
            end_derivative: s1,
            width_x: w,
        } = *init;
        let dy = y1 - y0;
        let w2 = w * w;
        let c2 = (3.0 * dy - w * (2.0 * s0 + s1)) / w2;
        let c3 = (w * (s0 + s1) - 2.0 * dy) / (w2 * w);
        Self::new(c3, c2, s0, y0)
    }

    /// [`CubicCurve::from_init`] after [`CubicInit::validate`].
    ///
    /// # Errors
    ///
    /// Returns the validation error for non-finite or non-positive inputs.
    pub fn try_from_init(init: &CubicInit) -> CurveResult<Self> {
        init.validate()?;
        Ok(Self::from_init(init))
    }

    /// Coefficient of `x^i`; zero for powers above three.
    pub fn coeff(&self, i: usize) -> f32 {
        self.c.get(i).copied().unwrap_or(0.0)
    }

    /// Overwrite the coefficient of `x^i`. Powers above three are ignored.
    pub fn set_coeff(&mut self, i: usize, value: f32) {
        if let Some(c) = self.c.get_mut(i) {
            *c = value;
        }
    }

    /// Number of coefficients (four).
    pub const fn num_coeff(&self) -> usize {
        4
    }

    /// True if `f''` does not change sign over `x_limits`.
    ///
    /// `f''` is linear, so only the end points are checked. Values within
    /// [`Curve::epsilon`] of zero count as zero, and zero is compatible with
    /// either sign.
    pub fn uniform_curvature(&self, x_limits: &RangeF32) -> bool {
        let epsilon = self.epsilon();
        let start = clamp_near_zero(self.second_derivative(x_limits.start()), epsilon);
        let end = clamp_near_zero(self.second_derivative(x_limits.end()), epsilon);
        start * end >= 0.0
    }
}

impl Curve for CubicCurve {
    #[inline]
    fn evaluate(&self, x: f32) -> f32 {
        let [c0, c1, c2, c3] = self.c;
        ((c3 * x + c2) * x + c1) * x + c0
    }

    #[inline]
    fn derivative(&self, x: f32) -> f32 {
        let [_, c1, c2, c3] = self.c;
        (3.0 * c3 * x + 2.0 * c2) * x + c1
    }

    #[inline]
    fn second_derivative(&self, x: f32) -> f32 {
        6.0 * self.c[3] * x + 2.0 * self.c[2]
    }

    #[inline]
    fn third_derivative(&self, _x: f32) -> f32 {
        6.0 * self.c[3]
    }

    fn epsilon(&self) -> f32 {
        coefficient_epsilon(&self.c)
    }
}

impl From<CubicInit> for CubicCurve {
    fn from(init: CubicInit) -> Self {
        Self::from_init(&init)
    }
}

impl fmt::Display for CubicCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_polynomial(f, &self.c)
    }
}
