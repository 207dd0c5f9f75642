//! Behaviour shared by the polynomial curves.

use std::fmt;

use serde::{Deserialize, Serialize};

/// 2^-22: relative precision below which an `f32` coefficient sum is noise.
///
/// Curves scale this by their largest coefficient, so zero tests stay
/// independent of the curve's magnitude.
pub const EPSILON_SCALE: f32 = 1.0 / 4_194_304.0;

/// Selects which of a curve's values to read at some `x`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurveValueType {
    /// `f(x)`
    #[default]
    Value,
    /// `f'(x)`
    Derivative,
    /// `f''(x)`
    SecondDerivative,
    /// `f'''(x)`
    ThirdDerivative,
}

/// A function of one variable with up to three derivatives.
///
/// Implemented by [`QuadraticCurve`](crate::QuadraticCurve) and
/// [`CubicCurve`](crate::CubicCurve). The derivatives that are constant for a
/// given degree still take `x` so that generic code can treat every curve the
/// same way.
pub trait Curve {
    /// `f(x)`
    fn evaluate(&self, x: f32) -> f32;

    /// `f'(x)`
    fn derivative(&self, x: f32) -> f32;

    /// `f''(x)`
    fn second_derivative(&self, x: f32) -> f32;

    /// `f'''(x)`
    fn third_derivative(&self, x: f32) -> f32;

    /// Magnitude below which values computed from this curve are unreliable.
    fn epsilon(&self) -> f32;

    /// Read the value selected by `value_type` at `x`.
    fn value(&self, x: f32, value_type: CurveValueType) -> f32 {
        match value_type {
            CurveValueType::Value => self.evaluate(x),
            CurveValueType::Derivative => self.derivative(x),
            CurveValueType::SecondDerivative => self.second_derivative(x),
            CurveValueType::ThirdDerivative => self.third_derivative(x),
        }
    }
}

/// Snap `value` to exactly zero when its magnitude is below `epsilon`.
#[inline]
pub(crate) fn clamp_near_zero(value: f32, epsilon: f32) -> f32 {
    if value.abs() < epsilon { 0.0 } else { value }
}

/// Largest absolute coefficient, times [`EPSILON_SCALE`].
pub(crate) fn coefficient_epsilon(coefficients: &[f32]) -> f32 {
    coefficients.iter().fold(0.0f32, |max, c| max.max(c.abs())) * EPSILON_SCALE
}

/// Write a polynomial as `a*x^n + ... + c`, highest power first.
///
/// `coefficients[i]` is the coefficient of `x^i`.
pub(crate) fn write_polynomial(f: &mut fmt::Formatter<'_>, coefficients: &[f32]) -> fmt::Result {
    let degree = coefficients.len().saturating_sub(1);
    for (power, c) in coefficients.iter().enumerate().rev() {
        if power == degree {
            write!(f, "{c:.3}")?;
        } else if c.is_sign_negative() {
            write!(f, " - {:.3}", c.abs())?;
        } else {
            write!(f, " + {c:.3}")?;
        }
        match power {
            0 => {}
            1 => write!(f, "x")?,
            _ => write!(f, "x^{power}")?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Parabola;

    impl Curve for Parabola {
        fn evaluate(&self, x: f32) -> f32 {
            x * x
        }
        fn derivative(&self, x: f32) -> f32 {
            2.0 * x
        }
        fn second_derivative(&self, _x: f32) -> f32 {
            2.0
        }
        fn third_derivative(&self, _x: f32) -> f32 {
            0.0
        }
        fn epsilon(&self) -> f32 {
            EPSILON_SCALE
        }
    }

    #[test]
    fn test_value_selects_derivative_order() {
        let curve = Parabola;
        assert!((curve.value(3.0, CurveValueType::Value) - 9.0).abs() < 1e-6);
        assert!((curve.value(3.0, CurveValueType::Derivative) - 6.0).abs() < 1e-6);
        assert!((curve.value(3.0, CurveValueType::SecondDerivative) - 2.0).abs() < 1e-6);
        assert!(curve.value(3.0, CurveValueType::ThirdDerivative).abs() < 1e-6);
    }

    #[test]
    fn test_epsilon_scale_is_2_pow_minus_22() {
        assert!((EPSILON_SCALE * 4_194_304.0 - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_coefficient_epsilon_uses_largest_magnitude() {
        let eps = coefficient_epsilon(&[0.5, -8.0, 2.0]);
        assert!((eps - 8.0 * EPSILON_SCALE).abs() < f32::EPSILON);
        assert!(coefficient_epsilon(&[0.0, 0.0]).abs() < f32::EPSILON);
    }

    #[test]
    fn test_clamp_near_zero() {
        assert!(clamp_near_zero(1e-9, 1e-6).abs() < f32::EPSILON);
        assert!((clamp_near_zero(0.5, 1e-6) - 0.5).abs() < f32::EPSILON);
        assert!((clamp_near_zero(-0.5, 1e-6) + 0.5).abs() < f32::EPSILON);
    }
}
