//! Error types for curve and spline construction.

/// Error type for curve and spline operations.
///
/// Numeric corner cases (near-zero leading coefficients, tangent roots) are
/// never errors; they select a lower-degree code path. This type only covers
/// parameters that arrive from configuration and cannot describe a curve.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CurveError {
    /// A parameter is NaN or infinite.
    #[error("{field} must be finite, got {value}")]
    NonFinite {
        /// Name of the offending parameter.
        field: &'static str,
        /// The rejected value.
        value: f32,
    },

    /// The x-width of a cubic segment is zero or negative.
    #[error("width_x must be > 0, got {0}")]
    NonPositiveWidth(f32),

    /// A spline node's y lies outside the spline's y range.
    #[error("node y {y} is outside the spline y range [{start}, {end}]")]
    YOutOfRange {
        /// The rejected y value.
        y: f32,
        /// Start of the spline's y range.
        start: f32,
        /// End of the spline's y range.
        end: f32,
    },

    /// A spline node's x cannot be represented with the spline's granularity.
    #[error("node x {x} does not fit in {max_grains} grains of {granularity}")]
    XOutOfRange {
        /// The rejected x value.
        x: f32,
        /// The spline's x granularity.
        granularity: f32,
        /// Largest representable grain count.
        max_grains: u16,
    },

    /// Invalid spline or curve configuration.
    #[error("Invalid curve configuration: {0}")]
    InvalidConfiguration(String),
}

/// A specialized `Result` type for curve operations.
pub type CurveResult<T> = Result<T, CurveError>;

/// Rejects NaN and infinite values, naming the field in the error.
pub(crate) fn ensure_finite(field: &'static str, value: f32) -> CurveResult<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CurveError::NonFinite { field, value })
    }
}
