//! Motion Math for Pie Noon
//!
//! This crate holds the numeric core behind Pie Noon's animations: intervals
//! with modular arithmetic, polynomial curves fit to keyframes, and compact
//! quantized splines.
//!
//! # Overview
//!
//! - **[`Range`]**: closed intervals, intersection of interval lists, and
//!   modular differences for wrapping quantities such as angles
//! - **[`QuadraticCurve`]**: evaluation, numerically careful roots, and the
//!   sub-ranges where the curve is above or below zero
//! - **[`CubicCurve`]**: Hermite fit to endpoint values and slopes over
//!   `[0, width_x]`, plus a curvature check
//! - **[`CompactSpline`]**: chains of cubics stored in six bytes per node,
//!   with [`SplinePlayback`] to drive them over time
//! - **[`graph_2d_points`]**: ASCII plots for debugging
//!
//! Every evaluation is a few multiply-adds with no allocation, so curves can
//! be evaluated once per frame per animated property.
//!
//! # Example
//!
//! ```
//! use pienoon_motive::{CubicCurve, CubicInit, Curve};
//!
//! // Ease from 0 to 10 over two seconds, arriving with zero velocity.
//! let init = CubicInit::new(0.0, 0.0, 10.0, 0.0, 2.0);
//! init.validate()?;
//! let curve = CubicCurve::from(init);
//!
//! assert!((curve.evaluate(2.0) - 10.0).abs() < 1e-4);
//! assert!(curve.derivative(2.0).abs() < 1e-4);
//! # Ok::<(), pienoon_motive::CurveError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod cubic;
pub mod curve;
pub mod error;
pub mod graph;
pub mod prelude;
pub mod quadratic;
pub mod range;
pub mod spline;

pub use cubic::{CubicCurve, CubicInit};
pub use curve::{Curve, CurveValueType, EPSILON_SCALE};
pub use error::{CurveError, CurveResult};
pub use graph::{GraphSize, graph_2d_points, graph_curve_on_x_range};
pub use quadratic::{QuadraticCurve, QuadraticInitWithStartDerivative, QuadraticRoots, SignRanges};
pub use range::{
    FloatScalar, ModularDirection, Range, RangeF32, RangeF64, RangeI32, RangeU32, Scalar,
};
pub use spline::{CompactSpline, CompactSplineNode, SplineAddMethod, SplineIndex, SplinePlayback};
