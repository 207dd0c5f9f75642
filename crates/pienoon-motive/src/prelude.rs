//! Common imports for code that builds and evaluates curves.
//!
//! ```
//! use pienoon_motive::prelude::*;
//!
//! let curve = QuadraticCurve::new(1.0, -4.0, 3.0);
//! assert_eq!(curve.roots().len(), 2);
//! ```

pub use crate::cubic::{CubicCurve, CubicInit};
pub use crate::curve::{Curve, CurveValueType};
pub use crate::error::{CurveError, CurveResult};
pub use crate::quadratic::{QuadraticCurve, QuadraticInitWithStartDerivative};
pub use crate::range::{ModularDirection, Range, RangeF32};
pub use crate::spline::{CompactSpline, SplineAddMethod, SplineIndex, SplinePlayback};
