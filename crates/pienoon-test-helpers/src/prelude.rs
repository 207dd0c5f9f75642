//! Convenience re-exports for common test utilities.
//!
//! ```rust,ignore
//! use pienoon_test_helpers::prelude::*;
//! ```

pub use crate::must::{must, must_some, must_with};

#[cfg(feature = "recorder")]
pub use crate::recorder::EventRecorder;

#[cfg(feature = "logging")]
pub use crate::logging::init_test_tracing;

/// Result type for tests that use `?`.
pub type TestResult = Result<(), Box<dyn std::error::Error>>;
