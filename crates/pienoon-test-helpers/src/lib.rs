//! Shared test utilities for the Pie Noon crates.
//!
//! # Modules
//!
//! - [`mod@must`] - Unwrap helpers with good error messages and `#[track_caller]`
//! - [`assertions`] - Assertion macros for floats and ordered sequences
//! - [`recorder`] - Thread-safe event log for observing callbacks
//! - [`logging`] - One-time `tracing` setup that writes through the test harness
//! - [`prelude`] - Convenience re-exports
//!
//! # Usage
//!
//! ```toml
//! [dev-dependencies]
//! pienoon-test-helpers = { workspace = true }
//! ```
//!
//! ```rust,ignore
//! use pienoon_test_helpers::prelude::*;
//! ```

#![deny(unsafe_op_in_unsafe_fn)]
#![allow(clippy::unwrap_used, clippy::panic)]

pub mod assertions;
pub mod must;
pub mod prelude;

#[cfg(feature = "recorder")]
pub mod recorder;

#[cfg(feature = "logging")]
pub mod logging;

pub use must::*;

#[cfg(feature = "recorder")]
pub use recorder::EventRecorder;
