//! Background Resource Loading for Pie Noon
//!
//! This crate moves slow resource loading (file reads, decoding) onto one
//! worker thread while keeping the final hand-off on the thread that owns
//! the game state.
//!
//! # Overview
//!
//! - **[`AsyncResource`]**: the two-phase contract, `load` on the worker and
//!   `finalize` on the owner
//! - **[`AsyncLoader`]**: FIFO job queue, worker lifecycle and the
//!   once-per-frame [`AsyncLoader::try_finalize`] drain
//! - **[`FileResource`]** / **[`FnResource`]**: ready-made resources
//! - **[`LoaderStats`]**: lock-free job counters
//!
//! # Ordering Guarantees
//!
//! - Jobs load one at a time, in the order they were queued
//! - Jobs finalize in the same order, only after their `load` returned
//! - [`AsyncLoader::stop_loading_when_complete`] is a barrier: the worker
//!   finishes everything queued before it, then exits
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use pienoon_loader::{AsyncLoader, FileResource, FileStatus};
//!
//! let mut loader = AsyncLoader::new();
//! let level = Arc::new(FileResource::new("does-not-exist.json"));
//! loader.queue_job(level.clone());
//! loader.start_loading()?;
//! loader.stop_loading_when_complete();
//!
//! // Once per frame:
//! while !loader.try_finalize() {
//!     std::thread::yield_now();
//! }
//! assert!(matches!(level.status(), FileStatus::Failed(_)));
//! # Ok::<(), pienoon_loader::LoaderError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod error;
pub mod loader;
pub mod prelude;
pub mod resource;
pub mod stats;

pub use config::LoaderConfig;
pub use error::{LoaderError, LoaderResult};
pub use loader::{AsyncLoader, LoaderState};
pub use resource::{AsyncResource, FileResource, FileStatus, FnResource};
pub use stats::{LoaderStats, LoaderStatsSnapshot};
