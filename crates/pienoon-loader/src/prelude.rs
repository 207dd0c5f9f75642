//! Common imports for code that queues and finalizes resources.

pub use crate::config::LoaderConfig;
pub use crate::error::{LoaderError, LoaderResult};
pub use crate::loader::{AsyncLoader, LoaderState};
pub use crate::resource::{AsyncResource, FileResource, FileStatus, FnResource};
