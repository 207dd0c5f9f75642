//! Error types for loader lifecycle operations.

use std::io;

/// Error type for [`AsyncLoader`](crate::AsyncLoader) lifecycle operations.
///
/// Resource load and finalize failures are never reported here; resources
/// record their own outcome.
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// `start_loading` was called while a worker thread is still alive.
    #[error("loader worker is already running")]
    AlreadyRunning,

    /// The operating system refused to create the worker thread.
    #[error("failed to spawn loader thread: {0}")]
    Spawn(#[source] io::Error),

    /// The worker thread panicked, most likely inside a resource's `load`.
    #[error("loader worker panicked")]
    WorkerPanicked,
}

/// A specialized `Result` type for loader operations.
pub type LoaderResult<T> = Result<T, LoaderError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;

    #[test]
    fn test_spawn_error_keeps_source() {
        let err = LoaderError::Spawn(io::Error::other("out of threads"));
        assert!(err.to_string().contains("out of threads"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_already_running_display() {
        assert_eq!(
            LoaderError::AlreadyRunning.to_string(),
            "loader worker is already running"
        );
    }
}
