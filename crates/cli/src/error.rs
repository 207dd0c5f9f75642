//! Error types for pienoonctl

use pienoon_loader::LoaderError;
use pienoon_motive::CurveError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid curve: {0}")]
    CurveError(#[from] CurveError),

    #[error("Loader error: {0}")]
    LoaderError(#[from] LoaderError),

    #[error("Load failed for {failed} of {total} files")]
    LoadFailed { failed: usize, total: usize },

    #[error("Timed out after {0} ms waiting for the loader to finish")]
    Timeout(u64),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::ValidationError(_) | CliError::CurveError(_) | CliError::JsonError(_) => 2,
            CliError::LoadFailed { .. } => 3,
            CliError::LoaderError(_) | CliError::Timeout(_) => 4,
        }
    }
}
