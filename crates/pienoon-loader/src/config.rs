//! Worker thread configuration.

use serde::{Deserialize, Serialize};

/// Default name given to the worker thread.
pub const DEFAULT_THREAD_NAME: &str = "pienoon-loader";

/// Settings for the loader's worker thread.
///
/// Every field has a default, so an empty JSON object is a valid config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// Name of the worker thread, as shown in debuggers and panic messages.
    pub thread_name: String,
    /// Stack size for the worker thread in bytes. `None` uses the platform
    /// default.
    pub stack_size: Option<usize>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            thread_name: DEFAULT_THREAD_NAME.to_string(),
            stack_size: None,
        }
    }
}

impl LoaderConfig {
    /// Config with a custom thread name.
    pub fn with_thread_name(name: impl Into<String>) -> Self {
        Self {
            thread_name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_json_uses_defaults() -> Result<(), serde_json::Error> {
        let config: LoaderConfig = serde_json::from_str("{}")?;
        assert_eq!(config, LoaderConfig::default());
        assert_eq!(config.thread_name, "pienoon-loader");
        Ok(())
    }

    #[test]
    fn test_partial_json() -> Result<(), serde_json::Error> {
        let config: LoaderConfig = serde_json::from_str(r#"{"stack_size": 262144}"#)?;
        assert_eq!(config.stack_size, Some(262_144));
        assert_eq!(config.thread_name, DEFAULT_THREAD_NAME);
        Ok(())
    }
}
