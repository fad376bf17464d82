//! Engine configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Field used by the `*_default` engine operations unless configured.
pub const DEFAULT_STATE_FIELD: &str = "status";

/// Errors that can occur when loading a configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid engine configuration: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Default state field must not be empty")]
    EmptyDefaultField,
}

/// Settings for a [`crate::engine::TransitionEngine`].
///
/// Every key is optional when deserializing:
///
/// ```rust
/// use statefield::engine::EngineConfig;
///
/// let config = EngineConfig::from_json(r#"{ "default_field": "stage" }"#).unwrap();
/// assert_eq!(config.default_field, "stage");
/// assert!(config.publish_events);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Field targeted by `transition` and `can_transition_default`
    pub default_field: String,

    /// Publish a notification after each successful transition.
    ///
    /// On by default. Setting it to `false` is an opt-out: committed
    /// transitions then persist and run their after hooks, but no
    /// `state.transitioned` notification is sent to any notifier.
    pub publish_events: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_field: DEFAULT_STATE_FIELD.to_string(),
            publish_events: true,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_field.trim().is_empty() {
            return Err(ConfigError::EmptyDefaultField);
        }
        Ok(())
    }
}
