//! Error types for the scene core.

use thiserror::Error;

/// Errors surfaced by fallible core operations.
///
/// Only setup paths (config loading and validation) return these. The
/// per-tick paths degrade silently instead.
#[derive(Debug, Error)]
pub enum SceneError {
    /// Config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid JSON for `SceneConfig`
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] serde_json::Error),

    /// Config parsed but holds an unusable value
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}

impl SceneError {
    /// Creates an invalid-config error.
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
