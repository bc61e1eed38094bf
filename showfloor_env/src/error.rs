//! Error types for the showfloor environment abstraction.

use thiserror::Error;

/// Errors that can occur at the collaborator boundary.
///
/// None of these ever reach the viewer: the scene core logs them and keeps
/// whatever was on display before.
#[derive(Debug, Error)]
pub enum EnvError {
    /// Remote request failed (network down, HTTP error, etc.)
    #[error("Fetch failed: {0}")]
    FetchFailed(String),

    /// Response arrived but could not be understood
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// A collaborator feature is not available on this tier or not yet built
    #[error("Unavailable: {0}")]
    Unavailable(String),
}

impl EnvError {
    /// Creates a fetch error.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::FetchFailed(msg.into())
    }

    /// Creates a malformed-response error.
    pub fn malformed(msg: impl std::fmt::Display) -> Self {
        Self::MalformedResponse(msg.to_string())
    }

    /// Creates an unavailable error for a named feature.
    pub fn unavailable(feature: impl std::fmt::Display) -> Self {
        Self::Unavailable(feature.to_string())
    }
}
