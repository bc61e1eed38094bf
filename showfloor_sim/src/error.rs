//! Harness errors.

use showfloor_core::SceneError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    #[error("failed to build simulation runtime: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("invalid scene configuration: {0}")]
    Config(#[from] SceneError),

    #[error("failed to write export to {path}: {source}")]
    Export {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid frame distribution: {0}")]
    Distribution(String),
}
