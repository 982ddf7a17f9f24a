//! Error types for the streaming decoration subsystem

use thiserror::Error;

/// Main error type for the subsystem
#[derive(Debug, Error)]
pub enum Error {
    #[error("GPU error: {0}")]
    Gpu(String),

    #[error("Streaming error: {0}")]
    Streaming(String),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),
}
