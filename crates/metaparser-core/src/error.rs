//! Error types for the Metaparser bridge

use crate::engine::Status;
use thiserror::Error;

/// Result type for Metaparser operations
pub type Result<T> = std::result::Result<T, MetaparserError>;

/// Metaparser error types
#[derive(Debug, Error)]
pub enum MetaparserError {
    /// Engine refused the extension
    #[error("instead_extension() return code: {0}")]
    Extension(Status),

    /// Engine failed to start against the game directory
    #[error("instead_init() return code: {0}")]
    Init(Status),

    /// Engine failed to load the game
    #[error("instead_load(): {0}")]
    Load(String),

    /// Engine returned no response for a command
    #[error("instead_cmd(): {0}")]
    Command(String),

    /// Filesystem error around the app directory
    #[error("IO error: {0}")]
    Io(String),

    /// Invalid or unreadable configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Blocking engine task failed or adapter became unusable
    #[error("Engine task error: {0}")]
    Task(String),
}

impl From<std::io::Error> for MetaparserError {
    fn from(err: std::io::Error) -> Self {
        MetaparserError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for MetaparserError {
    fn from(err: serde_json::Error) -> Self {
        MetaparserError::Config(err.to_string())
    }
}
