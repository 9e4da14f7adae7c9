//! Error types for the Frontdesk workspace.

use thiserror::Error;

/// Unified error type for configuration and input handling.
#[derive(Debug, Error)]
pub enum FrontdeskError {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input error
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}
