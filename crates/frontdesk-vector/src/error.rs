//! Vector store error types.

use thiserror::Error;

/// Errors that can occur during vector store operations.
#[derive(Debug, Error)]
pub enum VectorError {
    /// A vector's length disagrees with the store dimension
    #[error("Dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    /// Vector batch and metadata batch sizes disagree
    #[error("Count mismatch: {vectors} vectors, {metadata} metadata entries")]
    CountMismatch { vectors: usize, metadata: usize },

    /// Persisted artifacts are unreadable or inconsistent
    #[error("Corrupt store: {0}")]
    CorruptStore(String),

    /// Store dimension must be positive
    #[error("Invalid dimension: {0}")]
    InvalidDimension(usize),

    /// usearch index error
    #[error("Index error: {0}")]
    Index(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}
