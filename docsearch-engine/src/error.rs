//! Error types for the search engine

use thiserror::Error;

/// Errors that can occur while serving a search request
#[derive(Debug, Error)]
pub enum SearchError {
    /// Empty or missing query text, rejected before any store access
    #[error("Invalid query: query text must be a non-empty string")]
    InvalidQuery,

    /// Vector search was requested but no encoder is configured
    #[error("Vector search requested but no text encoder is configured")]
    EncoderUnavailable,

    /// Document store error
    #[error("Store error: {0}")]
    Store(String),

    /// Embedding generation error
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Native vector index error
    #[error("Index error: {0}")]
    Index(String),
}

impl SearchError {
    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Create an encoding error
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Create an index error
    pub fn index(msg: impl Into<String>) -> Self {
        Self::Index(msg.into())
    }
}

/// Result type for search operations
pub type Result<T> = std::result::Result<T, SearchError>;
