//! Error types for flatdb core.

use std::io;
use thiserror::Error;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// A collection or resource name is unusable as a path segment.
    #[error("invalid key: {message}")]
    InvalidKey {
        /// Description of what is wrong with the name.
        message: String,
    },

    /// The requested record or collection does not exist.
    #[error("not found: {key}")]
    NotFound {
        /// The key that was looked up, as `collection` or `collection/resource`.
        key: String,
    },

    /// Stored bytes could not be encoded or decoded.
    #[error("codec error: {0}")]
    Codec(#[from] flatdb_codec::CodecError),

    /// An underlying filesystem operation failed.
    #[error("storage fault: {0}")]
    Storage(#[from] io::Error),
}

impl StoreError {
    /// Creates an invalid key error.
    pub fn invalid_key(message: impl Into<String>) -> Self {
        Self::InvalidKey {
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(key: impl Into<String>) -> Self {
        Self::NotFound { key: key.into() }
    }
}
