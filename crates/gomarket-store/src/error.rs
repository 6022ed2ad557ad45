//! Store error types.

use thiserror::Error;

/// Errors that can occur when talking to a key-value store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the store.
    #[error("Failed to open store: {0}")]
    OpenError(String),

    /// Failed to encode or decode a value.
    #[error("Serialization error: {0}")]
    SerializeError(#[from] serde_json::Error),

    /// Failed to read a key.
    #[error("Read of {key} failed: {reason}")]
    ReadError { key: String, reason: String },

    /// Failed to write a key.
    #[error("Write of {key} failed: {reason}")]
    WriteError { key: String, reason: String },
}
