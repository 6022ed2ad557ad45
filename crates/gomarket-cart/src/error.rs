//! Cart error types.

use thiserror::Error;

/// Errors surfaced by the cart manager.
///
/// Persistence writes never produce one of these: they are logged and
/// dropped inside the background task.
#[derive(Error, Debug)]
pub enum CartError {
    /// `use_cart` was called outside a `CartProvider` scope.
    #[error("use_cart must be used within a CartProvider")]
    NoProvider,

    /// The manager was created outside a Tokio runtime.
    #[error("CartManager must be created inside a Tokio runtime")]
    NoRuntime,

    /// The persisted snapshot could not be decoded.
    #[error("Corrupt cart snapshot under {key}: {reason}")]
    CorruptSnapshot { key: String, reason: String },

    /// The initial load task died before reporting.
    #[error("Cart load did not complete")]
    LoadAborted,
}
