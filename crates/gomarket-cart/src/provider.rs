//! Task-scoped access to a cart manager.
//!
//! UI code deep inside a task can reach the active cart with [`use_cart`]
//! instead of threading a manager through every call.

use std::future::Future;

use crate::error::CartError;
use crate::manager::CartManager;

tokio::task_local! {
    static CURRENT_CART: CartManager;
}

/// Makes a [`CartManager`] available to everything running inside a future.
#[derive(Debug)]
pub struct CartProvider;

impl CartProvider {
    /// Run `f` with `manager` as the active cart.
    ///
    /// Scopes nest; the innermost manager wins.
    pub async fn scope<F>(manager: CartManager, f: F) -> F::Output
    where
        F: Future,
    {
        CURRENT_CART.scope(manager, f).await
    }

    /// Synchronous variant of [`scope`](Self::scope).
    pub fn sync_scope<F, R>(manager: CartManager, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        CURRENT_CART.sync_scope(manager, f)
    }
}

/// The active cart of the current provider scope.
///
/// Calling this outside [`CartProvider::scope`] is a wiring mistake and
/// yields [`CartError::NoProvider`].
pub fn use_cart() -> Result<CartManager, CartError> {
    CURRENT_CART
        .try_with(CartManager::clone)
        .map_err(|_| CartError::NoProvider)
}
