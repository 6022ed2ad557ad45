//! Change notifications for cart observers.

use std::sync::Arc;

use tokio::sync::watch;

use crate::state::CartState;

/// A registered observer of the cart.
///
/// Dropping the subscription (or calling [`unsubscribe`](Self::unsubscribe))
/// deregisters it.
#[derive(Debug)]
pub struct CartSubscription {
    receiver: watch::Receiver<Arc<CartState>>,
}

impl CartSubscription {
    pub(crate) fn new(receiver: watch::Receiver<Arc<CartState>>) -> Self {
        Self { receiver }
    }

    /// The latest published state, marking it as seen.
    pub fn current(&mut self) -> Arc<CartState> {
        Arc::clone(&self.receiver.borrow_and_update())
    }

    /// Whether a state was published since the last `current` or `changed`.
    pub fn has_changed(&self) -> bool {
        self.receiver.has_changed().unwrap_or(false)
    }

    /// Wait for the next published state.
    ///
    /// Returns `None` once the manager has been dropped. Every mutation
    /// publishes, even when the resulting state equals the previous one, but
    /// rapid successive publishes may be observed as a single change.
    pub async fn changed(&mut self) -> Option<Arc<CartState>> {
        self.receiver.changed().await.ok()?;
        Some(self.current())
    }

    /// Stop observing the cart.
    pub fn unsubscribe(self) {}
}
