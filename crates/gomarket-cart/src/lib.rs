//! Client-side shopping cart for GoMarket storefronts.
//!
//! This crate keeps the cart the UI renders from:
//!
//! - **State**: ordered line items, one per product, quantity always at least 1
//! - **Manager**: `add` / `increment` / `decrement`, published to subscribers
//!   synchronously and persisted to a key-value store in the background
//! - **Provider**: task-scoped access to the active manager via `use_cart`
//!
//! # Example
//!
//! ```rust,ignore
//! use gomarket_cart::prelude::*;
//! use gomarket_store::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open(".gomarket/store").await?);
//! let cart = CartManager::open(cache, &CartConfig::default()).await?;
//!
//! CartProvider::scope(cart, async {
//!     let cart = use_cart()?;
//!     cart.add(ProductDescriptor::new("1", "Shoe", "https://img/shoe.png", 10.0));
//!     cart.decrement(&ProductId::new("1")); // removed again
//!     Ok::<_, CartError>(())
//! })
//! .await?;
//! ```

pub mod config;
pub mod error;
pub mod ids;
pub mod item;
pub mod manager;
pub mod provider;
pub mod state;
pub mod subscription;

pub use config::CartConfig;
pub use error::CartError;
pub use ids::ProductId;
pub use item::{CartItem, ProductDescriptor};
pub use manager::CartManager;
pub use provider::{use_cart, CartProvider};
pub use state::CartState;
pub use subscription::CartSubscription;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{
        use_cart, CartConfig, CartError, CartItem, CartManager, CartProvider, CartState,
        CartSubscription, ProductDescriptor, ProductId,
    };
}
