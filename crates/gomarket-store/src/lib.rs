//! Async key-value persistence layer for the GoMarket cart.
//!
//! Provides a minimal store contract with two backends and a typed wrapper
//! that handles JSON serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use gomarket_store::{Cache, FileStore};
//!
//! let cache = Cache::new(FileStore::open(".gomarket/store").await?);
//!
//! // Store a value
//! cache.set("@GoMarketPlace:products", &items).await?;
//!
//! // Retrieve a value
//! let items: Option<Vec<CartItem>> = cache.get("@GoMarketPlace:products").await?;
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::StoreError;
pub use file::FileStore;
pub use kv::{Cache, KeyValueStore};
pub use memory::MemoryStore;
