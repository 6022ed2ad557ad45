//! Cart persistence configuration.

use gomarket_store::storage_key;
use serde::{Deserialize, Serialize};

/// Where the cart snapshot lives in the key-value store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Key namespace (default: `@GoMarketPlace`).
    #[serde(default = "default_namespace")]
    pub namespace: String,

    /// Key name inside the namespace (default: `products`).
    #[serde(default = "default_key")]
    pub key: String,
}

fn default_namespace() -> String {
    "@GoMarketPlace".to_string()
}

fn default_key() -> String {
    "products".to_string()
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            namespace: default_namespace(),
            key: default_key(),
        }
    }
}

impl CartConfig {
    /// Full store key of the snapshot, e.g. `@GoMarketPlace:products`.
    pub fn snapshot_key(&self) -> String {
        storage_key!(self.namespace.as_str(), self.key)
    }
}
