//! Cart state and its mutation rules.
//!
//! Transitions are pure: each returns a new [`CartState`] and leaves the
//! receiver untouched, so the manager can publish the result atomically.

use crate::ids::ProductId;
use crate::item::{CartItem, ProductDescriptor};
use serde::{Deserialize, Serialize};

/// Ordered sequence of cart line items, at most one per product id.
///
/// Serializes as a bare JSON array, which is the snapshot format.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct CartState {
    items: Vec<CartItem>,
}

impl CartState {
    /// An empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a state from items as-is. No uniqueness or quantity checks are made.
    pub fn from_items(items: Vec<CartItem>) -> Self {
        Self { items }
    }

    /// Items in display order.
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Iterate over items in display order.
    pub fn iter(&self) -> std::slice::Iter<'_, CartItem> {
        self.items.iter()
    }

    /// Number of distinct line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of all quantities.
    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get an item by product id.
    pub fn get(&self, id: &ProductId) -> Option<&CartItem> {
        self.items.iter().find(|i| &i.id == id)
    }

    /// Check whether a product is in the cart.
    pub fn contains(&self, id: &ProductId) -> bool {
        self.get(id).is_some()
    }

    /// Add one unit of a product.
    ///
    /// An existing line keeps its position and quantity + 1 but takes title,
    /// image and price from `descriptor`. A new product is appended with
    /// quantity 1.
    pub fn with_added(&self, descriptor: ProductDescriptor) -> Self {
        if !self.contains(&descriptor.id) {
            let mut items = self.items.clone();
            items.push(CartItem::from_descriptor(descriptor, 1));
            return Self { items };
        }

        let items = self
            .items
            .iter()
            .map(|item| {
                if item.id == descriptor.id {
                    CartItem::from_descriptor(descriptor.clone(), item.quantity.saturating_add(1))
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }

    /// Add one unit to an existing line. Unknown ids leave the state unchanged.
    pub fn with_incremented(&self, id: &ProductId) -> Self {
        let items = self
            .items
            .iter()
            .map(|item| {
                if &item.id == id {
                    CartItem {
                        quantity: item.quantity.saturating_add(1),
                        ..item.clone()
                    }
                } else {
                    item.clone()
                }
            })
            .collect();
        Self { items }
    }

    /// Remove one unit from a line.
    ///
    /// A line at quantity 1 is dropped entirely. Unknown ids leave the state
    /// unchanged. In an unvalidated snapshot holding the id more than once,
    /// every copy is decremented and copies that would reach 0 are dropped.
    pub fn with_decremented(&self, id: &ProductId) -> Self {
        let above_one = self.items.iter().any(|i| &i.id == id && i.quantity > 1);

        let items = if above_one {
            self.items
                .iter()
                .filter_map(|item| {
                    if &item.id != id {
                        return Some(item.clone());
                    }
                    (item.quantity > 1).then(|| CartItem {
                        quantity: item.quantity - 1,
                        ..item.clone()
                    })
                })
                .collect()
        } else {
            self.items.iter().filter(|i| &i.id != id).cloned().collect()
        };
        Self { items }
    }
}

impl<'a> IntoIterator for &'a CartState {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Vec<CartItem>> for CartState {
    fn from(items: Vec<CartItem>) -> Self {
        Self::from_items(items)
    }
}
