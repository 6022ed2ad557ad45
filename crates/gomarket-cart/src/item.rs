//! Cart line items and the product descriptors they are built from.

use crate::ids::ProductId;
use serde::{Deserialize, Serialize};

/// Product data as it arrives from the catalog, before it is in the cart.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductDescriptor {
    /// Product identifier.
    pub id: ProductId,
    /// Display title.
    pub title: String,
    /// Display image.
    pub image_url: String,
    /// Unit price.
    pub price: f64,
}

impl ProductDescriptor {
    /// Create a new descriptor.
    pub fn new(
        id: impl Into<ProductId>,
        title: impl Into<String>,
        image_url: impl Into<String>,
        price: f64,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            image_url: image_url.into(),
            price,
        }
    }
}

/// A line item in the cart.
///
/// Field order here is the snapshot field order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartItem {
    /// Product identifier, unique within a cart.
    pub id: ProductId,
    /// Display title (denormalized from the catalog).
    pub title: String,
    /// Display image (denormalized from the catalog).
    pub image_url: String,
    /// Unit price, carried through unchanged.
    pub price: f64,
    /// Quantity. At least 1 while the item is in the cart.
    pub quantity: u32,
}

impl CartItem {
    /// Build a line item from a descriptor with an explicit quantity.
    pub fn from_descriptor(descriptor: ProductDescriptor, quantity: u32) -> Self {
        let ProductDescriptor {
            id,
            title,
            image_url,
            price,
        } = descriptor;
        Self {
            id,
            title,
            image_url,
            price,
            quantity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_field_order_in_json() {
        let item = CartItem::from_descriptor(ProductDescriptor::new("1", "Shoe", "u", 10.0), 1);
        let json = serde_json::to_string(&item).unwrap();
        assert_eq!(
            json,
            r#"{"id":"1","title":"Shoe","image_url":"u","price":10.0,"quantity":1}"#
        );
    }

    #[test]
    fn test_from_descriptor_keeps_catalog_fields() {
        let descriptor = ProductDescriptor::new("7", "Hat", "https://img/hat.png", 19.9);
        let item = CartItem::from_descriptor(descriptor.clone(), 3);
        assert_eq!(item.id, descriptor.id);
        assert_eq!(item.title, descriptor.title);
        assert_eq!(item.image_url, descriptor.image_url);
        assert_eq!(item.price, descriptor.price);
        assert_eq!(item.quantity, 3);
    }
}
