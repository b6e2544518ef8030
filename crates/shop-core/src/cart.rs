//! # Cart
//!
//! The in-memory cart: an ordered list of items, unique by product id.
//! Persistence and change notification live in `store::CartStore`; this
//! module only enforces the cart's invariants.

use crate::product::{Price, Product};
use serde::{Deserialize, Serialize};

/// A line in the cart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    /// Product ID (unique within a cart)
    pub id: u64,

    /// Product title (denormalized for display)
    pub title: String,

    /// Unit price
    pub price: Price,

    /// Image URL
    #[serde(default)]
    pub image: String,

    /// Quantity, always at least 1
    pub quantity: u32,
}

impl CartItem {
    /// Create a cart line from a product
    pub fn from_product(product: &Product, quantity: u32) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            price: product.price,
            image: product.image.clone(),
            quantity,
        }
    }

    /// Price times quantity
    pub fn subtotal(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// Quantities arrive signed from the UI; only 1..=u32::MAX is accepted
fn valid_quantity(quantity: i64) -> Option<u32> {
    u32::try_from(quantity).ok().filter(|q| *q > 0)
}

/// Why a list of items cannot form a cart
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartViolation {
    /// Two items share a product id
    DuplicateId(u64),
    /// An item has quantity 0
    ZeroQuantity(u64),
}

impl std::fmt::Display for CartViolation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CartViolation::DuplicateId(id) => write!(f, "duplicate product id {id}"),
            CartViolation::ZeroQuantity(id) => write!(f, "product {id} has quantity 0"),
        }
    }
}

/// Ordered collection of cart items, unique by id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    /// Create an empty cart
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from items, checking uniqueness and quantities
    pub fn from_items(items: Vec<CartItem>) -> Result<Self, CartViolation> {
        for (index, item) in items.iter().enumerate() {
            if item.quantity == 0 {
                return Err(CartViolation::ZeroQuantity(item.id));
            }
            if items[..index].iter().any(|earlier| earlier.id == item.id) {
                return Err(CartViolation::DuplicateId(item.id));
            }
        }
        Ok(Self { items })
    }

    /// Items in insertion order
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    /// Look up an item by product id
    pub fn get(&self, id: u64) -> Option<&CartItem> {
        self.items.iter().find(|item| item.id == id)
    }

    fn get_mut(&mut self, id: u64) -> Option<&mut CartItem> {
        self.items.iter_mut().find(|item| item.id == id)
    }

    /// Add `quantity` of `product`, merging with an existing line.
    ///
    /// Returns false (and changes nothing) when `quantity <= 0`.
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> bool {
        let Some(quantity) = valid_quantity(quantity) else {
            return false;
        };
        match self.get_mut(product.id) {
            Some(existing) => {
                let merged = existing.quantity.saturating_add(quantity);
                if merged == existing.quantity {
                    return false;
                }
                existing.quantity = merged;
            }
            None => self.items.push(CartItem::from_product(product, quantity)),
        }
        true
    }

    /// Set the quantity of an existing line.
    ///
    /// Returns false when the id is absent, `quantity <= 0`, or the
    /// quantity is already `quantity`.
    pub fn update_quantity(&mut self, id: u64, quantity: i64) -> bool {
        let Some(quantity) = valid_quantity(quantity) else {
            return false;
        };
        match self.get_mut(id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    /// Remove the line for `id`; false if it was not in the cart
    pub fn remove_item(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.id != id);
        self.items.len() != before
    }

    /// Empty the cart; false if it was already empty
    pub fn clear(&mut self) -> bool {
        if self.items.is_empty() {
            return false;
        }
        self.items.clear();
        true
    }

    /// Sum of price times quantity over all lines
    pub fn total(&self) -> Price {
        self.items.iter().map(CartItem::subtotal).sum()
    }

    /// Sum of quantities (badge count), not the number of lines
    pub fn count(&self) -> u32 {
        self.items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity))
    }

    /// Number of distinct products
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Move the items out, leaving the cart empty
    pub fn take_items(&mut self) -> Vec<CartItem> {
        std::mem::take(&mut self.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: u64, cents: u64) -> Product {
        Product::new(id, format!("Product {id}"), Price::from_cents(cents))
    }

    #[test]
    fn test_repeated_adds_sum_quantities() {
        let mut cart = Cart::new();
        let p = product(1, 1000);

        for quantity in [1, 3, 2, 7] {
            assert!(cart.add_item(&p, quantity));
        }

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.get(1).unwrap().quantity, 13);
    }

    #[test]
    fn test_add_non_positive_quantity_is_noop() {
        let mut cart = Cart::new();
        assert!(!cart.add_item(&product(1, 1000), 0));
        assert!(!cart.add_item(&product(1, 1000), -4));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut cart = Cart::new();
        cart.add_item(&product(3, 100), 1);
        cart.add_item(&product(1, 100), 1);
        cart.add_item(&product(2, 100), 1);
        cart.add_item(&product(3, 100), 1);

        let ids: Vec<u64> = cart.items().iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn test_update_quantity_rejects_non_positive() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 2);
        let before = cart.clone();

        assert!(!cart.update_quantity(1, 0));
        assert!(!cart.update_quantity(1, -1));
        assert_eq!(cart, before);

        assert!(cart.update_quantity(1, 5));
        assert_eq!(cart.get(1).unwrap().quantity, 5);
    }

    #[test]
    fn test_update_quantity_absent_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 2);
        let before = cart.clone();

        assert!(!cart.update_quantity(99, 3));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 2);
        cart.add_item(&product(2, 500), 1);
        let before = cart.clone();

        assert!(!cart.remove_item(42));
        assert_eq!(cart, before);

        assert!(cart.remove_item(1));
        assert_eq!(cart.len(), 1);
        assert!(cart.get(1).is_none());
    }

    #[test]
    fn test_total_and_count() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 2);
        cart.add_item(&product(2, 500), 1);

        assert_eq!(cart.total().as_decimal(), 25.0);
        assert_eq!(cart.count(), 3);
        assert_eq!(cart.len(), 2);
    }

    #[test]
    fn test_clear_resets_totals() {
        let mut cart = Cart::new();
        cart.add_item(&product(1, 1000), 2);

        assert!(cart.clear());
        assert_eq!(cart.total(), Price::ZERO);
        assert_eq!(cart.count(), 0);
        assert!(!cart.clear());
    }

    #[test]
    fn test_oversized_quantity_rejected() {
        let mut cart = Cart::new();
        assert!(!cart.add_item(&product(1, 1), i64::from(u32::MAX) + 1));
        assert!(cart.add_item(&product(1, 1), i64::from(u32::MAX)));
        assert!(!cart.add_item(&product(1, 1), 1));
        assert_eq!(cart.count(), u32::MAX);
    }

    #[test]
    fn test_from_items_checks_invariants() {
        let item = CartItem::from_product(&product(1, 100), 1);
        let mut zero = item.clone();
        zero.quantity = 0;

        assert_eq!(
            Cart::from_items(vec![item.clone(), item.clone()]),
            Err(CartViolation::DuplicateId(1))
        );
        assert_eq!(
            Cart::from_items(vec![zero]),
            Err(CartViolation::ZeroQuantity(1))
        );
        assert_eq!(Cart::from_items(vec![item]).unwrap().len(), 1);
    }

    #[test]
    fn test_snapshot_json_layout() {
        let mut cart = Cart::new();
        cart.add_item(
            &product(7, 1099).with_image("https://example.com/7.jpg"),
            2,
        );

        let json = serde_json::to_value(&cart).unwrap();
        assert_eq!(
            json,
            serde_json::json!([{
                "id": 7,
                "title": "Product 7",
                "price": 10.99,
                "image": "https://example.com/7.jpg",
                "quantity": 2
            }])
        );
    }
}
