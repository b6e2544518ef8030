//! # Order Receipts
//!
//! What checkout hands back after the cart has been emptied.

use crate::cart::CartItem;
use crate::product::Price;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Record of a completed checkout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Unique order ID (generated)
    pub id: Uuid,

    /// Cart lines at the time of checkout
    pub items: Vec<CartItem>,

    /// Sum of line subtotals
    pub total: Price,

    /// Sum of quantities
    pub item_count: u32,

    /// When the order was placed
    pub placed_at: DateTime<Utc>,
}

impl OrderReceipt {
    /// Build a receipt for `items`
    pub fn new(items: Vec<CartItem>) -> Self {
        let total = items.iter().map(CartItem::subtotal).sum();
        let item_count = items
            .iter()
            .fold(0u32, |acc, item| acc.saturating_add(item.quantity));
        Self {
            id: Uuid::new_v4(),
            items,
            total,
            item_count,
            placed_at: Utc::now(),
        }
    }
}
