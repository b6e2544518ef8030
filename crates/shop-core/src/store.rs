//! # Cart Store
//!
//! The cart state container handed to UI code. It wraps a [`Cart`] with:
//!
//! - rehydration from local storage on construction
//! - a snapshot write after every mutation that changed the cart
//! - change subscriptions carrying the badge count and total
//!
//! No operation here returns an error. Bad quantities are no-ops, a corrupt
//! snapshot loads as an empty cart, and a failed write is logged and
//! otherwise ignored.
//!
//! ```text
//!  UI ──add/update/remove/clear──▶ CartStore ──snapshot──▶ LocalStorage["cart"]
//!   ▲                                 │
//!   └──────── CartSummary ◀───────────┘ (subscribers)
//! ```

use crate::cart::{Cart, CartItem};
use crate::error::ShopResult;
use crate::order::OrderReceipt;
use crate::product::{Price, Product};
use crate::storage::{LocalStorage, CART_KEY};
use serde::Serialize;
use tracing::{debug, warn};

/// Derived values a badge or cart page displays
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CartSummary {
    /// Sum of quantities
    pub count: u32,
    /// Sum of price times quantity
    pub total: Price,
    /// Number of lines
    pub distinct_items: usize,
}

impl CartSummary {
    fn of(cart: &Cart) -> Self {
        Self {
            count: cart.count(),
            total: cart.total(),
            distinct_items: cart.len(),
        }
    }
}

/// Handle returned by [`CartStore::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&CartSummary)>;

/// Cart state container backed by local storage
pub struct CartStore<S: LocalStorage> {
    cart: Cart,
    storage: S,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl<S: LocalStorage> CartStore<S> {
    /// Open the store, rehydrating from the snapshot in `storage`
    pub fn open(storage: S) -> Self {
        let cart = load_snapshot(&storage);
        debug!(items = cart.len(), "cart rehydrated");
        Self {
            cart,
            storage,
            listeners: Vec::new(),
            next_subscription: 0,
        }
    }

    /// Add `quantity` of `product`; no-op when `quantity <= 0`
    pub fn add_item(&mut self, product: &Product, quantity: i64) -> bool {
        let changed = self.cart.add_item(product, quantity);
        if changed {
            debug!(product_id = product.id, quantity, "added to cart");
        }
        self.commit(changed)
    }

    /// Set the quantity for `id`; no-op when absent or `quantity <= 0`
    pub fn update_quantity(&mut self, id: u64, quantity: i64) -> bool {
        let changed = self.cart.update_quantity(id, quantity);
        self.commit(changed)
    }

    /// Remove the line for `id`; no-op when absent
    pub fn remove_item(&mut self, id: u64) -> bool {
        let changed = self.cart.remove_item(id);
        self.commit(changed)
    }

    /// Empty the cart
    pub fn clear(&mut self) -> bool {
        let changed = self.cart.clear();
        self.commit(changed)
    }

    /// Empty the cart and delete its snapshot (used on sign-out)
    pub fn discard(&mut self) {
        let changed = self.cart.clear();
        if let Err(e) = self.storage.remove(CART_KEY) {
            warn!(error = %e, "failed to delete cart snapshot");
        }
        if changed {
            self.notify();
        }
    }

    /// Place the order: returns a receipt and empties the cart.
    ///
    /// An empty cart returns `None` and is left untouched.
    pub fn checkout(&mut self) -> Option<OrderReceipt> {
        if self.cart.is_empty() {
            return None;
        }
        let receipt = OrderReceipt::new(self.cart.take_items());
        debug!(order_id = %receipt.id, total = %receipt.total, "checkout");
        self.commit(true);
        Some(receipt)
    }

    /// Sum of price times quantity
    pub fn total(&self) -> Price {
        self.cart.total()
    }

    /// Sum of quantities
    pub fn count(&self) -> u32 {
        self.cart.count()
    }

    /// Count, total and line count together
    pub fn summary(&self) -> CartSummary {
        CartSummary::of(&self.cart)
    }

    /// Lines in insertion order
    pub fn items(&self) -> &[CartItem] {
        self.cart.items()
    }

    /// Look up a line by product id
    pub fn get(&self, id: u64) -> Option<&CartItem> {
        self.cart.get(id)
    }

    /// Check if cart is empty
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// The underlying cart
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// The storage backend
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Call `listener` with the new summary after every change
    pub fn subscribe(&mut self, listener: impl FnMut(&CartSummary) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Stop notifying a subscriber; false if it was not registered
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    fn commit(&mut self, changed: bool) -> bool {
        if changed {
            self.persist();
            self.notify();
        }
        changed
    }

    fn persist(&self) {
        if let Err(e) = write_snapshot(&self.storage, &self.cart) {
            warn!(error = %e, "failed to persist cart snapshot");
        }
    }

    fn notify(&mut self) {
        let summary = CartSummary::of(&self.cart);
        for (_, listener) in &mut self.listeners {
            listener(&summary);
        }
    }
}

impl<S: LocalStorage> std::fmt::Debug for CartStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

fn write_snapshot<S: LocalStorage>(storage: &S, cart: &Cart) -> ShopResult<()> {
    let snapshot = serde_json::to_string(cart)?;
    storage.set(CART_KEY, &snapshot)
}

/// Parse the stored snapshot; `Ok(None)` when nothing is stored
fn read_snapshot<S: LocalStorage>(storage: &S) -> ShopResult<Option<Vec<CartItem>>> {
    match storage.get(CART_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Read the snapshot; anything missing, unreadable or invalid is an empty cart
fn load_snapshot<S: LocalStorage>(storage: &S) -> Cart {
    let items = match read_snapshot(storage) {
        Ok(Some(items)) => items,
        Ok(None) => return Cart::new(),
        Err(e) if e.is_storage() => {
            warn!(error = %e, "cart snapshot unreadable, starting empty");
            return Cart::new();
        }
        Err(e) => {
            warn!(error = %e, "cart snapshot corrupt, starting empty");
            return Cart::new();
        }
    };

    Cart::from_items(items).unwrap_or_else(|violation| {
        warn!(%violation, "cart snapshot invalid, starting empty");
        Cart::new()
    })
}
