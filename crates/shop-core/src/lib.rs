//! # shop-core
//!
//! Cart state, catalog and session types for the storefront.
//!
//! This crate provides:
//! - `CartStore`, the cart state container persisted to local storage
//! - `Cart` and `CartItem` with the cart's invariants
//! - `Product`, `ProductCatalog` and `ProductFilter` for the listing page
//! - `LocalStorage` with memory and file backends
//! - `Session` for the mock login token
//! - `ShopError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use shop_core::{CartStore, MemoryStorage, Price, Product};
//!
//! let storage = MemoryStorage::new();
//! let mut cart = CartStore::open(storage.clone());
//!
//! let backpack = Product::new(1, "Fjallraven Backpack", Price::from_cents(10995));
//! cart.add_item(&backpack, 2);
//!
//! assert_eq!(cart.count(), 2);
//! assert_eq!(cart.total().display(), "$219.90");
//!
//! // A new store over the same storage sees the same cart
//! assert_eq!(CartStore::open(storage).count(), 2);
//! ```

pub mod cart;
pub mod error;
pub mod order;
pub mod product;
pub mod session;
pub mod storage;
pub mod store;

// Re-exports for convenience
pub use cart::{Cart, CartItem, CartViolation};
pub use error::{ShopError, ShopResult};
pub use order::OrderReceipt;
pub use product::{Price, Product, ProductCatalog, ProductFilter, Rating};
pub use session::Session;
pub use storage::{FileStorage, LocalStorage, MemoryStorage, CART_KEY, TOKEN_KEY};
pub use store::{CartStore, CartSummary, SubscriptionId};
