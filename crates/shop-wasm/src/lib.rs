//! # shop-wasm
//!
//! WebAssembly bindings that hand the storefront cart to a browser UI.
//!
//! The cart is backed by `window.localStorage`, so it survives reloads the
//! same way the snapshot does in every other frontend. Components read
//! `count`/`total` and register a callback to re-render when they change.
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { Shop, filterProducts } from 'shop-wasm';
//!
//! await init();
//!
//! const shop = new Shop();
//! shop.subscribe(({ count, total }) => renderBadge(count, total));
//!
//! const products = await (await fetch('/api/products')).json();
//! shop.addItem(products[0], 2);
//! console.log(shop.count(), shop.totalDisplay());
//!
//! const electronics = filterProducts(products, 'usb', 'electronics');
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

mod storage;

pub use storage::{BrowserStorage, WebStorage};

use shop_core::{CartSummary, Price, Product, ProductCatalog, ProductFilter, Rating, Session};
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;

/// Initialize the WASM module (called automatically)
#[wasm_bindgen(start)]
pub fn init() {
    // Set up panic hook for better error messages
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// JS numbers to cart quantities: fractions truncate, NaN is rejected as 0
fn to_quantity(value: f64) -> i64 {
    if value.is_finite() {
        value.trunc() as i64
    } else {
        0
    }
}

/// JS numbers to product ids; anything but a non-negative integer is None
fn to_id(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Cart and session for the current page.
///
/// Every method takes `&self`, so a change callback may read the shop
/// (`shop.items()`, `shop.count()`) or even mutate it again. Changes are
/// queued by the cart store and handed to JS callbacks only after the cart
/// borrow is released.
#[wasm_bindgen(js_name = Shop)]
pub struct WasmShop {
    session: RefCell<Session<BrowserStorage>>,
    pending: Rc<RefCell<Vec<CartSummary>>>,
    callbacks: RefCell<Vec<(u32, js_sys::Function)>>,
    next_handle: Cell<u32>,
}

#[wasm_bindgen(js_class = Shop)]
impl WasmShop {
    /// Open the shop, restoring the cart from local storage
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmShop {
        let mut session = Session::open(BrowserStorage::detect());
        let pending: Rc<RefCell<Vec<CartSummary>>> = Rc::default();
        let queue = Rc::clone(&pending);
        session
            .cart_mut()
            .subscribe(move |summary: &CartSummary| queue.borrow_mut().push(*summary));
        Self {
            session: RefCell::new(session),
            pending,
            callbacks: RefCell::new(Vec::new()),
            next_handle: Cell::new(0),
        }
    }

    /// Add a catalog product record; returns whether the cart changed
    #[wasm_bindgen(js_name = addItem)]
    pub fn add_item(&self, product: JsValue, quantity: f64) -> Result<bool, JsValue> {
        let product: Product = serde_wasm_bindgen::from_value(product)
            .map_err(|e| JsValue::from_str(&format!("Invalid product: {e}")))?;
        let changed = self
            .session
            .borrow_mut()
            .cart_mut()
            .add_item(&product, to_quantity(quantity));
        self.dispatch();
        Ok(changed)
    }

    #[wasm_bindgen(js_name = updateQuantity)]
    pub fn update_quantity(&self, id: f64, quantity: f64) -> bool {
        let Some(id) = to_id(id) else {
            return false;
        };
        let changed = self
            .session
            .borrow_mut()
            .cart_mut()
            .update_quantity(id, to_quantity(quantity));
        self.dispatch();
        changed
    }

    #[wasm_bindgen(js_name = removeItem)]
    pub fn remove_item(&self, id: f64) -> bool {
        let Some(id) = to_id(id) else {
            return false;
        };
        let changed = self.session.borrow_mut().cart_mut().remove_item(id);
        self.dispatch();
        changed
    }

    pub fn clear(&self) -> bool {
        let changed = self.session.borrow_mut().cart_mut().clear();
        self.dispatch();
        changed
    }

    /// Cart total as a decimal number
    pub fn total(&self) -> f64 {
        self.session.borrow().cart().total().as_decimal()
    }

    /// Cart total formatted for display ("$25.00")
    #[wasm_bindgen(js_name = totalDisplay)]
    pub fn total_display(&self) -> String {
        self.session.borrow().cart().total().display()
    }

    /// Badge count: sum of quantities
    pub fn count(&self) -> u32 {
        self.session.borrow().cart().count()
    }

    /// Cart lines as `[{id, title, price, image, quantity}]`
    pub fn items(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.borrow().cart().items())
    }

    /// `{count, total, distinct_items}`
    pub fn summary(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.borrow().cart().summary())
    }

    /// Call `callback(summary)` after every cart change; returns a handle
    pub fn subscribe(&self, callback: js_sys::Function) -> u32 {
        let handle = self.next_handle.get();
        self.next_handle.set(handle.wrapping_add(1));
        self.callbacks.borrow_mut().push((handle, callback));
        handle
    }

    pub fn unsubscribe(&self, handle: u32) -> bool {
        let mut callbacks = self.callbacks.borrow_mut();
        let Some(index) = callbacks.iter().position(|(h, _)| *h == handle) else {
            return false;
        };
        callbacks.remove(index);
        true
    }

    /// Place the order; returns the receipt, or `null` for an empty cart
    pub fn checkout(&self) -> Result<JsValue, JsValue> {
        let receipt = self.session.borrow_mut().checkout();
        self.dispatch();
        match receipt {
            Some(receipt) => to_js(&receipt),
            None => Ok(JsValue::NULL),
        }
    }

    /// Store the token returned by the auth service
    #[wasm_bindgen(js_name = signIn)]
    pub fn sign_in(&self, token: &str) -> Result<bool, JsValue> {
        self.session
            .borrow_mut()
            .sign_in(token)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Drop the token and the cart
    #[wasm_bindgen(js_name = signOut)]
    pub fn sign_out(&self) {
        self.session.borrow_mut().sign_out();
        self.dispatch();
    }

    #[wasm_bindgen(js_name = isAuthenticated)]
    pub fn is_authenticated(&self) -> bool {
        self.session.borrow().is_authenticated()
    }

    pub fn token(&self) -> Option<String> {
        self.session.borrow().token()
    }

    /// Whether the cart survives a page reload
    #[wasm_bindgen(js_name = isPersistent)]
    pub fn is_persistent(&self) -> bool {
        self.session.borrow().cart().storage().is_persistent()
    }
}

impl WasmShop {
    /// Hand queued summaries to JS callbacks. No borrow of the session is
    /// held while a callback runs.
    fn dispatch(&self) {
        loop {
            let batch = std::mem::take(&mut *self.pending.borrow_mut());
            if batch.is_empty() {
                return;
            }
            let callbacks: Vec<js_sys::Function> = self
                .callbacks
                .borrow()
                .iter()
                .map(|(_, callback)| callback.clone())
                .collect();
            for summary in &batch {
                let value = match to_js(summary) {
                    Ok(value) => value,
                    Err(e) => {
                        web_sys::console::error_2(&JsValue::from_str("cart summary failed:"), &e);
                        continue;
                    }
                };
                for callback in &callbacks {
                    if let Err(e) = callback.call1(&JsValue::NULL, &value) {
                        web_sys::console::error_2(
                            &JsValue::from_str("cart subscriber failed:"),
                            &e,
                        );
                    }
                }
            }
        }
    }
}

impl Default for WasmShop {
    fn default() -> Self {
        Self::new()
    }
}

/// Filter catalog records by search term and category
#[wasm_bindgen(js_name = filterProducts)]
pub fn filter_products(
    products: JsValue,
    search: Option<String>,
    category: Option<String>,
) -> Result<JsValue, JsValue> {
    let products: Vec<Product> = serde_wasm_bindgen::from_value(products)
        .map_err(|e| JsValue::from_str(&format!("Invalid products: {e}")))?;
    let catalog = ProductCatalog { products };
    let filter = ProductFilter { search, category };
    let matched: Vec<&Product> = catalog.filter(&filter).collect();
    to_js(&matched)
}

/// Distinct categories of catalog records, in first-seen order
#[wasm_bindgen]
pub fn categories(products: JsValue) -> Result<JsValue, JsValue> {
    let products: Vec<Product> = serde_wasm_bindgen::from_value(products)
        .map_err(|e| JsValue::from_str(&format!("Invalid products: {e}")))?;
    let catalog = ProductCatalog { products };
    to_js(&catalog.categories())
}

/// Format a decimal amount for display, rounded to the cent; negative or
/// non-finite amounts render as $0.00
#[wasm_bindgen(js_name = formatPrice)]
pub fn format_price(amount: f64) -> String {
    Price::rounded(amount).display()
}

/// Five-star rendering of a rating
#[wasm_bindgen(js_name = ratingStars)]
pub fn rating_stars(rate: f64) -> String {
    Rating { rate, count: 0 }.stars()
}

/// Title shortened for product cards
#[wasm_bindgen(js_name = displayTitle)]
pub fn display_title(title: String) -> String {
    Product::new(0, title, Price::ZERO).display_title()
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_quantity() {
        assert_eq!(to_quantity(2.0), 2);
        assert_eq!(to_quantity(2.9), 2);
        assert_eq!(to_quantity(-1.0), -1);
        assert_eq!(to_quantity(f64::NAN), 0);
    }

    #[test]
    fn test_to_id() {
        assert_eq!(to_id(7.0), Some(7));
        assert_eq!(to_id(7.5), None);
        assert_eq!(to_id(-1.0), None);
        assert_eq!(to_id(f64::INFINITY), None);
    }

    #[test]
    fn test_format_price() {
        assert_eq!(format_price(19.99), "$19.99");
        assert_eq!(format_price(1.0), "$1.00");
        assert_eq!(format_price(-5.0), "$0.00");
        assert_eq!(format_price(0.125), "$0.13");
    }

    #[test]
    fn test_rating_stars() {
        assert_eq!(rating_stars(4.6), "★★★★★");
        assert_eq!(rating_stars(2.4), "★★☆☆☆");
    }

    #[test]
    fn test_display_title() {
        assert_eq!(display_title("Backpack".to_string()), "Backpack");
        assert!(display_title("z".repeat(80)).ends_with("..."));
    }
}
