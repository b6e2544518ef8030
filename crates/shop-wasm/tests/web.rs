//! Browser tests: `wasm-pack test --headless --firefox`
#![cfg(target_arch = "wasm32")]

use shop_core::{Price, Product};
use shop_wasm::WasmShop;
use wasm_bindgen::JsValue;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn product_js(id: u64, cents: u64) -> JsValue {
    let product = Product::new(id, format!("Product {id}"), Price::from_cents(cents));
    serde_wasm_bindgen::to_value(&product).unwrap()
}

#[wasm_bindgen_test]
fn cart_survives_reopen() {
    let shop = WasmShop::new();
    shop.sign_out();

    assert!(shop.add_item(product_js(1, 1000), 2.0).unwrap());
    assert!(shop.add_item(product_js(2, 500), 1.0).unwrap());
    assert!(!shop.update_quantity(1.0, 0.0));

    let reopened = WasmShop::new();
    assert_eq!(reopened.count(), 3);
    assert_eq!(reopened.total_display(), "$25.00");

    shop.sign_out();
    assert_eq!(WasmShop::new().count(), 0);
}

#[wasm_bindgen_test]
fn checkout_returns_null_when_empty() {
    let shop = WasmShop::new();
    shop.sign_out();
    assert!(shop.checkout().unwrap().is_null());
}

#[wasm_bindgen_test]
fn subscriber_can_read_the_shop() {
    let shop = WasmShop::new();
    shop.sign_out();
    let shop = JsValue::from(shop);

    // Runs the way a page component would: the callback re-reads the shop
    let render = js_sys::Function::new_with_args(
        "shop, product",
        "const seen = [];
         shop.subscribe(summary => seen.push([summary.count, shop.items().length, shop.count()]));
         shop.addItem(product, 2);
         shop.addItem(product, 1);
         shop.signOut();
         return seen;",
    );
    let seen = render
        .call2(&JsValue::NULL, &shop, &product_js(1, 1000))
        .unwrap();
    let seen: Vec<(u32, u32, u32)> = serde_wasm_bindgen::from_value(seen).unwrap();
    assert_eq!(seen, vec![(2, 1, 2), (3, 1, 3), (0, 0, 0)]);
}

#[wasm_bindgen_test]
fn subscriber_may_mutate_the_shop() {
    let shop = WasmShop::new();
    shop.sign_out();
    let shop = JsValue::from(shop);

    let cap = js_sys::Function::new_with_args(
        "shop, product",
        "let calls = 0;
         shop.subscribe(summary => { calls += 1; if (summary.count > 3) shop.updateQuantity(1, 3); });
         shop.addItem(product, 5);
         return [calls, shop.count()];",
    );
    let result = cap.call2(&JsValue::NULL, &shop, &product_js(1, 1000)).unwrap();
    let (calls, count): (u32, u32) = serde_wasm_bindgen::from_value(result).unwrap();
    assert_eq!((calls, count), (2, 3));
}
