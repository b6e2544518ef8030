//! # Commands
//!
//! Executes parsed commands against a session and catalog, writing
//! human-readable output. Everything except `login`/`logout` needs a
//! signed-in session.

use crate::cli::Command;
use anyhow::bail;
use serde::Serialize;
use shop_core::{
    CartItem, CartSummary, LocalStorage, Product, ProductCatalog, ProductFilter, Session,
    ShopError,
};
use std::io::Write;
use tracing::{debug, instrument};

/// JSON shape of `shop cart --json`
#[derive(Debug, Serialize)]
struct CartView<'a> {
    items: &'a [CartItem],
    #[serde(flatten)]
    summary: CartSummary,
}

/// A session plus the catalog it shops from
#[derive(Debug)]
pub struct App<S: LocalStorage + Clone> {
    session: Session<S>,
    catalog: ProductCatalog,
}

impl<S: LocalStorage + Clone> App<S> {
    pub fn new(session: Session<S>, catalog: ProductCatalog) -> Self {
        Self { session, catalog }
    }

    pub fn session(&self) -> &Session<S> {
        &self.session
    }

    /// Run one command
    #[instrument(skip_all)]
    pub fn execute(&mut self, command: Command, out: &mut dyn Write) -> anyhow::Result<()> {
        if !command.is_public() {
            self.session.require_auth().map_err(|e| match e {
                ShopError::Unauthenticated => {
                    anyhow::anyhow!("Not signed in. Run `shop login <token>` first.")
                }
                other => other.into(),
            })?;
        }

        match command {
            Command::Products { search, category } => {
                let filter = ProductFilter { search, category };
                self.list_products(&filter, out)
            }
            Command::Categories => {
                for category in self.catalog.categories() {
                    writeln!(out, "{category}")?;
                }
                Ok(())
            }
            Command::Show { id } => {
                let product = self.catalog.require(id)?;
                show_product(product, out)
            }
            Command::Add { id, quantity } => {
                let product = self.catalog.require(id)?.clone();
                if self.session.cart_mut().add_item(&product, quantity) {
                    let count = self.session.cart().count();
                    writeln!(
                        out,
                        "Added {quantity} x {} to cart ({count} in cart)",
                        product.display_title()
                    )?;
                } else if quantity <= 0 {
                    writeln!(out, "Nothing added: quantity must be positive")?;
                } else {
                    writeln!(out, "Nothing added: quantity out of range")?;
                }
                Ok(())
            }
            Command::Update { id, quantity } => {
                if self.session.cart().get(id).is_none() {
                    writeln!(out, "Product {id} is not in the cart")?;
                } else if self.session.cart_mut().update_quantity(id, quantity) {
                    writeln!(out, "Quantity of product {id} set to {quantity}")?;
                } else if quantity <= 0 {
                    writeln!(out, "Quantity must be positive; use `shop remove {id}` instead")?;
                } else if u32::try_from(quantity).is_err() {
                    writeln!(out, "Quantity of product {id} unchanged: quantity out of range")?;
                } else {
                    writeln!(out, "Quantity of product {id} unchanged")?;
                }
                Ok(())
            }
            Command::Remove { id } => {
                if self.session.cart_mut().remove_item(id) {
                    writeln!(out, "Removed product {id} from cart")?;
                } else {
                    writeln!(out, "Product {id} is not in the cart")?;
                }
                Ok(())
            }
            Command::Cart { json } => self.show_cart(json, out),
            Command::Clear => {
                self.session.cart_mut().clear();
                writeln!(out, "Cart cleared")?;
                Ok(())
            }
            Command::Checkout => {
                match self.session.checkout() {
                    Some(receipt) => {
                        writeln!(out, "Order placed successfully!")?;
                        writeln!(
                            out,
                            "Order {}: {} items, total {}",
                            receipt.id, receipt.item_count, receipt.total
                        )?;
                    }
                    None => writeln!(out, "Your cart is empty")?,
                }
                Ok(())
            }
            Command::Login { token } => {
                if !self.session.sign_in(&token)? {
                    bail!("Token must not be empty");
                }
                writeln!(out, "Signed in")?;
                Ok(())
            }
            Command::Logout => {
                self.session.sign_out();
                writeln!(out, "Signed out")?;
                Ok(())
            }
        }
    }

    fn list_products(&self, filter: &ProductFilter, out: &mut dyn Write) -> anyhow::Result<()> {
        let mut shown = 0usize;
        for product in self.catalog.filter(filter) {
            writeln!(
                out,
                "{:>4}  {:<60}  {:>9}  {} ({})  [{}]",
                product.id,
                product.display_title(),
                product.price.display(),
                product.rating.stars(),
                product.rating.count,
                product.category
            )?;
            shown += 1;
        }
        debug!(shown, total = self.catalog.len(), "listed products");
        if shown == 0 {
            writeln!(out, "No products found")?;
        }
        Ok(())
    }

    fn show_cart(&self, json: bool, out: &mut dyn Write) -> anyhow::Result<()> {
        let cart = self.session.cart();
        if json {
            let view = CartView {
                items: cart.items(),
                summary: cart.summary(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&view)?)?;
            return Ok(());
        }

        if cart.is_empty() {
            writeln!(out, "Your cart is empty")?;
            return Ok(());
        }
        for item in cart.items() {
            writeln!(
                out,
                "{:>4}  {:<40}  {:>3} x {:>9} = {:>10}",
                item.id,
                truncate(&item.title, 40),
                item.quantity,
                item.price.display(),
                item.subtotal().display()
            )?;
        }
        writeln!(out, "Items: {}  Total: {}", cart.count(), cart.total())?;
        Ok(())
    }
}

fn show_product(product: &Product, out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out, "{}", product.title)?;
    writeln!(out, "Category: {}", product.category)?;
    writeln!(out, "Price:    {}", product.price)?;
    writeln!(
        out,
        "Rating:   {} ({} reviews)",
        product.rating.stars(),
        product.rating.count
    )?;
    if !product.image.is_empty() {
        writeln!(out, "Image:    {}", product.image)?;
    }
    if !product.description.is_empty() {
        writeln!(out)?;
        writeln!(out, "{}", product.description)?;
    }
    Ok(())
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() > width {
        let head: String = text.chars().take(width.saturating_sub(3)).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
