//! # Session
//!
//! Mock login state: an opaque token issued by the auth service, stored next
//! to the cart in the same local storage. Signing out drops both.

use crate::error::{ShopError, ShopResult};
use crate::order::OrderReceipt;
use crate::storage::{LocalStorage, TOKEN_KEY};
use crate::store::CartStore;
use tracing::{info, warn};

/// Token slot plus the cart it gates
#[derive(Debug)]
pub struct Session<S: LocalStorage + Clone> {
    storage: S,
    cart: CartStore<S>,
}

impl<S: LocalStorage + Clone> Session<S> {
    /// Open the session, rehydrating the cart from `storage`
    pub fn open(storage: S) -> Self {
        let cart = CartStore::open(storage.clone());
        Self { storage, cart }
    }

    /// The stored token, if any. Unreadable storage counts as signed out.
    pub fn token(&self) -> Option<String> {
        match self.storage.get(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.trim().is_empty()),
            Err(e) => {
                warn!(error = %e, "failed to read session token");
                None
            }
        }
    }

    /// Whether a token is present
    pub fn is_authenticated(&self) -> bool {
        self.token().is_some()
    }

    /// Store the token returned by the auth service.
    ///
    /// Blank tokens are ignored and return `Ok(false)`.
    pub fn sign_in(&mut self, token: &str) -> ShopResult<bool> {
        let token = token.trim();
        if token.is_empty() {
            return Ok(false);
        }
        self.storage.set(TOKEN_KEY, token)?;
        info!("signed in");
        Ok(true)
    }

    /// Forget the token and the cart
    pub fn sign_out(&mut self) {
        if let Err(e) = self.storage.remove(TOKEN_KEY) {
            warn!(error = %e, "failed to delete session token");
        }
        self.cart.discard();
        info!("signed out");
    }

    /// Fail with `Unauthenticated` unless signed in
    pub fn require_auth(&self) -> ShopResult<()> {
        if self.is_authenticated() {
            Ok(())
        } else {
            Err(ShopError::Unauthenticated)
        }
    }

    /// Place the order for the current cart
    pub fn checkout(&mut self) -> Option<OrderReceipt> {
        self.cart.checkout()
    }

    /// Shared view of the cart
    pub fn cart(&self) -> &CartStore<S> {
        &self.cart
    }

    /// Mutable access to the cart
    pub fn cart_mut(&mut self) -> &mut CartStore<S> {
        &mut self.cart
    }
}
