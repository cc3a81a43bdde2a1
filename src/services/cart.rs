//! Shopping carts for the product store.
//!
//! Carts live in process memory keyed by a random id; they are lost on
//! restart, matching the browser-local carts they replace. Lines are keyed
//! by `api_product_id` and keep the product snapshot taken when first added.

use std::collections::HashMap;
use std::sync::Arc;

use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::product::{Product, parse_display_price};

/// Largest quantity a single line may hold.
pub const MAX_LINE_QUANTITY: u32 = 999;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItem {
    #[serde(flatten)]
    pub product: Product,
    pub quantity: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Cart {
    pub id: Uuid,
    pub items: Vec<CartItem>,
}

/// Cart plus its derived totals, as returned to the client.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub id: Uuid,
    pub items: Vec<CartItem>,
    pub total_items: u64,
    pub total_price: f64,
}

impl Cart {
    #[must_use]
    pub fn new(id: Uuid) -> Self {
        Self { id, items: Vec::new() }
    }

    /// Add one unit; a product already in the cart has its quantity bumped,
    /// up to [`MAX_LINE_QUANTITY`].
    pub fn add(&mut self, product: Product) {
        match self.items.iter_mut().find(|item| item.product.api_product_id == product.api_product_id) {
            Some(item) => item.quantity = item.quantity.saturating_add(1).min(MAX_LINE_QUANTITY),
            None => self.items.push(CartItem { product, quantity: 1 }),
        }
    }

    /// Returns whether a line was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.product.api_product_id != product_id);
        self.items.len() != before
    }

    /// Set a line's quantity; below 1 removes the line. Returns whether the
    /// product was in the cart.
    pub fn set_quantity(&mut self, product_id: &str, quantity: u32) -> bool {
        if quantity < 1 {
            return self.remove(product_id);
        }
        match self.items.iter_mut().find(|item| item.product.api_product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Unparseable prices contribute nothing.
    #[must_use]
    pub fn total_price(&self) -> f64 {
        self.items
            .iter()
            .map(|item| {
                let unit = item.product.price.as_deref().and_then(parse_display_price).unwrap_or(0.0);
                unit * f64::from(item.quantity)
            })
            .sum()
    }

    #[must_use]
    pub fn view(&self) -> CartView {
        CartView {
            id: self.id,
            items: self.items.clone(),
            total_items: self.total_items(),
            total_price: self.total_price(),
        }
    }
}

/// Shared cart map held in app state.
#[derive(Clone, Default)]
pub struct CartStore {
    carts: Arc<RwLock<HashMap<Uuid, Cart>>>,
}

impl CartStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn create(&self) -> CartView {
        let cart = Cart::new(Uuid::new_v4());
        let view = cart.view();
        self.carts.write().await.insert(cart.id, cart);
        tracing::debug!(cart_id = %view.id, "cart created");
        view
    }

    pub async fn get(&self, id: Uuid) -> Option<CartView> {
        self.carts.read().await.get(&id).map(Cart::view)
    }

    /// Run `f` against a cart under the write lock and return the updated
    /// view, or `None` for an unknown cart.
    pub async fn update<R>(&self, id: Uuid, f: impl FnOnce(&mut Cart) -> R) -> Option<(R, CartView)> {
        let mut carts = self.carts.write().await;
        let cart = carts.get_mut(&id)?;
        let result = f(cart);
        Some((result, cart.view()))
    }
}
