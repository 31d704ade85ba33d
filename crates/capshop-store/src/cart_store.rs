//! # Cart Store
//!
//! The one shared cart every storefront view reads from and writes to.
//!
//! ## Thread Safety
//! The cart sits in an `Arc<Mutex<Cart>>`. Critical sections are short and
//! nearly all of them write, so a plain mutex is enough. A poisoned lock is
//! recovered rather than propagated.
//!
//! ## Change Notification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Store Operations                                │
//! │                                                                         │
//! │  View Action              CartStore               Cart Change           │
//! │  ───────────              ─────────               ───────────           │
//! │                                                                         │
//! │  Add to cart ────────────► add_item() ──────────► items.push(item)     │
//! │  Change quantity ────────► update_quantity() ───► qty = max(n, 1)      │
//! │  Click remove ───────────► remove_item() ───────► retain(id != ..)     │
//! │  Checkout done ──────────► clear() ─────────────► items.clear()        │
//! │                                                                         │
//! │  After every mutation the new CartTotals is pushed into a watch         │
//! │  channel before the call returns. Subscribers always see the latest.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use capshop_core::validation::validate_price;
use capshop_core::{Cart, CartLineItem, CartTotals, Money, TaxRate, DEFAULT_TAX_RATE};
use tokio::sync::watch;
use tracing::{debug, warn};

/// Shared cart handle. Clones point at the same cart.
#[derive(Debug, Clone)]
pub struct CartStore {
    cart: Arc<Mutex<Cart>>,
    totals: Arc<watch::Sender<CartTotals>>,
    tax_rate: TaxRate,
}

impl CartStore {
    /// Creates an empty cart taxed at [`DEFAULT_TAX_RATE`].
    pub fn new() -> Self {
        Self::with_tax_rate(DEFAULT_TAX_RATE)
    }

    pub fn with_tax_rate(tax_rate: TaxRate) -> Self {
        let cart = Cart::new();
        let (tx, _) = watch::channel(cart.totals(tax_rate));
        CartStore {
            cart: Arc::new(Mutex::new(cart)),
            totals: Arc::new(tx),
            tax_rate,
        }
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    fn lock(&self) -> MutexGuard<'_, Cart> {
        self.cart.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Runs `f` with read access to the cart.
    ///
    /// ## Usage
    /// ```rust
    /// # use capshop_store::CartStore;
    /// let store = CartStore::new();
    /// let empty = store.with_cart(|cart| cart.is_empty());
    /// assert!(empty);
    /// ```
    pub fn with_cart<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&Cart) -> R,
    {
        let cart = self.lock();
        f(&cart)
    }

    /// Runs `f` with write access, then publishes the new totals.
    ///
    /// Totals are published while the cart lock is still held, so the
    /// watch channel sees mutations in the order they were applied.
    fn mutate<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut Cart) -> R,
    {
        let mut cart = self.lock();
        let result = f(&mut cart);
        self.totals.send_replace(cart.totals(self.tax_rate));
        drop(cart);
        result
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Appends an item. Never fails.
    ///
    /// A negative price is logged but still accepted.
    pub fn add_item(&self, item: CartLineItem) {
        if let Err(e) = validate_price(item.price) {
            warn!(id = %item.id, error = %e, "Adding item with unusual price");
        }
        debug!(id = %item.id, name = %item.name, quantity = item.quantity, "Cart add");
        self.mutate(|cart| cart.add_item(item));
    }

    /// Sets the quantity of every entry with `id`, clamped to at least one.
    ///
    /// Returns how many entries changed; zero for an unknown id.
    pub fn update_quantity(&self, id: &str, quantity: i64) -> usize {
        let updated = self.mutate(|cart| cart.update_quantity(id, quantity));
        debug!(id = %id, quantity, updated, "Cart quantity update");
        updated
    }

    /// Removes every entry with `id`. Returns how many were removed.
    pub fn remove_item(&self, id: &str) -> usize {
        let removed = self.mutate(|cart| cart.remove_item(id));
        debug!(id = %id, removed, "Cart remove");
        removed
    }

    pub fn clear(&self) {
        self.mutate(Cart::clear);
        debug!("Cart cleared");
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Copy of the current entries, in insertion order.
    pub fn items(&self) -> Vec<CartLineItem> {
        self.with_cart(|cart| cart.items().to_vec())
    }

    pub fn subtotal(&self) -> Money {
        self.with_cart(Cart::subtotal)
    }

    /// Sum of quantities across all entries.
    pub fn item_count(&self) -> u64 {
        self.with_cart(Cart::item_count)
    }

    pub fn totals(&self) -> CartTotals {
        self.with_cart(|cart| cart.totals(self.tax_rate))
    }

    /// Watches the cart totals. The receiver starts at the current value.
    pub fn subscribe(&self) -> watch::Receiver<CartTotals> {
        self.totals.subscribe()
    }
}

impl Default for CartStore {
    fn default() -> Self {
        Self::new()
    }
}
