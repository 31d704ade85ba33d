//! # Cart
//!
//! The cart container and its derived totals.
//!
//! ## Operations
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Cart Operations                                 │
//! │                                                                         │
//! │  Shopper Action        Cart Method               Effect                 │
//! │  ──────────────        ───────────               ──────                 │
//! │  "Add to cart"  ─────► add_item(item) ─────────► items.push(item)      │
//! │  "−" / "+"      ─────► update_quantity(id, n) ─► qty = max(n, 1)       │
//! │  Trash icon     ─────► remove_item(id) ────────► items.retain(≠ id)    │
//! │  Checkout done  ─────► clear() ────────────────► items.clear()         │
//! │                                                                         │
//! │  Navbar badge   ◄───── item_count()   = Σ quantity                     │
//! │  Cart preview   ◄───── subtotal()     = Σ price × quantity             │
//! │                 ◄───── tax(rate), total(rate)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Invariants
//! - No entry ever holds a quantity below [`MIN_LINE_QUANTITY`]
//! - Totals are computed from `items` on every call, never cached
//! - Adding an id that is already present appends a second entry; quantities
//!   are not merged

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::types::{CartLineItem, TaxRate};
use crate::MIN_LINE_QUANTITY;

/// The shopping cart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Creates an empty cart.
    pub fn new() -> Self {
        Cart { items: Vec::new() }
    }

    /// Appends an item.
    ///
    /// Never fails. A repeated id becomes a separate entry. A quantity of
    /// zero is floored to one so the cart never holds an empty line.
    pub fn add_item(&mut self, mut item: CartLineItem) {
        item.quantity = item.quantity.max(MIN_LINE_QUANTITY);
        self.items.push(item);
    }

    /// Sets the quantity of every entry with `id`.
    ///
    /// `quantity <= 0` is clamped to [`MIN_LINE_QUANTITY`]. An unknown id
    /// leaves the cart untouched. Returns the number of entries updated.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> usize {
        let clamped = clamp_quantity(quantity);
        let mut updated = 0;
        for item in self.items.iter_mut().filter(|i| i.id == id) {
            item.quantity = clamped;
            updated += 1;
        }
        updated
    }

    /// Removes every entry with `id`. Returns the number removed.
    pub fn remove_item(&mut self, id: &str) -> usize {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        before - self.items.len()
    }

    /// Empties the cart.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Entries in insertion order.
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of entries (distinct lines, not units).
    pub fn line_count(&self) -> usize {
        self.items.len()
    }

    /// Total number of units, used for the cart badge.
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Σ price × quantity.
    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Tax over the subtotal (not per line, matching the cart preview).
    pub fn tax(&self, rate: TaxRate) -> Money {
        self.subtotal().calculate_tax(rate)
    }

    /// Subtotal plus tax.
    pub fn total(&self, rate: TaxRate) -> Money {
        self.subtotal() + self.tax(rate)
    }

    /// Snapshot of every derived figure at once.
    pub fn totals(&self, rate: TaxRate) -> CartTotals {
        let subtotal = self.subtotal();
        let tax = subtotal.calculate_tax(rate);
        CartTotals {
            line_count: self.line_count() as u64,
            item_count: self.item_count(),
            subtotal,
            tax,
            total: subtotal + tax,
        }
    }
}

/// Maps an arbitrary requested quantity onto the allowed range.
fn clamp_quantity(quantity: i64) -> u32 {
    if quantity < i64::from(MIN_LINE_QUANTITY) {
        MIN_LINE_QUANTITY
    } else {
        u32::try_from(quantity).unwrap_or(u32::MAX)
    }
}

/// Cart totals summary handed to the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartTotals {
    pub line_count: u64,
    pub item_count: u64,
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

impl From<&Cart> for CartTotals {
    fn from(cart: &Cart) -> Self {
        cart.totals(crate::DEFAULT_TAX_RATE)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
