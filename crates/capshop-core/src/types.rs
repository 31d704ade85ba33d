//! # Domain Types
//!
//! The line item the storefront puts in a cart, and the tax rate applied
//! to a cart's subtotal.
//!
//! ## Where Line Items Come From
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Line Item Sources                                   │
//! │                                                                         │
//! │  Product card "Add"   ──► id = product id,   qty 1, first color, "M"   │
//! │  Quick view "Add"     ──► id = product id,   qty chosen, color, size   │
//! │  Cap customizer "Add" ──► id = "custom-…",   qty 1, base color, "M"    │
//! │  Account "Buy again"  ──► id = product id,   qty 1                     │
//! │                                                                         │
//! │  All of them end up in Cart::add_item as a CartLineItem.               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::money::Money;
use crate::{CUSTOM_ITEM_PREFIX, MIN_LINE_QUANTITY};

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (1 bps = 0.01%, 800 bps = 8%).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Rate as a percentage, for display only.
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Cart Line Item
// =============================================================================

/// One entry in the cart: a chosen product variant and its quantity.
///
/// ## Invariants
/// - `quantity >= MIN_LINE_QUANTITY` once the item is inside a [`Cart`](crate::Cart)
/// - `price` is a unit price; the line total is `price × quantity`
/// - `image` is opaque to the core, it is only carried for display
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct CartLineItem {
    /// Product id, or a synthesized `custom-…` id for customized caps.
    pub id: String,

    pub name: String,

    /// Unit price.
    pub price: Money,

    pub quantity: u32,

    /// Color name or hex value picked by the shopper.
    pub color: String,

    /// Size label ("S", "M", "L", "XL", "One Size", ...).
    pub size: String,

    pub image: String,
}

impl CartLineItem {
    /// Creates a line item with empty descriptors.
    ///
    /// Use the `with_*` builders to fill in color, size and image.
    pub fn new(id: impl Into<String>, name: impl Into<String>, price: Money, quantity: u32) -> Self {
        CartLineItem {
            id: id.into(),
            name: name.into(),
            price,
            quantity,
            color: String::new(),
            size: String::new(),
            image: String::new(),
        }
    }

    /// Creates a line item for a customized cap.
    ///
    /// Every call gets a fresh `custom-<uuid>` id, so two customizations of
    /// the same style are always separate entries.
    ///
    /// ```rust
    /// use capshop_core::{CartLineItem, Money};
    ///
    /// let item = CartLineItem::custom("Custom Snapback Cap", Money::from_cents(3499));
    /// assert!(item.id.starts_with("custom-"));
    /// assert_eq!(item.quantity, 1);
    /// ```
    pub fn custom(name: impl Into<String>, price: Money) -> Self {
        let id = format!("{}{}", CUSTOM_ITEM_PREFIX, Uuid::new_v4());
        Self::new(id, name, price, MIN_LINE_QUANTITY)
    }

    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        self.size = size.into();
        self
    }

    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = image.into();
        self
    }

    /// True when the id was synthesized by [`CartLineItem::custom`].
    pub fn is_custom(&self) -> bool {
        self.id.starts_with(CUSTOM_ITEM_PREFIX)
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = CartLineItem::new("trucker-02", "Mesh Trucker", Money::from_cents(2199), 3);
        assert_eq!(item.line_total().cents(), 6597);
    }

    #[test]
    fn test_custom_ids_are_unique() {
        let a = CartLineItem::custom("Custom Fitted Cap", Money::from_cents(3999));
        let b = CartLineItem::custom("Custom Fitted Cap", Money::from_cents(3999));

        assert!(a.is_custom());
        assert!(b.is_custom());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_builders() {
        let item = CartLineItem::new("dad-01", "Washed Dad Hat", Money::from_cents(1999), 1)
            .with_color("Navy")
            .with_size("One Size")
            .with_image("https://cdn.example/dad-01.jpg");

        assert_eq!(item.color, "Navy");
        assert_eq!(item.size, "One Size");
        assert!(!item.is_custom());
    }

    #[test]
    fn test_serializes_camel_case() {
        let item = CartLineItem::new("1", "Cap", Money::from_cents(1000), 2);
        let json = serde_json::to_value(&item).unwrap();

        assert_eq!(json["id"], "1");
        assert_eq!(json["price"], 1000);
        assert_eq!(json["quantity"], 2);
    }
}
