//! # capshop-core: Pure Cart Logic for the Capshop Storefront
//!
//! Everything the storefront needs to reason about a cart, with zero I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Capshop Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Presentation (out of tree)                      │   │
//! │  │   Product card ──► Quick view ──► Customizer ──► Cart preview   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ subscribe / read / mutate              │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 capshop-store (stateful)                        │   │
//! │  │          CartStore                SessionSimulator              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ capshop-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐   │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │ validation│   │   │
//! │  │   │ LineItem  │  │   Money   │  │   Cart    │  │  email    │   │   │
//! │  │   │  TaxRate  │  │  tax math │  │  totals   │  │  password │   │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘   │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO SHARED STATE • PURE FUNCTIONS                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Line items and tax rates
//! - [`money`] - Money type with integer arithmetic
//! - [`cart`] - The cart container and its derived totals
//! - [`error`] - Validation error types
//! - [`validation`] - Input rules shared by the auth simulator
//!
//! ## Example Usage
//!
//! ```rust
//! use capshop_core::{Cart, CartLineItem, Money};
//!
//! let mut cart = Cart::new();
//! cart.add_item(CartLineItem::new("snapback-01", "Classic Snapback", Money::from_cents(2999), 2));
//!
//! assert_eq!(cart.item_count(), 2);
//! assert_eq!(cart.subtotal().cents(), 5998);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{Cart, CartTotals};
pub use error::ValidationError;
pub use money::Money;
pub use types::{CartLineItem, TaxRate};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Smallest quantity a line item can hold.
///
/// Updates below this floor are clamped; removal is the only way an entry
/// leaves the cart.
pub const MIN_LINE_QUANTITY: u32 = 1;

/// Flat sales tax the storefront shows in the cart preview (8%).
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_bps(800);

/// Prefix of ids synthesized for customized caps.
pub const CUSTOM_ITEM_PREFIX: &str = "custom-";
