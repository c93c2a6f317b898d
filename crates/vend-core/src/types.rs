//! # Domain Types
//!
//! Core domain types used throughout the vending core.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │  ProductRecord  │   │  ProductReload  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  description    │◄──│  code           │   │  product        │       │
//! │  └─────────────────┘   │  product        │   │  count          │       │
//! │                        │  unit_price     │   │  unit_price     │       │
//! │                        │  count          │   └─────────────────┘       │
//! │                        └─────────────────┘                              │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │  SessionState   │   │   Dispensed     │                              │
//! │  │  Idle           │   │  product, price │                              │
//! │  │  Accumulating   │   │  paid, change   │                              │
//! │  │  Evaluating     │   └─────────────────┘                              │
//! │  │  Dispensed      │                                                    │
//! │  │  Rejected       │                                                    │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! A dispenser slot is addressed by its numeric code, but *what* is in the
//! slot is identified by the product description. Reloads compare
//! descriptions, never codes.

use serde::{Deserialize, Serialize};

use crate::money::{coins_total, CoinStack, Money};

/// Numeric key of a dispenser slot.
pub type ProductCode = u32;

// =============================================================================
// Product
// =============================================================================

/// What is sold from a slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Product {
    pub description: String,
}

impl Product {
    pub fn new(description: impl Into<String>) -> Self {
        Product {
            description: description.into(),
        }
    }
}

// =============================================================================
// Product Record
// =============================================================================

/// Stock held in one dispenser slot.
///
/// ## Invariants
/// - `product.description` doesn't change while `count > 0`
/// - `unit_price` may change on every reload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub code: ProductCode,
    pub product: Product,
    pub unit_price: Money,
    pub count: u32,
}

impl ProductRecord {
    /// Checks if at least one unit can be dispensed.
    #[inline]
    pub fn in_stock(&self) -> bool {
        self.count > 0
    }
}

// =============================================================================
// Product Reload
// =============================================================================

/// One entry of a reload batch: units to add to a slot and the slot's new
/// price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductReload {
    pub product: Product,
    pub count: u32,
    pub unit_price: Money,
}

impl ProductReload {
    pub fn new(description: impl Into<String>, count: u32, unit_price: i64) -> Self {
        ProductReload {
            product: Product::new(description),
            count,
            unit_price: Money::from_minor(unit_price),
        }
    }
}

// =============================================================================
// Session State
// =============================================================================

/// Where a customer transaction currently stands.
///
/// ```text
/// Idle ──insert──► Accumulating ──select──► Evaluating ──► Dispensed
///  ▲                                                   └──► Rejected
///  └──────────────────────── return_coins ◄─────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    /// No coins pending.
    #[default]
    Idle,
    /// Coins inserted, nothing selected yet.
    Accumulating,
    /// A selection is being checked.
    Evaluating,
    /// The last selection dispensed a product.
    Dispensed,
    /// The last selection was refused.
    Rejected,
}

// =============================================================================
// Dispensed
// =============================================================================

/// The outcome of a successful selection.
///
/// `change` has already been placed back into the customer's pending
/// coins, where it can be retrieved or spent on another product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispensed {
    pub code: ProductCode,
    pub product: Product,
    pub price: Money,
    /// Pending total at the moment of selection.
    pub paid: Money,
    /// `paid - price`.
    pub change_due: Money,
    /// Coins set aside as change, highest denomination first.
    pub change: Vec<CoinStack>,
}

impl Dispensed {
    /// Face value of the change actually set aside.
    pub fn change_returned(&self) -> Money {
        coins_total(&self.change)
    }

    /// How much change the reserve couldn't cover. Zero when exact.
    pub fn shortfall(&self) -> Money {
        self.change_due - self.change_returned()
    }

    pub fn is_exact(&self) -> bool {
        self.shortfall().is_zero()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
