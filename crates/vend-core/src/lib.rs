//! # vend-core: Pure Business Logic for a Vending Machine
//!
//! This crate is the transactional core of the machine: product stock, coin
//! stock, payment checks and change-making from a limited coin supply. It
//! has no I/O; dispensers, displays and coin mechanisms call into it.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Vend Architecture                               │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │          Front panel / coin mech / dispenser (external)         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │      vend-machine: config, shared stock, customer sessions      │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ★ vend-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │ inventory │  │   coins   │  │  change   │  │  session  │  │   │
//! │  │   │  reload   │  │   purse   │  │  greedy   │  │  insert   │  │   │
//! │  │   │  stock    │  │  reserve  │  │  exact    │  │  select   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO HARDWARE • NO PERSISTENCE                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, ProductRecord, Dispensed, ...)
//! - [`money`] - Money, Denomination, CoinStack, DenominationSet
//! - [`inventory`] - Product stock keyed by code
//! - [`coins`] - Pending purse, available reserve, ledger
//! - [`change`] - Change strategies
//! - [`purchase`] - The selection transaction
//! - [`session`] - Single-customer machine
//! - [`error`] - Domain error types
//! - [`validation`] - Input validation
//!
//! ## Example Usage
//!
//! ```rust
//! use std::collections::BTreeMap;
//! use vend_core::{CoinStack, Denomination, ProductReload, VendingSession};
//!
//! let mut machine = VendingSession::default();
//! let products: BTreeMap<_, _> = [(1, ProductReload::new("Water", 5, 100))].into();
//! let fifty = Denomination::new(50).unwrap();
//! machine.reload(&products, &[CoinStack::new(fifty, 10)]).unwrap();
//!
//! machine.insert_coin(200).unwrap();
//! let sold = machine.select_product(1).unwrap();
//! assert_eq!(sold.product.description, "Water");
//! assert_eq!(machine.return_coins(), vec![CoinStack::new(fifty, 2)]);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod change;
pub mod coins;
pub mod error;
pub mod inventory;
pub mod money;
pub mod purchase;
pub mod session;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use change::{ChangeMode, ChangeStrategy, ExactChange, GreedyChange, MAX_EXACT_CHANGE};
pub use coins::{CoinLedger, CoinPurse, CoinReserve};
pub use error::{CoreError, CoreResult, ReloadConflict, ValidationError};
pub use inventory::Inventory;
pub use money::{coins_total, CoinStack, Denomination, DenominationSet, Money};
pub use purchase::purchase;
pub use session::VendingSession;
pub use types::*;
