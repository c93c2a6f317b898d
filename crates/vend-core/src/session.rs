//! # Vending Session
//!
//! A complete single-customer machine: inventory, coin ledger and change
//! strategy behind the three customer operations.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  insert_coin(50) ─► 50p                                                 │
//! │  insert_coin(50) ─► 100p                                                │
//! │  insert_coin(200) ─► 300p                                               │
//! │  select_product(1) ─► Water, change 200p now pending                   │
//! │  return_coins() ─► [200×1]                                             │
//! │  return_coins() ─► []                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Change is never pushed out automatically: it waits in the pending slot
//! until the customer asks for it or spends it on another selection.

use std::collections::BTreeMap;

use tracing::{error, info, warn};

use crate::change::ChangeMode;
use crate::coins::CoinLedger;
use crate::error::CoreResult;
use crate::inventory::Inventory;
use crate::money::{CoinStack, DenominationSet, Money};
use crate::purchase::purchase;
use crate::types::{Dispensed, ProductCode, ProductRecord, ProductReload, SessionState};

/// Single-customer vending machine.
#[derive(Debug, Clone, Default)]
pub struct VendingSession {
    inventory: Inventory,
    ledger: CoinLedger,
    mode: ChangeMode,
    state: SessionState,
}

impl VendingSession {
    /// Creates an empty machine accepting `allowed` coins.
    pub fn new(allowed: DenominationSet, mode: ChangeMode) -> Self {
        VendingSession {
            inventory: Inventory::new(),
            ledger: CoinLedger::new(allowed),
            mode,
            state: SessionState::Idle,
        }
    }

    // =========================================================================
    // Operator
    // =========================================================================

    /// Loads products and change in one go.
    ///
    /// Both batches are checked before either is applied; if one is refused,
    /// neither pool changes.
    pub fn reload(
        &mut self,
        products: &BTreeMap<ProductCode, ProductReload>,
        coins: &[CoinStack],
    ) -> CoreResult<()> {
        self.inventory
            .check_reload(products)
            .and_then(|()| self.ledger.available().check_deposit(coins))
            .inspect_err(|e| {
                warn!(error = %e, "Reload refused");
            })?;

        self.inventory.reload(products)?;
        self.ledger.reload_available(coins)
    }

    pub fn reload_products(&mut self, products: &BTreeMap<ProductCode, ProductReload>) -> CoreResult<()> {
        self.reload(products, &[])
    }

    pub fn reload_change(&mut self, coins: &[CoinStack]) -> CoreResult<()> {
        self.reload(&BTreeMap::new(), coins)
    }

    // =========================================================================
    // Customer
    // =========================================================================

    /// Feeds one coin into the slot and returns the pending total.
    ///
    /// An unrecognised coin is refused without changing anything; the error
    /// carries the unchanged total.
    pub fn insert_coin(&mut self, value: u32) -> CoreResult<Money> {
        match self.ledger.insert(value) {
            Ok(total) => {
                self.state = SessionState::Accumulating;
                Ok(total)
            }
            Err(e) => {
                warn!(coin = value, "Unrecognized coin");
                Err(e)
            }
        }
    }

    /// Tries to sell one unit of `code` with the pending coins.
    pub fn select_product(&mut self, code: ProductCode) -> CoreResult<Dispensed> {
        self.state = SessionState::Evaluating;
        let (reserve, purse) = self.ledger.split_mut();

        match purchase(&mut self.inventory, reserve, purse, code, self.mode.strategy()) {
            Ok(dispensed) => {
                if !dispensed.is_exact() {
                    warn!(code, shortfall = %dispensed.shortfall(), "Change short");
                }
                self.state = SessionState::Dispensed;
                Ok(dispensed)
            }
            Err(e) => {
                if e.is_internal() {
                    error!(code, error = %e, "Coin bookkeeping fault");
                } else {
                    info!(code, reason = %e, "Selection refused");
                }
                self.state = SessionState::Rejected;
                Err(e)
            }
        }
    }

    /// Hands back every pending coin (inserted coins or change).
    pub fn return_coins(&mut self) -> Vec<CoinStack> {
        self.state = SessionState::Idle;
        self.ledger.drain_pending()
    }

    // =========================================================================
    // Read-only
    // =========================================================================

    pub fn pending_total(&self) -> Money {
        self.ledger.pending_total()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> ChangeMode {
        self.mode
    }

    /// Stock per slot, ordered by code.
    pub fn inventory(&self) -> Vec<ProductRecord> {
        self.inventory.snapshot()
    }

    /// Reserve coins, ordered by denomination.
    pub fn available_change(&self) -> Vec<CoinStack> {
        self.ledger.available().snapshot()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
