//! # Customer Sessions
//!
//! One `CustomerSession` per person standing at the machine. Each session
//! keeps its own pending coins, so two customers never see or spend each
//! other's money; they only compete for stock and reserve coins, which are
//! locked for the length of a selection.
//!
//! ## Selection Flow
//! ```text
//! insert_coin ──► own purse (no lock)
//!                      │
//! select_product ──────┼──► lock stock ──► vend_core::purchase ──► unlock
//!                      │                   (price, change, decrement)
//!                      ▼
//! return_coins ──► drain own purse (no lock)
//! ```

use tracing::{error, info, warn};
use uuid::Uuid;
use vend_core::{purchase, CoinPurse, CoinStack, Dispensed, Money, ProductCode, SessionState};

use crate::error::MachineResult;
use crate::state::VendingMachine;

/// A single customer's interaction with a shared machine.
#[derive(Debug)]
pub struct CustomerSession {
    id: Uuid,
    machine: VendingMachine,
    purse: CoinPurse,
    state: SessionState,
}

impl CustomerSession {
    pub fn new(machine: VendingMachine) -> Self {
        let purse = CoinPurse::new(machine.allowed().clone());
        CustomerSession {
            id: Uuid::new_v4(),
            machine,
            purse,
            state: SessionState::Idle,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Feeds one coin into this customer's purse and returns its total.
    pub fn insert_coin(&mut self, value: u32) -> MachineResult<Money> {
        match self.purse.insert(value) {
            Ok(total) => {
                self.state = SessionState::Accumulating;
                Ok(total)
            }
            Err(e) => {
                warn!(customer = %self.id, coin = value, "Unrecognized coin");
                Err(e.into())
            }
        }
    }

    /// Buys one unit of `code` with this customer's pending coins.
    ///
    /// The stock stays locked from the availability check until the slot is
    /// decremented, so the last unit is sold at most once.
    pub fn select_product(&mut self, code: ProductCode) -> MachineResult<Dispensed> {
        self.state = SessionState::Evaluating;
        let strategy = self.machine.mode().strategy();
        let purse = &mut self.purse;

        let result = self.machine.with_stock_mut(|stock| {
            purchase(&mut stock.inventory, &mut stock.reserve, purse, code, strategy)
        });

        match result {
            Ok(dispensed) => {
                if !dispensed.is_exact() {
                    warn!(customer = %self.id, code, shortfall = %dispensed.shortfall(), "Change short");
                }
                self.state = SessionState::Dispensed;
                Ok(dispensed)
            }
            Err(e) => {
                if e.is_internal() {
                    error!(customer = %self.id, code, error = %e, "Coin bookkeeping fault");
                } else {
                    info!(customer = %self.id, code, reason = %e, "Selection refused");
                }
                self.state = SessionState::Rejected;
                Err(e.into())
            }
        }
    }

    /// Hands back every pending coin.
    pub fn return_coins(&mut self) -> Vec<CoinStack> {
        self.state = SessionState::Idle;
        self.purse.drain()
    }

    pub fn pending_total(&self) -> Money {
        self.purse.total()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn machine(&self) -> &VendingMachine {
        &self.machine
    }
}
