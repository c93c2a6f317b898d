//! # Coins
//!
//! Bookkeeping for the two coin pools of a machine.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          CoinLedger                                     │
//! │                                                                         │
//! │   ┌──────────────────────┐   commit    ┌──────────────────────────┐    │
//! │   │  CoinPurse (pending) │ ──────────► │  CoinReserve (available) │    │
//! │   │  per customer        │             │  shared by the machine   │    │
//! │   │  allow-listed coins  │ ◄────────── │  any denomination        │    │
//! │   └──────────────────────┘   change    └──────────────────────────┘    │
//! │            │                                                            │
//! │            ▼ drain                                                      │
//! │      coin return tray                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The purse and the reserve are separate types so that a multi-customer
//! machine can give each customer a purse while the reserve sits behind the
//! machine lock. `CoinLedger` glues one of each together for the
//! single-customer case.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{CoreError, CoreResult};
use crate::money::{CoinStack, Denomination, DenominationSet, Money};
use crate::validation::validate_stock_count;

fn total_of(coins: &BTreeMap<Denomination, u32>) -> Money {
    coins.iter().map(|(d, &n)| d.value() * n).sum()
}

// =============================================================================
// Coin Purse
// =============================================================================

/// Coins inserted by one customer and not yet accepted into the till.
///
/// After a sale the purse holds the customer's change instead, which can be
/// retrieved or spent on another product.
#[derive(Debug, Clone, Default)]
pub struct CoinPurse {
    allowed: DenominationSet,
    coins: BTreeMap<Denomination, u32>,
}

impl CoinPurse {
    /// Creates an empty purse that accepts `allowed` denominations.
    pub fn new(allowed: DenominationSet) -> Self {
        CoinPurse {
            allowed,
            coins: BTreeMap::new(),
        }
    }

    /// Accepts one coin from the slot and returns the new pending total.
    ///
    /// ## Errors
    /// `UnrecognizedCoin` if `value` isn't in the allow-list. The purse is
    /// unchanged and the error carries the current total.
    pub fn insert(&mut self, value: u32) -> CoreResult<Money> {
        let Some(denomination) = self.allowed.recognise(value) else {
            return Err(CoreError::UnrecognizedCoin {
                denomination: value,
                pending_total: self.total(),
            });
        };

        let held = self.coins.get(&denomination).copied().unwrap_or(0);
        let count = validate_stock_count("coin count", held, 1)?;
        self.coins.insert(denomination, count);
        let total = self.total();
        debug!(coin = value, %total, "Coin inserted");
        Ok(total)
    }

    /// Face value of every pending coin.
    pub fn total(&self) -> Money {
        total_of(&self.coins)
    }

    /// Replaces the pending coins wholesale (used to hand over change).
    ///
    /// Change may contain denominations outside the allow-list; the list
    /// only restricts the slot.
    pub fn replace(&mut self, coins: &[CoinStack]) {
        self.coins.clear();
        for stack in coins.iter().filter(|s| s.count > 0) {
            *self.coins.entry(stack.denomination).or_insert(0) += stack.count;
        }
    }

    /// Returns and clears every pending coin, highest denomination first.
    pub fn drain(&mut self) -> Vec<CoinStack> {
        let coins = self.stacks();
        self.coins.clear();
        coins
    }

    /// Pending coins, highest denomination first.
    pub fn stacks(&self) -> Vec<CoinStack> {
        self.coins
            .iter()
            .rev()
            .map(|(&d, &n)| CoinStack::new(d, n))
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.coins.is_empty()
    }

    pub fn allowed(&self) -> &DenominationSet {
        &self.allowed
    }
}

// =============================================================================
// Coin Reserve
// =============================================================================

/// The machine's committed coins, available for change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoinReserve {
    coins: BTreeMap<Denomination, u32>,
}

impl CoinReserve {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds operator-loaded coins. Counts accumulate per denomination.
    pub fn reload(&mut self, coins: &[CoinStack]) -> CoreResult<()> {
        self.deposit(coins)?;
        debug!(stacks = coins.len(), total = %self.total(), "Change reloaded");
        Ok(())
    }

    /// Moves coins into the reserve.
    ///
    /// ## Errors
    /// `Validation` if a stack would pass `MAX_STOCK_COUNT`. The reserve is
    /// unchanged.
    pub fn deposit(&mut self, coins: &[CoinStack]) -> CoreResult<()> {
        self.coins = self.with_deposit(coins)?;
        Ok(())
    }

    /// Runs the deposit checks without mutating.
    pub fn check_deposit(&self, coins: &[CoinStack]) -> CoreResult<()> {
        self.with_deposit(coins)?;
        Ok(())
    }

    fn with_deposit(&self, coins: &[CoinStack]) -> CoreResult<BTreeMap<Denomination, u32>> {
        let mut next = self.coins.clone();
        for stack in coins {
            let held = next.entry(stack.denomination).or_insert(0);
            *held = validate_stock_count("coin count", *held, stack.count)?;
        }
        Ok(next)
    }

    /// Takes `count` coins of one denomination out of the reserve.
    ///
    /// ## Errors
    /// `InsufficientReserve` if fewer than `count` are present. The reserve
    /// is unchanged.
    pub fn withdraw(&mut self, denomination: Denomination, count: u32) -> CoreResult<()> {
        let available = self.count(denomination);
        if count > available {
            return Err(CoreError::InsufficientReserve {
                denomination,
                requested: count,
                available,
            });
        }
        if count > 0 {
            if let Some(held) = self.coins.get_mut(&denomination) {
                *held -= count;
            }
        }
        Ok(())
    }

    /// Coins held of one denomination.
    pub fn count(&self, denomination: Denomination) -> u32 {
        self.coins.get(&denomination).copied().unwrap_or(0)
    }

    /// Every denomination ever held, highest first.
    pub fn denominations_desc(&self) -> Vec<Denomination> {
        self.coins.keys().rev().copied().collect()
    }

    /// Face value of the whole reserve.
    pub fn total(&self) -> Money {
        total_of(&self.coins)
    }

    /// Read-only copy ordered by denomination.
    pub fn snapshot(&self) -> Vec<CoinStack> {
        self.coins
            .iter()
            .map(|(&d, &n)| CoinStack::new(d, n))
            .collect()
    }
}

// =============================================================================
// Coin Ledger
// =============================================================================

/// A reserve and a single purse.
#[derive(Debug, Clone, Default)]
pub struct CoinLedger {
    available: CoinReserve,
    pending: CoinPurse,
}

impl CoinLedger {
    pub fn new(allowed: DenominationSet) -> Self {
        CoinLedger {
            available: CoinReserve::new(),
            pending: CoinPurse::new(allowed),
        }
    }

    pub fn insert(&mut self, value: u32) -> CoreResult<Money> {
        self.pending.insert(value)
    }

    pub fn pending_total(&self) -> Money {
        self.pending.total()
    }

    /// Accepts every pending coin into the reserve and clears the purse.
    ///
    /// If the reserve can't take them the coins stay pending.
    pub fn commit_pending_to_available(&mut self) -> CoreResult<()> {
        self.available.deposit(&self.pending.stacks())?;
        self.pending.drain();
        Ok(())
    }

    pub fn withdraw_from_available(
        &mut self,
        denomination: Denomination,
        count: u32,
    ) -> CoreResult<()> {
        self.available.withdraw(denomination, count)
    }

    pub fn set_pending(&mut self, coins: &[CoinStack]) {
        self.pending.replace(coins);
    }

    pub fn drain_pending(&mut self) -> Vec<CoinStack> {
        self.pending.drain()
    }

    pub fn reload_available(&mut self, coins: &[CoinStack]) -> CoreResult<()> {
        self.available.reload(coins)
    }

    pub fn available(&self) -> &CoinReserve {
        &self.available
    }

    pub fn pending(&self) -> &CoinPurse {
        &self.pending
    }

    /// Both pools at once, for the purchase transaction.
    pub fn split_mut(&mut self) -> (&mut CoinReserve, &mut CoinPurse) {
        (&mut self.available, &mut self.pending)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
