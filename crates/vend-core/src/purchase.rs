//! # Purchase
//!
//! The selection transaction shared by the single-customer
//! [`VendingSession`](crate::session::VendingSession) and multi-customer
//! machines.
//!
//! ## Flow
//! ```text
//! select(code)
//!    │
//!    ├── slot unknown / empty ───────────► ProductNotFound / OutOfStock
//!    ├── pending < price ────────────────► InsufficientFunds
//!    │
//!    ▼
//! till = reserve + pending coins        (scratch copy)
//!    ├── a stack would overflow ─────────► Validation
//! change = strategy(pending - price, till)
//!    ├── strategy refuses ───────────────► ExactChangeUnavailable
//!    ▼
//! stock -1, reserve = till, pending = change
//! ```
//!
//! Every check and the change calculation run against a scratch copy of the
//! reserve. Nothing is published until all of them succeed, so an error
//! leaves inventory, reserve and purse exactly as they were.

use tracing::info;

use crate::change::ChangeStrategy;
use crate::coins::{CoinPurse, CoinReserve};
use crate::error::{CoreError, CoreResult};
use crate::inventory::Inventory;
use crate::money::coins_total;
use crate::types::{Dispensed, ProductCode};

/// Sells one unit of `code` against the coins in `purse`.
///
/// On success the purse holds the change (possibly short of
/// [`Dispensed::change_due`] with the greedy strategy).
pub fn purchase(
    inventory: &mut Inventory,
    reserve: &mut CoinReserve,
    purse: &mut CoinPurse,
    code: ProductCode,
    strategy: &dyn ChangeStrategy,
) -> CoreResult<Dispensed> {
    let record = inventory.available(code)?;
    let price = record.unit_price;
    let product = record.product.clone();

    let paid = purse.total();
    if paid < price {
        return Err(CoreError::InsufficientFunds {
            code,
            price,
            inserted: paid,
        });
    }

    let change_due = paid - price;
    let mut till = reserve.clone();
    till.deposit(&purse.stacks())?;
    let change = strategy.make_change(change_due, &mut till)?;

    inventory.decrement(code)?;
    *reserve = till;
    purse.replace(&change);

    info!(
        code,
        product = %product.description,
        %price,
        %paid,
        change = %coins_total(&change),
        "Product dispensed"
    );

    Ok(Dispensed {
        code,
        product,
        price,
        paid,
        change_due,
        change,
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
