//! Operator stock report.

use serde::{Deserialize, Serialize};
use vend_core::{coins_total, ChangeMode, CoinStack, Money, ProductRecord};

use crate::state::VendingMachine;

/// Point-in-time view of a machine, taken under one lock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReport {
    pub change_strategy: ChangeMode,
    pub allowed_denominations: Vec<u32>,
    pub products: Vec<ProductRecord>,
    pub coins: Vec<CoinStack>,
    pub reserve_total: Money,
}

impl StockReport {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl From<&VendingMachine> for StockReport {
    fn from(machine: &VendingMachine) -> Self {
        let (products, coins) =
            machine.with_stock(|stock| (stock.inventory.snapshot(), stock.reserve.snapshot()));

        StockReport {
            change_strategy: machine.mode(),
            allowed_denominations: machine.allowed().values(),
            reserve_total: coins_total(&coins),
            products,
            coins,
        }
    }
}
