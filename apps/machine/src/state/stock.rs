//! Shared stock handle.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{info, warn};
use vend_core::{
    ChangeMode, CoinReserve, CoinStack, DenominationSet, Inventory, ProductCode, ProductRecord,
    ProductReload,
};

use crate::config::MachineConfig;
use crate::error::MachineResult;

/// What every customer competes for: products and the change reserve.
#[derive(Debug, Clone, Default)]
pub struct MachineStock {
    pub inventory: Inventory,
    pub reserve: CoinReserve,
}

/// Cloneable handle to one physical machine.
///
/// ## Thread Safety
/// Uses `Arc<Mutex<MachineStock>>` because a selection reads the price,
/// makes change from the reserve and decrements the slot as one step. A
/// `RwLock` would buy nothing: snapshots are rare and short.
#[derive(Debug, Clone)]
pub struct VendingMachine {
    stock: Arc<Mutex<MachineStock>>,
    allowed: DenominationSet,
    mode: ChangeMode,
}

impl VendingMachine {
    /// Creates an empty machine.
    pub fn new(allowed: DenominationSet, mode: ChangeMode) -> Self {
        VendingMachine {
            stock: Arc::new(Mutex::new(MachineStock::default())),
            allowed,
            mode,
        }
    }

    /// Builds a machine and applies the initial load from `config`.
    pub fn from_config(config: &MachineConfig) -> MachineResult<Self> {
        config.validate()?;
        let machine = Self::new(config.denomination_set()?, config.change_strategy);
        machine.reload(&config.product_batch(), &config.coin_batch()?)?;

        info!(
            products = config.products.len(),
            mode = %config.change_strategy,
            "Machine ready"
        );
        Ok(machine)
    }

    /// Executes a function with read access to the stock.
    ///
    /// A panic in another holder doesn't wedge the machine. Reloads and
    /// purchases run every check, overflow included, before their first
    /// write, and the writes after that can't fail, so a poisoned guard
    /// still holds a consistent value.
    pub fn with_stock<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&MachineStock) -> R,
    {
        let stock = self.stock.lock().unwrap_or_else(PoisonError::into_inner);
        f(&stock)
    }

    /// Executes a function with write access to the stock.
    pub fn with_stock_mut<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut MachineStock) -> R,
    {
        let mut stock = self.stock.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut stock)
    }

    // =========================================================================
    // Operator
    // =========================================================================

    /// Loads products and change under a single lock.
    ///
    /// Both batches are checked before either is applied; a refused batch
    /// leaves the whole stock untouched.
    pub fn reload(
        &self,
        products: &BTreeMap<ProductCode, ProductReload>,
        coins: &[CoinStack],
    ) -> MachineResult<()> {
        self.with_stock_mut(|stock| -> MachineResult<()> {
            stock
                .inventory
                .check_reload(products)
                .and_then(|()| stock.reserve.check_deposit(coins))
                .inspect_err(|e| {
                    warn!(error = %e, "Reload refused");
                })?;

            stock.inventory.reload(products)?;
            stock.reserve.reload(coins)?;
            Ok(())
        })
    }

    pub fn reload_products(&self, products: &BTreeMap<ProductCode, ProductReload>) -> MachineResult<()> {
        self.reload(products, &[])
    }

    pub fn reload_change(&self, coins: &[CoinStack]) -> MachineResult<()> {
        self.reload(&BTreeMap::new(), coins)
    }

    // =========================================================================
    // Read-only
    // =========================================================================

    /// Stock per slot, ordered by code.
    pub fn inventory(&self) -> Vec<ProductRecord> {
        self.with_stock(|stock| stock.inventory.snapshot())
    }

    /// Reserve coins, ordered by denomination.
    pub fn available_change(&self) -> Vec<CoinStack> {
        self.with_stock(|stock| stock.reserve.snapshot())
    }

    pub fn allowed(&self) -> &DenominationSet {
        &self.allowed
    }

    pub fn mode(&self) -> ChangeMode {
        self.mode
    }
}

impl Default for VendingMachine {
    fn default() -> Self {
        Self::new(DenominationSet::default(), ChangeMode::default())
    }
}
