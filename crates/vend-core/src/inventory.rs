//! # Inventory
//!
//! Product stock keyed by dispenser code.
//!
//! ## Reload Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reload(code 1: Water ×33 @ 88p)                                       │
//! │                                                                         │
//! │  slot unknown ───────────────► insert as new record                    │
//! │  slot holds Water ×5 @ 100p ─► Water ×38 @ 88p (count adds, price      │
//! │                                 overwrites)                             │
//! │  slot holds Cola ×5 ─────────► IdentityConflict (whole batch refused)  │
//! │  slot holds Cola ×0 ─────────► relabelled Water ×33 @ 88p              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A batch is all-or-nothing: every conflict is collected first, and if there
//! are any, nothing in the batch is applied.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use tracing::{debug, info};

use crate::error::{CoreError, CoreResult, ReloadConflict};
use crate::types::{ProductCode, ProductRecord, ProductReload};
use crate::validation::{validate_reload_batch, validate_stock_count};

/// Product records owned by the machine, keyed by code.
#[derive(Debug, Clone, Default)]
pub struct Inventory {
    records: BTreeMap<ProductCode, ProductRecord>,
}

impl Inventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies a reload batch.
    ///
    /// ## Errors
    /// - `Validation` if any entry has an empty description or negative price,
    ///   or would push a slot past `MAX_STOCK_COUNT`
    /// - `IdentityConflict` listing every code whose non-empty slot holds a
    ///   different product
    ///
    /// In both cases the inventory is left unchanged.
    pub fn reload(&mut self, batch: &BTreeMap<ProductCode, ProductReload>) -> CoreResult<()> {
        self.check_reload(batch)?;

        for (&code, reload) in batch {
            match self.records.entry(code) {
                Entry::Occupied(mut slot) => {
                    let record = slot.get_mut();
                    if record.product != reload.product {
                        debug!(code, from = %record.product.description, to = %reload.product.description, "Relabelling empty slot");
                        record.product = reload.product.clone();
                    }
                    record.unit_price = reload.unit_price;
                    record.count += reload.count;
                }
                Entry::Vacant(slot) => {
                    slot.insert(ProductRecord {
                        code,
                        product: reload.product.clone(),
                        unit_price: reload.unit_price,
                        count: reload.count,
                    });
                }
            }
        }

        info!(codes = batch.len(), "Products reloaded");
        Ok(())
    }

    /// Runs every reload check without mutating.
    pub fn check_reload(&self, batch: &BTreeMap<ProductCode, ProductReload>) -> CoreResult<()> {
        validate_reload_batch(batch)?;
        for (&code, reload) in batch {
            let held = self.records.get(&code).map_or(0, |r| r.count);
            validate_stock_count("count", held, reload.count)?;
        }

        let conflicts: Vec<ReloadConflict> = batch
            .iter()
            .filter_map(|(&code, reload)| {
                let existing = self.records.get(&code)?;
                (existing.count > 0 && existing.product != reload.product).then(|| {
                    ReloadConflict {
                        code,
                        existing: existing.product.description.clone(),
                        existing_count: existing.count,
                        incoming: reload.product.description.clone(),
                    }
                })
            })
            .collect();

        if conflicts.is_empty() {
            Ok(())
        } else {
            Err(CoreError::IdentityConflict { conflicts })
        }
    }

    /// Looks up a slot.
    pub fn get(&self, code: ProductCode) -> CoreResult<&ProductRecord> {
        self.records
            .get(&code)
            .ok_or(CoreError::ProductNotFound { code })
    }

    /// Looks up a slot that has at least one unit to dispense.
    pub fn available(&self, code: ProductCode) -> CoreResult<&ProductRecord> {
        let record = self.get(code)?;
        if !record.in_stock() {
            return Err(CoreError::OutOfStock {
                code,
                description: record.product.description.clone(),
            });
        }
        Ok(record)
    }

    /// Removes one unit from a slot.
    ///
    /// Callers check availability first; this is not a compare-and-swap.
    pub fn decrement(&mut self, code: ProductCode) -> CoreResult<&ProductRecord> {
        let record = self
            .records
            .get_mut(&code)
            .ok_or(CoreError::ProductNotFound { code })?;

        if record.count == 0 {
            return Err(CoreError::OutOfStock {
                code,
                description: record.product.description.clone(),
            });
        }

        record.count -= 1;
        Ok(&*record)
    }

    /// Read-only copy of every record, ordered by code.
    pub fn snapshot(&self) -> Vec<ProductRecord> {
        self.records.values().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
