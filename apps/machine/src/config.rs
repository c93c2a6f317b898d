//! # Machine Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     VEND_CHANGE_STRATEGY=exact                                         │
//! │     VEND_ALLOWED_DENOMINATIONS=5,10,20,50                              │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     path given by caller (VEND_CONFIG in the binary), else             │
//! │     ~/.config/vend-machine/machine.toml (Linux)                        │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     coins {1,5,10,20,50,100,200}, greedy change, empty machine         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # machine.toml
//! allowed_denominations = [1, 5, 10, 20, 50, 100, 200]
//! change_strategy = "greedy"  # greedy | exact
//!
//! [[products]]
//! code = 1
//! description = "Water"
//! count = 5
//! price = 100
//!
//! [[coins]]
//! denomination = 50
//! count = 50
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use vend_core::money::DEFAULT_DENOMINATIONS;
use vend_core::{
    ChangeMode, CoinStack, Denomination, DenominationSet, Money, Product, ProductCode,
    ProductReload,
};

use crate::error::{MachineError, MachineResult};

/// One `[[products]]` entry of the initial load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductEntry {
    pub code: ProductCode,
    pub description: String,
    pub count: u32,
    /// Unit price in minor units.
    pub price: i64,
}

/// One `[[coins]]` entry of the initial load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinEntry {
    pub denomination: u32,
    pub count: u32,
}

fn default_denominations() -> Vec<u32> {
    DEFAULT_DENOMINATIONS.to_vec()
}

/// Everything needed to stand up a machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MachineConfig {
    /// Coins the slot accepts, in minor units.
    #[serde(default = "default_denominations")]
    pub allowed_denominations: Vec<u32>,

    /// How change is made.
    #[serde(default)]
    pub change_strategy: ChangeMode,

    /// Initial product load.
    #[serde(default)]
    pub products: Vec<ProductEntry>,

    /// Initial change load.
    #[serde(default)]
    pub coins: Vec<CoinEntry>,
}

impl Default for MachineConfig {
    fn default() -> Self {
        MachineConfig {
            allowed_denominations: default_denominations(),
            change_strategy: ChangeMode::default(),
            products: Vec::new(),
            coins: Vec::new(),
        }
    }
}

impl MachineConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (machine.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> MachineResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading machine config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = Self::from_toml_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    /// Parses a TOML document (no validation).
    pub fn from_toml_str(contents: &str) -> MachineResult<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Applies `VEND_*` overrides read through `lookup`.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(mode) = lookup("VEND_CHANGE_STRATEGY") {
            match mode.parse::<ChangeMode>() {
                Ok(parsed) => {
                    debug!(mode = %mode, "Overriding change strategy from environment");
                    self.change_strategy = parsed;
                }
                Err(_) => warn!(mode = %mode, "Unknown change strategy in environment"),
            }
        }

        if let Some(list) = lookup("VEND_ALLOWED_DENOMINATIONS") {
            let parsed: Result<Vec<u32>, _> =
                list.split(',').map(|v| v.trim().parse::<u32>()).collect();
            match parsed {
                Ok(values) => {
                    debug!(?values, "Overriding allowed denominations from environment");
                    self.allowed_denominations = values;
                }
                Err(_) => warn!(list = %list, "Unparseable denomination list in environment"),
            }
        }
    }

    /// Validates the configuration.
    pub fn validate(&self) -> MachineResult<()> {
        if self.allowed_denominations.is_empty() {
            return Err(MachineError::InvalidConfig(
                "allowed_denominations must not be empty".into(),
            ));
        }
        self.denomination_set()?;

        let mut seen = BTreeSet::new();
        for entry in &self.products {
            if !seen.insert(entry.code) {
                return Err(MachineError::InvalidConfig(format!(
                    "product code {} is listed twice",
                    entry.code
                )));
            }
        }
        vend_core::validation::validate_reload_batch(&self.product_batch())?;
        self.coin_batch()?;

        Ok(())
    }

    /// The slot allow-list.
    pub fn denomination_set(&self) -> MachineResult<DenominationSet> {
        Ok(DenominationSet::from_values(
            self.allowed_denominations.iter().copied(),
        )?)
    }

    /// The initial product load as a reload batch.
    pub fn product_batch(&self) -> BTreeMap<ProductCode, ProductReload> {
        self.products
            .iter()
            .map(|entry| {
                (
                    entry.code,
                    ProductReload {
                        product: Product::new(entry.description.clone()),
                        count: entry.count,
                        unit_price: Money::from_minor(entry.price),
                    },
                )
            })
            .collect()
    }

    /// The initial change load.
    pub fn coin_batch(&self) -> MachineResult<Vec<CoinStack>> {
        self.coins
            .iter()
            .map(|entry| -> MachineResult<CoinStack> {
                Ok(CoinStack::new(
                    Denomination::new(entry.denomination)?,
                    entry.count,
                ))
            })
            .collect()
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "vend", "vend-machine")
            .map(|dirs| dirs.config_dir().join("machine.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        allowed_denominations = [5, 10, 20, 50]
        change_strategy = "exact"

        [[products]]
        code = 1
        description = "Water"
        count = 5
        price = 100

        [[products]]
        code = 2
        description = "Snack"
        count = 15
        price = 150

        [[coins]]
        denomination = 50
        count = 50
    "#;

    #[test]
    fn test_parse_sample() {
        let config = MachineConfig::from_toml_str(SAMPLE).unwrap();
        config.validate().unwrap();

        assert_eq!(config.change_strategy, ChangeMode::Exact);
        assert_eq!(config.denomination_set().unwrap().values(), vec![5, 10, 20, 50]);

        let batch = config.product_batch();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[&2], ProductReload::new("Snack", 15, 150));

        let coins = config.coin_batch().unwrap();
        assert_eq!(coins, vec![CoinStack::new(Denomination::new(50).unwrap(), 50)]);
    }

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = MachineConfig::from_toml_str("").unwrap();
        config.validate().unwrap();

        assert_eq!(config.allowed_denominations, vec![1, 5, 10, 20, 50, 100, 200]);
        assert_eq!(config.change_strategy, ChangeMode::Greedy);
        assert!(config.products.is_empty());
    }

    #[test]
    fn test_overrides() {
        let mut config = MachineConfig::default();
        config.apply_overrides(|key| match key {
            "VEND_CHANGE_STRATEGY" => Some("exact".to_string()),
            "VEND_ALLOWED_DENOMINATIONS" => Some("10, 20,50".to_string()),
            _ => None,
        });

        assert_eq!(config.change_strategy, ChangeMode::Exact);
        assert_eq!(config.allowed_denominations, vec![10, 20, 50]);
    }

    #[test]
    fn test_bad_overrides_are_ignored() {
        let mut config = MachineConfig::default();
        config.apply_overrides(|key| match key {
            "VEND_CHANGE_STRATEGY" => Some("optimal".to_string()),
            "VEND_ALLOWED_DENOMINATIONS" => Some("10,x".to_string()),
            _ => None,
        });

        assert_eq!(config.change_strategy, ChangeMode::Greedy);
        assert_eq!(config.allowed_denominations.len(), 7);
    }

    #[test]
    fn test_validate_rejects_bad_configs() {
        let mut config = MachineConfig::default();
        config.allowed_denominations.clear();
        assert!(matches!(config.validate(), Err(MachineError::InvalidConfig(_))));

        let mut config = MachineConfig::default();
        config.allowed_denominations.push(0);
        assert!(config.validate().is_err());

        let mut config = MachineConfig::default();
        config.coins.push(CoinEntry {
            denomination: 0,
            count: 3,
        });
        assert!(config.validate().is_err());

        let mut config = MachineConfig::default();
        let water = ProductEntry {
            code: 1,
            description: "Water".to_string(),
            count: 1,
            price: 100,
        };
        config.products = vec![water.clone(), water];
        assert!(matches!(config.validate(), Err(MachineError::InvalidConfig(_))));
    }

    #[test]
    fn test_unknown_strategy_in_file_fails_to_parse() {
        let err = MachineConfig::from_toml_str(r#"change_strategy = "optimal""#).unwrap_err();
        assert!(matches!(err, MachineError::ConfigParse(_)));
    }
}
