//! # vend-machine: Machine Runtime
//!
//! Stands a machine up from configuration and lets any number of customers
//! use it at once. All selling logic lives in `vend-core`; this crate adds
//! the shared stock, per-customer sessions, configuration and logging.
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Machine Startup                                   │
//! │                                                                         │
//! │  1. Initialize Logging ───────────────────────────────────────────────► │
//! │     • tracing-subscriber with env filter                                │
//! │     • Default: info,vend=debug, overridden with RUST_LOG                │
//! │                                                                         │
//! │  2. Load Configuration ───────────────────────────────────────────────► │
//! │     • VEND_CONFIG path, else the platform config dir                    │
//! │     • VEND_* environment overrides                                      │
//! │                                                                         │
//! │  3. Build VendingMachine ─────────────────────────────────────────────► │
//! │     • Initial product and change load                                   │
//! │                                                                         │
//! │  4. Open CustomerSessions against the shared machine                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing_subscriber::EnvFilter;

pub mod config;
pub mod customer;
pub mod error;
pub mod report;
pub mod state;

pub use config::{CoinEntry, MachineConfig, ProductEntry};
pub use customer::CustomerSession;
pub use error::{MachineError, MachineResult};
pub use report::StockReport;
pub use state::{MachineStock, VendingMachine};

/// Initializes the tracing subscriber for structured logging.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Show debug messages
/// - `RUST_LOG=vend_core=trace` - Show trace for the core only
/// - Default: INFO, DEBUG for vend crates
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,vend=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
