//! # State Module
//!
//! Shared machine state. Every customer session holds a handle to the same
//! stock; only the stock is locked, pending coins live in each session.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    State Architecture                                   │
//! │                                                                         │
//! │  CustomerSession A ──┐                                                  │
//! │  CustomerSession B ──┼──► VendingMachine (clone handle)                 │
//! │  Operator reload ────┘            │                                     │
//! │                                   ▼                                     │
//! │                    Arc<Mutex<MachineStock>>                             │
//! │                    ├─ Inventory                                         │
//! │                    └─ CoinReserve                                       │
//! │                                                                         │
//! │  THREAD SAFETY:                                                        │
//! │  • MachineStock: one Mutex, held for a whole selection                 │
//! │  • allow-list and change mode: read-only after start-up                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod stock;

pub use stock::{MachineStock, VendingMachine};
