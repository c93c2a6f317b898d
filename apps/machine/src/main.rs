//! # Vend Machine Entry Point
//!
//! Loads the configured machine and prints its stock report as JSON.
//!
//! ## Environment
//! - `VEND_CONFIG` - path to `machine.toml`
//! - `VEND_CHANGE_STRATEGY` - `greedy` or `exact`
//! - `VEND_ALLOWED_DENOMINATIONS` - comma-separated coin values
//! - `RUST_LOG` - log filter

use std::path::PathBuf;
use std::process::ExitCode;

use tracing::{error, info};
use vend_machine::{init_tracing, MachineConfig, MachineResult, StockReport, VendingMachine};

fn main() -> ExitCode {
    init_tracing();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Machine failed to start");
            ExitCode::FAILURE
        }
    }
}

fn run() -> MachineResult<()> {
    info!("Starting vend machine");

    let config_path = std::env::var("VEND_CONFIG").ok().map(PathBuf::from);
    let config = MachineConfig::load(config_path)?;
    let machine = VendingMachine::from_config(&config)?;

    let report = StockReport::from(&machine);
    match report.to_json() {
        Ok(json) => println!("{json}"),
        Err(e) => error!(error = %e, "Failed to render stock report"),
    }

    Ok(())
}
