//! Configuration loading and management for the Payroll Deduction Engine.
//!
//! This module loads a fiscal year's rate table from YAML files: metadata
//! about the publication plus the BPC value, contribution rates, IRPF
//! brackets and deduction parameters.
//!
//! # Example
//!
//! ```no_run
//! use payroll_engine::config::ConfigLoader;
//!
//! let config = ConfigLoader::load("./config/uy_2025").unwrap();
//! println!("Loaded rates: {}", config.metadata().name);
//! ```

#[cfg(test)]
pub(crate) mod fixtures;
mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    FonasaConfig, HealthRates, IrpfConfig, PayrollConfig, RateTable, RateTableMetadata,
    RetirementConfig, TaxBracket,
};
