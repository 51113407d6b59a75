//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading a fiscal
//! year's rate table from YAML files.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::error::{EngineError, EngineResult};

use super::types::{PayrollConfig, RateTable, RateTableMetadata};

/// Loads and provides access to a fiscal year's payroll configuration.
///
/// # Directory Structure
///
/// The configuration directory should have the following structure:
/// ```text
/// config/uy_2025/
/// ├── metadata.yaml    # Jurisdiction, fiscal year and source
/// └── rate_table.yaml  # BPC, contribution rates, IRPF brackets
/// ```
///
/// # Example
///
/// ```no_run
/// use payroll_engine::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/uy_2025").unwrap();
/// println!("BPC for {}: {}", loader.metadata().fiscal_year, loader.rate_table().bpc);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config: PayrollConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration directory (e.g., "./config/uy_2025")
    ///
    /// # Returns
    ///
    /// Returns a `ConfigLoader` instance on success, or an error if:
    /// - Any required file is missing
    /// - Any file contains invalid YAML
    /// - The metadata and rate table disagree on the fiscal year
    /// - The rate table violates its invariants
    ///
    /// # Example
    ///
    /// ```no_run
    /// use payroll_engine::config::ConfigLoader;
    ///
    /// let loader = ConfigLoader::load("./config/uy_2025")?;
    /// # Ok::<(), payroll_engine::error::EngineError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<RateTableMetadata>(&path.join("metadata.yaml"))?;
        let rate_table = Self::load_yaml::<RateTable>(&path.join("rate_table.yaml"))?;

        if metadata.fiscal_year != rate_table.fiscal_year {
            return Err(EngineError::InvalidRateTable {
                message: format!(
                    "metadata fiscal year {} does not match rate table fiscal year {}",
                    metadata.fiscal_year, rate_table.fiscal_year
                ),
            });
        }
        rate_table.validate()?;

        debug!(
            path = %path.display(),
            fiscal_year = rate_table.fiscal_year,
            brackets = rate_table.irpf.brackets.len(),
            "Loaded rate table"
        );

        Ok(Self {
            config: PayrollConfig::new(metadata, rate_table),
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the underlying payroll configuration.
    pub fn config(&self) -> &PayrollConfig {
        &self.config
    }

    /// Returns the rate table metadata.
    pub fn metadata(&self) -> &RateTableMetadata {
        self.config.metadata()
    }

    /// Returns the rate table.
    pub fn rate_table(&self) -> &RateTable {
        self.config.rate_table()
    }
}
