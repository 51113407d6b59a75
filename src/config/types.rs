//! Configuration types for payroll deduction calculation.
//!
//! This module contains the strongly-typed rate table structures that
//! are deserialized from YAML configuration files. A [`RateTable`] holds
//! every rate, threshold and bracket for a single fiscal year.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Months per year, used to turn annual BPC amounts into monthly currency.
fn months_per_year() -> Decimal {
    Decimal::new(12, 0)
}

/// Metadata describing where a rate table comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTableMetadata {
    /// The jurisdiction code (e.g., "UY").
    pub jurisdiction: String,
    /// The human-readable name of the rate table.
    pub name: String,
    /// The fiscal year the rates apply to.
    pub fiscal_year: i32,
    /// URL to the official publication of the rates.
    pub source_url: String,
}

/// A single progressive IRPF bracket.
///
/// Bounds are expressed in BPC multiples. `from` is inclusive, `to` is
/// exclusive, and the last bracket has no upper bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    /// Lower bound in BPC.
    pub from: Decimal,
    /// Upper bound in BPC, `None` for the open-ended bracket.
    #[serde(default)]
    pub to: Option<Decimal>,
    /// Marginal tax rate in percent.
    pub rate: Decimal,
}

/// FONASA rate set (percentages) for one income band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRates {
    /// Base rate paid by every worker in this band.
    pub base: Decimal,
    /// Surcharge when the worker covers a spouse.
    pub spouse: Decimal,
    /// Surcharge when the worker covers children.
    pub children: Decimal,
}

/// FONASA configuration keyed by an income threshold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FonasaConfig {
    /// Income threshold in BPC separating the two rate sets.
    pub threshold_bpc: Decimal,
    /// Rates for income at or below the threshold.
    pub at_or_below_threshold: HealthRates,
    /// Rates for income above the threshold.
    pub above_threshold: HealthRates,
}

impl FonasaConfig {
    /// Selects the rate set for a salary expressed in BPC.
    pub fn rates_for(&self, salary_in_bpc: Decimal) -> &HealthRates {
        if salary_in_bpc > self.threshold_bpc {
            &self.above_threshold
        } else {
            &self.at_or_below_threshold
        }
    }
}

/// Retirement contribution configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetirementConfig {
    /// Contribution rate in percent.
    pub rate: Decimal,
    /// Maximum monthly salary subject to the contribution.
    pub cap: Decimal,
}

/// IRPF configuration: brackets, surcharge and deduction parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrpfConfig {
    /// Progressive brackets, sorted ascending.
    pub brackets: Vec<TaxBracket>,
    /// Income in BPC above which the taxable income surcharge applies.
    pub surcharge_threshold_bpc: Decimal,
    /// Surcharge applied to taxable income, in percent.
    pub surcharge_rate: Decimal,
    /// Income in BPC above which the lower deduction rate applies.
    pub deduction_rate_threshold_bpc: Decimal,
    /// Deduction rate (percent) for income at or below the threshold.
    pub deduction_rate_at_or_below_threshold: Decimal,
    /// Deduction rate (percent) for income above the threshold.
    pub deduction_rate_above_threshold: Decimal,
    /// Annual deduction per child without a disability, in BPC.
    pub child_deduction_bpc: Decimal,
    /// Annual deduction per child with a disability, in BPC.
    pub disabled_child_deduction_bpc: Decimal,
    /// Annual additional solidarity fund contribution, in BPC.
    pub additional_solidarity_bpc: Decimal,
}

impl IrpfConfig {
    /// Selects the deduction rate for a (pre-surcharge) salary in BPC.
    pub fn deduction_rate_for(&self, salary_in_bpc: Decimal) -> Decimal {
        if salary_in_bpc > self.deduction_rate_threshold_bpc {
            self.deduction_rate_above_threshold
        } else {
            self.deduction_rate_at_or_below_threshold
        }
    }
}

/// The complete set of rates for one fiscal year.
///
/// The table is immutable once loaded; swapping fiscal years means loading
/// a different table, never changing calculation code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateTable {
    /// The fiscal year these rates apply to.
    pub fiscal_year: i32,
    /// Value of one BPC in currency.
    pub bpc: Decimal,
    /// Retirement contribution rates.
    pub retirement: RetirementConfig,
    /// FONASA health insurance rates.
    pub fonasa: FonasaConfig,
    /// FRL training fund rate in percent.
    pub frl_rate: Decimal,
    /// IRPF parameters.
    pub irpf: IrpfConfig,
}

impl RateTable {
    /// Expresses a currency amount as a multiple of the BPC.
    pub fn to_bpc(&self, amount: Decimal) -> Decimal {
        amount / self.bpc
    }

    /// Converts an annual amount in BPC into a monthly currency amount.
    ///
    /// # Example
    ///
    /// ```
    /// # use payroll_engine::config::ConfigLoader;
    /// # use rust_decimal::Decimal;
    /// # let loader = ConfigLoader::load("./config/uy_2025").unwrap();
    /// let rates = loader.rate_table();
    /// assert_eq!(rates.monthly_from_annual_bpc(Decimal::from(20)), Decimal::from(10960));
    /// ```
    pub fn monthly_from_annual_bpc(&self, bpc_count: Decimal) -> Decimal {
        bpc_count * self.bpc / months_per_year()
    }

    /// Monthly deduction per child without a disability.
    pub fn child_deduction(&self) -> Decimal {
        self.monthly_from_annual_bpc(self.irpf.child_deduction_bpc)
    }

    /// Monthly deduction per child with a disability.
    pub fn disabled_child_deduction(&self) -> Decimal {
        self.monthly_from_annual_bpc(self.irpf.disabled_child_deduction_bpc)
    }

    /// Monthly additional solidarity fund contribution.
    pub fn additional_solidarity_contribution(&self) -> Decimal {
        self.monthly_from_annual_bpc(self.irpf.additional_solidarity_bpc)
    }

    /// Checks the structural invariants of the table.
    ///
    /// The BPC must be positive, every rate, threshold and deduction
    /// non-negative, and the brackets must
    /// start at 0, be contiguous and ascending, with only the last one
    /// open-ended.
    pub fn validate(&self) -> EngineResult<()> {
        if self.bpc <= Decimal::ZERO {
            return Err(invalid(format!("BPC must be positive, got {}", self.bpc)));
        }

        let rates = [
            ("retirement.rate", self.retirement.rate),
            ("retirement.cap", self.retirement.cap),
            ("fonasa.threshold_bpc", self.fonasa.threshold_bpc),
            (
                "fonasa.at_or_below_threshold.base",
                self.fonasa.at_or_below_threshold.base,
            ),
            (
                "fonasa.at_or_below_threshold.spouse",
                self.fonasa.at_or_below_threshold.spouse,
            ),
            (
                "fonasa.at_or_below_threshold.children",
                self.fonasa.at_or_below_threshold.children,
            ),
            ("fonasa.above_threshold.base", self.fonasa.above_threshold.base),
            ("fonasa.above_threshold.spouse", self.fonasa.above_threshold.spouse),
            (
                "fonasa.above_threshold.children",
                self.fonasa.above_threshold.children,
            ),
            ("frl_rate", self.frl_rate),
            ("irpf.surcharge_threshold_bpc", self.irpf.surcharge_threshold_bpc),
            ("irpf.surcharge_rate", self.irpf.surcharge_rate),
            (
                "irpf.deduction_rate_threshold_bpc",
                self.irpf.deduction_rate_threshold_bpc,
            ),
            (
                "irpf.deduction_rate_at_or_below_threshold",
                self.irpf.deduction_rate_at_or_below_threshold,
            ),
            (
                "irpf.deduction_rate_above_threshold",
                self.irpf.deduction_rate_above_threshold,
            ),
            ("irpf.child_deduction_bpc", self.irpf.child_deduction_bpc),
            (
                "irpf.disabled_child_deduction_bpc",
                self.irpf.disabled_child_deduction_bpc,
            ),
            (
                "irpf.additional_solidarity_bpc",
                self.irpf.additional_solidarity_bpc,
            ),
        ];
        if let Some((name, value)) = rates.iter().find(|(_, v)| *v < Decimal::ZERO) {
            return Err(invalid(format!("{} must not be negative, got {}", name, value)));
        }

        let brackets = &self.irpf.brackets;
        let Some(first) = brackets.first() else {
            return Err(invalid("at least one IRPF bracket is required".to_string()));
        };
        if !first.from.is_zero() {
            return Err(invalid(format!(
                "first bracket must start at 0, got {}",
                first.from
            )));
        }

        let last_index = brackets.len() - 1;
        for (index, bracket) in brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO {
                return Err(invalid(format!("bracket {} has a negative rate", index)));
            }
            match bracket.to {
                Some(to) if to <= bracket.from => {
                    return Err(invalid(format!(
                        "bracket {} upper bound {} is not above its lower bound {}",
                        index, to, bracket.from
                    )));
                }
                Some(_) if index == last_index => {
                    return Err(invalid("last bracket must be open-ended".to_string()));
                }
                None if index != last_index => {
                    return Err(invalid(format!(
                        "only the last bracket may be open-ended, bracket {} is not last",
                        index
                    )));
                }
                _ => {}
            }
            if let Some(next) = brackets.get(index + 1) {
                if bracket.to != Some(next.from) {
                    return Err(invalid(format!(
                        "brackets {} and {} are not contiguous",
                        index,
                        index + 1
                    )));
                }
            }
        }

        Ok(())
    }
}

fn invalid(message: String) -> EngineError {
    EngineError::InvalidRateTable { message }
}

/// The complete payroll configuration: metadata plus the rate table.
#[derive(Debug, Clone)]
pub struct PayrollConfig {
    metadata: RateTableMetadata,
    rate_table: RateTable,
}

impl PayrollConfig {
    /// Creates a new PayrollConfig from its component parts.
    pub fn new(metadata: RateTableMetadata, rate_table: RateTable) -> Self {
        Self {
            metadata,
            rate_table,
        }
    }

    /// Returns the rate table metadata.
    pub fn metadata(&self) -> &RateTableMetadata {
        &self.metadata
    }

    /// Returns the rate table.
    pub fn rate_table(&self) -> &RateTable {
        &self.rate_table
    }
}
