//! Calculation result models for the Payroll Deduction Engine.
//!
//! This module contains the result types produced by each calculation
//! stage: [`ContributionResult`], [`TaxResult`] and the final
//! [`PayrollResult`], plus the audit trace recorded along the way.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Social security contributions for one month.
///
/// All amounts are unrounded; rounding happens when the payroll result is
/// assembled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionResult {
    /// Retirement contribution.
    pub retirement: Decimal,
    /// FONASA health insurance contribution.
    pub health: Decimal,
    /// FRL training fund contribution.
    pub training_fund: Decimal,
    /// The FONASA rate applied, in percent.
    pub health_rate: Decimal,
    /// Whether the salary exceeded the retirement contribution cap.
    pub retirement_capped: bool,
}

/// Bracket bounds expressed in BPC.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BpcRange {
    /// Lower bound in BPC (inclusive).
    pub from: Decimal,
    /// Upper bound in BPC (exclusive), `None` for the open bracket.
    pub to: Option<Decimal>,
}

/// The tax computed within a single IRPF bracket.
///
/// # Example
///
/// ```
/// use payroll_engine::models::{BpcRange, BracketDetail};
/// use rust_decimal::Decimal;
///
/// let detail = BracketDetail {
///     range_in_bpc: BpcRange { from: Decimal::from(7), to: Some(Decimal::from(10)) },
///     from: Decimal::from(46032),
///     to: Some(Decimal::from(65760)),
///     applied_amount: Decimal::from(19728),
///     rate: Decimal::from(10),
///     tax: Decimal::new(19728, 1),
/// };
/// assert_eq!(detail.tax.to_string(), "1972.8");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketDetail {
    /// Bracket bounds in BPC.
    pub range_in_bpc: BpcRange,
    /// Lower bound in currency.
    pub from: Decimal,
    /// Upper bound in currency, `None` for the open bracket.
    pub to: Option<Decimal>,
    /// Portion of the taxable income falling within this bracket.
    pub applied_amount: Decimal,
    /// Bracket rate in percent.
    pub rate: Decimal,
    /// Tax owed within this bracket.
    pub tax: Decimal,
}

/// The result of an IRPF calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// One entry per configured bracket, in bracket order.
    pub brackets: Vec<BracketDetail>,
    /// Total deductible amount.
    pub deductions: Decimal,
    /// Rate (percent) at which deductions reduce the tax.
    pub deduction_rate: Decimal,
    /// Income used for bracket application (after any surcharge).
    pub taxable_income: Decimal,
    /// Whether the taxable income surcharge was applied.
    pub surcharge_applied: bool,
    /// Sum of all bracket taxes before deductions.
    pub bracket_tax_total: Decimal,
    /// Amount by which deductions reduce the tax.
    pub deduction_credit: Decimal,
    /// Final IRPF owed, never negative.
    pub total: Decimal,
}

/// The IRPF breakdown reported in a [`PayrollResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrpfDetails {
    /// One entry per configured bracket, in bracket order.
    pub brackets: Vec<BracketDetail>,
    /// Total deductible amount.
    pub deductions: Decimal,
    /// Rate (percent) at which deductions reduce the tax.
    pub deduction_rate: Decimal,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Amounts in `input`, `output` and `reasoning` are the unrounded values
/// the calculation worked with, not the cent-rounded figures reported on
/// [`PayrollResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Reference to the law establishing this rule, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub legal_ref: Option<String>,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during calculation.
///
/// Warnings flag clamps that changed a value without being errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a calculation.
///
/// Steps carry full-precision amounts so the trace can be replayed
/// exactly; rounding only applies to the result's monetary fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during calculation.
    pub warnings: Vec<AuditWarning>,
}

/// The complete result of a payroll calculation.
///
/// Monetary fields are rounded to two decimal places; rates are reported
/// as configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayrollResult {
    /// Monthly gross salary.
    pub gross_salary: Decimal,
    /// Salary after contributions and IRPF.
    pub net_salary: Decimal,
    /// Retirement contribution.
    pub retirement: Decimal,
    /// FONASA health insurance contribution.
    pub health: Decimal,
    /// FRL training fund contribution.
    pub training_fund: Decimal,
    /// IRPF breakdown.
    pub irpf_details: IrpfDetails,
    /// IRPF owed.
    pub irpf_total: Decimal,
    /// Audit trace of calculation decisions.
    pub audit_trace: AuditTrace,
}

impl PayrollResult {
    /// Sum of all amounts withheld from the gross salary.
    pub fn total_withheld(&self) -> Decimal {
        self.retirement + self.health + self.training_fund + self.irpf_total
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_sample_result() -> PayrollResult {
        PayrollResult {
            gross_salary: dec("20000"),
            net_salary: dec("16080"),
            retirement: dec("3000"),
            health: dec("900"),
            training_fund: dec("20"),
            irpf_details: IrpfDetails {
                brackets: vec![BracketDetail {
                    range_in_bpc: BpcRange {
                        from: dec("0"),
                        to: Some(dec("7")),
                    },
                    from: dec("0"),
                    to: Some(dec("46032")),
                    applied_amount: dec("20000"),
                    rate: dec("0"),
                    tax: dec("0"),
                }],
                deductions: dec("3920"),
                deduction_rate: dec("14"),
            },
            irpf_total: dec("0"),
            audit_trace: AuditTrace::default(),
        }
    }

    #[test]
    fn test_total_withheld_sums_contributions_and_irpf() {
        let result = create_sample_result();
        assert_eq!(result.total_withheld(), dec("3920"));
        assert_eq!(result.gross_salary - result.total_withheld(), result.net_salary);
    }

    #[test]
    fn test_serializes_monetary_values_as_strings() {
        let result = create_sample_result();
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["net_salary"].as_str().unwrap(), "16080");
        assert_eq!(
            json["irpf_details"]["brackets"][0]["range_in_bpc"]["to"]
                .as_str()
                .unwrap(),
            "7"
        );
    }

    #[test]
    fn test_open_bracket_serializes_null_upper_bound() {
        let detail = BracketDetail {
            range_in_bpc: BpcRange {
                from: dec("115"),
                to: None,
            },
            from: dec("756240"),
            to: None,
            applied_amount: dec("0"),
            rate: dec("36"),
            tax: dec("0"),
        };
        let json = serde_json::to_value(&detail).unwrap();

        assert!(json["to"].is_null());
        assert!(json["range_in_bpc"]["to"].is_null());
    }

    #[test]
    fn test_round_trip_preserves_audit_trace() {
        let mut result = create_sample_result();
        result.audit_trace.warnings.push(AuditWarning {
            code: "RETIREMENT_CAP_APPLIED".to_string(),
            message: "capped".to_string(),
            severity: "low".to_string(),
        });

        let json = serde_json::to_string(&result).unwrap();
        let parsed: PayrollResult = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, result);
    }
}
