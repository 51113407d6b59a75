//! IRPF (personal income tax) calculation.
//!
//! This module computes the progressive income tax on a monthly salary.
//! The sequence matters: the deduction rate is chosen from the salary
//! before the surcharge, while the brackets are applied to the salary
//! after it.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::RateTable;
use crate::models::{
    BpcRange, BracketDetail, ContributionResult, DeductionFactor, TaxProfile, TaxResult,
};

use super::percent_of;

/// Inputs to the IRPF calculation.
///
/// Contributions already withheld are deductible, so the IRPF can only be
/// computed once they are known.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IrpfInput {
    /// Monthly gross salary.
    pub gross_salary: Decimal,
    /// Share of the child deductions claimed.
    pub dependent_factor: DeductionFactor,
    /// Number of children without a disability.
    pub non_disabled_children: u32,
    /// Number of children with a disability.
    pub disabled_children: u32,
    /// Monthly retirement contribution.
    pub retirement: Decimal,
    /// Monthly FONASA contribution.
    pub health: Decimal,
    /// Monthly FRL contribution.
    pub training_fund: Decimal,
    /// Annual solidarity fund contribution, in BPC.
    pub solidarity_fund: Decimal,
    /// Whether the additional solidarity fund contribution applies.
    pub add_solidarity_fund: bool,
    /// Monthly professional fund contribution.
    pub professional_fund: Decimal,
    /// Any other monthly deductible amount.
    pub other_deductions: Decimal,
}

impl IrpfInput {
    /// Builds the IRPF input from a profile and its computed contributions.
    pub fn from_profile(profile: &TaxProfile, contributions: &ContributionResult) -> Self {
        Self {
            gross_salary: profile.gross_salary,
            dependent_factor: profile.deduction_factor,
            non_disabled_children: profile.children_without_disability,
            disabled_children: profile.children_with_disability,
            retirement: contributions.retirement,
            health: contributions.health,
            training_fund: contributions.training_fund,
            solidarity_fund: profile.solidarity_fund_contribution,
            add_solidarity_fund: profile.additional_solidarity_fund,
            professional_fund: profile.professional_fund_contribution,
            other_deductions: profile.other_deductions,
        }
    }
}

/// Calculates the monthly IRPF.
///
/// 1. The deduction rate is chosen from the salary in BPC (lower rate above
///    the threshold).
/// 2. Above the surcharge threshold the taxable income is increased by the
///    surcharge percentage. Step 1 still sees the gross salary.
/// 3. Deductions are aggregated: child deductions scaled by the dependent
///    factor, contributions, solidarity fund (annual BPC to monthly
///    currency), the optional additional solidarity amount, professional
///    fund and other deductions.
/// 4. Each bracket taxes the portion of the taxable income within its
///    bounds, independently of the others.
/// 5. The total is the bracket sum less deductions times the deduction
///    rate, floored at zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::{calculate_irpf, IrpfInput};
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::DeductionFactor;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/uy_2025").unwrap();
/// let input = IrpfInput {
///     gross_salary: Decimal::from(80000),
///     dependent_factor: DeductionFactor::Full,
///     non_disabled_children: 1,
///     disabled_children: 0,
///     retirement: Decimal::from(12000),
///     health: Decimal::from(3600),
///     training_fund: Decimal::from(80),
///     solidarity_fund: Decimal::ZERO,
///     add_solidarity_fund: false,
///     professional_fund: Decimal::ZERO,
///     other_deductions: Decimal::ZERO,
/// };
///
/// let result = calculate_irpf(&input, loader.rate_table());
/// assert_eq!(result.deductions, Decimal::from(26640));
/// assert_eq!(result.total, Decimal::new(10992, 1));
/// ```
pub fn calculate_irpf(input: &IrpfInput, rates: &RateTable) -> TaxResult {
    let salary_in_bpc = rates.to_bpc(input.gross_salary);
    let deduction_rate = rates.irpf.deduction_rate_for(salary_in_bpc);

    let surcharge_applied = salary_in_bpc > rates.irpf.surcharge_threshold_bpc;
    let taxable_income = if surcharge_applied {
        input.gross_salary * (Decimal::ONE + percent_of(Decimal::ONE, rates.irpf.surcharge_rate))
    } else {
        input.gross_salary
    };

    let deductions = total_deductions(input, rates);
    let brackets = bracket_details(taxable_income, rates);

    let bracket_tax_total: Decimal = brackets.iter().map(|b| b.tax).sum();
    let deduction_credit = percent_of(deductions, deduction_rate);
    let total = (bracket_tax_total - deduction_credit).max(Decimal::ZERO);

    TaxResult {
        brackets,
        deductions,
        deduction_rate,
        taxable_income,
        surcharge_applied,
        bracket_tax_total,
        deduction_credit,
        total,
    }
}

/// Aggregates every deductible amount for the month.
fn total_deductions(input: &IrpfInput, rates: &RateTable) -> Decimal {
    let child_deductions = input.dependent_factor.multiplier()
        * (Decimal::from(input.non_disabled_children) * rates.child_deduction()
            + Decimal::from(input.disabled_children) * rates.disabled_child_deduction());

    let additional_solidarity = if input.add_solidarity_fund {
        rates.additional_solidarity_contribution()
    } else {
        Decimal::ZERO
    };

    child_deductions
        + input.retirement
        + input.health
        + input.training_fund
        + rates.monthly_from_annual_bpc(input.solidarity_fund)
        + additional_solidarity
        + input.professional_fund
        + input.other_deductions
}

/// Applies every configured bracket to the taxable income.
fn bracket_details(taxable_income: Decimal, rates: &RateTable) -> Vec<BracketDetail> {
    rates
        .irpf
        .brackets
        .iter()
        .map(|bracket| {
            let from = bracket.from * rates.bpc;
            let to = bracket.to.map(|to| to * rates.bpc);
            let ceiling = to.map_or(taxable_income, |to| to.min(taxable_income));
            let applied_amount = (ceiling - from).max(Decimal::ZERO);

            BracketDetail {
                range_in_bpc: BpcRange {
                    from: bracket.from,
                    to: bracket.to,
                },
                from,
                to,
                applied_amount,
                rate: bracket.rate,
                tax: percent_of(applied_amount, bracket.rate),
            }
        })
        .collect()
}
