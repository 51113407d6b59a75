//! Payroll aggregation.
//!
//! This module chains the contribution and IRPF calculations for a
//! profile and derives the net salary. Intermediate values stay at full
//! precision; rounding to cents happens only when the result is built.

use rust_decimal::{Decimal, RoundingStrategy};
use tracing::debug;

use crate::config::RateTable;
use crate::models::{BracketDetail, IrpfDetails, PayrollResult, TaxProfile};

use super::audit::AuditRecorder;
use super::{IrpfInput, calculate_contributions, calculate_irpf};

/// Number of decimal places monetary values are reported with.
pub const CURRENCY_DECIMAL_PLACES: u32 = 2;

/// Rounds a monetary amount to cents, with midpoints away from zero.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::round_currency;
/// use rust_decimal::Decimal;
///
/// assert_eq!(round_currency(Decimal::new(12345, 3)), Decimal::new(1235, 2));
/// assert_eq!(round_currency(Decimal::new(-12345, 3)), Decimal::new(-1235, 2));
/// ```
pub fn round_currency(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(CURRENCY_DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn round_bracket(detail: BracketDetail) -> BracketDetail {
    BracketDetail {
        from: round_currency(detail.from),
        to: detail.to.map(round_currency),
        applied_amount: round_currency(detail.applied_amount),
        tax: round_currency(detail.tax),
        ..detail
    }
}

/// Calculates contributions, IRPF and net salary for a profile.
///
/// Contributions are computed first because they are deductible for the
/// IRPF. Net salary is the gross salary less the three contributions and
/// the IRPF, all unrounded; every reported amount is then rounded to two
/// decimal places.
///
/// The profile is not validated here. Callers that need to reject
/// negative amounts run [`TaxProfile::validate`] first.
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_payroll;
/// use payroll_engine::config::ConfigLoader;
/// use payroll_engine::models::TaxProfile;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/uy_2025").unwrap();
/// let result = calculate_payroll(&TaxProfile::single(Decimal::from(100)), loader.rate_table());
///
/// assert_eq!(result.net_salary, Decimal::new(8190, 2));
/// ```
pub fn calculate_payroll(profile: &TaxProfile, rates: &RateTable) -> PayrollResult {
    let mut recorder = AuditRecorder::new();

    let contributions = calculate_contributions(
        profile.gross_salary,
        profile.has_children,
        profile.has_spouse,
        rates,
    );
    recorder.record_contributions(
        profile.gross_salary,
        profile.has_children,
        profile.has_spouse,
        &contributions,
        rates,
    );

    let irpf_input = IrpfInput::from_profile(profile, &contributions);
    let tax = calculate_irpf(&irpf_input, rates);
    recorder.record_irpf(&irpf_input, &tax, rates);

    let net_salary = profile.gross_salary
        - contributions.retirement
        - contributions.health
        - contributions.training_fund
        - tax.total;
    recorder.record_net_salary(profile.gross_salary, &contributions, tax.total, net_salary);

    debug!(
        gross_salary = %profile.gross_salary,
        irpf_total = %tax.total,
        net_salary = %net_salary,
        "Payroll calculated"
    );

    PayrollResult {
        gross_salary: profile.gross_salary,
        net_salary: round_currency(net_salary),
        retirement: round_currency(contributions.retirement),
        health: round_currency(contributions.health),
        training_fund: round_currency(contributions.training_fund),
        irpf_details: IrpfDetails {
            brackets: tax.brackets.into_iter().map(round_bracket).collect(),
            deductions: round_currency(tax.deductions),
            deduction_rate: tax.deduction_rate,
        },
        irpf_total: round_currency(tax.total),
        audit_trace: recorder.finish(),
    }
}
