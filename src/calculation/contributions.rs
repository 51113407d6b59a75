//! Social security contribution calculation.
//!
//! This module computes the three payroll contributions withheld by BPS:
//! retirement (capped), FONASA health insurance (rate depends on income
//! band and dependents) and the FRL training fund (flat, uncapped).

use rust_decimal::Decimal;

use crate::config::RateTable;
use crate::models::ContributionResult;

use super::percent_of;

/// Calculates retirement, FONASA and FRL contributions for a monthly salary.
///
/// The salary is first expressed in BPC to select the FONASA rate set:
/// above the threshold (2.5 BPC in 2025) the higher base rate and the
/// children surcharge apply. Retirement is computed on the salary capped
/// at the configured ceiling; a salary exactly at the cap yields the
/// capped value.
///
/// No input is rejected. A zero salary yields zero contributions and a
/// negative salary propagates arithmetically.
///
/// # Arguments
///
/// * `gross_salary` - Monthly gross salary
/// * `has_children` - Whether the worker covers children through FONASA
/// * `has_spouse` - Whether the worker covers a spouse through FONASA
/// * `rates` - The fiscal year's rate table
///
/// # Examples
///
/// ```
/// use payroll_engine::calculation::calculate_contributions;
/// use payroll_engine::config::ConfigLoader;
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/uy_2025").unwrap();
/// let result = calculate_contributions(Decimal::from(20000), false, false, loader.rate_table());
///
/// assert_eq!(result.retirement, Decimal::from(3000));
/// assert_eq!(result.health, Decimal::from(900));
/// assert_eq!(result.training_fund, Decimal::from(20));
/// ```
pub fn calculate_contributions(
    gross_salary: Decimal,
    has_children: bool,
    has_spouse: bool,
    rates: &RateTable,
) -> ContributionResult {
    let salary_in_bpc = rates.to_bpc(gross_salary);
    let health_rates = rates.fonasa.rates_for(salary_in_bpc);

    let mut health_rate = health_rates.base;
    if has_children {
        health_rate += health_rates.children;
    }
    if has_spouse {
        health_rate += health_rates.spouse;
    }

    let retirement_base = gross_salary.min(rates.retirement.cap);

    ContributionResult {
        retirement: percent_of(retirement_base, rates.retirement.rate),
        health: percent_of(gross_salary, health_rate),
        training_fund: percent_of(gross_salary, rates.frl_rate),
        health_rate,
        retirement_capped: gross_salary > rates.retirement.cap,
    }
}
