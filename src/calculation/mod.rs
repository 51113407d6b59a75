//! Calculation logic for the Payroll Deduction Engine.
//!
//! This module contains the social security contribution calculation,
//! the IRPF calculation and the payroll aggregation that chains them,
//! along with the audit trace built for each payroll.

mod audit;
mod contributions;
mod irpf;
mod payroll;

use rust_decimal::Decimal;

pub use contributions::calculate_contributions;
pub use irpf::{IrpfInput, calculate_irpf};
pub use payroll::{CURRENCY_DECIMAL_PLACES, calculate_payroll, round_currency};

/// Returns `rate` percent of `amount`.
pub(crate) fn percent_of(amount: Decimal, rate: Decimal) -> Decimal {
    amount * rate / Decimal::ONE_HUNDRED
}
