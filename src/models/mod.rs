//! Core data models for the Payroll Deduction Engine.
//!
//! This module contains the input profile and the result types used
//! throughout the engine.

mod payroll_result;
mod tax_profile;

pub use payroll_result::{
    AuditStep, AuditTrace, AuditWarning, BpcRange, BracketDetail, ContributionResult,
    IrpfDetails, PayrollResult, TaxResult,
};
pub use tax_profile::{max_monetary_amount, DeductionFactor, TaxProfile, MAX_CHILDREN};
