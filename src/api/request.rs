//! Request types for the Payroll Deduction Engine API.
//!
//! This module defines the JSON request structure for the `/calculate`
//! endpoint. Only the salary and the deduction factor are required; every
//! other field defaults to "not applicable".

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::{DeductionFactor, TaxProfile};

/// Request body for the `/calculate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalculationRequest {
    /// Caller-supplied reference echoed back in the response.
    #[serde(default)]
    pub reference: Option<String>,
    /// Monthly gross salary.
    pub gross_salary: Decimal,
    /// Whether the worker covers children through FONASA.
    #[serde(default)]
    pub has_children: bool,
    /// Whether the worker covers a spouse through FONASA.
    #[serde(default)]
    pub has_spouse: bool,
    /// Share of the child deductions claimed (0, 0.5 or 1).
    pub deduction_factor: DeductionFactor,
    /// Number of dependent children without a disability.
    #[serde(default)]
    pub children_without_disability: u32,
    /// Number of dependent children with a disability.
    #[serde(default)]
    pub children_with_disability: u32,
    /// Annual solidarity fund contribution, in BPC.
    #[serde(default)]
    pub solidarity_fund_contribution: Decimal,
    /// Whether the additional solidarity fund contribution applies.
    #[serde(default)]
    pub additional_solidarity_fund: bool,
    /// Monthly professional fund contribution.
    #[serde(default)]
    pub professional_fund_contribution: Decimal,
    /// Any other monthly deductible amount.
    #[serde(default)]
    pub other_deductions: Decimal,
}

impl From<CalculationRequest> for TaxProfile {
    fn from(req: CalculationRequest) -> Self {
        TaxProfile {
            gross_salary: req.gross_salary,
            has_children: req.has_children,
            has_spouse: req.has_spouse,
            deduction_factor: req.deduction_factor,
            children_without_disability: req.children_without_disability,
            children_with_disability: req.children_with_disability,
            solidarity_fund_contribution: req.solidarity_fund_contribution,
            additional_solidarity_fund: req.additional_solidarity_fund,
            professional_fund_contribution: req.professional_fund_contribution,
            other_deductions: req.other_deductions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_minimal_request_uses_defaults() {
        let json = r#"{ "gross_salary": 20000, "deduction_factor": 1 }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        let profile: TaxProfile = request.into();

        assert_eq!(profile, TaxProfile::single(dec("20000")));
    }

    #[test]
    fn test_full_request_converts_to_profile() {
        let json = r#"{
            "reference": "payslip-2025-03",
            "gross_salary": "80000",
            "has_children": true,
            "has_spouse": true,
            "deduction_factor": 0.5,
            "children_without_disability": 2,
            "children_with_disability": 1,
            "solidarity_fund_contribution": "1.5",
            "additional_solidarity_fund": true,
            "professional_fund_contribution": "1200",
            "other_deductions": "300"
        }"#;

        let request: CalculationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.reference.as_deref(), Some("payslip-2025-03"));

        let profile: TaxProfile = request.into();
        assert_eq!(profile.deduction_factor, DeductionFactor::Half);
        assert_eq!(profile.children_without_disability, 2);
        assert_eq!(profile.children_with_disability, 1);
        assert_eq!(profile.solidarity_fund_contribution, dec("1.5"));
        assert!(profile.additional_solidarity_fund);
        assert_eq!(profile.professional_fund_contribution, dec("1200"));
        assert_eq!(profile.other_deductions, dec("300"));
    }

    #[test]
    fn test_missing_gross_salary_is_rejected() {
        let json = r#"{ "deduction_factor": 1 }"#;

        let err = serde_json::from_str::<CalculationRequest>(json).unwrap_err();
        assert!(err.to_string().contains("missing field `gross_salary`"));
    }

    #[test]
    fn test_negative_child_count_is_rejected() {
        let json = r#"{ "gross_salary": 1000, "deduction_factor": 1, "children_with_disability": -1 }"#;

        assert!(serde_json::from_str::<CalculationRequest>(json).is_err());
    }
}
