//! Tax profile model and related types.
//!
//! This module defines the [`TaxProfile`] struct describing a worker's
//! salary and household, and the [`DeductionFactor`] enum for shared
//! dependent claims.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Largest dependent child count accepted by [`TaxProfile::validate`].
pub const MAX_CHILDREN: u32 = 50;

/// Largest monetary amount accepted by [`TaxProfile::validate`].
///
/// Keeps every product in the calculation well inside `Decimal`'s range.
pub fn max_monetary_amount() -> Decimal {
    Decimal::new(1_000_000_000_000, 0)
}

/// Share of the child deductions a worker may claim.
///
/// When both parents claim the same children each takes half; when only
/// one claims them, that parent takes the full amount. Serialized as the
/// number `0`, `0.5` or `1`.
///
/// # Example
///
/// ```
/// use payroll_engine::models::DeductionFactor;
/// use rust_decimal::Decimal;
///
/// let factor = DeductionFactor::try_from(Decimal::new(5, 1)).unwrap();
/// assert_eq!(factor, DeductionFactor::Half);
/// assert!(DeductionFactor::try_from(Decimal::new(7, 1)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub enum DeductionFactor {
    /// No child deductions are claimed.
    None,
    /// Half of the child deductions are claimed.
    Half,
    /// The full child deductions are claimed.
    Full,
}

impl DeductionFactor {
    /// Returns the multiplier applied to child deductions.
    pub fn multiplier(self) -> Decimal {
        match self {
            DeductionFactor::None => Decimal::ZERO,
            DeductionFactor::Half => Decimal::new(5, 1),
            DeductionFactor::Full => Decimal::ONE,
        }
    }
}

impl From<DeductionFactor> for Decimal {
    fn from(factor: DeductionFactor) -> Self {
        factor.multiplier()
    }
}

impl TryFrom<Decimal> for DeductionFactor {
    type Error = EngineError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        [
            DeductionFactor::None,
            DeductionFactor::Half,
            DeductionFactor::Full,
        ]
        .into_iter()
        .find(|factor| factor.multiplier() == value)
        .ok_or_else(|| EngineError::InvalidProfile {
            field: "deduction_factor".to_string(),
            message: format!("must be 0, 0.5 or 1, got {}", value),
        })
    }
}

/// A worker's salary and household profile for one monthly calculation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxProfile {
    /// Monthly gross salary.
    pub gross_salary: Decimal,
    /// Whether the worker covers children through FONASA.
    pub has_children: bool,
    /// Whether the worker covers a spouse through FONASA.
    pub has_spouse: bool,
    /// Share of the child deductions claimed for IRPF.
    pub deduction_factor: DeductionFactor,
    /// Number of dependent children without a disability.
    pub children_without_disability: u32,
    /// Number of dependent children with a disability.
    pub children_with_disability: u32,
    /// Annual solidarity fund contribution, in BPC.
    pub solidarity_fund_contribution: Decimal,
    /// Whether the additional solidarity fund contribution applies.
    pub additional_solidarity_fund: bool,
    /// Monthly professional fund contribution (CJPPU or Caja Notarial).
    pub professional_fund_contribution: Decimal,
    /// Any other monthly deductible amount.
    pub other_deductions: Decimal,
}

impl TaxProfile {
    /// Creates a profile with the given salary and no dependents or extra
    /// contributions.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{DeductionFactor, TaxProfile};
    /// use rust_decimal::Decimal;
    ///
    /// let profile = TaxProfile::single(Decimal::from(20000));
    /// assert_eq!(profile.deduction_factor, DeductionFactor::Full);
    /// assert_eq!(profile.children_without_disability, 0);
    /// ```
    pub fn single(gross_salary: Decimal) -> Self {
        Self {
            gross_salary,
            has_children: false,
            has_spouse: false,
            deduction_factor: DeductionFactor::Full,
            children_without_disability: 0,
            children_with_disability: 0,
            solidarity_fund_contribution: Decimal::ZERO,
            additional_solidarity_fund: false,
            professional_fund_contribution: Decimal::ZERO,
            other_deductions: Decimal::ZERO,
        }
    }

    /// Rejects negative or oversized monetary amounts and child counts
    /// above [`MAX_CHILDREN`].
    ///
    /// The calculation functions accept any input and let it propagate
    /// arithmetically; callers that need a strict boundary run this first.
    /// The deduction factor is already constrained by its type.
    pub fn validate(&self) -> EngineResult<()> {
        let amounts = [
            ("gross_salary", self.gross_salary),
            (
                "solidarity_fund_contribution",
                self.solidarity_fund_contribution,
            ),
            (
                "professional_fund_contribution",
                self.professional_fund_contribution,
            ),
            ("other_deductions", self.other_deductions),
        ];

        let max_amount = max_monetary_amount();
        for (field, amount) in amounts {
            if amount < Decimal::ZERO {
                return Err(invalid_field(
                    field,
                    format!("must not be negative, got {}", amount),
                ));
            }
            if amount > max_amount {
                return Err(invalid_field(
                    field,
                    format!("must not exceed {}, got {}", max_amount, amount),
                ));
            }
        }

        let counts = [
            ("children_without_disability", self.children_without_disability),
            ("children_with_disability", self.children_with_disability),
        ];
        for (field, count) in counts {
            if count > MAX_CHILDREN {
                return Err(invalid_field(
                    field,
                    format!("must not exceed {}, got {}", MAX_CHILDREN, count),
                ));
            }
        }

        Ok(())
    }
}

fn invalid_field(field: &str, message: String) -> EngineError {
    EngineError::InvalidProfile {
        field: field.to_string(),
        message,
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
    fn test_deserialize_full_profile() {
        let json = r#"{
            "gross_salary": "80000",
            "has_children": true,
            "has_spouse": false,
            "deduction_factor": 1,
            "children_without_disability": 1,
            "children_with_disability": 0,
            "solidarity_fund_contribution": "0",
            "additional_solidarity_fund": false,
            "professional_fund_contribution": "0",
            "other_deductions": "0"
        }"#;

        let profile: TaxProfile = serde_json::from_str(json).unwrap();
        assert_eq!(profile.gross_salary, dec("80000"));
        assert!(profile.has_children);
        assert_eq!(profile.deduction_factor, DeductionFactor::Full);
        assert_eq!(profile.children_without_disability, 1);
    }

    #[test]
    fn test_deserialize_half_deduction_factor() {
        let factor: DeductionFactor = serde_json::from_str("0.5").unwrap();
        assert_eq!(factor, DeductionFactor::Half);
    }

    #[test]
    fn test_deserialize_rejects_unlisted_deduction_factor() {
        let result = serde_json::from_str::<DeductionFactor>("0.75");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("0, 0.5 or 1"));
    }

    #[test]
    fn test_deduction_factor_serializes_as_number_string() {
        let json = serde_json::to_string(&DeductionFactor::Half).unwrap();
        assert_eq!(json, "\"0.5\"");
    }

    #[test]
    fn test_multipliers() {
        assert_eq!(DeductionFactor::None.multiplier(), dec("0"));
        assert_eq!(DeductionFactor::Half.multiplier(), dec("0.5"));
        assert_eq!(DeductionFactor::Full.multiplier(), dec("1"));
    }

    #[test]
    fn test_deduction_factor_accepts_trailing_zeros() {
        assert_eq!(
            DeductionFactor::try_from(dec("1.00")).unwrap(),
            DeductionFactor::Full
        );
    }

    #[test]
    fn test_single_profile_is_valid() {
        assert!(TaxProfile::single(dec("20000")).validate().is_ok());
    }

    #[test]
    fn test_zero_salary_is_valid() {
        assert!(TaxProfile::single(Decimal::ZERO).validate().is_ok());
    }

    #[test]
    fn test_negative_salary_is_rejected() {
        let profile = TaxProfile::single(dec("-1"));

        match profile.validate() {
            Err(EngineError::InvalidProfile { field, message }) => {
                assert_eq!(field, "gross_salary");
                assert!(message.contains("-1"));
            }
            other => panic!("Expected InvalidProfile, got {:?}", other),
        }
    }

    #[test]
    fn test_negative_other_deductions_is_rejected() {
        let mut profile = TaxProfile::single(dec("50000"));
        profile.other_deductions = dec("-100");

        match profile.validate() {
            Err(EngineError::InvalidProfile { field, .. }) => {
                assert_eq!(field, "other_deductions");
            }
            other => panic!("Expected InvalidProfile, got {:?}", other),
        }
    }

    #[test]
    fn test_amount_at_limit_is_valid() {
        let profile = TaxProfile::single(max_monetary_amount());
        assert!(profile.validate().is_ok());
    }

    #[test]
    fn test_oversized_salary_is_rejected() {
        let profile = TaxProfile::single(Decimal::from_i128_with_scale(10i128.pow(28), 0));

        match profile.validate() {
            Err(EngineError::InvalidProfile { field, message }) => {
                assert_eq!(field, "gross_salary");
                assert!(message.contains("must not exceed"));
            }
            other => panic!("Expected InvalidProfile, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_solidarity_fund_is_rejected() {
        let mut profile = TaxProfile::single(dec("50000"));
        profile.solidarity_fund_contribution = Decimal::from_i128_with_scale(10i128.pow(26), 0);

        match profile.validate() {
            Err(EngineError::InvalidProfile { field, .. }) => {
                assert_eq!(field, "solidarity_fund_contribution");
            }
            other => panic!("Expected InvalidProfile, got {:?}", other),
        }
    }

    #[test]
    fn test_too_many_children_is_rejected() {
        let mut profile = TaxProfile::single(dec("50000"));
        profile.children_with_disability = MAX_CHILDREN + 1;

        match profile.validate() {
            Err(EngineError::InvalidProfile { field, .. }) => {
                assert_eq!(field, "children_with_disability");
            }
            other => panic!("Expected InvalidProfile, got {:?}", other),
        }
    }

    #[test]
    fn test_largest_valid_profile_calculates_without_overflow() {
        let profile = TaxProfile {
            gross_salary: max_monetary_amount(),
            has_children: true,
            has_spouse: true,
            deduction_factor: DeductionFactor::Full,
            children_without_disability: MAX_CHILDREN,
            children_with_disability: MAX_CHILDREN,
            solidarity_fund_contribution: max_monetary_amount(),
            additional_solidarity_fund: true,
            professional_fund_contribution: max_monetary_amount(),
            other_deductions: max_monetary_amount(),
        };
        assert!(profile.validate().is_ok());

        let result = crate::calculation::calculate_payroll(
            &profile,
            &crate::config::fixtures::uruguay_2025(),
        );
        assert!(result.irpf_total >= Decimal::ZERO);
    }
}
