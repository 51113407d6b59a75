//! Audit trace construction.
//!
//! Each payroll records one step per rule applied, with the inputs it saw,
//! the outputs it produced and a one-line explanation.

use rust_decimal::Decimal;
use serde_json::json;

use crate::config::RateTable;
use crate::models::{AuditStep, AuditTrace, AuditWarning, ContributionResult, TaxResult};

use super::irpf::IrpfInput;

/// Legal reference for retirement contributions.
pub(crate) const RETIREMENT_LEGAL_REF: &str = "Ley 16.713";

/// Legal reference for FONASA contributions.
pub(crate) const FONASA_LEGAL_REF: &str = "Ley 18.211";

/// Legal reference for the FRL training fund.
pub(crate) const FRL_LEGAL_REF: &str = "Ley 18.406";

/// Legal reference for the IRPF.
pub(crate) const IRPF_LEGAL_REF: &str = "Ley 18.083";

fn amount(value: Decimal) -> String {
    value.normalize().to_string()
}

/// Accumulates audit steps and warnings with sequential step numbers.
#[derive(Debug, Default)]
pub(crate) struct AuditRecorder {
    trace: AuditTrace,
}

impl AuditRecorder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    fn record(
        &mut self,
        rule_id: &str,
        rule_name: &str,
        legal_ref: Option<&str>,
        input: serde_json::Value,
        output: serde_json::Value,
        reasoning: String,
    ) {
        let step_number = self.trace.steps.len() as u32 + 1;
        self.trace.steps.push(AuditStep {
            step_number,
            rule_id: rule_id.to_string(),
            rule_name: rule_name.to_string(),
            legal_ref: legal_ref.map(str::to_string),
            input,
            output,
            reasoning,
        });
    }

    fn warn(&mut self, code: &str, message: String) {
        self.trace.warnings.push(AuditWarning {
            code: code.to_string(),
            message,
            severity: "low".to_string(),
        });
    }

    pub(crate) fn record_contributions(
        &mut self,
        gross_salary: Decimal,
        has_children: bool,
        has_spouse: bool,
        contributions: &ContributionResult,
        rates: &RateTable,
    ) {
        let cap = rates.retirement.cap;
        let retirement_base = gross_salary.min(cap);
        self.record(
            "retirement_contribution",
            "Retirement Contribution",
            Some(RETIREMENT_LEGAL_REF),
            json!({
                "gross_salary": amount(gross_salary),
                "cap": amount(cap),
                "rate": amount(rates.retirement.rate)
            }),
            json!({
                "retirement": amount(contributions.retirement),
                "capped": contributions.retirement_capped
            }),
            format!(
                "${} x {}% = ${}",
                amount(retirement_base),
                amount(rates.retirement.rate),
                amount(contributions.retirement)
            ),
        );
        if contributions.retirement_capped {
            self.warn(
                "RETIREMENT_CAP_APPLIED",
                format!(
                    "Salary ${} exceeds the retirement cap ${}; contribution computed on the cap",
                    amount(gross_salary),
                    amount(cap)
                ),
            );
        }

        let salary_in_bpc = rates.to_bpc(gross_salary);
        let band = if salary_in_bpc > rates.fonasa.threshold_bpc {
            "above"
        } else {
            "at or below"
        };
        self.record(
            "fonasa_contribution",
            "FONASA Health Insurance",
            Some(FONASA_LEGAL_REF),
            json!({
                "gross_salary": amount(gross_salary),
                "salary_in_bpc": amount(salary_in_bpc.round_dp(4)),
                "has_children": has_children,
                "has_spouse": has_spouse
            }),
            json!({
                "health_rate": amount(contributions.health_rate),
                "health": amount(contributions.health)
            }),
            format!(
                "Income {} {} BPC: ${} x {}% = ${}",
                band,
                amount(rates.fonasa.threshold_bpc),
                amount(gross_salary),
                amount(contributions.health_rate),
                amount(contributions.health)
            ),
        );

        self.record(
            "frl_contribution",
            "FRL Training Fund",
            Some(FRL_LEGAL_REF),
            json!({
                "gross_salary": amount(gross_salary),
                "rate": amount(rates.frl_rate)
            }),
            json!({ "training_fund": amount(contributions.training_fund) }),
            format!(
                "${} x {}% = ${}",
                amount(gross_salary),
                amount(rates.frl_rate),
                amount(contributions.training_fund)
            ),
        );
    }

    pub(crate) fn record_irpf(&mut self, input: &IrpfInput, tax: &TaxResult, rates: &RateTable) {
        let salary_in_bpc = rates.to_bpc(input.gross_salary);

        self.record(
            "irpf_deduction_rate",
            "IRPF Deduction Rate",
            Some(IRPF_LEGAL_REF),
            json!({
                "salary_in_bpc": amount(salary_in_bpc.round_dp(4)),
                "threshold_bpc": amount(rates.irpf.deduction_rate_threshold_bpc)
            }),
            json!({ "deduction_rate": amount(tax.deduction_rate) }),
            format!(
                "Income of {} BPC uses a {}% deduction rate",
                amount(salary_in_bpc.round_dp(2)),
                amount(tax.deduction_rate)
            ),
        );

        let surcharge_reasoning = if tax.surcharge_applied {
            format!(
                "Income above {} BPC: ${} + {}% = ${}",
                amount(rates.irpf.surcharge_threshold_bpc),
                amount(input.gross_salary),
                amount(rates.irpf.surcharge_rate),
                amount(tax.taxable_income)
            )
        } else {
            format!(
                "Income at or below {} BPC: no surcharge",
                amount(rates.irpf.surcharge_threshold_bpc)
            )
        };
        self.record(
            "irpf_taxable_income",
            "IRPF Taxable Income",
            Some(IRPF_LEGAL_REF),
            json!({
                "gross_salary": amount(input.gross_salary),
                "surcharge_rate": amount(rates.irpf.surcharge_rate)
            }),
            json!({
                "taxable_income": amount(tax.taxable_income),
                "surcharge_applied": tax.surcharge_applied
            }),
            surcharge_reasoning,
        );

        self.record(
            "irpf_deductions",
            "IRPF Deductions",
            Some(IRPF_LEGAL_REF),
            json!({
                "dependent_factor": amount(input.dependent_factor.multiplier()),
                "non_disabled_children": input.non_disabled_children,
                "disabled_children": input.disabled_children,
                "retirement": amount(input.retirement),
                "health": amount(input.health),
                "training_fund": amount(input.training_fund),
                "solidarity_fund_bpc": amount(input.solidarity_fund),
                "add_solidarity_fund": input.add_solidarity_fund,
                "professional_fund": amount(input.professional_fund),
                "other_deductions": amount(input.other_deductions)
            }),
            json!({
                "deductions": amount(tax.deductions),
                "deduction_credit": amount(tax.deduction_credit)
            }),
            format!(
                "${} deductions x {}% = ${} credit",
                amount(tax.deductions),
                amount(tax.deduction_rate),
                amount(tax.deduction_credit)
            ),
        );

        let bracket_taxes: Vec<String> = tax.brackets.iter().map(|b| amount(b.tax)).collect();
        self.record(
            "irpf_brackets",
            "IRPF Progressive Brackets",
            Some(IRPF_LEGAL_REF),
            json!({
                "taxable_income": amount(tax.taxable_income),
                "bracket_count": tax.brackets.len()
            }),
            json!({
                "bracket_taxes": bracket_taxes,
                "bracket_tax_total": amount(tax.bracket_tax_total)
            }),
            format!(
                "{} brackets applied to ${}: total ${}",
                tax.brackets.len(),
                amount(tax.taxable_income),
                amount(tax.bracket_tax_total)
            ),
        );

        self.record(
            "irpf_total",
            "IRPF Total",
            Some(IRPF_LEGAL_REF),
            json!({
                "bracket_tax_total": amount(tax.bracket_tax_total),
                "deduction_credit": amount(tax.deduction_credit)
            }),
            json!({ "irpf_total": amount(tax.total) }),
            format!(
                "max(0, ${} - ${}) = ${}",
                amount(tax.bracket_tax_total),
                amount(tax.deduction_credit),
                amount(tax.total)
            ),
        );
        if tax.bracket_tax_total > Decimal::ZERO && tax.deduction_credit > tax.bracket_tax_total {
            self.warn(
                "IRPF_FLOORED_AT_ZERO",
                format!(
                    "Deduction credit ${} exceeds bracket tax ${}; IRPF set to zero",
                    amount(tax.deduction_credit),
                    amount(tax.bracket_tax_total)
                ),
            );
        }
    }

    pub(crate) fn record_net_salary(
        &mut self,
        gross_salary: Decimal,
        contributions: &ContributionResult,
        irpf_total: Decimal,
        net_salary: Decimal,
    ) {
        self.record(
            "net_salary",
            "Net Salary",
            None,
            json!({
                "gross_salary": amount(gross_salary),
                "retirement": amount(contributions.retirement),
                "health": amount(contributions.health),
                "training_fund": amount(contributions.training_fund),
                "irpf_total": amount(irpf_total)
            }),
            json!({ "net_salary": amount(net_salary) }),
            format!(
                "${} - ${} - ${} - ${} - ${} = ${}",
                amount(gross_salary),
                amount(contributions.retirement),
                amount(contributions.health),
                amount(contributions.training_fund),
                amount(irpf_total),
                amount(net_salary)
            ),
        );
    }

    pub(crate) fn finish(self) -> AuditTrace {
        self.trace
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculation::{calculate_contributions, calculate_irpf};
    use crate::config::fixtures::uruguay_2025;
    use crate::models::TaxProfile;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn trace_for(gross: &str) -> AuditTrace {
        let rates = uruguay_2025();
        let profile = TaxProfile::single(dec(gross));
        let contributions = calculate_contributions(profile.gross_salary, false, false, &rates);
        let input = IrpfInput::from_profile(&profile, &contributions);
        let tax = calculate_irpf(&input, &rates);

        let mut recorder = AuditRecorder::new();
        recorder.record_contributions(profile.gross_salary, false, false, &contributions, &rates);
        recorder.record_irpf(&input, &tax, &rates);
        recorder.finish()
    }

    #[test]
    fn test_steps_are_numbered_sequentially() {
        let trace = trace_for("80000");

        for (index, step) in trace.steps.iter().enumerate() {
            assert_eq!(step.step_number, index as u32 + 1);
        }
        assert_eq!(trace.steps.len(), 8);
    }

    #[test]
    fn test_retirement_step_explains_calculation() {
        let trace = trace_for("20000");
        let step = &trace.steps[0];

        assert_eq!(step.rule_id, "retirement_contribution");
        assert_eq!(step.legal_ref.as_deref(), Some(RETIREMENT_LEGAL_REF));
        assert_eq!(step.output["retirement"].as_str().unwrap(), "3000");
        assert_eq!(step.reasoning, "$20000 x 15% = $3000");
    }

    #[test]
    fn test_cap_warning_only_above_cap() {
        assert!(trace_for("272564").warnings.is_empty());

        let trace = trace_for("300000");
        assert!(trace
            .warnings
            .iter()
            .any(|w| w.code == "RETIREMENT_CAP_APPLIED"));
    }

    #[test]
    fn test_floor_warning_when_deductions_exceed_bracket_tax() {
        // 50000: bracket tax 396.8, credit 1372
        let trace = trace_for("50000");
        assert!(trace
            .warnings
            .iter()
            .any(|w| w.code == "IRPF_FLOORED_AT_ZERO"));
    }

    #[test]
    fn test_no_floor_warning_without_bracket_tax() {
        let trace = trace_for("20000");
        assert!(trace.warnings.is_empty());
    }

    #[test]
    fn test_surcharge_step_reports_taxable_income() {
        let trace = trace_for("80000");
        let step = trace
            .steps
            .iter()
            .find(|s| s.rule_id == "irpf_taxable_income")
            .unwrap();

        assert_eq!(step.output["taxable_income"].as_str().unwrap(), "84800");
        assert!(step.output["surcharge_applied"].as_bool().unwrap());
        assert!(step.reasoning.contains("+ 6%"));
    }

    #[test]
    fn test_bracket_step_lists_every_bracket() {
        let trace = trace_for("80000");
        let step = trace
            .steps
            .iter()
            .find(|s| s.rule_id == "irpf_brackets")
            .unwrap();
        let taxes = step.output["bracket_taxes"].as_array().unwrap();

        assert_eq!(taxes.len(), 8);
        assert_eq!(taxes[1].as_str().unwrap(), "1972.8");
        assert_eq!(taxes[2].as_str().unwrap(), "2856");
    }
}
