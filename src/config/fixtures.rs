//! In-memory rate tables shared by unit tests.

use rust_decimal::Decimal;
use std::str::FromStr;

use super::types::{
    FonasaConfig, HealthRates, IrpfConfig, RateTable, RetirementConfig, TaxBracket,
};

fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

fn bracket(from: &str, to: Option<&str>, rate: &str) -> TaxBracket {
    TaxBracket {
        from: dec(from),
        to: to.map(dec),
        rate: dec(rate),
    }
}

/// The 2025 Uruguayan rate table, mirroring `config/uy_2025/rate_table.yaml`.
pub(crate) fn uruguay_2025() -> RateTable {
    RateTable {
        fiscal_year: 2025,
        bpc: dec("6576"),
        retirement: RetirementConfig {
            rate: dec("15"),
            cap: dec("272564"),
        },
        fonasa: FonasaConfig {
            threshold_bpc: dec("2.5"),
            at_or_below_threshold: HealthRates {
                base: dec("3"),
                spouse: dec("2"),
                children: dec("0"),
            },
            above_threshold: HealthRates {
                base: dec("4.5"),
                spouse: dec("2"),
                children: dec("1.5"),
            },
        },
        frl_rate: dec("0.1"),
        irpf: IrpfConfig {
            brackets: vec![
                bracket("0", Some("7"), "0"),
                bracket("7", Some("10"), "10"),
                bracket("10", Some("15"), "15"),
                bracket("15", Some("30"), "24"),
                bracket("30", Some("50"), "25"),
                bracket("50", Some("75"), "27"),
                bracket("75", Some("115"), "31"),
                bracket("115", None, "36"),
            ],
            surcharge_threshold_bpc: dec("10"),
            surcharge_rate: dec("6"),
            deduction_rate_threshold_bpc: dec("15"),
            deduction_rate_at_or_below_threshold: dec("14"),
            deduction_rate_above_threshold: dec("8"),
            child_deduction_bpc: dec("20"),
            disabled_child_deduction_bpc: dec("40"),
            additional_solidarity_bpc: dec("1.25"),
        },
    }
}
