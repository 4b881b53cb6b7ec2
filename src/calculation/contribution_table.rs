//! The 2026 contribution table, line by line.
//!
//! Rates are fractions of the selected base. The AT/MP and FNAL employer
//! rates in the table are placeholders overridden by configuration.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{ConfiguredRate, ContributionBase, ContributionRule};

use crate::models::ContributionBase::{BracketHigh, BracketLow, CsgBase, TotalGross};

/// Key of the death/disability employer contribution on tranche A.
pub const DEATH_COVER_RULE: &str = "prevoyance_deces";

/// Key of the supplementary welfare contribution on tranche B.
pub const SUPPLEMENTARY_COVER_RULE: &str = "prevoyance_supp";

const fn rule(
    key: &'static str,
    label: &'static str,
    employer_rate: Decimal,
    employee_rate: Decimal,
    base: ContributionBase,
) -> ContributionRule {
    ContributionRule {
        key,
        label,
        employer_rate,
        employee_rate,
        base,
        configured_rate: None,
    }
}

const fn configured(
    key: &'static str,
    label: &'static str,
    base: ContributionBase,
    source: ConfiguredRate,
) -> ContributionRule {
    ContributionRule {
        key,
        label,
        employer_rate: Decimal::ZERO,
        employee_rate: Decimal::ZERO,
        base,
        configured_rate: Some(source),
    }
}

static CONTRIBUTION_RULES: [ContributionRule; 27] = [
    // Whole gross salary
    rule("maladie", "Maladie", dec!(0.0700), dec!(0), TotalGross),
    rule("maladie_compl", "Maladie complémentaire", dec!(0.0600), dec!(0), TotalGross),
    rule("csa", "Contrib. Solidarité Autonomie", dec!(0.0030), dec!(0), TotalGross),
    rule("vieillesse_dep", "Vieillesse déplafonnée", dec!(0.0211), dec!(0.0040), TotalGross),
    rule("af", "Allocations Familiales", dec!(0.0345), dec!(0), TotalGross),
    rule("af_compl", "Alloc. Familiales compl.", dec!(0.0180), dec!(0), TotalGross),
    configured("atmp", "AT/MP", TotalGross, ConfiguredRate::WorkplaceAccident),
    rule("chomage", "Chômage", dec!(0.0400), dec!(0), TotalGross),
    rule("ags", "AGS", dec!(0.0025), dec!(0), TotalGross),
    rule("formation", "Formation professionnelle", dec!(0.0100), dec!(0), TotalGross),
    rule("taxe_appr", "Taxe d'apprentissage", dec!(0.0059), dec!(0), TotalGross),
    rule("taxe_appr_lib", "Taxe appr. (libératoire)", dec!(0.0009), dec!(0), TotalGross),
    rule("dialogue_soc", "Dialogue social", dec!(0.0001), dec!(0), TotalGross),
    // Tranche A
    rule("vieillesse_pl", "Vieillesse plafonnée", dec!(0.0855), dec!(0.0690), BracketLow),
    configured("fnal", "FNAL", BracketLow, ConfiguredRate::HousingFund),
    rule("retraite_t1", "Retraite AGIRC-ARRCO T1", dec!(0.0472), dec!(0.0315), BracketLow),
    rule("ceg_t1", "CEG T1", dec!(0.0129), dec!(0.0086), BracketLow),
    rule("cet_t1", "CET T1", dec!(0.0021), dec!(0.0014), BracketLow),
    rule("apec_t1", "APEC T1", dec!(0.00036), dec!(0.00024), BracketLow),
    rule(DEATH_COVER_RULE, "Prévoyance décès cadre", dec!(0.0159), dec!(0), BracketLow),
    // Tranche B
    rule("retraite_t2", "Retraite AGIRC-ARRCO T2", dec!(0.1295), dec!(0.0864), BracketHigh),
    rule("ceg_t2", "CEG T2", dec!(0.0162), dec!(0.0108), BracketHigh),
    rule("cet_t2", "CET T2", dec!(0.0021), dec!(0.0014), BracketHigh),
    rule("apec_t2", "APEC T2", dec!(0.00036), dec!(0.00024), BracketHigh),
    rule(SUPPLEMENTARY_COVER_RULE, "Prévoyance supp. cadre T2", dec!(0.0073), dec!(0.0073), BracketHigh),
    // CSG / CRDS
    rule("csg_deductible", "CSG déductible", dec!(0), dec!(0.0680), CsgBase),
    rule("csg_crds", "CSG/CRDS non déductible", dec!(0), dec!(0.0290), CsgBase),
];

/// Returns the static contribution table, in payslip order.
pub fn contribution_rules() -> &'static [ContributionRule] {
    &CONTRIBUTION_RULES
}

/// Looks up a rule by key.
pub fn find_rule(key: &str) -> Option<&'static ContributionRule> {
    CONTRIBUTION_RULES.iter().find(|rule| rule.key == key)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_table_has_27_rules() {
        assert_eq!(contribution_rules().len(), 27);
    }

    #[test]
    fn test_keys_are_unique() {
        let keys: HashSet<&str> = contribution_rules().iter().map(|r| r.key).collect();
        assert_eq!(keys.len(), contribution_rules().len());
    }

    #[test]
    fn test_only_atmp_and_fnal_are_configured() {
        let configured: Vec<&str> = contribution_rules()
            .iter()
            .filter(|r| r.configured_rate.is_some())
            .map(|r| r.key)
            .collect();

        assert_eq!(configured, vec!["atmp", "fnal"]);
    }

    #[test]
    fn test_welfare_rules_present_on_expected_brackets() {
        let death = find_rule(DEATH_COVER_RULE).unwrap();
        let supplementary = find_rule(SUPPLEMENTARY_COVER_RULE).unwrap();

        assert_eq!(death.base, ContributionBase::BracketLow);
        assert_eq!(death.employer_rate, dec!(0.0159));
        assert_eq!(supplementary.base, ContributionBase::BracketHigh);
        assert_eq!(supplementary.employer_rate, dec!(0.0073));
    }

    #[test]
    fn test_csg_rules_are_employee_only() {
        for rule in contribution_rules().iter().filter(|r| r.base == CsgBase) {
            assert!(rule.employer_rate.is_zero(), "{} has employer rate", rule.key);
            assert!(!rule.employee_rate.is_zero());
        }
    }

    #[test]
    fn test_find_rule_unknown_key() {
        assert!(find_rule("unknown").is_none());
    }
}
