//! Contribution table evaluation.
//!
//! Turns a gross salary into an itemized social-charge breakdown by applying
//! every rule of the static table to its base.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::models::{
    ConfiguredRate, ContributionBase, ContributionBreakdown, ContributionLine,
};

use super::contribution_table::contribution_rules;

/// Share of gross salary retained in the CSG/CRDS base (1.75% professional
/// expense abatement).
pub const CSG_GROSS_SHARE: Decimal = dec!(0.9825);

/// Rounds a currency amount to the cent.
pub fn round_cents(amount: Decimal) -> Decimal {
    amount.round_dp(2)
}

/// Splits a gross salary into tranche A (up to the ceiling) and tranche B.
///
/// A zero or negative ceiling is treated as "no tranche B".
///
/// # Examples
///
/// ```
/// use portage_engine::calculation::split_tranches;
/// use rust_decimal::Decimal;
///
/// let (a, b) = split_tranches(Decimal::from(5000), Decimal::from(4005));
/// assert_eq!(a, Decimal::from(4005));
/// assert_eq!(b, Decimal::from(995));
/// ```
pub fn split_tranches(gross: Decimal, pmss: Decimal) -> (Decimal, Decimal) {
    let gross = gross.max(Decimal::ZERO);
    if pmss <= Decimal::ZERO {
        return (gross, Decimal::ZERO);
    }
    (gross.min(pmss), (gross - pmss).max(Decimal::ZERO))
}

/// Evaluates the contribution table on a gross salary.
///
/// # Arguments
///
/// * `gross` - The gross salary
/// * `pmss` - The monthly social-security ceiling
/// * `accident_rate` - Employer AT/MP rate, replacing the table value
/// * `housing_fund_rate` - Employer FNAL rate, replacing the table value
/// * `employer_welfare_base` - Employer death/disability and mutual
///   contributions, added to the CSG/CRDS base
///
/// Rules on tranche B are skipped entirely when the gross salary does not
/// exceed the ceiling. Each amount is rounded to the cent on its own line
/// before being summed.
///
/// # Examples
///
/// ```
/// use portage_engine::calculation::evaluate_contributions;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let breakdown = evaluate_contributions(
///     Decimal::from(3000),
///     Decimal::from(4005),
///     Decimal::from_str("0.0064").unwrap(),
///     Decimal::from_str("0.0010").unwrap(),
///     Decimal::from_str("77.74").unwrap(),
/// );
///
/// assert_eq!(breakdown.tranche_b, Decimal::ZERO);
/// assert!(breakdown.line("retraite_t2").is_none());
/// assert_eq!(breakdown.line("maladie").unwrap().employer_amount, Decimal::from(210));
/// ```
pub fn evaluate_contributions(
    gross: Decimal,
    pmss: Decimal,
    accident_rate: Decimal,
    housing_fund_rate: Decimal,
    employer_welfare_base: Decimal,
) -> ContributionBreakdown {
    let gross = gross.max(Decimal::ZERO);
    let (tranche_a, tranche_b) = split_tranches(gross, pmss);
    let csg_base = gross * CSG_GROSS_SHARE + employer_welfare_base;

    let mut lines = Vec::with_capacity(contribution_rules().len());
    let mut employer_total = Decimal::ZERO;
    let mut employee_total = Decimal::ZERO;

    for rule in contribution_rules() {
        let base = match rule.base {
            ContributionBase::TotalGross => gross,
            ContributionBase::BracketLow => tranche_a,
            ContributionBase::BracketHigh => {
                if tranche_b.is_zero() {
                    continue;
                }
                tranche_b
            }
            ContributionBase::CsgBase => csg_base,
        };

        let employer_rate = match rule.configured_rate {
            Some(ConfiguredRate::WorkplaceAccident) => accident_rate,
            Some(ConfiguredRate::HousingFund) => housing_fund_rate,
            None => rule.employer_rate,
        };
        let employee_rate = rule.employee_rate;

        let employer_amount = round_cents(base * employer_rate);
        let employee_amount = round_cents(base * employee_rate);

        employer_total += employer_amount;
        employee_total += employee_amount;

        lines.push(ContributionLine {
            key: rule.key.to_string(),
            label: rule.label.to_string(),
            base: round_cents(base),
            employer_rate,
            employer_amount,
            employee_rate,
            employee_amount,
        });
    }

    ContributionBreakdown {
        lines,
        employer_total,
        employee_total,
        tranche_a,
        tranche_b,
        csg_base: round_cents(csg_base),
    }
}
