//! Contribution models: the static rule shape and the per-evaluation lines.
//!
//! A [`ContributionRule`] describes one social-insurance line of the payslip.
//! Evaluating the rule table against a gross salary yields one
//! [`ContributionLine`] per applicable rule, rolled up into a
//! [`ContributionBreakdown`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Selects which amount a contribution rule is assessed on.
///
/// # Example
///
/// ```
/// use portage_engine::models::ContributionBase;
///
/// let base = ContributionBase::BracketHigh;
/// assert_eq!(serde_json::to_string(&base).unwrap(), "\"bracket_high\"");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContributionBase {
    /// The whole gross salary.
    TotalGross,
    /// Tranche A: the gross salary up to the social-security ceiling (PMSS).
    BracketLow,
    /// Tranche B: the part of gross salary above the ceiling.
    BracketHigh,
    /// 98.25% of gross plus employer welfare contributions.
    CsgBase,
}

impl ContributionBase {
    /// Returns a human-readable label for the base.
    pub fn label(&self) -> &'static str {
        match self {
            ContributionBase::TotalGross => "Totalité",
            ContributionBase::BracketLow => "Tranche A (PMSS)",
            ContributionBase::BracketHigh => "Tranche B",
            ContributionBase::CsgBase => "Base CSG",
        }
    }
}

/// Employer rates that come from the salary configuration instead of the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfiguredRate {
    /// Workplace accident (AT/MP) rate, specific to the employer.
    WorkplaceAccident,
    /// Housing fund (FNAL) rate, selected by workforce size.
    HousingFund,
}

/// One social-insurance line of the contribution table.
///
/// Rules are immutable and live in a static table; see
/// [`crate::calculation::contribution_rules`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ContributionRule {
    /// Unique key of the rule (e.g. "retraite_t1").
    pub key: &'static str,
    /// Display label used on payslips.
    pub label: &'static str,
    /// Employer rate as a fraction.
    pub employer_rate: Decimal,
    /// Employee rate as a fraction.
    pub employee_rate: Decimal,
    /// The base the rule is assessed on.
    pub base: ContributionBase,
    /// When set, the employer rate is supplied at evaluation time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configured_rate: Option<ConfiguredRate>,
}

/// A computed contribution line.
///
/// Employer and employee amounts are rounded to the cent independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionLine {
    /// The key of the rule this line was computed from.
    pub key: String,
    /// Display label of the rule.
    pub label: String,
    /// The assessed base, rounded to the cent.
    pub base: Decimal,
    /// The employer rate applied.
    pub employer_rate: Decimal,
    /// The employer amount, rounded to the cent.
    pub employer_amount: Decimal,
    /// The employee rate applied.
    pub employee_rate: Decimal,
    /// The employee amount, rounded to the cent.
    pub employee_amount: Decimal,
}

/// The itemized result of evaluating the contribution table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributionBreakdown {
    /// One line per applicable rule, in table order.
    pub lines: Vec<ContributionLine>,
    /// Sum of employer amounts.
    pub employer_total: Decimal,
    /// Sum of employee amounts.
    pub employee_total: Decimal,
    /// Gross salary up to the ceiling.
    pub tranche_a: Decimal,
    /// Gross salary above the ceiling.
    pub tranche_b: Decimal,
    /// The CSG/CRDS base, rounded to the cent.
    pub csg_base: Decimal,
}

impl ContributionBreakdown {
    /// Returns the line computed for `key`, if that rule applied.
    pub fn line(&self, key: &str) -> Option<&ContributionLine> {
        self.lines.iter().find(|line| line.key == key)
    }
}
