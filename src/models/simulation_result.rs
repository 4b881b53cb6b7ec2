//! Simulation result models.
//!
//! This module contains the [`SimulationResult`] type and its associated
//! structures that capture every figure of a payslip simulation, the solver
//! diagnostics and an audit trace explaining each step.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ContributionBreakdown;

/// How the aggregate charge rate of a simulation was determined.
///
/// # Example
///
/// ```
/// use portage_engine::models::RateScenario;
///
/// let scenario = RateScenario::ManualOverride;
/// assert_eq!(scenario.label(), "manual override");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RateScenario {
    /// The configured override rate was used as-is.
    ManualOverride,
    /// Fixed-point iteration against the contribution table.
    Iterative,
    /// Tiered table, reduced tier.
    TieredReduced,
    /// Tiered table, standard tier.
    TieredStandard,
    /// Tiered table, standard tier plus surcharge.
    TieredSurcharge,
}

impl RateScenario {
    /// Returns a short human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            RateScenario::ManualOverride => "manual override",
            RateScenario::Iterative => "iterative",
            RateScenario::TieredReduced => "tiered (reduced)",
            RateScenario::TieredStandard => "tiered (standard)",
            RateScenario::TieredSurcharge => "tiered (surcharge)",
        }
    }
}

/// Diagnostics reported by the gross salary solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolverDiagnostics {
    /// The aggregate charge rate used to divide the budget.
    pub applied_rate: Decimal,
    /// How the rate was determined.
    pub scenario: RateScenario,
    /// Number of contribution evaluations performed to find the rate.
    pub iterations: u32,
    /// False only when the fixed-point iteration hit its cap.
    pub converged: bool,
}

/// A single step in the audit trace recording a calculation decision.
///
/// Each step captures the input, output, and reasoning for a rule application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStep {
    /// The sequential step number.
    pub step_number: u32,
    /// The unique identifier of the rule that was applied.
    pub rule_id: String,
    /// The human-readable name of the rule.
    pub rule_name: String,
    /// Regulatory reference for this rule.
    pub legal_ref: String,
    /// The input data for this step.
    pub input: serde_json::Value,
    /// The output data from this step.
    pub output: serde_json::Value,
    /// Human-readable explanation of the decision.
    pub reasoning: String,
}

/// A warning generated during a simulation.
///
/// Warnings flag results that are valid but deserve the reader's attention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditWarning {
    /// A code identifying the type of warning.
    pub code: String,
    /// A human-readable description of the warning.
    pub message: String,
    /// The severity level (e.g., "low", "medium", "high").
    pub severity: String,
}

/// The complete audit trace for a simulation.
///
/// # Example
///
/// ```
/// use portage_engine::models::AuditTrace;
///
/// let trace = AuditTrace {
///     steps: vec![],
///     warnings: vec![],
/// };
/// assert!(trace.step("general_reduction").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditTrace {
    /// The sequence of calculation steps.
    pub steps: Vec<AuditStep>,
    /// Any warnings generated during the simulation.
    pub warnings: Vec<AuditWarning>,
}

impl AuditTrace {
    /// Returns the first step recorded for `rule_id`.
    pub fn step(&self, rule_id: &str) -> Option<&AuditStep> {
        self.steps.iter().find(|step| step.rule_id == rule_id)
    }

    /// Returns true if a warning with `code` was raised.
    pub fn has_warning(&self, code: &str) -> bool {
        self.warnings.iter().any(|warning| warning.code == code)
    }
}

/// The complete result of a payslip simulation.
///
/// Produced once per solve and returned by value. Amounts are kept at full
/// precision except where the payroll rules round (contribution lines,
/// welfare contributions and levy); consumers round for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationResult {
    /// Daily rate × days billed.
    pub turnover: Decimal,
    /// Management fees withheld by the portage company.
    pub management_fees: Decimal,
    /// Intermediation fees withheld on turnover.
    pub intermediation_fees: Decimal,
    /// Turnover net of fees.
    pub available_amount: Decimal,
    /// Telework days actually allowed (capped).
    pub telework_days: u32,
    /// Telework flat allowance.
    pub telework_allowance: Decimal,
    /// Total of reimbursed expenses (paid on top of net salary).
    pub reimbursed_expenses: Decimal,
    /// Budget left for gross salary and employer charges.
    pub salary_budget: Decimal,
    /// Budget divided by (1 + aggregate rate).
    pub pool: Decimal,
    /// Fixed base salary, prorated to the weekly contract.
    pub base_salary: Decimal,
    /// Business-referral bonus on the base salary.
    pub bonus: Decimal,
    /// Complement of remuneration.
    pub complement_remuneration: Decimal,
    /// Business-referral share of the complement.
    pub complement_referral: Decimal,
    /// Paid-leave allowance.
    pub paid_leave_allowance: Decimal,
    /// Gross salary.
    pub gross_salary: Decimal,
    /// Gross reserve set aside for the consultant (zero when inactive).
    ///
    /// The reserve is withheld from the pool whether or not it is active.
    pub reserve_gross: Decimal,
    /// Reserve provision: budget − gross − employer charges (zero when inactive).
    pub reserve_provision: Decimal,
    /// Itemized contributions on the gross salary.
    pub contributions: ContributionBreakdown,
    /// Employer share of the mutual health insurance.
    pub mutual_employer_share: Decimal,
    /// Employee share of the mutual health insurance.
    pub mutual_employee_share: Decimal,
    /// Employer share of meal vouchers.
    pub meal_voucher_employer_share: Decimal,
    /// Employee share of meal vouchers.
    pub meal_voucher_employee_share: Decimal,
    /// Employer welfare contributions (death/disability + mutual).
    pub welfare_employer_contributions: Decimal,
    /// Flat levy on employer welfare contributions (forfait social).
    pub welfare_levy: Decimal,
    /// Employer charges before the general reduction.
    pub employer_charges_before_reduction: Decimal,
    /// Degressive general reduction.
    pub general_reduction: Decimal,
    /// Total employer charges.
    pub employer_charges: Decimal,
    /// Total employee charges.
    pub employee_charges: Decimal,
    /// Gross + employer charges + reimbursed expenses.
    pub total_cost_without_reserve: Decimal,
    /// Gross − employee charges.
    pub net_before_tax: Decimal,
    /// Net before tax + reimbursed expenses.
    pub net_payable: Decimal,
    /// Solver diagnostics.
    pub diagnostics: SolverDiagnostics,
    /// Step-by-step explanation of the simulation.
    pub audit_trace: AuditTrace,
}
