//! Gross salary reconstruction from a billing budget.
//!
//! This is the core of the simulator: from the turnover billed to the client
//! it derives the budget available for salary, solves the aggregate charge
//! rate, splits the pool into base salary, bonus, complement and paid-leave
//! allowance, and evaluates every charge on the resulting gross salary.
//!
//! ## Pipeline
//!
//! 1. Turnover − management and intermediation fees = available amount
//! 2. Available amount − reimbursed expenses = salary budget
//! 3. Aggregate charge rate (iterative, tiered or manual override)
//! 4. Pool = budget ÷ (1 + rate); gross rebuilt from the pool
//! 5. Contribution table and welfare levy on the gross salary
//! 6. General reduction
//! 7. Net pay and reserve provision

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::config::{ComplementSplit, SalaryConfiguration};
use crate::models::{AuditStep, AuditTrace, AuditWarning, SimulationInput, SimulationResult};

use super::allowances::{meal_voucher_shares, telework_allowance};
use super::general_reduction::{GENERAL_REDUCTION_REF, calculate_general_reduction};
use super::rate_solver::{SalaryFrame, charges_on, solve_charge_rate};
use super::welfare::mutual_shares;

/// Warning raised when the iteration cap is hit.
pub const SOLVER_NOT_CONVERGED: &str = "SOLVER_NOT_CONVERGED";

/// Warning raised when the pool does not cover base salary, bonus and reserve.
pub const BUDGET_SHORTFALL: &str = "BUDGET_SHORTFALL";

const FULL_TIME_DAYS: Decimal = dec!(5);

fn amounts(pairs: &[(&str, Decimal)]) -> serde_json::Value {
    let map = pairs
        .iter()
        .map(|(name, value)| (name.to_string(), serde_json::Value::String(value.round_dp(2).to_string())))
        .collect::<serde_json::Map<_, _>>();
    serde_json::Value::Object(map)
}

/// Splits the complement into remuneration and business-referral shares.
fn split_complement(complement: Decimal, config: &SalaryConfiguration) -> (Decimal, Decimal) {
    let divisor = match config.complement_split {
        ComplementSplit::BonusRate => Decimal::ONE + config.bonus_rate,
        ComplementSplit::FixedRatio { divisor } => divisor,
    };
    let remuneration = complement.checked_div(divisor).unwrap_or(complement);
    (remuneration, complement - remuneration)
}

/// Runs one payslip simulation.
///
/// The function is pure: the same input and configuration always produce
/// the same result, and nothing is retained between calls. It never fails;
/// negative intermediates are clamped to zero and a non-converging rate
/// iteration keeps its last estimate (both are flagged in the audit trace).
///
/// # Examples
///
/// ```
/// use portage_engine::calculation::solve_salary;
/// use portage_engine::config::SalaryConfiguration;
/// use portage_engine::models::SimulationInput;
/// use rust_decimal::Decimal;
///
/// let input = SimulationInput::new(Decimal::from(500), Decimal::from(19));
/// let result = solve_salary(&input, &SalaryConfiguration::default());
///
/// assert_eq!(result.turnover, Decimal::from(9500));
/// assert_eq!(result.gross_salary.round_dp(0), Decimal::from(6005));
/// assert_eq!(result.net_before_tax, result.gross_salary - result.employee_charges);
/// ```
pub fn solve_salary(input: &SimulationInput, config: &SalaryConfiguration) -> SimulationResult {
    let mut steps = Vec::new();
    let mut warnings = Vec::new();

    // Budget
    let turnover = (input.daily_rate * input.days_per_month).max(Decimal::ZERO);
    let management_fees = turnover * config.management_fee_rate;
    let intermediation_fees = turnover * input.intermediation_fee_rate;
    let available_amount = turnover - management_fees - intermediation_fees;

    steps.push(AuditStep {
        step_number: 1,
        rule_id: "available_budget".to_string(),
        rule_name: "Available Amount".to_string(),
        legal_ref: "Portage service agreement".to_string(),
        input: serde_json::json!({
            "daily_rate": input.daily_rate.normalize().to_string(),
            "days_per_month": input.days_per_month.normalize().to_string(),
            "management_fee_rate": config.management_fee_rate.normalize().to_string(),
            "intermediation_fee_rate": input.intermediation_fee_rate.normalize().to_string()
        }),
        output: amounts(&[
            ("turnover", turnover),
            ("management_fees", management_fees),
            ("intermediation_fees", intermediation_fees),
            ("available_amount", available_amount),
        ]),
        reasoning: format!(
            "€{} × {} days = €{}; less €{} fees and €{} intermediation = €{}",
            input.daily_rate.normalize(),
            input.days_per_month.normalize(),
            turnover.round_dp(2),
            management_fees.round_dp(2),
            intermediation_fees.round_dp(2),
            available_amount.round_dp(2)
        ),
    });

    // Reimbursed expenses
    let (telework_days, telework_amount) = telework_allowance(input.telework_days, &config.benefits);
    let reimbursed_expenses = input.claimed_expenses() + telework_amount;
    let salary_budget = available_amount - reimbursed_expenses;

    steps.push(AuditStep {
        step_number: 2,
        rule_id: "reimbursed_expenses".to_string(),
        rule_name: "Reimbursed Expenses".to_string(),
        legal_ref: "URSSAF professional expense allowances".to_string(),
        input: serde_json::json!({
            "kilometric_allowance": input.kilometric_allowance.round_dp(2).to_string(),
            "per_diem_allowance": input.per_diem_allowance.round_dp(2).to_string(),
            "other_expenses": input.other_expenses.round_dp(2).to_string(),
            "telework_days_claimed": input.telework_days
        }),
        output: serde_json::json!({
            "telework_days": telework_days,
            "telework_allowance": telework_amount.round_dp(2).to_string(),
            "reimbursed_expenses": reimbursed_expenses.round_dp(2).to_string(),
            "salary_budget": salary_budget.round_dp(2).to_string()
        }),
        reasoning: format!(
            "€{} of expenses paid outside salary; €{} left for salary and charges",
            reimbursed_expenses.round_dp(2),
            salary_budget.round_dp(2)
        ),
    });

    // Fixed parts
    let base_salary = config.base_salary * input.days_per_week / FULL_TIME_DAYS;
    let bonus = base_salary * config.bonus_rate;
    // Withheld from the pool whether or not the reserve is provisioned
    let reserve_gross = base_salary * config.reserve_rate;
    let mutual = mutual_shares(config.pmss, &config.mutual_insurance, input.mutual_insurance_active);
    let vouchers = meal_voucher_shares(input.meal_vouchers, &config.benefits);

    let frame = SalaryFrame {
        salary_budget,
        base_salary,
        bonus,
        reserve_gross,
        mutual_employer_share: mutual.employer,
        meal_voucher_employer_share: vouchers.employer,
        large_employer: input.large_employer,
    };

    // Charge rate
    let solution = solve_charge_rate(&frame, config, 3);
    let diagnostics = solution.diagnostics;
    steps.push(solution.audit_step);

    if !diagnostics.converged {
        warnings.push(AuditWarning {
            code: SOLVER_NOT_CONVERGED.to_string(),
            message: format!(
                "Charge rate did not converge after {} iteration(s); using last estimate {}",
                diagnostics.iterations,
                diagnostics.applied_rate.round_dp(6)
            ),
            severity: "medium".to_string(),
        });
    }

    // Gross reconstruction
    let pool = frame.pool_at(diagnostics.applied_rate);
    let complement = frame.complement(pool);
    let (complement_remuneration, complement_referral) = split_complement(complement, config);
    let worked_pay = frame.worked_pay(pool);
    let paid_leave_allowance = worked_pay * config.paid_leave_rate;
    let gross_salary = worked_pay + paid_leave_allowance;

    if pool < base_salary + bonus + reserve_gross {
        warnings.push(AuditWarning {
            code: BUDGET_SHORTFALL.to_string(),
            message: format!(
                "Pool €{} does not cover base salary, bonus and reserve (€{}); complement set to zero",
                pool.round_dp(2),
                (base_salary + bonus + reserve_gross).round_dp(2)
            ),
            severity: "high".to_string(),
        });
    }

    steps.push(AuditStep {
        step_number: 4,
        rule_id: "gross_reconstruction".to_string(),
        rule_name: "Gross Salary Reconstruction".to_string(),
        legal_ref: "Portage service agreement".to_string(),
        input: amounts(&[
            ("pool", pool),
            ("base_salary", base_salary),
            ("bonus", bonus),
            ("reserve_gross", reserve_gross),
        ]),
        output: amounts(&[
            ("complement_remuneration", complement_remuneration),
            ("complement_referral", complement_referral),
            ("paid_leave_allowance", paid_leave_allowance),
            ("gross_salary", gross_salary),
        ]),
        reasoning: format!(
            "(€{} + €{} + €{}) × (1 + {}) = €{}",
            base_salary.round_dp(2),
            bonus.round_dp(2),
            complement.round_dp(2),
            config.paid_leave_rate.normalize(),
            gross_salary.round_dp(2)
        ),
    });

    // Charges on the gross salary
    let charges = charges_on(gross_salary, &frame, config);
    let welfare_total = charges.welfare.total();

    steps.push(AuditStep {
        step_number: 5,
        rule_id: "contributions".to_string(),
        rule_name: "Social Contributions".to_string(),
        legal_ref: "URSSAF contribution table".to_string(),
        input: amounts(&[
            ("gross_salary", gross_salary),
            ("pmss", config.pmss),
            ("employer_welfare_base", welfare_total),
        ]),
        output: serde_json::json!({
            "lines": charges.contributions.lines.len(),
            "tranche_a": charges.contributions.tranche_a.round_dp(2).to_string(),
            "tranche_b": charges.contributions.tranche_b.round_dp(2).to_string(),
            "csg_base": charges.contributions.csg_base.to_string(),
            "employer_total": charges.contributions.employer_total.to_string(),
            "employee_total": charges.contributions.employee_total.to_string()
        }),
        reasoning: format!(
            "{} contribution lines: employer €{}, employee €{}",
            charges.contributions.lines.len(),
            charges.contributions.employer_total,
            charges.contributions.employee_total
        ),
    });

    steps.push(AuditStep {
        step_number: 6,
        rule_id: "welfare_levy".to_string(),
        rule_name: "Welfare Flat Levy".to_string(),
        legal_ref: "CSS L137-15".to_string(),
        input: amounts(&[
            ("death_cover", charges.welfare.death_cover),
            ("supplementary_cover", charges.welfare.supplementary_cover),
            ("mutual", charges.welfare.mutual),
        ]),
        output: amounts(&[("welfare_total", welfare_total), ("levy", charges.levy)]),
        reasoning: format!(
            "€{} × {} = €{}",
            welfare_total,
            config.welfare_levy_rate.normalize(),
            charges.levy
        ),
    });

    // General reduction
    let (general_reduction, reduction_step) = if input.general_reduction_active {
        let reduction = calculate_general_reduction(
            gross_salary,
            config.smic_monthly,
            input.large_employer,
            &config.reduction,
            7,
        );
        (reduction.reduction, reduction.audit_step)
    } else {
        (
            Decimal::ZERO,
            AuditStep {
                step_number: 7,
                rule_id: "general_reduction".to_string(),
                rule_name: "General Reduction".to_string(),
                legal_ref: GENERAL_REDUCTION_REF.to_string(),
                input: serde_json::json!({ "active": false }),
                output: serde_json::json!({ "applied": false, "reduction": "0.00" }),
                reasoning: "General reduction disabled for this simulation".to_string(),
            },
        )
    };
    steps.push(reduction_step);

    // Totals
    let employer_charges_before_reduction =
        charges.contributions.employer_total + mutual.employer + vouchers.employer + charges.levy;
    let employer_charges = employer_charges_before_reduction - general_reduction;
    let employee_charges = charges.contributions.employee_total + mutual.employee + vouchers.employee;

    let reserve_provision = if input.reserve_active {
        (salary_budget - gross_salary - employer_charges).max(Decimal::ZERO)
    } else {
        Decimal::ZERO
    };
    let total_cost_without_reserve = gross_salary + employer_charges + reimbursed_expenses;
    let net_before_tax = gross_salary - employee_charges;
    let net_payable = net_before_tax + reimbursed_expenses;

    steps.push(AuditStep {
        step_number: 8,
        rule_id: "net_pay".to_string(),
        rule_name: "Net Pay".to_string(),
        legal_ref: "Code du travail L3243-2".to_string(),
        input: amounts(&[
            ("gross_salary", gross_salary),
            ("employee_charges", employee_charges),
            ("reimbursed_expenses", reimbursed_expenses),
        ]),
        output: amounts(&[
            ("net_before_tax", net_before_tax),
            ("net_payable", net_payable),
            ("reserve_provision", reserve_provision),
        ]),
        reasoning: format!(
            "€{} − €{} = €{} net before tax; €{} payable with expenses",
            gross_salary.round_dp(2),
            employee_charges.round_dp(2),
            net_before_tax.round_dp(2),
            net_payable.round_dp(2)
        ),
    });

    debug!(
        gross = %gross_salary.round_dp(2),
        net = %net_before_tax.round_dp(2),
        rate = %diagnostics.applied_rate.round_dp(6),
        scenario = diagnostics.scenario.label(),
        "Simulation solved"
    );

    SimulationResult {
        turnover,
        management_fees,
        intermediation_fees,
        available_amount,
        telework_days,
        telework_allowance: telework_amount,
        reimbursed_expenses,
        salary_budget,
        pool,
        base_salary,
        bonus,
        complement_remuneration,
        complement_referral,
        paid_leave_allowance,
        gross_salary,
        reserve_gross: if input.reserve_active {
            reserve_gross
        } else {
            Decimal::ZERO
        },
        reserve_provision,
        mutual_employer_share: mutual.employer,
        mutual_employee_share: mutual.employee,
        meal_voucher_employer_share: vouchers.employer,
        meal_voucher_employee_share: vouchers.employee,
        welfare_employer_contributions: welfare_total,
        welfare_levy: charges.levy,
        contributions: charges.contributions,
        employer_charges_before_reduction,
        general_reduction,
        employer_charges,
        employee_charges,
        total_cost_without_reserve,
        net_before_tax,
        net_payable,
        diagnostics,
        audit_trace: AuditTrace { steps, warnings },
    }
}
