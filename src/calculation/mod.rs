//! Calculation logic for the portage payslip simulator.
//!
//! This module contains the static contribution table and its evaluator,
//! welfare contributions and the flat levy, the degressive general
//! reduction, expense allowances, the aggregate charge rate solver and the
//! gross salary solver that ties them together.

mod allowances;
mod contribution_table;
mod contributions;
mod general_reduction;
mod rate_solver;
mod salary_solver;
mod welfare;

pub use allowances::{
    MealVoucherShares, TravelZone, kilometric_allowance, meal_voucher_shares, telework_allowance,
    travel_allowance,
};
pub use contribution_table::{
    DEATH_COVER_RULE, SUPPLEMENTARY_COVER_RULE, contribution_rules, find_rule,
};
pub use contributions::{CSG_GROSS_SHARE, evaluate_contributions, round_cents, split_tranches};
pub use general_reduction::{
    GENERAL_REDUCTION_REF, GeneralReductionResult, calculate_general_reduction,
};
pub use rate_solver::{
    GrossCharges, RATE_DIVERGENCE_LIMIT, RateSolution, SalaryFrame, charges_on, realized_rate,
    solve_charge_rate, tiered_rate,
};
pub use salary_solver::{BUDGET_SHORTFALL, SOLVER_NOT_CONVERGED, solve_salary};
pub use welfare::{
    MutualShares, WelfareContributions, mutual_shares, welfare_contributions, welfare_levy,
};
