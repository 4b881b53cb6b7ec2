//! Aggregate employer charge rate determination.
//!
//! The gross salary depends on the charge rate (the budget is split between
//! gross and employer charges) while the real charge rate depends on the
//! gross salary. This module resolves that circularity either by fixed-point
//! iteration against the full contribution table or by a single pass through
//! a tiered rate table.
//!
//! ## Iterative strategy
//!
//! Starting from the seed estimate `r`:
//! 1. `pool = budget ÷ (1 + r)`
//! 2. rebuild the gross salary from the pool and evaluate real employer
//!    charges on it, plus the extra charges caused by the reserve
//! 3. `r' = charges ÷ pool`; stop once `|r' − r|` is below the tolerance
//!
//! Hitting the iteration cap is not an error: the last estimate is kept and
//! the diagnostics report `converged = false`. The same applies when the
//! estimate runs past [`RATE_DIVERGENCE_LIMIT`], which happens when the
//! budget cannot even cover the fixed salary and its charges. In that regime
//! the reserve's share of the pool exceeds one and its share of the mutual
//! insurance grows with it, so the estimate runs away quickly.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::{debug, warn};

use crate::config::{RateStrategy, SalaryConfiguration, TieredRates};
use crate::models::{AuditStep, ContributionBreakdown, RateScenario, SolverDiagnostics};

use super::contributions::evaluate_contributions;
use super::welfare::{WelfareContributions, welfare_contributions, welfare_levy};

/// Estimates above this rate stop the iteration.
pub const RATE_DIVERGENCE_LIMIT: Decimal = dec!(1000);

/// The fixed parts of a simulation that the charge rate is solved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SalaryFrame {
    /// Budget shared between gross salary and employer charges.
    pub salary_budget: Decimal,
    /// Prorated fixed base salary.
    pub base_salary: Decimal,
    /// Business-referral bonus on the base salary.
    pub bonus: Decimal,
    /// Gross reserve withheld from the pool (zero when inactive).
    pub reserve_gross: Decimal,
    /// Employer mutual insurance share.
    pub mutual_employer_share: Decimal,
    /// Employer meal-voucher share.
    pub meal_voucher_employer_share: Decimal,
    /// Whether the employer has 50 or more employees.
    pub large_employer: bool,
}

impl SalaryFrame {
    /// Budget left for gross salary at a given aggregate rate.
    pub fn pool_at(&self, rate: Decimal) -> Decimal {
        Decimal::ONE
            .checked_add(rate)
            .and_then(|divisor| self.salary_budget.checked_div(divisor))
            .unwrap_or(Decimal::ZERO)
    }

    /// Complement of remuneration paid out of `pool`, clamped at zero.
    pub fn complement(&self, pool: Decimal) -> Decimal {
        (pool - self.base_salary - self.bonus - self.reserve_gross).max(Decimal::ZERO)
    }

    /// Base + bonus + complement: the pay the paid-leave allowance is assessed on.
    pub fn worked_pay(&self, pool: Decimal) -> Decimal {
        self.base_salary + self.bonus + self.complement(pool)
    }

    /// Gross salary rebuilt from `pool`, paid-leave allowance included.
    pub fn gross_at(&self, pool: Decimal, paid_leave_rate: Decimal) -> Decimal {
        self.worked_pay(pool) * (Decimal::ONE + paid_leave_rate)
    }
}

/// Charges assessed on one gross salary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrossCharges {
    /// Itemized contribution table evaluation.
    pub contributions: ContributionBreakdown,
    /// Employer welfare contributions entering the CSG base.
    pub welfare: WelfareContributions,
    /// Flat levy on the welfare contributions.
    pub levy: Decimal,
}

impl GrossCharges {
    /// Table employer charges plus the welfare levy.
    pub fn employer_cost(&self) -> Decimal {
        self.contributions.employer_total + self.levy
    }
}

/// Evaluates welfare contributions, the contribution table and the levy on `gross`.
pub fn charges_on(gross: Decimal, frame: &SalaryFrame, config: &SalaryConfiguration) -> GrossCharges {
    let welfare = welfare_contributions(gross, config.pmss, frame.mutual_employer_share);
    let contributions = evaluate_contributions(
        gross,
        config.pmss,
        config.workplace_accident_rate,
        config.housing_fund.rate_for(frame.large_employer),
        welfare.total(),
    );
    let levy = welfare_levy(welfare.total(), config.welfare_levy_rate);

    GrossCharges {
        contributions,
        welfare,
        levy,
    }
}

/// The aggregate rate the contribution table actually yields for `pool`.
///
/// Includes the paid-leave allowance, the flat mutual and meal-voucher
/// employer shares, and the incremental charges caused by the reserve
/// (its own paid-leave loading and its pro-rata share of the mutual).
/// A non-positive pool yields zero. A pool so small that the rate overflows
/// yields `Decimal::MAX`, which stops the iteration as diverged.
pub fn realized_rate(pool: Decimal, frame: &SalaryFrame, config: &SalaryConfiguration) -> Decimal {
    if pool <= Decimal::ZERO {
        return Decimal::ZERO;
    }

    let paid_leave = config.paid_leave_rate;
    let worked = frame.worked_pay(pool);
    let gross = worked * (Decimal::ONE + paid_leave);

    let on_gross = charges_on(gross, frame, config).employer_cost();
    let gross_charges = on_gross
        + frame.mutual_employer_share
        + frame.meal_voucher_employer_share
        + (gross - worked);

    let loaded_reserve = frame.reserve_gross * (Decimal::ONE + paid_leave);
    let on_reserve = charges_on(gross + loaded_reserve, frame, config).employer_cost();
    let reserve_charges = (on_reserve - on_gross) + frame.reserve_gross * paid_leave;

    frame
        .reserve_gross
        .checked_div(pool)
        .and_then(|share| frame.mutual_employer_share.checked_mul(share))
        .and_then(|mutual_on_reserve| {
            (gross_charges + reserve_charges).checked_add(mutual_on_reserve)
        })
        .and_then(|charges| charges.checked_div(pool))
        .unwrap_or(Decimal::MAX)
}

/// The outcome of the charge rate determination.
#[derive(Debug, Clone)]
pub struct RateSolution {
    /// Solver diagnostics, including the applied rate.
    pub diagnostics: SolverDiagnostics,
    /// The audit step recording this determination.
    pub audit_step: AuditStep,
}

/// Picks a tier from `table` given the gross salary each candidate rate yields.
///
/// Thresholds are compared against the monthly SMIC multiples; a gross
/// exactly at the reduced threshold stays in the reduced tier.
pub fn tiered_rate<F>(table: &TieredRates, smic_monthly: Decimal, gross_at_rate: F) -> (Decimal, RateScenario)
where
    F: Fn(Decimal) -> Decimal,
{
    let reduced_ceiling = table.reduced_smic_multiple * smic_monthly;
    if gross_at_rate(table.reduced_rate) <= reduced_ceiling {
        return (table.reduced_rate, RateScenario::TieredReduced);
    }

    if let Some(surcharge) = table.surcharge {
        let standard_gross = gross_at_rate(table.standard_rate);
        if standard_gross > surcharge.smic_multiple * smic_monthly {
            return (
                table.standard_rate + surcharge.increment,
                RateScenario::TieredSurcharge,
            );
        }
    }

    (table.standard_rate, RateScenario::TieredStandard)
}

fn iterate(frame: &SalaryFrame, config: &SalaryConfiguration) -> SolverDiagnostics {
    let settings = config.solver;
    let mut rate = settings.seed_rate;
    let mut iterations = 0;
    let mut converged = false;

    while iterations < settings.max_iterations {
        iterations += 1;
        let pool = frame.pool_at(rate);
        let realized = realized_rate(pool, frame, config);
        debug!(
            iteration = iterations,
            estimate = %rate,
            realized = %realized,
            "Charge rate iteration"
        );

        let settled = (realized - rate).abs() < settings.tolerance;
        rate = realized;
        if settled {
            converged = true;
            break;
        }
        if rate > RATE_DIVERGENCE_LIMIT {
            break;
        }
    }

    if !converged {
        warn!(
            iterations,
            rate = %rate,
            "Charge rate did not converge"
        );
    }

    SolverDiagnostics {
        applied_rate: rate,
        scenario: RateScenario::Iterative,
        iterations,
        converged,
    }
}

/// Determines the aggregate employer charge rate for a simulation.
///
/// A non-zero `charge_rate_override` is used as-is whatever the strategy.
///
/// # Examples
///
/// ```
/// use portage_engine::calculation::{SalaryFrame, solve_charge_rate};
/// use portage_engine::config::SalaryConfiguration;
/// use portage_engine::models::RateScenario;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let mut config = SalaryConfiguration::default();
/// config.charge_rate_override = Decimal::from_str("0.60").unwrap();
///
/// let frame = SalaryFrame {
///     salary_budget: Decimal::from(9025),
///     base_salary: Decimal::from(2374),
///     bonus: Decimal::from_str("118.70").unwrap(),
///     reserve_gross: Decimal::from_str("237.40").unwrap(),
///     mutual_employer_share: Decimal::from_str("30.04").unwrap(),
///     meal_voucher_employer_share: Decimal::ZERO,
///     large_employer: false,
/// };
///
/// let solution = solve_charge_rate(&frame, &config, 3);
/// assert_eq!(solution.diagnostics.scenario, RateScenario::ManualOverride);
/// assert_eq!(solution.diagnostics.applied_rate, Decimal::from_str("0.60").unwrap());
/// ```
pub fn solve_charge_rate(
    frame: &SalaryFrame,
    config: &SalaryConfiguration,
    step_number: u32,
) -> RateSolution {
    let diagnostics = if config.charge_rate_override > Decimal::ZERO {
        SolverDiagnostics {
            applied_rate: config.charge_rate_override,
            scenario: RateScenario::ManualOverride,
            iterations: 0,
            converged: true,
        }
    } else {
        match config.strategy {
            RateStrategy::Iterative => iterate(frame, config),
            RateStrategy::Tiered(table) => {
                let (applied_rate, scenario) = tiered_rate(&table, config.smic_monthly, |rate| {
                    frame.gross_at(frame.pool_at(rate), config.paid_leave_rate)
                });
                SolverDiagnostics {
                    applied_rate,
                    scenario,
                    iterations: 0,
                    converged: true,
                }
            }
        }
    };

    let reasoning = match diagnostics.scenario {
        RateScenario::ManualOverride => format!(
            "Manual override: aggregate rate fixed at {}",
            diagnostics.applied_rate.normalize()
        ),
        RateScenario::Iterative if diagnostics.converged => format!(
            "Converged to {} after {} iteration(s) from seed {}",
            diagnostics.applied_rate.round_dp(6),
            diagnostics.iterations,
            config.solver.seed_rate.normalize()
        ),
        RateScenario::Iterative => format!(
            "Stopped at {} after {} iteration(s) without converging; last estimate kept",
            diagnostics.applied_rate.round_dp(6),
            diagnostics.iterations
        ),
        scenario => format!(
            "Tier {} selected: aggregate rate {}",
            scenario.label(),
            diagnostics.applied_rate.normalize()
        ),
    };

    RateSolution {
        audit_step: AuditStep {
            step_number,
            rule_id: "charge_rate".to_string(),
            rule_name: "Aggregate Charge Rate".to_string(),
            legal_ref: "Portage company policy".to_string(),
            input: serde_json::json!({
                "salary_budget": frame.salary_budget.round_dp(2).to_string(),
                "override": config.charge_rate_override.normalize().to_string(),
                "seed_rate": config.solver.seed_rate.normalize().to_string(),
                "max_iterations": config.solver.max_iterations
            }),
            output: serde_json::json!({
                "applied_rate": diagnostics.applied_rate.round_dp(8).to_string(),
                "scenario": diagnostics.scenario,
                "iterations": diagnostics.iterations,
                "converged": diagnostics.converged
            }),
            reasoning,
        },
        diagnostics,
    }
}
