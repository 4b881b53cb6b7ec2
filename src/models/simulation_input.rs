//! Simulation input model.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The parameters of one payslip simulation.
///
/// Expense amounts are monthly euro amounts already computed by the caller
/// (see [`crate::calculation::kilometric_allowance`] and
/// [`crate::calculation::travel_allowance`] for the URSSAF scales).
///
/// # Example
///
/// ```
/// use portage_engine::models::SimulationInput;
/// use rust_decimal::Decimal;
///
/// let input = SimulationInput::new(Decimal::from(500), Decimal::from(19));
/// assert_eq!(input.days_per_week, Decimal::from(5));
/// assert!(input.reserve_active);
/// assert!(input.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationInput {
    /// Daily billing rate charged to the client.
    pub daily_rate: Decimal,
    /// Days billed in the month.
    pub days_per_month: Decimal,
    /// Contractual days per week; below 5 prorates the fixed base salary.
    #[serde(default = "default_days_per_week")]
    pub days_per_week: Decimal,
    /// Kilometric allowance for the month.
    #[serde(default)]
    pub kilometric_allowance: Decimal,
    /// Business-travel per-diem allowance (meals and nights) for the month.
    #[serde(default)]
    pub per_diem_allowance: Decimal,
    /// Other flat reimbursed expenses (phone, transport, ...).
    #[serde(default)]
    pub other_expenses: Decimal,
    /// Telecommuting days in the month.
    #[serde(default)]
    pub telework_days: u32,
    /// Number of meal vouchers issued in the month.
    #[serde(default)]
    pub meal_vouchers: u32,
    /// Intermediation fee as a fraction of turnover.
    #[serde(default)]
    pub intermediation_fee_rate: Decimal,
    /// Whether the financial reserve is provisioned.
    #[serde(default = "default_true")]
    pub reserve_active: bool,
    /// Whether the employee is covered by the mutual health insurance.
    #[serde(default = "default_true")]
    pub mutual_insurance_active: bool,
    /// Whether the employer has 50 or more employees.
    #[serde(default)]
    pub large_employer: bool,
    /// Whether the degressive general reduction is applied.
    #[serde(default = "default_true")]
    pub general_reduction_active: bool,
}

fn default_days_per_week() -> Decimal {
    Decimal::from(5)
}

fn default_true() -> bool {
    true
}

impl SimulationInput {
    /// Creates a full-time input with no expenses and the default toggles.
    pub fn new(daily_rate: Decimal, days_per_month: Decimal) -> Self {
        Self {
            daily_rate,
            days_per_month,
            days_per_week: default_days_per_week(),
            kilometric_allowance: Decimal::ZERO,
            per_diem_allowance: Decimal::ZERO,
            other_expenses: Decimal::ZERO,
            telework_days: 0,
            meal_vouchers: 0,
            intermediation_fee_rate: Decimal::ZERO,
            reserve_active: true,
            mutual_insurance_active: true,
            large_employer: false,
            general_reduction_active: true,
        }
    }

    /// Checks the form-level contract: every amount is non-negative and the
    /// weekly contract fits in a week.
    pub fn validate(&self) -> EngineResult<()> {
        let amounts = [
            ("daily_rate", self.daily_rate),
            ("days_per_month", self.days_per_month),
            ("days_per_week", self.days_per_week),
            ("kilometric_allowance", self.kilometric_allowance),
            ("per_diem_allowance", self.per_diem_allowance),
            ("other_expenses", self.other_expenses),
            ("intermediation_fee_rate", self.intermediation_fee_rate),
        ];

        for (field, value) in amounts {
            if value < Decimal::ZERO {
                return Err(EngineError::InvalidInput {
                    field: field.to_string(),
                    message: format!("must not be negative (got {})", value),
                });
            }
        }

        if self.days_per_week > Decimal::from(7) {
            return Err(EngineError::InvalidInput {
                field: "days_per_week".to_string(),
                message: format!("cannot exceed 7 (got {})", self.days_per_week),
            });
        }

        if self.intermediation_fee_rate > Decimal::ONE {
            return Err(EngineError::InvalidInput {
                field: "intermediation_fee_rate".to_string(),
                message: format!(
                    "must be a fraction of turnover (got {})",
                    self.intermediation_fee_rate
                ),
            });
        }

        Ok(())
    }

    /// Total of the reimbursed expenses supplied as amounts.
    ///
    /// The telework allowance is derived from `telework_days` by the solver
    /// and is not part of this sum.
    pub fn claimed_expenses(&self) -> Decimal {
        self.kilometric_allowance + self.per_diem_allowance + self.other_expenses
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
    fn test_new_uses_full_time_defaults() {
        let input = SimulationInput::new(dec("500"), dec("19"));

        assert_eq!(input.days_per_week, dec("5"));
        assert!(input.reserve_active);
        assert!(input.mutual_insurance_active);
        assert!(input.general_reduction_active);
        assert!(!input.large_employer);
        assert_eq!(input.claimed_expenses(), Decimal::ZERO);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let input: SimulationInput =
            serde_json::from_str(r#"{"daily_rate": "450", "days_per_month": "18"}"#).unwrap();

        assert_eq!(input, SimulationInput::new(dec("450"), dec("18")));
    }

    #[test]
    fn test_validate_rejects_negative_amount() {
        let mut input = SimulationInput::new(dec("500"), dec("19"));
        input.other_expenses = dec("-10");

        match input.validate() {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "other_expenses"),
            other => panic!("Expected InvalidInput, got {:?}", other),
        }
    }

    #[test]
    fn test_validate_rejects_more_than_seven_days_per_week() {
        let mut input = SimulationInput::new(dec("500"), dec("19"));
        input.days_per_week = dec("7.5");

        assert!(input.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_intermediation_above_one() {
        let mut input = SimulationInput::new(dec("500"), dec("19"));
        input.intermediation_fee_rate = dec("2");

        assert!(input.validate().is_err());
    }

    #[test]
    fn test_claimed_expenses_sums_amounts() {
        let mut input = SimulationInput::new(dec("500"), dec("19"));
        input.kilometric_allowance = dec("63.60");
        input.per_diem_allowance = dec("43.20");
        input.other_expenses = dec("30");

        assert_eq!(input.claimed_expenses(), dec("136.80"));
    }
}
