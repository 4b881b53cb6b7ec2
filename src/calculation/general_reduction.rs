//! Degressive general reduction of employer charges (RGDU).
//!
//! The reduction applies to salaries below a multiple of the minimum wage
//! (3 × SMIC in 2026), as per article L241-13 of the Social Security Code.

use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::config::ReductionParameters;
use crate::models::AuditStep;

/// Regulatory reference for the general reduction.
pub const GENERAL_REDUCTION_REF: &str = "CSS L241-13";

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// The result of the general reduction calculation.
#[derive(Debug, Clone)]
pub struct GeneralReductionResult {
    /// The monthly reduction amount.
    pub reduction: Decimal,
    /// The coefficient applied to the monthly gross, rounded to 4 decimals.
    pub coefficient: Decimal,
    /// The audit step recording this calculation.
    pub audit_step: AuditStep,
}

/// `x^1.75`, computed as `x × √x × ⁴√x`.
fn pow_one_point_seven_five(x: Decimal) -> Decimal {
    let root = x.sqrt().unwrap_or(Decimal::ZERO);
    let fourth_root = root.sqrt().unwrap_or(Decimal::ZERO);
    x * root * fourth_root
}

/// Calculates the degressive general reduction for a monthly gross salary.
///
/// # Formula
///
/// With annual gross `G` and annual SMIC `S`:
/// - `G ≥ 3S` ⇒ no reduction.
/// - otherwise `C = Tmin + Tdelta × (½ × (3S/G − 1))^1.75`, capped at
///   `Tmin + Tdelta` and rounded to 4 decimals; reduction = monthly gross × C.
///
/// `Tdelta` depends on the workforce size (housing-fund bracket). A zero
/// gross yields no reduction.
///
/// # Examples
///
/// ```
/// use portage_engine::calculation::calculate_general_reduction;
/// use portage_engine::config::SalaryConfiguration;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let config = SalaryConfiguration::default();
/// let result = calculate_general_reduction(
///     Decimal::from(2000),
///     config.smic_monthly,
///     false,
///     &config.reduction,
///     1,
/// );
///
/// assert_eq!(result.coefficient, Decimal::from_str("0.3147").unwrap());
/// assert_eq!(result.reduction, Decimal::from_str("629.40").unwrap());
/// ```
pub fn calculate_general_reduction(
    monthly_gross: Decimal,
    smic_monthly: Decimal,
    large_employer: bool,
    params: &ReductionParameters,
    step_number: u32,
) -> GeneralReductionResult {
    let annual_smic = smic_monthly * MONTHS_PER_YEAR;
    let annual_gross = monthly_gross * MONTHS_PER_YEAR;
    let ceiling = params.smic_multiple * annual_smic;
    let t_delta = if large_employer {
        params.t_delta_large_employer
    } else {
        params.t_delta_small_employer
    };

    let input = serde_json::json!({
        "monthly_gross": monthly_gross.round_dp(2).to_string(),
        "annual_gross": annual_gross.round_dp(2).to_string(),
        "annual_smic": annual_smic.round_dp(2).to_string(),
        "smic_multiple": params.smic_multiple.normalize().to_string(),
        "t_min": params.t_min.normalize().to_string(),
        "t_delta": t_delta.normalize().to_string(),
        "large_employer": large_employer
    });

    let no_reduction = |reasoning: String| GeneralReductionResult {
        reduction: Decimal::ZERO,
        coefficient: Decimal::ZERO,
        audit_step: AuditStep {
            step_number,
            rule_id: "general_reduction".to_string(),
            rule_name: "General Reduction".to_string(),
            legal_ref: GENERAL_REDUCTION_REF.to_string(),
            input: input.clone(),
            output: serde_json::json!({
                "applied": false,
                "coefficient": "0",
                "reduction": "0.00"
            }),
            reasoning,
        },
    };

    if annual_gross >= ceiling {
        return no_reduction(format!(
            "Annual gross {} is at or above {} × annual SMIC ({}) - no reduction",
            annual_gross.round_dp(2),
            params.smic_multiple.normalize(),
            ceiling.round_dp(2)
        ));
    }

    if annual_gross <= Decimal::ZERO {
        return no_reduction("No gross salary - no reduction".to_string());
    }

    let ratio = ceiling / annual_gross - Decimal::ONE;
    if ratio <= Decimal::ZERO {
        return no_reduction("Ceiling ratio is not positive - no reduction".to_string());
    }

    let base = ratio / dec!(2);
    let cap = params.t_min + t_delta;
    let coefficient = (params.t_min + t_delta * pow_one_point_seven_five(base))
        .min(cap)
        .round_dp(4);
    let reduction = monthly_gross * coefficient;

    GeneralReductionResult {
        reduction,
        coefficient,
        audit_step: AuditStep {
            step_number,
            rule_id: "general_reduction".to_string(),
            rule_name: "General Reduction".to_string(),
            legal_ref: GENERAL_REDUCTION_REF.to_string(),
            input,
            output: serde_json::json!({
                "applied": true,
                "coefficient": coefficient.normalize().to_string(),
                "capped": coefficient >= cap.round_dp(4),
                "reduction": reduction.round_dp(2).to_string()
            }),
            reasoning: format!(
                "{} + {} × ({} / 2)^1.75 = {} ; €{} × {} = €{}",
                params.t_min.normalize(),
                t_delta.normalize(),
                ratio.round_dp(6),
                coefficient.normalize(),
                monthly_gross.round_dp(2),
                coefficient.normalize(),
                reduction.round_dp(2)
            ),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SalaryConfiguration;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn params() -> ReductionParameters {
        SalaryConfiguration::default().reduction
    }

    #[test]
    fn test_gross_at_three_smic_has_no_reduction() {
        let smic = dec("1823.03");
        let result = calculate_general_reduction(smic * dec("3"), smic, false, &params(), 1);

        assert_eq!(result.reduction, Decimal::ZERO);
        assert_eq!(result.audit_step.output["applied"], false);
    }

    #[test]
    fn test_gross_above_three_smic_has_no_reduction() {
        let result = calculate_general_reduction(dec("6004.77"), dec("1823.03"), true, &params(), 1);

        assert_eq!(result.reduction, Decimal::ZERO);
        assert!(result.audit_step.reasoning.contains("no reduction"));
    }

    #[test]
    fn test_zero_gross_is_guarded() {
        let result = calculate_general_reduction(Decimal::ZERO, dec("1823.03"), false, &params(), 1);

        assert_eq!(result.reduction, Decimal::ZERO);
        assert_eq!(result.coefficient, Decimal::ZERO);
    }

    #[test]
    fn test_gross_at_smic_is_capped_large_employer() {
        let smic = dec("1823.03");
        let result = calculate_general_reduction(smic, smic, true, &params(), 1);

        // ratio = 2, base = 1, coefficient capped at 0.02 + 0.3821
        assert_eq!(result.coefficient, dec("0.4021"));
        assert_eq!(result.reduction, dec("733.040363"));
        assert_eq!(result.audit_step.output["capped"], true);
    }

    #[test]
    fn test_gross_at_smic_small_employer_uses_smaller_delta() {
        let smic = dec("1823.03");
        let result = calculate_general_reduction(smic, smic, false, &params(), 1);

        assert_eq!(result.coefficient, dec("0.3981"));
        assert_eq!(result.reduction, dec("725.748243"));
    }

    #[test]
    fn test_degressive_coefficient_between_bounds() {
        let result = calculate_general_reduction(dec("2000"), dec("1823.03"), false, &params(), 3);

        assert_eq!(result.coefficient, dec("0.3147"));
        assert_eq!(result.reduction, dec("629.4"));
        assert_eq!(result.audit_step.step_number, 3);
        assert_eq!(result.audit_step.legal_ref, "CSS L241-13");
    }

    #[test]
    fn test_reduction_decreases_as_gross_rises() {
        let low = calculate_general_reduction(dec("2000"), dec("1823.03"), false, &params(), 1);
        let high = calculate_general_reduction(dec("4000"), dec("1823.03"), false, &params(), 1);

        assert!(high.coefficient < low.coefficient);
        assert!(high.coefficient > dec("0.02"));
    }
}
