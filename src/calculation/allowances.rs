//! Reimbursed expense allowances and meal vouchers.
//!
//! Kilometric and business-travel allowances follow the URSSAF scales loaded
//! from `allowances.yaml`; telework and meal-voucher rates come from the
//! salary configuration.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{AllowanceScales, BenefitRates, DistanceBand, VehicleKind};
use crate::error::{EngineError, EngineResult};

/// Location of business-travel nights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelZone {
    /// Outside Paris and Île-de-France.
    #[default]
    Province,
    /// Paris and Île-de-France.
    Paris,
}

/// Computes the kilometric allowance for the month.
///
/// The per-km rate is taken from the vehicle's scale for its fiscal power
/// and the annual distance band.
///
/// # Errors
///
/// Returns `AllowanceScaleNotFound` when the scale has no entry for the
/// fiscal power.
///
/// # Examples
///
/// ```no_run
/// use portage_engine::calculation::kilometric_allowance;
/// use portage_engine::config::{ConfigLoader, DistanceBand, VehicleKind};
/// use rust_decimal::Decimal;
///
/// let loader = ConfigLoader::load("./config/portage")?;
/// let amount = kilometric_allowance(
///     loader.allowances(),
///     VehicleKind::Car,
///     5,
///     DistanceBand::First,
///     Decimal::from(100),
/// )?;
/// assert_eq!(amount, Decimal::new(636, 1));
/// # Ok::<(), portage_engine::error::EngineError>(())
/// ```
pub fn kilometric_allowance(
    scales: &AllowanceScales,
    vehicle: VehicleKind,
    fiscal_power: u8,
    band: DistanceBand,
    distance_km: Decimal,
) -> EngineResult<Decimal> {
    let scale = scales
        .kilometric(vehicle)
        .bands
        .iter()
        .find(|b| b.fiscal_power == fiscal_power)
        .ok_or_else(|| EngineError::AllowanceScaleNotFound {
            vehicle: vehicle.as_str().to_string(),
            fiscal_power,
        })?;

    let rate = match band {
        DistanceBand::First => scale.rates[0],
        DistanceBand::Second => scale.rates[1],
        DistanceBand::Third => scale.rates[2],
    };

    Ok(distance_km.max(Decimal::ZERO) * rate)
}

/// Computes the business-travel (IGD) allowance: meals plus nights at the
/// zone's rate.
pub fn travel_allowance(scales: &AllowanceScales, meals: u32, nights: u32, zone: TravelZone) -> Decimal {
    let night_rate = match zone {
        TravelZone::Province => scales.travel.night_province,
        TravelZone::Paris => scales.travel.night_paris,
    };

    Decimal::from(meals) * scales.travel.meal + Decimal::from(nights) * night_rate
}

/// Returns the telework days actually allowed and the flat allowance for them.
///
/// # Examples
///
/// ```
/// use portage_engine::calculation::telework_allowance;
/// use portage_engine::config::SalaryConfiguration;
/// use rust_decimal::Decimal;
///
/// let rates = SalaryConfiguration::default().benefits;
/// let (days, amount) = telework_allowance(30, &rates);
/// assert_eq!(days, 22);
/// assert_eq!(amount, Decimal::new(594, 1));
/// ```
pub fn telework_allowance(days: u32, rates: &BenefitRates) -> (u32, Decimal) {
    let allowed = days.min(rates.telework_max_days);
    (allowed, Decimal::from(allowed) * rates.telework_daily_rate)
}

/// Employer and employee shares of the month's meal vouchers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MealVoucherShares {
    /// Employer share, added to employer charges.
    pub employer: Decimal,
    /// Employee share, withheld from net pay.
    pub employee: Decimal,
}

/// Computes meal-voucher shares for `count` vouchers.
pub fn meal_voucher_shares(count: u32, rates: &BenefitRates) -> MealVoucherShares {
    let count = Decimal::from(count);
    MealVoucherShares {
        employer: count * rates.meal_voucher_employer_share,
        employee: count * rates.meal_voucher_employee_share,
    }
}
