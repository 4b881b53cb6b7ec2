//! Request types for the portage simulation API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculation::TravelZone;
use crate::config::{ConfigurationUpdate, DistanceBand, VehicleKind};
use crate::models::SimulationInput;

/// Request body for the `/simulate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationRequest {
    /// Date selecting the regulatory year; the latest year when absent.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    /// The simulation parameters.
    pub input: SimulationInput,
    /// Mileage claim; replaces `input.kilometric_allowance` when present.
    #[serde(default)]
    pub mileage: Option<MileageClaim>,
    /// Business-travel claim; replaces `input.per_diem_allowance` when present.
    #[serde(default)]
    pub travel: Option<TravelClaim>,
    /// Edits applied on top of the regulatory year's configuration.
    #[serde(default)]
    pub configuration: Option<ConfigurationUpdate>,
}

/// Kilometres driven with a personal vehicle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MileageClaim {
    /// The vehicle kind.
    pub vehicle: VehicleKind,
    /// Fiscal horsepower (CV).
    pub fiscal_power: u8,
    /// Annual distance band.
    pub band: DistanceBand,
    /// Kilometres driven this month.
    pub distance_km: Decimal,
}

/// Meals and nights spent away on business.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TravelClaim {
    /// Meals taken away.
    #[serde(default)]
    pub meals: u32,
    /// Nights spent away.
    #[serde(default)]
    pub nights: u32,
    /// Where the nights were spent.
    #[serde(default)]
    pub zone: TravelZone,
}

/// Request body for the `/contributions/evaluate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationRequest {
    /// The gross salary to evaluate.
    pub gross: Decimal,
    /// Date selecting the regulatory year; the latest year when absent.
    #[serde(default)]
    pub effective_date: Option<NaiveDate>,
    /// Whether the employer has 50 or more employees.
    #[serde(default)]
    pub large_employer: bool,
    /// Employer welfare contributions added to the CSG base; derived from
    /// the gross salary and the mutual contract when absent.
    #[serde(default)]
    pub employer_welfare_base: Option<Decimal>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_deserialize_minimal_simulation_request() {
        let json = r#"{
            "input": {
                "daily_rate": "500",
                "days_per_month": "19"
            }
        }"#;

        let request: SimulationRequest = serde_json::from_str(json).unwrap();
        assert!(request.effective_date.is_none());
        assert!(request.mileage.is_none());
        assert_eq!(request.input.days_per_week, Decimal::from(5));
        assert!(request.input.reserve_active);
        assert!(request.input.mutual_insurance_active);
        assert!(!request.input.large_employer);
    }

    #[test]
    fn test_deserialize_full_simulation_request() {
        let json = r#"{
            "effective_date": "2025-06-01",
            "input": {
                "daily_rate": "250",
                "days_per_month": "18",
                "days_per_week": "4",
                "telework_days": 5,
                "meal_vouchers": 10,
                "reserve_active": false
            },
            "mileage": {
                "vehicle": "car",
                "fiscal_power": 5,
                "band": "first",
                "distance_km": "100"
            },
            "travel": {
                "meals": 2,
                "nights": 1,
                "zone": "paris"
            },
            "configuration": {
                "management_fee_rate": "0.07",
                "complement_split": { "kind": "fixed_ratio", "divisor": "1.05" }
            }
        }"#;

        let request: SimulationRequest = serde_json::from_str(json).unwrap();
        assert_eq!(request.effective_date, NaiveDate::from_ymd_opt(2025, 6, 1));
        assert!(!request.input.reserve_active);
        assert_eq!(request.input.telework_days, 5);

        let mileage = request.mileage.unwrap();
        assert_eq!(mileage.vehicle, VehicleKind::Car);
        assert_eq!(mileage.band, DistanceBand::First);

        let travel = request.travel.unwrap();
        assert_eq!(travel.zone, TravelZone::Paris);

        let update = request.configuration.unwrap();
        assert_eq!(update.management_fee_rate, Some(Decimal::from_str("0.07").unwrap()));
        assert!(update.pmss.is_none());
    }

    #[test]
    fn test_travel_zone_defaults_to_province() {
        let claim: TravelClaim = serde_json::from_str(r#"{"meals": 3}"#).unwrap();

        assert_eq!(claim.zone, TravelZone::Province);
        assert_eq!(claim.nights, 0);
    }

    #[test]
    fn test_deserialize_evaluation_request() {
        let request: EvaluationRequest = serde_json::from_str(r#"{"gross": "3000"}"#).unwrap();

        assert_eq!(request.gross, Decimal::from(3000));
        assert!(!request.large_employer);
        assert!(request.employer_welfare_base.is_none());
    }
}
