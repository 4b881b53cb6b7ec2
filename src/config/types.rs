//! Configuration types for payslip simulation.
//!
//! This module contains the strongly-typed configuration structures that
//! are deserialized from YAML configuration files, together with the
//! [`SalaryConfiguration`] defaults for the 2026 regulatory year.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Metadata about the portage scheme.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SchemeMetadata {
    /// Short code of the scheme (e.g., "PORTAGE-FR").
    pub code: String,
    /// The human-readable name of the scheme.
    pub name: String,
    /// The version of the configuration set.
    pub version: String,
    /// URL to the reference documentation.
    pub source_url: String,
}

/// Housing fund (FNAL) employer rates by workforce size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct HousingFundRates {
    /// Rate for employers with fewer than 50 employees.
    pub small_employer: Decimal,
    /// Rate for employers with 50 employees or more.
    pub large_employer: Decimal,
}

impl HousingFundRates {
    /// Selects the rate for the workforce size.
    pub fn rate_for(&self, large_employer: bool) -> Decimal {
        if large_employer {
            self.large_employer
        } else {
            self.small_employer
        }
    }
}

/// Mutual health insurance contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct MutualInsurance {
    /// Monthly premium as a fraction of the PMSS.
    pub rate_of_pmss: Decimal,
    /// Employer share of the premium.
    pub employer_share: Decimal,
}

/// Parameters of the degressive general reduction (RGDU).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct ReductionParameters {
    /// Minimum coefficient.
    pub t_min: Decimal,
    /// Coefficient spread for employers with fewer than 50 employees.
    pub t_delta_small_employer: Decimal,
    /// Coefficient spread for employers with 50 employees or more.
    pub t_delta_large_employer: Decimal,
    /// Annual gross ceiling as a multiple of the annual SMIC.
    pub smic_multiple: Decimal,
}

/// Flat benefits paid or withheld alongside the salary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct BenefitRates {
    /// Telework allowance per day.
    pub telework_daily_rate: Decimal,
    /// Maximum telework days allowed per month.
    pub telework_max_days: u32,
    /// Employer share of one meal voucher.
    pub meal_voucher_employer_share: Decimal,
    /// Employee share of one meal voucher.
    pub meal_voucher_employee_share: Decimal,
}

/// Surcharge tier of a tiered rate table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SurchargeTier {
    /// Gross salary above this multiple of the monthly SMIC takes the surcharge.
    pub smic_multiple: Decimal,
    /// Added to the standard rate.
    pub increment: Decimal,
}

/// A small table of aggregate employer rates keyed to SMIC multiples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct TieredRates {
    /// Aggregate rate of the reduced tier.
    pub reduced_rate: Decimal,
    /// Gross salary at or below this multiple of the monthly SMIC is reduced.
    pub reduced_smic_multiple: Decimal,
    /// Aggregate rate of the standard tier.
    pub standard_rate: Decimal,
    /// Optional surcharge tier.
    #[serde(default)]
    pub surcharge: Option<SurchargeTier>,
}

impl Default for TieredRates {
    fn default() -> Self {
        Self {
            reduced_rate: dec!(0.42),
            reduced_smic_multiple: dec!(1.6),
            standard_rate: dec!(0.55),
            surcharge: Some(SurchargeTier {
                smic_multiple: dec!(3.5),
                increment: dec!(0.02),
            }),
        }
    }
}

/// How the aggregate charge rate is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RateStrategy {
    /// Fixed-point iteration against the full contribution table.
    #[default]
    Iterative,
    /// Single-pass lookup in a tiered rate table.
    Tiered(TieredRates),
}

/// How the complement is split between remuneration and business referral.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ComplementSplit {
    /// remuneration = complement ÷ (1 + bonus rate).
    #[default]
    BonusRate,
    /// remuneration = complement ÷ divisor (earlier years used 1.05).
    FixedRatio {
        /// The divisor applied to the complement.
        divisor: Decimal,
    },
}

/// Settings of the fixed-point iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SolverSettings {
    /// Initial aggregate rate estimate.
    pub seed_rate: Decimal,
    /// Iteration cap.
    pub max_iterations: u32,
    /// Absolute tolerance between two successive estimates.
    pub tolerance: Decimal,
}

impl Default for SolverSettings {
    fn default() -> Self {
        Self {
            seed_rate: dec!(0.55),
            max_iterations: 50,
            tolerance: dec!(0.00001),
        }
    }
}

/// Settings read at the start of every simulation.
///
/// Passed explicitly to [`crate::calculation::solve_salary`]; mutate it
/// through [`SalaryConfiguration::apply`].
///
/// # Example
///
/// ```
/// use portage_engine::config::{ConfigurationUpdate, SalaryConfiguration};
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let mut config = SalaryConfiguration::default();
/// assert_eq!(config.pmss, Decimal::from_str("4005").unwrap());
///
/// config.apply(ConfigurationUpdate {
///     management_fee_rate: Some(Decimal::from_str("0.07").unwrap()),
///     ..Default::default()
/// });
/// assert_eq!(config.management_fee_rate, Decimal::from_str("0.07").unwrap());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct SalaryConfiguration {
    /// Full-time fixed base salary.
    pub base_salary: Decimal,
    /// Management fees as a fraction of turnover.
    pub management_fee_rate: Decimal,
    /// Business-referral bonus as a fraction of base salary.
    pub bonus_rate: Decimal,
    /// Paid-leave allowance rate.
    pub paid_leave_rate: Decimal,
    /// Financial reserve as a fraction of base salary.
    pub reserve_rate: Decimal,
    /// Monthly social-security ceiling.
    pub pmss: Decimal,
    /// Monthly gross minimum wage.
    pub smic_monthly: Decimal,
    /// Workplace accident (AT/MP) employer rate.
    pub workplace_accident_rate: Decimal,
    /// Housing fund rates.
    pub housing_fund: HousingFundRates,
    /// Mutual health insurance contract.
    pub mutual_insurance: MutualInsurance,
    /// Flat levy on employer welfare contributions.
    pub welfare_levy_rate: Decimal,
    /// Aggregate charge rate forced by the user; zero means solve it.
    #[serde(default)]
    pub charge_rate_override: Decimal,
    /// General reduction parameters.
    pub reduction: ReductionParameters,
    /// Telework and meal-voucher rates.
    pub benefits: BenefitRates,
    /// Rate determination strategy.
    #[serde(default)]
    pub strategy: RateStrategy,
    /// Complement split policy.
    #[serde(default)]
    pub complement_split: ComplementSplit,
    /// Fixed-point iteration settings.
    #[serde(default)]
    pub solver: SolverSettings,
}

impl Default for SalaryConfiguration {
    fn default() -> Self {
        Self {
            base_salary: dec!(2374.00),
            management_fee_rate: dec!(0.05),
            bonus_rate: dec!(0.05),
            paid_leave_rate: dec!(0.10),
            reserve_rate: dec!(0.10),
            pmss: dec!(4005),
            smic_monthly: dec!(1823.03),
            workplace_accident_rate: dec!(0.0064),
            housing_fund: HousingFundRates {
                small_employer: dec!(0.0010),
                large_employer: dec!(0.0050),
            },
            mutual_insurance: MutualInsurance {
                rate_of_pmss: dec!(0.015),
                employer_share: dec!(0.50),
            },
            welfare_levy_rate: dec!(0.08),
            charge_rate_override: Decimal::ZERO,
            reduction: ReductionParameters {
                t_min: dec!(0.02),
                t_delta_small_employer: dec!(0.3781),
                t_delta_large_employer: dec!(0.3821),
                smic_multiple: dec!(3.0),
            },
            benefits: BenefitRates {
                telework_daily_rate: dec!(2.70),
                telework_max_days: 22,
                meal_voucher_employer_share: dec!(7.18),
                meal_voucher_employee_share: dec!(7.18),
            },
            strategy: RateStrategy::Iterative,
            complement_split: ComplementSplit::BonusRate,
            solver: SolverSettings::default(),
        }
    }
}

/// A partial edit of [`SalaryConfiguration`]; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConfigurationUpdate {
    /// New full-time base salary.
    pub base_salary: Option<Decimal>,
    /// New management fee rate.
    pub management_fee_rate: Option<Decimal>,
    /// New bonus rate.
    pub bonus_rate: Option<Decimal>,
    /// New paid-leave rate.
    pub paid_leave_rate: Option<Decimal>,
    /// New reserve rate.
    pub reserve_rate: Option<Decimal>,
    /// New PMSS.
    pub pmss: Option<Decimal>,
    /// New monthly SMIC.
    pub smic_monthly: Option<Decimal>,
    /// New AT/MP rate.
    pub workplace_accident_rate: Option<Decimal>,
    /// New mutual premium as a fraction of the PMSS.
    pub mutual_rate_of_pmss: Option<Decimal>,
    /// New mutual employer share.
    pub mutual_employer_share: Option<Decimal>,
    /// New manual charge rate override (zero re-enables solving).
    pub charge_rate_override: Option<Decimal>,
    /// New rate strategy.
    pub strategy: Option<RateStrategy>,
    /// New complement split policy.
    pub complement_split: Option<ComplementSplit>,
}

impl SalaryConfiguration {
    /// Applies a configuration edit in place.
    pub fn apply(&mut self, update: ConfigurationUpdate) {
        if let Some(value) = update.base_salary {
            self.base_salary = value;
        }
        if let Some(value) = update.management_fee_rate {
            self.management_fee_rate = value;
        }
        if let Some(value) = update.bonus_rate {
            self.bonus_rate = value;
        }
        if let Some(value) = update.paid_leave_rate {
            self.paid_leave_rate = value;
        }
        if let Some(value) = update.reserve_rate {
            self.reserve_rate = value;
        }
        if let Some(value) = update.pmss {
            self.pmss = value;
        }
        if let Some(value) = update.smic_monthly {
            self.smic_monthly = value;
        }
        if let Some(value) = update.workplace_accident_rate {
            self.workplace_accident_rate = value;
        }
        if let Some(value) = update.mutual_rate_of_pmss {
            self.mutual_insurance.rate_of_pmss = value;
        }
        if let Some(value) = update.mutual_employer_share {
            self.mutual_insurance.employer_share = value;
        }
        if let Some(value) = update.charge_rate_override {
            self.charge_rate_override = value;
        }
        if let Some(value) = update.strategy {
            self.strategy = value;
        }
        if let Some(value) = update.complement_split {
            self.complement_split = value;
        }
    }
}

/// One regulatory year: a configuration and the date it takes effect.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegulatoryYear {
    /// The effective date for this configuration.
    pub effective_date: NaiveDate,
    /// The configuration values.
    pub configuration: SalaryConfiguration,
}

/// Vehicle kinds covered by the kilometric scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleKind {
    /// Passenger car.
    Car,
    /// Motorcycle.
    Motorcycle,
}

impl VehicleKind {
    /// Returns the snake_case name used in configuration files.
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleKind::Car => "car",
            VehicleKind::Motorcycle => "motorcycle",
        }
    }
}

/// Annual distance band of the kilometric scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceBand {
    /// Up to the first threshold (5,000 km for cars, 3,000 km for motorcycles).
    First,
    /// Between the two thresholds.
    Second,
    /// Beyond the second threshold.
    Third,
}

/// Per-km rates for one fiscal power.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KilometricBand {
    /// Fiscal horsepower (CV).
    pub fiscal_power: u8,
    /// Per-km rate for each distance band, in band order.
    pub rates: [Decimal; 3],
}

/// Kilometric scale for one vehicle kind.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct KilometricScale {
    /// Annual distance thresholds separating the three bands.
    pub thresholds_km: [u32; 2],
    /// Rates by fiscal power.
    pub bands: Vec<KilometricBand>,
}

/// Business-travel per-diem rates.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct TravelRates {
    /// Allowance per meal.
    pub meal: Decimal,
    /// Allowance per night outside Paris/IDF.
    pub night_province: Decimal,
    /// Allowance per night in Paris/IDF.
    pub night_paris: Decimal,
}

/// Expense allowance scales from allowances.yaml.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AllowanceScales {
    /// Car kilometric scale.
    pub car: KilometricScale,
    /// Motorcycle kilometric scale.
    pub motorcycle: KilometricScale,
    /// Business-travel per-diem rates.
    pub travel: TravelRates,
}

impl AllowanceScales {
    /// Returns the scale for a vehicle kind.
    pub fn kilometric(&self, vehicle: VehicleKind) -> &KilometricScale {
        match vehicle {
            VehicleKind::Car => &self.car,
            VehicleKind::Motorcycle => &self.motorcycle,
        }
    }
}
