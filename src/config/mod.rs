//! Configuration loading and management for the portage simulation engine.
//!
//! [`SalaryConfiguration`] is an explicit value passed into every simulation.
//! It defaults to the 2026 reference values and is edited only through
//! [`SalaryConfiguration::apply`]. [`ConfigLoader`] reads the per-year
//! configurations and allowance scales from YAML files.
//!
//! # Example
//!
//! ```no_run
//! use portage_engine::config::ConfigLoader;
//!
//! let loader = ConfigLoader::load("./config/portage").unwrap();
//! println!("Loaded scheme: {}", loader.scheme().name);
//! ```

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::{
    AllowanceScales, BenefitRates, ComplementSplit, ConfigurationUpdate, DistanceBand,
    HousingFundRates, KilometricBand, KilometricScale, MutualInsurance, RateStrategy,
    ReductionParameters, RegulatoryYear, SalaryConfiguration, SchemeMetadata, SolverSettings,
    SurchargeTier, TieredRates, TravelRates, VehicleKind,
};
