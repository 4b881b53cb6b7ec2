//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the regulatory
//! configuration of the portage scheme from YAML files.

use chrono::NaiveDate;
use std::fs;
use std::path::Path;

use crate::error::{EngineError, EngineResult};

use super::types::{AllowanceScales, RegulatoryYear, SalaryConfiguration, SchemeMetadata};

/// Loads and provides access to the scheme configuration.
///
/// # Directory Structure
///
/// ```text
/// config/portage/
/// ├── scheme.yaml       # Scheme metadata
/// ├── allowances.yaml   # Kilometric and travel allowance scales
/// └── years/
///     └── 2026-01-01.yaml  # Salary configuration effective from this date
/// ```
///
/// # Example
///
/// ```no_run
/// use portage_engine::config::ConfigLoader;
/// use chrono::NaiveDate;
///
/// let loader = ConfigLoader::load("./config/portage").unwrap();
///
/// let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
/// let config = loader.configuration_for(date).unwrap();
/// println!("PMSS: {}", config.pmss);
/// ```
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    metadata: SchemeMetadata,
    allowances: AllowanceScales,
    /// Sorted oldest first.
    years: Vec<RegulatoryYear>,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns an error if any required file is missing, contains invalid
    /// YAML, or if the `years` directory holds no configuration.
    pub fn load<P: AsRef<Path>>(path: P) -> EngineResult<Self> {
        let path = path.as_ref();

        let metadata = Self::load_yaml::<SchemeMetadata>(&path.join("scheme.yaml"))?;
        let allowances = Self::load_yaml::<AllowanceScales>(&path.join("allowances.yaml"))?;
        let mut years = Self::load_years(&path.join("years"))?;
        years.sort_by(|a, b| a.effective_date.cmp(&b.effective_date));

        Ok(Self {
            metadata,
            allowances,
            years,
        })
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> EngineResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| EngineError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| EngineError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Loads all regulatory year files from the years directory.
    fn load_years(years_dir: &Path) -> EngineResult<Vec<RegulatoryYear>> {
        let years_dir_str = years_dir.display().to_string();

        let entries = fs::read_dir(years_dir).map_err(|_| EngineError::ConfigNotFound {
            path: years_dir_str.clone(),
        })?;

        let mut years = Vec::new();

        for entry in entries {
            let entry = entry.map_err(|_| EngineError::ConfigNotFound {
                path: years_dir_str.clone(),
            })?;

            let path = entry.path();
            if path.extension().is_some_and(|ext| ext == "yaml") {
                years.push(Self::load_yaml::<RegulatoryYear>(&path)?);
            }
        }

        if years.is_empty() {
            return Err(EngineError::ConfigNotFound {
                path: format!("{} (no regulatory year files found)", years_dir_str),
            });
        }

        Ok(years)
    }

    /// Returns the scheme metadata.
    pub fn scheme(&self) -> &SchemeMetadata {
        &self.metadata
    }

    /// Returns the expense allowance scales.
    pub fn allowances(&self) -> &AllowanceScales {
        &self.allowances
    }

    /// Returns all regulatory years, oldest first.
    pub fn years(&self) -> &[RegulatoryYear] {
        &self.years
    }

    /// Gets the regulatory year effective on `date`: the most recent year
    /// whose effective date is on or before it.
    pub fn year_for(&self, date: NaiveDate) -> EngineResult<&RegulatoryYear> {
        self.years
            .iter()
            .rev()
            .find(|year| year.effective_date <= date)
            .ok_or(EngineError::RegulatoryYearNotFound { date })
    }

    /// Gets the configuration effective on `date`.
    pub fn configuration_for(&self, date: NaiveDate) -> EngineResult<SalaryConfiguration> {
        self.year_for(date).map(|year| year.configuration)
    }

    /// Gets the most recent configuration.
    pub fn latest_configuration(&self) -> SalaryConfiguration {
        // load() guarantees at least one year
        self.years
            .last()
            .map(|year| year.configuration)
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn config_path() -> &'static str {
        "./config/portage"
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_load_valid_configuration() {
        let result = ConfigLoader::load(config_path());
        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());

        let loader = result.unwrap();
        assert_eq!(loader.scheme().code, "PORTAGE-FR");
        assert_eq!(loader.years().len(), 2);
    }

    #[test]
    fn test_years_sorted_oldest_first() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let dates: Vec<NaiveDate> = loader.years().iter().map(|y| y.effective_date).collect();
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_configuration_for_2026_matches_defaults() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let date = NaiveDate::from_ymd_opt(2026, 6, 15).unwrap();
        let config = loader.configuration_for(date).unwrap();

        assert_eq!(config, SalaryConfiguration::default());
    }

    #[test]
    fn test_configuration_for_2025_uses_previous_ceiling() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let date = NaiveDate::from_ymd_opt(2025, 9, 1).unwrap();
        let config = loader.configuration_for(date).unwrap();

        assert_eq!(config.pmss, dec("3925"));
        assert_eq!(config.smic_monthly, dec("1801.80"));
    }

    #[test]
    fn test_latest_configuration_is_most_recent_year() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        assert_eq!(loader.latest_configuration().pmss, dec("4005"));
    }

    #[test]
    fn test_configuration_before_first_year_returns_error() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let date = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        match loader.configuration_for(date) {
            Err(EngineError::RegulatoryYearNotFound { date: d }) => assert_eq!(d, date),
            other => panic!("Expected RegulatoryYearNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_allowance_scales_loaded_correctly() {
        let loader = ConfigLoader::load(config_path()).unwrap();

        let scales = loader.allowances();
        assert_eq!(scales.car.thresholds_km, [5000, 20000]);
        assert_eq!(scales.motorcycle.bands.len(), 5);
        assert_eq!(scales.travel.meal, dec("21.60"));
        assert_eq!(scales.travel.night_paris, dec("76.70"));
    }

    #[test]
    fn test_load_missing_directory_returns_error() {
        let result = ConfigLoader::load("/nonexistent/path");

        match result {
            Err(EngineError::ConfigNotFound { path }) => {
                assert!(path.contains("scheme.yaml"));
            }
            _ => panic!("Expected ConfigNotFound error"),
        }
    }
}
