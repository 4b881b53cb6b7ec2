//! Error types for the portage simulation engine.
//!
//! The numeric core never fails: it clamps and continues. Errors only come
//! from the edges of the crate, such as configuration loading, allowance
//! scale lookups and validation of caller-supplied input.

use chrono::NaiveDate;
use thiserror::Error;

/// The main error type for the portage simulation engine.
///
/// # Example
///
/// ```
/// use portage_engine::error::EngineError;
///
/// let error = EngineError::ConfigNotFound {
///     path: "/missing/scheme.yaml".to_string(),
/// };
/// assert_eq!(error.to_string(), "Configuration file not found: /missing/scheme.yaml");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// Configuration file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// Configuration file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },

    /// No regulatory year configuration is effective on the requested date.
    #[error("No regulatory configuration effective on {date}")]
    RegulatoryYearNotFound {
        /// The date for which a configuration was requested.
        date: NaiveDate,
    },

    /// The kilometric scale has no entry for the vehicle and fiscal power.
    #[error("No kilometric scale for {vehicle} with fiscal power {fiscal_power}")]
    AllowanceScaleNotFound {
        /// The vehicle kind (`car` or `motorcycle`).
        vehicle: String,
        /// The requested fiscal horsepower.
        fiscal_power: u8,
    },

    /// A simulation input field was invalid.
    #[error("Invalid input field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;
