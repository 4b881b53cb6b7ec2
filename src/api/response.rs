//! Response types for the portage simulation API.
//!
//! This module defines the success envelopes returned by the handlers, the
//! error response structure and the mapping from [`EngineError`].

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::SalaryConfiguration;
use crate::error::EngineError;
use crate::models::{ContributionBreakdown, ContributionRule, SimulationResult};

/// Response body of the `/simulate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationResponse {
    /// Unique identifier for this simulation.
    pub simulation_id: Uuid,
    /// When the simulation was performed.
    pub timestamp: DateTime<Utc>,
    /// The engine version that produced the result.
    pub engine_version: String,
    /// Effective date of the regulatory year used.
    pub effective_date: NaiveDate,
    /// The configuration the simulation ran with, edits included.
    pub configuration: SalaryConfiguration,
    /// The simulation result.
    pub result: SimulationResult,
}

/// Response body of the `/contributions/evaluate` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationResponse {
    /// Effective date of the regulatory year used.
    pub effective_date: NaiveDate,
    /// The evaluated gross salary.
    pub gross: Decimal,
    /// The employer welfare base added to the CSG base.
    pub employer_welfare_base: Decimal,
    /// The itemized contributions.
    pub breakdown: ContributionBreakdown,
}

/// Response body of the `/contributions` endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ContributionTableResponse {
    /// The static contribution table in payslip order.
    pub rules: Vec<ContributionRule>,
}

/// API error response structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Optional details about the error.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    /// Creates a new API error with details.
    pub fn with_details(
        code: impl Into<String>,
        message: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: Some(details.into()),
        }
    }

    /// Creates a validation error response.
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::new("VALIDATION_ERROR", message)
    }

    /// Creates a malformed JSON error response.
    pub fn malformed_json(message: impl Into<String>) -> Self {
        Self::new("MALFORMED_JSON", message)
    }
}

/// API error with HTTP status code.
pub struct ApiErrorResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The error body.
    pub error: ApiError,
}

impl IntoResponse for ApiErrorResponse {
    fn into_response(self) -> Response {
        (self.status, Json(self.error)).into_response()
    }
}

impl From<EngineError> for ApiErrorResponse {
    fn from(error: EngineError) -> Self {
        match error {
            EngineError::ConfigNotFound { path } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration error",
                    format!("Configuration file not found: {}", path),
                ),
            },
            EngineError::ConfigParseError { path, message } => ApiErrorResponse {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                error: ApiError::with_details(
                    "CONFIG_ERROR",
                    "Configuration parse error",
                    format!("Failed to parse {}: {}", path, message),
                ),
            },
            EngineError::RegulatoryYearNotFound { date } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "REGULATORY_YEAR_NOT_FOUND",
                    format!("No regulatory configuration effective on {}", date),
                    "The effective date precedes every configured regulatory year",
                ),
            },
            EngineError::AllowanceScaleNotFound {
                vehicle,
                fiscal_power,
            } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "ALLOWANCE_SCALE_NOT_FOUND",
                    format!(
                        "No kilometric scale for {} with fiscal power {}",
                        vehicle, fiscal_power
                    ),
                    "The mileage claim uses a fiscal power outside the scale",
                ),
            },
            EngineError::InvalidInput { field, message } => ApiErrorResponse {
                status: StatusCode::BAD_REQUEST,
                error: ApiError::with_details(
                    "VALIDATION_ERROR",
                    format!("Invalid input field '{}': {}", field, message),
                    "The simulation input contains invalid information",
                ),
            },
        }
    }
}
