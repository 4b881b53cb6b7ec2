//! HTTP request handlers for the portage simulation API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::{
    contribution_rules, evaluate_contributions, kilometric_allowance, mutual_shares, solve_salary,
    travel_allowance, welfare_contributions,
};
use crate::config::{ConfigLoader, RegulatoryYear};
use crate::error::{EngineError, EngineResult};

use super::request::{EvaluationRequest, SimulationRequest};
use super::response::{
    ApiError, ApiErrorResponse, ContributionTableResponse, EvaluationResponse, SimulationResponse,
};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/simulate", post(simulate_handler))
        .route("/contributions", get(contribution_table_handler))
        .route("/contributions/evaluate", post(evaluate_handler))
        .with_state(state)
}

fn json_response<T: Serialize>(status: StatusCode, body: T) -> Response {
    (status, [(header::CONTENT_TYPE, "application/json")], Json(body)).into_response()
}

fn error_response(error: EngineError) -> Response {
    let api_error: ApiErrorResponse = error.into();
    json_response(api_error.status, api_error.error)
}

/// Turns a JSON extraction failure into a 400 response.
fn rejection_response(correlation_id: Uuid, rejection: JsonRejection) -> Response {
    let error = match rejection {
        JsonRejection::JsonDataError(err) => {
            // The body text carries serde's detailed message
            let body_text = err.body_text();
            warn!(
                correlation_id = %correlation_id,
                error = %body_text,
                "JSON data error"
            );
            if body_text.contains("missing field") {
                ApiError::validation_error(body_text)
            } else {
                ApiError::malformed_json(body_text)
            }
        }
        JsonRejection::JsonSyntaxError(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "JSON syntax error"
            );
            ApiError::malformed_json(format!("Invalid JSON syntax: {}", err))
        }
        JsonRejection::MissingJsonContentType(_) => {
            ApiError::new("MISSING_CONTENT_TYPE", "Content-Type must be application/json")
        }
        _ => ApiError::malformed_json("Failed to parse request body"),
    };
    json_response(StatusCode::BAD_REQUEST, error)
}

/// Resolves the regulatory year for `date`, or the latest one when absent.
fn resolve_year(loader: &ConfigLoader, date: Option<NaiveDate>) -> EngineResult<&RegulatoryYear> {
    match date {
        Some(date) => loader.year_for(date),
        None => loader.years().last().ok_or_else(|| EngineError::ConfigNotFound {
            path: "years (no regulatory year loaded)".to_string(),
        }),
    }
}

/// Handler for POST /simulate endpoint.
///
/// Accepts a simulation request and returns the full payslip simulation.
async fn simulate_handler(
    State(state): State<AppState>,
    payload: Result<Json<SimulationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing simulation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    let start_time = Instant::now();
    match perform_simulation(request, state.config()) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                simulation_id = %response.simulation_id,
                effective_date = %response.effective_date,
                gross_salary = %response.result.gross_salary.round_dp(2),
                net_payable = %response.result.net_payable.round_dp(2),
                scenario = response.result.diagnostics.scenario.label(),
                iterations = response.result.diagnostics.iterations,
                duration_us = start_time.elapsed().as_micros(),
                "Simulation completed successfully"
            );
            if !response.result.audit_trace.warnings.is_empty() {
                warn!(
                    correlation_id = %correlation_id,
                    warnings = response.result.audit_trace.warnings.len(),
                    "Simulation completed with warnings"
                );
            }
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Simulation failed"
            );
            error_response(err)
        }
    }
}

/// Resolves configuration and claims, then runs the simulation.
fn perform_simulation(
    request: SimulationRequest,
    loader: &ConfigLoader,
) -> EngineResult<SimulationResponse> {
    let year = resolve_year(loader, request.effective_date)?;
    let mut configuration = year.configuration;
    if let Some(update) = request.configuration {
        configuration.apply(update);
    }

    let mut input = request.input;
    if let Some(mileage) = request.mileage {
        input.kilometric_allowance = kilometric_allowance(
            loader.allowances(),
            mileage.vehicle,
            mileage.fiscal_power,
            mileage.band,
            mileage.distance_km,
        )?;
    }
    if let Some(travel) = request.travel {
        input.per_diem_allowance =
            travel_allowance(loader.allowances(), travel.meals, travel.nights, travel.zone);
    }
    input.validate()?;

    let result = solve_salary(&input, &configuration);

    Ok(SimulationResponse {
        simulation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        effective_date: year.effective_date,
        configuration,
        result,
    })
}

/// Handler for POST /contributions/evaluate endpoint.
///
/// Evaluates the contribution table on a single gross salary.
async fn evaluate_handler(
    State(state): State<AppState>,
    payload: Result<Json<EvaluationRequest>, JsonRejection>,
) -> Response {
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing evaluation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => return rejection_response(correlation_id, rejection),
    };

    match perform_evaluation(request, state.config()) {
        Ok(response) => {
            info!(
                correlation_id = %correlation_id,
                gross = %response.gross,
                employer_total = %response.breakdown.employer_total,
                employee_total = %response.breakdown.employee_total,
                "Evaluation completed successfully"
            );
            json_response(StatusCode::OK, response)
        }
        Err(err) => {
            warn!(
                correlation_id = %correlation_id,
                error = %err,
                "Evaluation failed"
            );
            error_response(err)
        }
    }
}

fn perform_evaluation(
    request: EvaluationRequest,
    loader: &ConfigLoader,
) -> EngineResult<EvaluationResponse> {
    if request.gross < Decimal::ZERO {
        return Err(EngineError::InvalidInput {
            field: "gross".to_string(),
            message: format!("must not be negative (got {})", request.gross),
        });
    }

    let year = resolve_year(loader, request.effective_date)?;
    let config = year.configuration;

    let employer_welfare_base = match request.employer_welfare_base {
        Some(base) => base,
        None => {
            let mutual = mutual_shares(config.pmss, &config.mutual_insurance, true);
            welfare_contributions(request.gross, config.pmss, mutual.employer).total()
        }
    };

    let breakdown = evaluate_contributions(
        request.gross,
        config.pmss,
        config.workplace_accident_rate,
        config.housing_fund.rate_for(request.large_employer),
        employer_welfare_base,
    );

    Ok(EvaluationResponse {
        effective_date: year.effective_date,
        gross: request.gross,
        employer_welfare_base,
        breakdown,
    })
}

/// Handler for GET /contributions endpoint.
///
/// Returns the static contribution table.
async fn contribution_table_handler() -> Response {
    json_response(
        StatusCode::OK,
        ContributionTableResponse {
            rules: contribution_rules().to_vec(),
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SimulationInput;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use std::str::FromStr;
    use tower::ServiceExt;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn create_test_state() -> AppState {
        let config = ConfigLoader::load("./config/portage").expect("Failed to load config");
        AppState::new(config)
    }

    fn create_valid_request() -> SimulationRequest {
        SimulationRequest {
            effective_date: NaiveDate::from_ymd_opt(2026, 3, 1),
            input: SimulationInput::new(dec("500"), dec("19")),
            mileage: None,
            travel: None,
            configuration: None,
        }
    }

    async fn post_json(uri: &str, body: String) -> Response {
        create_router(create_test_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn body_bytes(response: Response) -> axum::body::Bytes {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_valid_simulation_returns_200() {
        let body = serde_json::to_string(&create_valid_request()).unwrap();
        let response = post_json("/simulate", body).await;

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response.headers().get("content-type").unwrap();
        assert_eq!(content_type, "application/json");

        let result: SimulationResponse = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(result.effective_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(result.engine_version, env!("CARGO_PKG_VERSION"));
        assert!((result.result.gross_salary - dec("6004.77")).abs() <= dec("0.01"));
    }

    #[tokio::test]
    async fn test_malformed_json_returns_400() {
        let response = post_json("/simulate", "{invalid json".to_string()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "MALFORMED_JSON");
    }

    #[tokio::test]
    async fn test_missing_daily_rate_returns_validation_error() {
        let body = r#"{"input": {"days_per_month": "19"}}"#.to_string();
        let response = post_json("/simulate", body).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("daily_rate"));
    }

    #[tokio::test]
    async fn test_negative_input_returns_validation_error() {
        let mut request = create_valid_request();
        request.input.other_expenses = dec("-10");
        let response = post_json("/simulate", serde_json::to_string(&request).unwrap()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "VALIDATION_ERROR");
        assert!(error.message.contains("other_expenses"));
    }

    #[tokio::test]
    async fn test_date_before_first_year_returns_400() {
        let mut request = create_valid_request();
        request.effective_date = NaiveDate::from_ymd_opt(2019, 12, 31);
        let response = post_json("/simulate", serde_json::to_string(&request).unwrap()).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ApiError = serde_json::from_slice(&body_bytes(response).await).unwrap();
        assert_eq!(error.code, "REGULATORY_YEAR_NOT_FOUND");
    }

    #[test]
    fn test_perform_simulation_converts_claims() {
        let loader = ConfigLoader::load("./config/portage").unwrap();
        let request: SimulationRequest = serde_json::from_str(
            r#"{
                "effective_date": "2026-02-01",
                "input": {"daily_rate": "500", "days_per_month": "19"},
                "mileage": {"vehicle": "car", "fiscal_power": 5, "band": "first", "distance_km": "100"},
                "travel": {"meals": 2, "nights": 1}
            }"#,
        )
        .unwrap();

        let response = perform_simulation(request, &loader).unwrap();

        // 63.60 mileage + 101.00 travel
        assert_eq!(response.result.reimbursed_expenses, dec("164.60"));
    }

    #[test]
    fn test_perform_simulation_applies_configuration_update() {
        let loader = ConfigLoader::load("./config/portage").unwrap();
        let mut request = create_valid_request();
        request.configuration = Some(crate::config::ConfigurationUpdate {
            management_fee_rate: Some(dec("0.07")),
            ..Default::default()
        });

        let response = perform_simulation(request, &loader).unwrap();

        assert_eq!(response.configuration.management_fee_rate, dec("0.07"));
        assert_eq!(response.result.management_fees, dec("665"));
    }

    #[test]
    fn test_latest_year_used_without_date() {
        let loader = ConfigLoader::load("./config/portage").unwrap();
        let mut request = create_valid_request();
        request.effective_date = None;

        let response = perform_simulation(request, &loader).unwrap();

        assert_eq!(response.effective_date, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
    }

    #[test]
    fn test_evaluation_derives_welfare_base() {
        let loader = ConfigLoader::load("./config/portage").unwrap();
        let request = EvaluationRequest {
            gross: dec("3000"),
            effective_date: None,
            large_employer: false,
            employer_welfare_base: None,
        };

        let response = perform_evaluation(request, &loader).unwrap();

        // 47.70 death cover + 30.04 mutual
        assert_eq!(response.employer_welfare_base, dec("77.74"));
        assert_eq!(response.breakdown.csg_base, dec("3025.24"));
    }

    #[test]
    fn test_evaluation_rejects_negative_gross() {
        let loader = ConfigLoader::load("./config/portage").unwrap();
        let request = EvaluationRequest {
            gross: dec("-1"),
            effective_date: None,
            large_employer: false,
            employer_welfare_base: None,
        };

        assert!(matches!(
            perform_evaluation(request, &loader),
            Err(EngineError::InvalidInput { .. })
        ));
    }

    #[tokio::test]
    async fn test_contribution_table_lists_all_rules() {
        let response = create_router(create_test_state())
            .oneshot(Request::builder().uri("/contributions").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let table: serde_json::Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
        let rules = table["rules"].as_array().unwrap();
        assert_eq!(rules.len(), 27);
        assert_eq!(rules[0]["key"], "maladie");
        assert_eq!(rules[6]["configured_rate"], "workplace_accident");
    }
}
