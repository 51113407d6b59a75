//! HTTP request handlers for the Payroll Deduction Engine API.
//!
//! This module contains the handler functions for all API endpoints.

use std::time::Instant;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::calculation::calculate_payroll;
use crate::config::{RateTable, RateTableMetadata};
use crate::models::TaxProfile;

use super::request::CalculationRequest;
use super::response::{ApiError, ApiErrorResponse, CalculationResponse};
use super::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/calculate", post(calculate_handler))
        .route("/rate-table", get(rate_table_handler))
        .with_state(state)
}

/// Body of the `/rate-table` endpoint.
#[derive(Serialize)]
struct RateTableResponse<'a> {
    metadata: &'a RateTableMetadata,
    rate_table: &'a RateTable,
}

/// Handler for GET /rate-table endpoint.
///
/// Returns the active fiscal year's rates so clients can display them.
async fn rate_table_handler(State(state): State<AppState>) -> impl IntoResponse {
    let config = state.config();
    (
        StatusCode::OK,
        Json(RateTableResponse {
            metadata: config.metadata(),
            rate_table: config.rate_table(),
        }),
    )
        .into_response()
}

/// Handler for POST /calculate endpoint.
///
/// Accepts a salary profile, validates it and returns the payroll breakdown.
async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<CalculationRequest>, JsonRejection>,
) -> impl IntoResponse {
    // Generate correlation ID for request tracking
    let correlation_id = Uuid::new_v4();
    info!(correlation_id = %correlation_id, "Processing calculation request");

    let request = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
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
            return (
                StatusCode::BAD_REQUEST,
                [(header::CONTENT_TYPE, "application/json")],
                Json(error),
            )
                .into_response();
        }
    };

    let reference = request.reference.clone();
    let profile: TaxProfile = request.into();

    if let Err(err) = profile.validate() {
        warn!(
            correlation_id = %correlation_id,
            error = %err,
            "Profile validation failed"
        );
        let api_error: ApiErrorResponse = err.into();
        return (
            api_error.status,
            [(header::CONTENT_TYPE, "application/json")],
            Json(api_error.error),
        )
            .into_response();
    }

    let config = state.config();
    let start_time = Instant::now();
    let result = calculate_payroll(&profile, config.rate_table());
    let duration = start_time.elapsed();

    info!(
        correlation_id = %correlation_id,
        gross_salary = %result.gross_salary,
        net_salary = %result.net_salary,
        irpf_total = %result.irpf_total,
        duration_us = duration.as_micros(),
        "Calculation completed successfully"
    );

    let response = CalculationResponse {
        calculation_id: Uuid::new_v4(),
        timestamp: Utc::now(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        fiscal_year: config.metadata().fiscal_year,
        reference,
        duration_us: duration.as_micros() as u64,
        result,
    };

    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "application/json")],
        Json(response),
    )
        .into_response()
}
