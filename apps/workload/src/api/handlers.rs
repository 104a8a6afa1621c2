//! # API Endpoint Handlers
//!
//! This module implements the actual HTTP endpoint handlers.

use super::{
    AppState,
    types::{
        CalculateResponse, ExportQuery, ExportResponse, HealthResponse, SubmissionListResponse,
        SubmissionResponse, SubmitResponse, SummaryResponse,
    },
};
use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use workload_core::{
    ExportFormat, ProgrammeInput, SubmissionSummary, WorkloadError, export_checksum,
    export_records, insights,
};

/// HTTP status for an engine or storage error.
fn status_for(error: &WorkloadError) -> StatusCode {
    match error {
        WorkloadError::InvalidInput { .. } => StatusCode::BAD_REQUEST,
        WorkloadError::NotFound(_) => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Unwrap a JSON body, turning malformed payloads into a readable message.
fn read_input(payload: Result<Json<ProgrammeInput>, JsonRejection>) -> Result<ProgrammeInput, String> {
    payload
        .map(|Json(input)| input)
        .map_err(|e| format!("Invalid input: {}", e.body_text()))
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

/// Health check endpoint.
pub async fn health_handler() -> impl IntoResponse {
    Json(HealthResponse::default())
}

// =============================================================================
// CONFIG HANDLER
// =============================================================================

/// Engine constants in use, so collectors can show the assumptions.
pub async fn config_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(state.engine.config().clone())
}

// =============================================================================
// CALCULATE HANDLER
// =============================================================================

/// Run the engine without storing anything.
pub async fn calculate_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProgrammeInput>, JsonRejection>,
) -> impl IntoResponse {
    let input = match read_input(payload) {
        Ok(input) => input,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(CalculateResponse::error(msg))),
    };

    match state.engine.calculate(&input) {
        Ok(metrics) => {
            let notes = insights(&input, &metrics, state.engine.config());
            (StatusCode::OK, Json(CalculateResponse::success(metrics, notes)))
        }
        Err(e) => (status_for(&e), Json(CalculateResponse::error(e.to_string()))),
    }
}

// =============================================================================
// SUBMIT HANDLER
// =============================================================================

/// Calculate and persist a submission.
pub async fn submit_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProgrammeInput>, JsonRejection>,
) -> impl IntoResponse {
    let input = match read_input(payload) {
        Ok(input) => input,
        Err(msg) => return (StatusCode::BAD_REQUEST, Json(SubmitResponse::error(msg))),
    };

    let metrics = match state.engine.calculate(&input) {
        Ok(metrics) => metrics,
        Err(e) => return (status_for(&e), Json(SubmitResponse::error(e.to_string()))),
    };

    match state.store.append(input, metrics, Utc::now()) {
        Ok(record) => {
            tracing::info!(
                event = "submission_stored",
                id = record.id,
                programme = %record.input.programme_name,
                "Submission stored"
            );
            (StatusCode::CREATED, Json(SubmitResponse::success(record)))
        }
        Err(e) => {
            tracing::error!("Failed to store submission: {}", e);
            (status_for(&e), Json(SubmitResponse::error(e.to_string())))
        }
    }
}

// =============================================================================
// ADMIN HANDLERS
// =============================================================================

/// List every stored submission.
pub async fn list_submissions_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list() {
        Ok(records) => (StatusCode::OK, Json(SubmissionListResponse::success(records))),
        Err(e) => (
            status_for(&e),
            Json(SubmissionListResponse::error(e.to_string())),
        ),
    }
}

/// Fetch one submission by id.
pub async fn get_submission_handler(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> impl IntoResponse {
    match state.store.get(id) {
        Ok(record) => (StatusCode::OK, Json(SubmissionResponse::success(record))),
        Err(e) => (status_for(&e), Json(SubmissionResponse::error(e.to_string()))),
    }
}

/// Aggregate figures across all submissions.
pub async fn summary_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.store.list() {
        Ok(records) => (
            StatusCode::OK,
            Json(SummaryResponse::success(SubmissionSummary::from_records(
                &records,
            ))),
        ),
        Err(e) => (status_for(&e), Json(SummaryResponse::error(e.to_string()))),
    }
}

/// Flat export of every submission, CSV by default.
pub async fn export_handler(
    State(state): State<AppState>,
    Query(query): Query<ExportQuery>,
) -> impl IntoResponse {
    let format: ExportFormat = match query.format.as_deref().unwrap_or("csv").parse() {
        Ok(f) => f,
        Err(e) => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ExportResponse::error(format!("{}", e))),
            );
        }
    };

    let records = match state.store.list() {
        Ok(records) => records,
        Err(e) => return (status_for(&e), Json(ExportResponse::error(e.to_string()))),
    };

    let exported = export_records(&records, format).and_then(|bytes| {
        String::from_utf8(bytes).map_err(|e| WorkloadError::SerializationError(e.to_string()))
    });

    match exported {
        Ok(data) => {
            let checksum = export_checksum(data.as_bytes());
            (
                StatusCode::OK,
                Json(ExportResponse::success(
                    format.as_str(),
                    records.len(),
                    data,
                    checksum,
                )),
            )
        }
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ExportResponse::error(format!("Export failed: {}", e))),
        ),
    }
}
