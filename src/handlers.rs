//! Loan API handlers
//!
//! Each handler validates and parses its inputs into typed requests
//! before touching the service layer, so malformed input produces an
//! explicit 400 instead of a store-layer failure.

use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::error::{ApiError, ApiResult};
use crate::loan::{
    AdminStatusUpdate, CreateLoanRequest, Loan, LoanSummary, ReviewerRole, VerifierStatusUpdate,
};

/// Query parameters carrying the applicant identifier.
#[derive(Debug, Deserialize)]
pub struct ApplicantQuery {
    #[serde(rename = "idNumber")]
    pub id_number: Option<String>,
}

/// Query parameters carrying the reviewer role.
#[derive(Debug, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

/// Query parameters carrying the record identifier.
#[derive(Debug, Deserialize)]
pub struct LoanIdQuery {
    #[serde(rename = "_id")]
    pub id: Option<String>,
}

fn parse_id_number(raw: Option<&str>) -> ApiResult<i64> {
    raw.and_then(|value| value.parse::<i64>().ok())
        .ok_or_else(|| {
            ApiError::Validation("Invalid idNumber provided. It should be a number.".to_string())
        })
}

/// `POST /loans?idNumber=<number>`
pub async fn create_loan(
    State(state): State<AppState>,
    Query(query): Query<ApplicantQuery>,
    payload: Result<Json<CreateLoanRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Loan>)> {
    let raw = query
        .id_number
        .as_deref()
        .ok_or_else(|| ApiError::Validation("IdNumber is required.".to_string()))?;
    let id_number = parse_id_number(Some(raw))?;

    let Json(request) = payload?;

    let loan = state.loan_service.create_loan(id_number, request).await?;
    Ok((StatusCode::CREATED, Json(loan)))
}

/// `GET /loans?role=verifier|admin`
pub async fn get_loans_by_role(
    State(state): State<AppState>,
    Query(query): Query<RoleQuery>,
) -> ApiResult<Json<Vec<Loan>>> {
    let role = query
        .role
        .as_deref()
        .and_then(ReviewerRole::parse)
        .ok_or_else(|| {
            ApiError::Validation(
                "Invalid role. Please specify either \"verifier\" or \"admin\".".to_string(),
            )
        })?;

    let loans = state.loan_service.loans_for_role(role).await?;
    Ok(Json(loans))
}

/// `GET /loans/id?idNumber=<number>`
pub async fn get_loans_by_id_number(
    State(state): State<AppState>,
    Query(query): Query<ApplicantQuery>,
) -> ApiResult<Json<Vec<Loan>>> {
    let id_number = parse_id_number(query.id_number.as_deref())?;

    let loans = state.loan_service.loans_for_applicant(id_number).await?;
    Ok(Json(loans))
}

/// `PATCH /loans/status-admin?_id=<id>`
pub async fn update_loan_status_admin(
    State(state): State<AppState>,
    Query(query): Query<LoanIdQuery>,
    payload: Result<Json<AdminStatusUpdate>, JsonRejection>,
) -> ApiResult<Json<Loan>> {
    let id = query
        .id
        .as_deref()
        .ok_or_else(|| ApiError::Validation("Loan id (_id) is required.".to_string()))?;
    let Json(update) = payload?;

    let loan = state
        .loan_service
        .update_status_admin(id, update.status)
        .await?;
    Ok(Json(loan))
}

/// `PATCH /loans/status-verifier?_id=<id>`
pub async fn update_loan_status_verifier(
    State(state): State<AppState>,
    Query(query): Query<LoanIdQuery>,
    payload: Result<Json<VerifierStatusUpdate>, JsonRejection>,
) -> ApiResult<Json<Loan>> {
    let id = query
        .id
        .as_deref()
        .ok_or_else(|| ApiError::Validation("Loan id (_id) is required.".to_string()))?;
    let Json(update) = payload?;

    let loan = state
        .loan_service
        .update_status_verifier(id, update.status, &update.loan_officer)
        .await?;
    Ok(Json(loan))
}

/// `GET /loans/summary`
pub async fn get_loan_summary(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<LoanSummary>>> {
    let summary = state.loan_service.summary().await?;
    Ok(Json(vec![summary]))
}

/// `GET /` service banner
pub async fn root() -> &'static str {
    "LoanDesk API Server"
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub version: String,
}

/// `GET /health`
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let database = match state.loan_service.store().ping().await {
        Ok(()) => "connected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    let status = if database == "connected" {
        "healthy"
    } else {
        "unhealthy"
    };

    Json(HealthResponse {
        status: status.to_string(),
        database,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
