//! Loan domain model and request/response types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle status of a loan application.
///
/// The intended flow is `PENDING -> VERIFIED -> {APPROVED, REJECTED}`
/// (verifier performs the first step, admin the second), but transition
/// legality is not enforced by the update operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LoanStatus {
    Pending,
    Verified,
    Approved,
    Rejected,
}

impl LoanStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoanStatus::Pending => "PENDING",
            LoanStatus::Verified => "VERIFIED",
            LoanStatus::Approved => "APPROVED",
            LoanStatus::Rejected => "REJECTED",
        }
    }
}

impl std::fmt::Display for LoanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reviewer roles with distinct visibility over loan statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewerRole {
    Verifier,
    Admin,
}

impl ReviewerRole {
    /// Parse a role query value. Anything other than the two known
    /// roles is rejected at the boundary.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "verifier" => Some(ReviewerRole::Verifier),
            "admin" => Some(ReviewerRole::Admin),
            _ => None,
        }
    }

    /// Statuses visible to this role when listing loans.
    pub fn visible_statuses(&self) -> &'static [LoanStatus] {
        match self {
            ReviewerRole::Verifier => &[LoanStatus::Pending, LoanStatus::Verified],
            ReviewerRole::Admin => &[
                LoanStatus::Verified,
                LoanStatus::Approved,
                LoanStatus::Rejected,
            ],
        }
    }
}

/// Sentinel written to `loanOfficer` until a verifier picks up the loan.
pub const UNASSIGNED_OFFICER: &str = "Not Assigned";

/// A persisted loan application record.
///
/// Serialized with the wire field names the frontend expects; the record
/// identifier travels as `_id` (hex ObjectId string).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    #[serde(rename = "_id")]
    pub id: String,
    pub id_number: i64,
    pub full_name: String,
    pub loan_amount: f64,
    pub loan_tenure: i64,
    pub employment_status: String,
    pub reason_for_loan: String,
    pub employment_address: String,
    pub status: LoanStatus,
    pub loan_officer: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a loan before the store assigns id and timestamps.
#[derive(Debug, Clone)]
pub struct NewLoan {
    pub id_number: i64,
    pub full_name: String,
    pub loan_amount: f64,
    pub loan_tenure: i64,
    pub employment_status: String,
    pub reason_for_loan: String,
    pub employment_address: String,
    pub status: LoanStatus,
    pub loan_officer: String,
}

/// Body of `POST /loans`. All fields are required; `status` and
/// `loanOfficer` are never accepted from the client and are forced
/// server-side.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoanRequest {
    pub full_name: String,
    pub loan_amount: f64,
    pub loan_tenure: i64,
    pub employment_status: String,
    pub reason_for_loan: String,
    pub employment_address: String,
}

/// Body of `PATCH /loans/status-admin`.
#[derive(Debug, Deserialize)]
pub struct AdminStatusUpdate {
    pub status: LoanStatus,
}

/// Body of `PATCH /loans/status-verifier`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifierStatusUpdate {
    pub status: LoanStatus,
    pub loan_officer: String,
}

/// Aggregate statistics over the whole loan collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanSummary {
    #[serde(rename = "activeUserCount")]
    pub active_user_count: u64,
    #[serde(rename = "borrowUserCount")]
    pub borrow_user_count: u64,
    #[serde(rename = "approvedLoanCount")]
    pub approved_loan_count: u64,
    // Field spelling is part of the API contract.
    #[serde(rename = "totalDisbursedloanAmount")]
    pub total_disbursed_loan_amount: f64,
}
