//! Loan service layer - business logic for the loan workflow

use std::sync::Arc;

use crate::error::{ApiError, ApiResult};
use crate::loan::{
    CreateLoanRequest, Loan, LoanStatus, LoanSummary, NewLoan, ReviewerRole, UNASSIGNED_OFFICER,
};
use crate::store::{LoanStore, StoreError};

/// Loan service owning the injected store handle.
#[derive(Clone)]
pub struct LoanService {
    store: Arc<dyn LoanStore>,
}

impl LoanService {
    pub fn new(store: Arc<dyn LoanStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &dyn LoanStore {
        self.store.as_ref()
    }

    /// Create a loan application for the given applicant.
    ///
    /// `status` and `loanOfficer` are forced to their initial values;
    /// client-supplied values for them never reach the store.
    pub async fn create_loan(
        &self,
        id_number: i64,
        request: CreateLoanRequest,
    ) -> ApiResult<Loan> {
        let loan = NewLoan {
            id_number,
            full_name: request.full_name,
            loan_amount: request.loan_amount,
            loan_tenure: request.loan_tenure,
            employment_status: request.employment_status,
            reason_for_loan: request.reason_for_loan,
            employment_address: request.employment_address,
            status: LoanStatus::Pending,
            loan_officer: UNASSIGNED_OFFICER.to_string(),
        };

        self.store
            .insert_loan(loan)
            .await
            .map_err(|e| ApiError::database("Error creating loan entry", e))
    }

    /// Loans visible to a reviewer role.
    pub async fn loans_for_role(&self, role: ReviewerRole) -> ApiResult<Vec<Loan>> {
        self.store
            .loans_with_status(role.visible_statuses())
            .await
            .map_err(|e| ApiError::database("Error fetching loan entries", e))
    }

    /// All loans of one applicant; an empty result is a not-found.
    pub async fn loans_for_applicant(&self, id_number: i64) -> ApiResult<Vec<Loan>> {
        let loans = self
            .store
            .loans_for_applicant(id_number)
            .await
            .map_err(|e| ApiError::database("Error fetching loans by idNumber", e))?;

        if loans.is_empty() {
            return Err(ApiError::NotFound(
                "No loans found for this idNumber.".to_string(),
            ));
        }
        Ok(loans)
    }

    /// Admin status update: sets `status` only.
    pub async fn update_status_admin(&self, id: &str, status: LoanStatus) -> ApiResult<Loan> {
        self.apply_status_update(id, status, None).await
    }

    /// Verifier status update: sets `status` and `loanOfficer` together.
    pub async fn update_status_verifier(
        &self,
        id: &str,
        status: LoanStatus,
        loan_officer: &str,
    ) -> ApiResult<Loan> {
        self.apply_status_update(id, status, Some(loan_officer)).await
    }

    async fn apply_status_update(
        &self,
        id: &str,
        status: LoanStatus,
        loan_officer: Option<&str>,
    ) -> ApiResult<Loan> {
        let updated = self
            .store
            .update_loan_status(id, status, loan_officer)
            .await
            .map_err(|e| match e {
                StoreError::InvalidId(_) => ApiError::from(e),
                other => ApiError::database("Error updating loan status", other),
            })?;

        updated.ok_or_else(|| ApiError::NotFound("Loan not found.".to_string()))
    }

    /// Aggregate statistics over the whole collection, computed
    /// concurrently against the store.
    pub async fn summary(&self) -> ApiResult<LoanSummary> {
        let (active, borrow, approved, total) = tokio::join!(
            self.store.distinct_applicant_count(false),
            self.store.distinct_applicant_count(true),
            self.store.count_with_status(LoanStatus::Approved),
            self.store.total_amount_with_status(LoanStatus::Approved),
        );

        Ok(LoanSummary {
            active_user_count: active?,
            borrow_user_count: borrow?,
            approved_loan_count: approved?,
            total_disbursed_loan_amount: total?,
        })
    }
}
