//! Persistence layer for loan records
//!
//! The service talks to storage through the [`LoanStore`] trait so the
//! MongoDB-backed store can be swapped for an in-memory one in tests.

mod memory;
mod mongo;

pub use memory::MemoryLoanStore;
pub use mongo::MongoLoanStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::loan::{Loan, LoanStatus, NewLoan};

/// Store-layer errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("invalid record id: {0}")]
    InvalidId(String),

    #[error(transparent)]
    Driver(#[from] mongodb::error::Error),
}

/// Storage operations needed by the loan workflow.
///
/// Implementations must keep `updatedAt` fresh on every mutation and
/// perform status updates atomically on a single record.
#[async_trait]
pub trait LoanStore: Send + Sync {
    /// Persist a new loan, assigning its id and timestamps.
    async fn insert_loan(&self, loan: NewLoan) -> Result<Loan, StoreError>;

    /// All loans whose status is one of `statuses`.
    async fn loans_with_status(&self, statuses: &[LoanStatus]) -> Result<Vec<Loan>, StoreError>;

    /// All loans belonging to one applicant.
    async fn loans_for_applicant(&self, id_number: i64) -> Result<Vec<Loan>, StoreError>;

    /// Atomically set `status` (and `loanOfficer` when given) on one
    /// record, returning the post-update document. `None` when no
    /// record matches the id.
    async fn update_loan_status(
        &self,
        id: &str,
        status: LoanStatus,
        loan_officer: Option<&str>,
    ) -> Result<Option<Loan>, StoreError>;

    /// Number of distinct applicant identifiers, optionally restricted
    /// to loans that have moved past `PENDING`.
    async fn distinct_applicant_count(&self, exclude_pending: bool) -> Result<u64, StoreError>;

    /// Number of loans with the given status.
    async fn count_with_status(&self, status: LoanStatus) -> Result<u64, StoreError>;

    /// Sum of `loanAmount` over loans with the given status (0 if none).
    async fn total_amount_with_status(&self, status: LoanStatus) -> Result<f64, StoreError>;

    /// Connectivity check for health reporting.
    async fn ping(&self) -> Result<(), StoreError>;
}
