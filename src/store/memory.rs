//! In-memory loan store for tests
//!
//! Mirrors the observable semantics of the MongoDB store, including
//! ObjectId-shaped record ids and `updatedAt` refresh on mutation.

use std::collections::HashSet;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use mongodb::bson::oid::ObjectId;

use super::{LoanStore, StoreError};
use crate::loan::{Loan, LoanStatus, NewLoan};

#[derive(Default)]
pub struct MemoryLoanStore {
    loans: Mutex<Vec<Loan>>,
}

impl MemoryLoanStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LoanStore for MemoryLoanStore {
    async fn insert_loan(&self, loan: NewLoan) -> Result<Loan, StoreError> {
        let now = Utc::now();
        let record = Loan {
            id: ObjectId::new().to_hex(),
            id_number: loan.id_number,
            full_name: loan.full_name,
            loan_amount: loan.loan_amount,
            loan_tenure: loan.loan_tenure,
            employment_status: loan.employment_status,
            reason_for_loan: loan.reason_for_loan,
            employment_address: loan.employment_address,
            status: loan.status,
            loan_officer: loan.loan_officer,
            created_at: now,
            updated_at: now,
        };

        self.loans
            .lock()
            .expect("loan store mutex poisoned")
            .push(record.clone());
        Ok(record)
    }

    async fn loans_with_status(&self, statuses: &[LoanStatus]) -> Result<Vec<Loan>, StoreError> {
        let loans = self.loans.lock().expect("loan store mutex poisoned");
        Ok(loans
            .iter()
            .filter(|loan| statuses.contains(&loan.status))
            .cloned()
            .collect())
    }

    async fn loans_for_applicant(&self, id_number: i64) -> Result<Vec<Loan>, StoreError> {
        let loans = self.loans.lock().expect("loan store mutex poisoned");
        Ok(loans
            .iter()
            .filter(|loan| loan.id_number == id_number)
            .cloned()
            .collect())
    }

    async fn update_loan_status(
        &self,
        id: &str,
        status: LoanStatus,
        loan_officer: Option<&str>,
    ) -> Result<Option<Loan>, StoreError> {
        // Same id validation as the Mongo store.
        ObjectId::parse_str(id).map_err(|_| StoreError::InvalidId(id.to_string()))?;

        let mut loans = self.loans.lock().expect("loan store mutex poisoned");
        match loans.iter_mut().find(|loan| loan.id == id) {
            Some(loan) => {
                loan.status = status;
                if let Some(officer) = loan_officer {
                    loan.loan_officer = officer.to_string();
                }
                loan.updated_at = Utc::now();
                Ok(Some(loan.clone()))
            }
            None => Ok(None),
        }
    }

    async fn distinct_applicant_count(&self, exclude_pending: bool) -> Result<u64, StoreError> {
        let loans = self.loans.lock().expect("loan store mutex poisoned");
        let distinct: HashSet<i64> = loans
            .iter()
            .filter(|loan| !exclude_pending || loan.status != LoanStatus::Pending)
            .map(|loan| loan.id_number)
            .collect();
        Ok(distinct.len() as u64)
    }

    async fn count_with_status(&self, status: LoanStatus) -> Result<u64, StoreError> {
        let loans = self.loans.lock().expect("loan store mutex poisoned");
        Ok(loans.iter().filter(|loan| loan.status == status).count() as u64)
    }

    async fn total_amount_with_status(&self, status: LoanStatus) -> Result<f64, StoreError> {
        let loans = self.loans.lock().expect("loan store mutex poisoned");
        Ok(loans
            .iter()
            .filter(|loan| loan.status == status)
            .map(|loan| loan.loan_amount)
            .sum())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_loan(id_number: i64, status: LoanStatus, amount: f64) -> NewLoan {
        NewLoan {
            id_number,
            full_name: "Ada Lovelace".to_string(),
            loan_amount: amount,
            loan_tenure: 12,
            employment_status: "Employed".to_string(),
            reason_for_loan: "Business".to_string(),
            employment_address: "12 Analytical Way".to_string(),
            status,
            loan_officer: "Not Assigned".to_string(),
        }
    }

    #[tokio::test]
    async fn insert_assigns_object_id_hex() {
        let store = MemoryLoanStore::new();
        let loan = store
            .insert_loan(new_loan(1, LoanStatus::Pending, 100.0))
            .await
            .unwrap();
        assert_eq!(loan.id.len(), 24);
        assert!(ObjectId::parse_str(&loan.id).is_ok());
    }

    #[tokio::test]
    async fn update_refreshes_updated_at_only() {
        let store = MemoryLoanStore::new();
        let loan = store
            .insert_loan(new_loan(1, LoanStatus::Pending, 100.0))
            .await
            .unwrap();

        let updated = store
            .update_loan_status(&loan.id, LoanStatus::Verified, Some("Jane"))
            .await
            .unwrap()
            .expect("record should exist");

        assert_eq!(updated.status, LoanStatus::Verified);
        assert_eq!(updated.loan_officer, "Jane");
        assert_eq!(updated.created_at, loan.created_at);
        assert!(updated.updated_at >= loan.updated_at);
    }

    #[tokio::test]
    async fn malformed_id_is_rejected() {
        let store = MemoryLoanStore::new();
        let result = store
            .update_loan_status("not-an-object-id", LoanStatus::Verified, None)
            .await;
        assert!(matches!(result, Err(StoreError::InvalidId(_))));
    }
}
