//! Service-level tests against the in-memory store.

use std::sync::Arc;

use axum::http::StatusCode;

use loandesk_server::loan::{CreateLoanRequest, LoanStatus, NewLoan, UNASSIGNED_OFFICER};
use loandesk_server::loan_service::LoanService;
use loandesk_server::store::{LoanStore, MemoryLoanStore};

fn service_with_store() -> (LoanService, Arc<MemoryLoanStore>) {
    let store = Arc::new(MemoryLoanStore::new());
    (LoanService::new(store.clone()), store)
}

fn create_request(amount: f64) -> CreateLoanRequest {
    CreateLoanRequest {
        full_name: "Grace Hopper".to_string(),
        loan_amount: amount,
        loan_tenure: 18,
        employment_status: "Employed".to_string(),
        reason_for_loan: "Education".to_string(),
        employment_address: "1 Navy Yard".to_string(),
    }
}

async fn seed(store: &MemoryLoanStore, id_number: i64, status: LoanStatus, amount: f64) -> String {
    store
        .insert_loan(NewLoan {
            id_number,
            full_name: "Seeded Applicant".to_string(),
            loan_amount: amount,
            loan_tenure: 24,
            employment_status: "Self-employed".to_string(),
            reason_for_loan: "Working capital".to_string(),
            employment_address: "9 Harbor Road".to_string(),
            status,
            loan_officer: UNASSIGNED_OFFICER.to_string(),
        })
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn create_forces_pending_and_unassigned_officer() {
    let (service, _) = service_with_store();

    let loan = service.create_loan(42, create_request(3000.0)).await.unwrap();

    assert_eq!(loan.status, LoanStatus::Pending);
    assert_eq!(loan.loan_officer, UNASSIGNED_OFFICER);
    assert_eq!(loan.id_number, 42);
}

#[tokio::test]
async fn applicant_lookup_with_no_loans_is_not_found() {
    let (service, store) = service_with_store();
    seed(&store, 1, LoanStatus::Pending, 1000.0).await;

    let err = service.loans_for_applicant(2).await.unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);

    let loans = service.loans_for_applicant(1).await.unwrap();
    assert_eq!(loans.len(), 1);
}

#[tokio::test]
async fn update_on_unknown_record_is_not_found() {
    let (service, _) = service_with_store();

    let missing = mongodb::bson::oid::ObjectId::new().to_hex();
    let err = service
        .update_status_admin(&missing, LoanStatus::Approved)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_update_leaves_officer_untouched() {
    let (service, store) = service_with_store();
    let id = seed(&store, 3, LoanStatus::Verified, 2000.0).await;

    let verified = service
        .update_status_verifier(&id, LoanStatus::Verified, "Jane")
        .await
        .unwrap();
    assert_eq!(verified.loan_officer, "Jane");

    let approved = service
        .update_status_admin(&id, LoanStatus::Approved)
        .await
        .unwrap();
    assert_eq!(approved.status, LoanStatus::Approved);
    assert_eq!(approved.loan_officer, "Jane");
}

#[tokio::test]
async fn summary_counts_distinct_applicants() {
    let (service, store) = service_with_store();

    // Applicant 10: one pending, one approved. Applicant 20: pending only.
    seed(&store, 10, LoanStatus::Pending, 1000.0).await;
    seed(&store, 10, LoanStatus::Approved, 2500.0).await;
    seed(&store, 20, LoanStatus::Pending, 4000.0).await;

    let summary = service.summary().await.unwrap();

    assert_eq!(summary.active_user_count, 2);
    assert_eq!(summary.borrow_user_count, 1);
    assert_eq!(summary.approved_loan_count, 1);
    assert_eq!(summary.total_disbursed_loan_amount, 2500.0);
}

#[tokio::test]
async fn summary_sums_only_approved_amounts() {
    let (service, store) = service_with_store();

    seed(&store, 1, LoanStatus::Approved, 1000.0).await;
    seed(&store, 2, LoanStatus::Approved, 2000.0).await;
    seed(&store, 3, LoanStatus::Rejected, 9000.0).await;

    let summary = service.summary().await.unwrap();

    assert_eq!(summary.approved_loan_count, 2);
    assert_eq!(summary.total_disbursed_loan_amount, 3000.0);
    assert_eq!(summary.borrow_user_count, 3);
}

#[tokio::test]
async fn role_visibility_matches_status_sets() {
    let (service, store) = service_with_store();

    seed(&store, 1, LoanStatus::Pending, 1000.0).await;
    seed(&store, 2, LoanStatus::Verified, 2000.0).await;
    seed(&store, 3, LoanStatus::Approved, 3000.0).await;

    let verifier = service
        .loans_for_role(loandesk_server::loan::ReviewerRole::Verifier)
        .await
        .unwrap();
    assert_eq!(verifier.len(), 2);
    assert!(verifier
        .iter()
        .all(|l| matches!(l.status, LoanStatus::Pending | LoanStatus::Verified)));

    let admin = service
        .loans_for_role(loandesk_server::loan::ReviewerRole::Admin)
        .await
        .unwrap();
    assert_eq!(admin.len(), 2);
    assert!(admin.iter().all(|l| l.status != LoanStatus::Pending));
}
