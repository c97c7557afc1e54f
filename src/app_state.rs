//! Application state shared across handlers

use axum::extract::FromRef;

use crate::loan_service::LoanService;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub loan_service: LoanService,
}

impl AppState {
    pub fn new(loan_service: LoanService) -> Self {
        Self { loan_service }
    }
}

impl FromRef<AppState> for LoanService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.loan_service.clone()
    }
}
