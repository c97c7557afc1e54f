//! Route definitions for the loan API

use axum::{
    routing::{get, patch, post},
    Router,
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::app_state::AppState;
use crate::handlers::*;
use crate::middleware;

/// The six loan routes.
pub fn loan_routes() -> Router<AppState> {
    Router::new()
        .route("/loans", post(create_loan).get(get_loans_by_role))
        .route("/loans/id", get(get_loans_by_id_number))
        .route("/loans/status-verifier", patch(update_loan_status_verifier))
        .route("/loans/status-admin", patch(update_loan_status_admin))
        .route("/loans/summary", get(get_loan_summary))
}

/// Assemble the application router with request tracing and the
/// generic panic fallback. CORS is layered on top by the binary.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health_check))
        .merge(loan_routes())
        .with_state(state)
        .layer(axum::middleware::from_fn(middleware::request_tracing))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
}
