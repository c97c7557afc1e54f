//! LoanDesk backend library
//!
//! A CRUD backend for loan applications: creation, role-scoped listing,
//! applicant lookup, the two-step verifier/admin status workflow and
//! collection-wide summary statistics.

pub mod app_state;
pub mod config;
pub mod error;
pub mod handlers;
pub mod loan;
pub mod loan_service;
pub mod middleware;
pub mod routes;
pub mod store;
