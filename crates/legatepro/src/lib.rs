//! Core library for the LegatePro estate-administration service.
//!
//! Estates, their scoped records (documents, contacts, notes, tasks), and
//! financial entries (expenses, invoices, rent payments) live behind
//! repository traits so the HTTP binary and the tests can share the same
//! service layer. Authorization is centralized in [`access`]; every route
//! handler resolves the caller's estate role through it rather than
//! re-checking membership ad hoc.

pub mod access;
pub mod activity;
pub mod auth;
pub mod billing;
pub mod config;
pub mod context;
pub mod domain;
pub mod error;
pub mod estates;
pub mod finance;
pub mod readiness;
pub mod records;
pub mod store;
pub mod telemetry;

pub use context::{api_router, AppContext};
