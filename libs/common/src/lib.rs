//! Common library for the storefront backend
//!
//! This crate provides shared functionality used across the workspace,
//! including database connectivity, schema migrations, the store error
//! taxonomy and deadline/retry helpers for store calls.

pub mod database;
pub mod error;
pub mod timeout;

pub use error::{StoreError, StoreResult};
