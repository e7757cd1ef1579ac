//! # caselink-core
//!
//! Core crate for CaseLink. Contains configuration schemas, pagination and
//! validation types, and the unified error system.
//!
//! This crate has **no** internal dependencies on other CaseLink crates.

pub mod config;
pub mod error;
pub mod result;
pub mod types;

pub use error::AppError;
pub use result::AppResult;
