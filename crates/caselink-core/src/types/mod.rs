//! Shared types used across the CaseLink crates.

pub mod pagination;
pub mod validation;

pub use pagination::{PageRequest, PageResponse};
pub use validation::{ValidationError, ValidationErrors};
