//! # caselink-directory
//!
//! The organization directory: resolves a target-organization identifier to
//! its network address, service-account credentials, and public key. Backed
//! by the `sharing` configuration section; this crate consumes that data, it
//! does not manage it.

pub mod model;
pub mod service;

pub use model::{OrganizationAccessData, OrganizationRef};
pub use service::DirectoryService;
