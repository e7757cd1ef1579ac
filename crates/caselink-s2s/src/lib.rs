//! # caselink-s2s
//!
//! The inter-instance data-sharing protocol ("S2S sharing"): the mechanism by
//! which one CaseLink instance securely transmits a case or contact record
//! (with its dependent samples) to another instance, and by which the
//! receiving instance validates, deduplicates, and durably absorbs that
//! record while preserving traceability of its origin.
//!
//! Outbound flow: builder → encryption → transport → ledger write.
//! Inbound flow: decrypt → validate all entries → persist all entries.
//! Both directions are all-or-nothing per batch.

pub mod builder;
pub mod crypto;
pub mod dto;
pub mod error;
pub mod fields;
pub mod jurisdiction;
pub mod options;
pub mod persister;
pub mod processor;
pub mod pseudonymizer;
pub mod service;
pub mod store;
pub mod transport;
pub mod wire;

#[cfg(test)]
pub(crate) mod testutil;

pub use error::{ShareError, ShareResult};
pub use options::ShareOptions;
pub use service::SharingService;
