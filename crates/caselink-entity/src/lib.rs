//! # caselink-entity
//!
//! Domain entity models for CaseLink: surveillance cases, contacts, samples,
//! persons, users, and the sharing records (`ShareInfo`, `OriginInfo`) that
//! track what left this instance and where received data came from.

pub mod case;
pub mod contact;
pub mod person;
pub mod sample;
pub mod share;
pub mod symptoms;
pub mod user;

pub use case::{Case, CaseClassification, Disease};
pub use contact::{Contact, ContactClassification, ContactStatus};
pub use person::{Person, Sex};
pub use sample::{Sample, SampleMaterial};
pub use share::{OriginInfo, ShareInfo, ShareInfoCriteria, ShareTarget};
pub use symptoms::Symptoms;
pub use user::{User, UserRight};
