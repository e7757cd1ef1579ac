//! Storage ports consumed by the sharing protocol.
//!
//! The protocol reads entities by their stable external identifier and
//! writes through idempotent upserts. Implementations live in
//! `caselink-database`; tests use in-memory fakes.

use async_trait::async_trait;

use caselink_core::AppResult;
use caselink_core::types::{PageRequest, PageResponse};
use caselink_entity::case::Case;
use caselink_entity::contact::Contact;
use caselink_entity::sample::Sample;
use caselink_entity::share::{ShareInfo, ShareInfoCriteria};

/// A batch of upserts applied in one transaction.
///
/// Entities carry their provenance (`origin_info`) inline; upserting an
/// entity that already exists updates it and its provenance in place,
/// matched by the stable external uuid.
#[derive(Debug, Clone, Default)]
pub struct WriteSet {
    /// Cases to upsert.
    pub cases: Vec<Case>,
    /// Contacts to upsert.
    pub contacts: Vec<Contact>,
    /// Samples to upsert.
    pub samples: Vec<Sample>,
}

impl WriteSet {
    /// Whether the write set contains nothing.
    pub fn is_empty(&self) -> bool {
        self.cases.is_empty() && self.contacts.is_empty() && self.samples.is_empty()
    }
}

/// Entity reads and the atomic batch write used by the protocol.
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Cases by external uuid, in input order; missing uuids are skipped.
    async fn cases_by_uuids(&self, uuids: &[String]) -> AppResult<Vec<Case>>;

    /// Contacts by external uuid, in input order; missing uuids are skipped.
    async fn contacts_by_uuids(&self, uuids: &[String]) -> AppResult<Vec<Contact>>;

    /// Contacts linked to the given case.
    async fn contacts_for_case(&self, case_uuid: &str) -> AppResult<Vec<Contact>>;

    /// Samples of the given case.
    async fn samples_for_case(&self, case_uuid: &str) -> AppResult<Vec<Sample>>;

    /// Samples of the given contact.
    async fn samples_for_contact(&self, contact_uuid: &str) -> AppResult<Vec<Sample>>;

    /// Apply all writes in a single transaction: either every entity of the
    /// set is visible afterwards, or none is.
    async fn apply(&self, writes: WriteSet) -> AppResult<()>;
}

/// The append-only outbound share ledger.
#[async_trait]
pub trait ShareLedger: Send + Sync {
    /// Append all rows atomically: a batch gets a ledger row per shared
    /// entity, or none at all.
    async fn append(&self, rows: Vec<ShareInfo>) -> AppResult<()>;

    /// List ledger rows matching the criteria, newest first.
    async fn list(
        &self,
        criteria: &ShareInfoCriteria,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ShareInfo>>;
}
