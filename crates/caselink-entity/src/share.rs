//! Sharing records: the outbound share ledger and inbound provenance.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The entity a share-ledger row refers to.
///
/// Exactly one association per row; the variants carry the entity's stable
/// external identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "uuid", rename_all = "snake_case")]
pub enum ShareTarget {
    /// A shared case.
    Case(String),
    /// A shared contact.
    Contact(String),
    /// A shared sample.
    Sample(String),
}

impl ShareTarget {
    /// The external identifier of the referenced entity.
    pub fn uuid(&self) -> &str {
        match self {
            Self::Case(uuid) | Self::Contact(uuid) | Self::Sample(uuid) => uuid,
        }
    }
}

/// Durable ledger record of one shared entity.
///
/// Created once per shared entity per share action, only after the remote
/// instance confirmed acceptance. Rows are append-only: a re-share of the
/// same entity produces a new row instead of mutating an old one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShareInfo {
    /// Unique row identifier.
    pub id: Uuid,
    /// When the share was recorded.
    pub creation_date: DateTime<Utc>,
    /// Identifier of the target organization.
    pub organization_id: String,
    /// Whether ownership of the entity was handed over to the target.
    pub ownership_handed_over: bool,
    /// External identifier of the user who performed the share.
    pub sender_user_uuid: String,
    /// Free-text comment entered by the sender.
    pub comment: Option<String>,
    /// The shared entity.
    pub target: ShareTarget,
}

/// Filter criteria for listing share-ledger rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShareInfoCriteria {
    /// Restrict to rows referencing this case.
    pub case_uuid: Option<String>,
    /// Restrict to rows referencing this contact.
    pub contact_uuid: Option<String>,
    /// Restrict to rows referencing this sample.
    pub sample_uuid: Option<String>,
    /// Restrict to shares with this organization.
    pub organization_id: Option<String>,
}

impl ShareInfoCriteria {
    /// Whether a ledger row matches these criteria.
    pub fn matches(&self, info: &ShareInfo) -> bool {
        if let Some(uuid) = &self.case_uuid {
            if !matches!(&info.target, ShareTarget::Case(u) if u == uuid) {
                return false;
            }
        }
        if let Some(uuid) = &self.contact_uuid {
            if !matches!(&info.target, ShareTarget::Contact(u) if u == uuid) {
                return false;
            }
        }
        if let Some(uuid) = &self.sample_uuid {
            if !matches!(&info.target, ShareTarget::Sample(u) if u == uuid) {
                return false;
            }
        }
        if let Some(org) = &self.organization_id {
            if &info.organization_id != org {
                return false;
            }
        }
        true
    }
}

/// Provenance attached to an entity received from another instance.
///
/// Created on first receipt of a remote entity and updated in place on
/// subsequent receipts of the same entity; never duplicated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OriginInfo {
    /// Unique record identifier.
    pub id: Uuid,
    /// When the provenance record was first created.
    pub creation_date: DateTime<Utc>,
    /// Identifier of the organization the entity came from.
    pub organization_id: String,
    /// Name of the sending user.
    pub sender_name: String,
    /// Email of the sending user.
    pub sender_email: Option<String>,
    /// Phone number of the sending user.
    pub sender_phone: Option<String>,
    /// Whether the sender handed over ownership. `true` makes the local copy
    /// the master copy and therefore editable.
    pub ownership_handed_over: bool,
    /// Free-text comment from the sender.
    pub comment: Option<String>,
}
