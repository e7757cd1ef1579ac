//! Contact entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::case::Disease;
use crate::person::Person;
use crate::share::OriginInfo;

/// Classification of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactClassification {
    Unconfirmed,
    Confirmed,
    NoContact,
}

/// Follow-up status of a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContactStatus {
    Active,
    ConvertedToCase,
    Dropped,
}

/// A contact of a surveillance case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contact {
    /// Local primary key.
    pub id: Uuid,
    /// Stable external identifier, shared across instances.
    pub uuid: String,
    /// External identifier of the source case, when known on this instance.
    pub case_uuid: Option<String>,
    /// Disease of the source case.
    pub disease: Disease,
    /// Current classification.
    pub contact_classification: ContactClassification,
    /// Follow-up status.
    pub contact_status: ContactStatus,
    /// Date the contact was reported.
    pub report_date: DateTime<Utc>,
    /// The contact person.
    pub person: Person,
    /// Responsible jurisdiction (region identifier).
    pub region: String,
    /// Provenance record, present only when this contact was received from
    /// another instance.
    pub origin_info: Option<OriginInfo>,
    /// Last modification timestamp, used for optimistic concurrency.
    pub change_date: DateTime<Utc>,
}

impl Contact {
    /// Whether this instance may edit the contact. Same ownership rule as
    /// [`crate::Case::is_locally_editable`].
    pub fn is_locally_editable(&self) -> bool {
        match &self.origin_info {
            None => true,
            Some(origin) => origin.ownership_handed_over,
        }
    }
}
