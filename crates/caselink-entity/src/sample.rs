//! Sample entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Material a sample was taken from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SampleMaterial {
    Blood,
    Sera,
    Stool,
    NasalSwab,
    ThroatSwab,
    Other,
}

/// A laboratory sample taken for a case or contact.
///
/// A sample is associated with exactly one of the two; both association
/// fields set or both empty is a data error caught during share validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Local primary key.
    pub id: Uuid,
    /// Stable external identifier, shared across instances.
    pub uuid: String,
    /// External identifier of the associated case.
    pub associated_case_uuid: Option<String>,
    /// External identifier of the associated contact.
    pub associated_contact_uuid: Option<String>,
    /// Material taken.
    pub sample_material: SampleMaterial,
    /// When the sample was taken.
    pub sample_date: DateTime<Utc>,
    /// Laboratory the sample was sent to.
    pub lab_name: String,
    /// Last modification timestamp.
    pub change_date: DateTime<Utc>,
}
