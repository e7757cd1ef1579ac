//! Share-package DTOs: the decrypted logical payload of one request.
//!
//! Each DTO is self-contained — person, samples, and (for a case) linked
//! contacts are inlined, so the receiver resolves no external references
//! before persisting.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use caselink_entity::case::{CaseClassification, Disease};
use caselink_entity::contact::{ContactClassification, ContactStatus};
use caselink_entity::person::Sex;
use caselink_entity::sample::SampleMaterial;
use caselink_entity::symptoms::Symptoms;

/// A case share package entry: the case plus everything it depends on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseShareDto {
    /// The case itself.
    pub case: CaseDataDto,
    /// Contacts linked to the case.
    #[serde(default)]
    pub associated_contacts: Vec<ContactDataDto>,
    /// Samples of the case and of its linked contacts.
    #[serde(default)]
    pub samples: Vec<SampleDto>,
    /// Provenance the receiver attaches to the absorbed entities.
    pub origin_info: OriginInfoDto,
}

/// A contact share package entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactShareDto {
    /// The contact itself.
    pub contact: ContactDataDto,
    /// Samples of the contact.
    #[serde(default)]
    pub samples: Vec<SampleDto>,
    /// Provenance the receiver attaches to the absorbed entities.
    pub origin_info: OriginInfoDto,
}

/// Shareable form of a case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseDataDto {
    /// Stable external identifier.
    pub uuid: String,
    /// Disease.
    pub disease: Disease,
    /// Classification.
    pub case_classification: CaseClassification,
    /// Report date.
    pub report_date: DateTime<Utc>,
    /// Jurisdiction of the sending instance.
    pub region: String,
    /// Facility where the case is handled.
    pub health_facility: Option<String>,
    /// The affected person.
    pub person: PersonDto,
    /// Reported symptoms, already reduced to the fields visible for the
    /// disease.
    pub symptoms: Symptoms,
}

/// Shareable form of a contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDataDto {
    /// Stable external identifier.
    pub uuid: String,
    /// External identifier of the source case, when shared along.
    pub case_uuid: Option<String>,
    /// Disease of the source case.
    pub disease: Disease,
    /// Classification.
    pub contact_classification: ContactClassification,
    /// Follow-up status.
    pub contact_status: ContactStatus,
    /// Report date.
    pub report_date: DateTime<Utc>,
    /// Jurisdiction of the sending instance.
    pub region: String,
    /// The contact person.
    pub person: PersonDto,
}

/// Shareable form of a sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SampleDto {
    /// Stable external identifier.
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
}

/// Shareable form of a person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonDto {
    /// Stable external identifier.
    pub uuid: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Sex.
    pub sex: Option<Sex>,
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email_address: Option<String>,
}

/// Provenance information carried with every share package entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OriginInfoDto {
    /// Identifier of the sending organization.
    pub organization_id: String,
    /// Name of the sending user.
    pub sender_name: String,
    /// Email of the sending user.
    pub sender_email: Option<String>,
    /// Phone number of the sending user.
    pub sender_phone: Option<String>,
    /// Whether the sender hands over ownership to the receiver.
    pub ownership_handed_over: bool,
    /// Free-text comment from the sender.
    pub comment: Option<String>,
}
