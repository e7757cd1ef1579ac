//! Text mappings between database columns and entity enums.
//!
//! Enum values are stored as the same snake_case strings the wire format
//! uses, so database content and share payloads stay comparable.

use caselink_core::error::AppError;
use caselink_core::result::AppResult;
use caselink_entity::case::{CaseClassification, Disease};
use caselink_entity::contact::{ContactClassification, ContactStatus};
use caselink_entity::person::Sex;
use caselink_entity::sample::SampleMaterial;
use caselink_entity::share::ShareTarget;

pub(crate) fn disease_to_db(value: Disease) -> &'static str {
    match value {
        Disease::Covid19 => "covid19",
        Disease::Cholera => "cholera",
        Disease::Measles => "measles",
        Disease::Ebola => "ebola",
        Disease::Plague => "plague",
        Disease::Dengue => "dengue",
        Disease::Other => "other",
    }
}

pub(crate) fn disease_from_db(value: &str) -> AppResult<Disease> {
    match value {
        "covid19" => Ok(Disease::Covid19),
        "cholera" => Ok(Disease::Cholera),
        "measles" => Ok(Disease::Measles),
        "ebola" => Ok(Disease::Ebola),
        "plague" => Ok(Disease::Plague),
        "dengue" => Ok(Disease::Dengue),
        "other" => Ok(Disease::Other),
        other => Err(AppError::database(format!("Unknown disease value: {other}"))),
    }
}

pub(crate) fn case_classification_to_db(value: CaseClassification) -> &'static str {
    match value {
        CaseClassification::NotYetClassified => "not_yet_classified",
        CaseClassification::Suspect => "suspect",
        CaseClassification::Probable => "probable",
        CaseClassification::Confirmed => "confirmed",
        CaseClassification::NoCase => "no_case",
    }
}

pub(crate) fn case_classification_from_db(value: &str) -> AppResult<CaseClassification> {
    match value {
        "not_yet_classified" => Ok(CaseClassification::NotYetClassified),
        "suspect" => Ok(CaseClassification::Suspect),
        "probable" => Ok(CaseClassification::Probable),
        "confirmed" => Ok(CaseClassification::Confirmed),
        "no_case" => Ok(CaseClassification::NoCase),
        other => Err(AppError::database(format!(
            "Unknown case classification value: {other}"
        ))),
    }
}

pub(crate) fn contact_classification_to_db(value: ContactClassification) -> &'static str {
    match value {
        ContactClassification::Unconfirmed => "unconfirmed",
        ContactClassification::Confirmed => "confirmed",
        ContactClassification::NoContact => "no_contact",
    }
}

pub(crate) fn contact_classification_from_db(value: &str) -> AppResult<ContactClassification> {
    match value {
        "unconfirmed" => Ok(ContactClassification::Unconfirmed),
        "confirmed" => Ok(ContactClassification::Confirmed),
        "no_contact" => Ok(ContactClassification::NoContact),
        other => Err(AppError::database(format!(
            "Unknown contact classification value: {other}"
        ))),
    }
}

pub(crate) fn contact_status_to_db(value: ContactStatus) -> &'static str {
    match value {
        ContactStatus::Active => "active",
        ContactStatus::ConvertedToCase => "converted_to_case",
        ContactStatus::Dropped => "dropped",
    }
}

pub(crate) fn contact_status_from_db(value: &str) -> AppResult<ContactStatus> {
    match value {
        "active" => Ok(ContactStatus::Active),
        "converted_to_case" => Ok(ContactStatus::ConvertedToCase),
        "dropped" => Ok(ContactStatus::Dropped),
        other => Err(AppError::database(format!(
            "Unknown contact status value: {other}"
        ))),
    }
}

pub(crate) fn sample_material_to_db(value: SampleMaterial) -> &'static str {
    match value {
        SampleMaterial::Blood => "blood",
        SampleMaterial::Sera => "sera",
        SampleMaterial::Stool => "stool",
        SampleMaterial::NasalSwab => "nasal_swab",
        SampleMaterial::ThroatSwab => "throat_swab",
        SampleMaterial::Other => "other",
    }
}

pub(crate) fn sample_material_from_db(value: &str) -> AppResult<SampleMaterial> {
    match value {
        "blood" => Ok(SampleMaterial::Blood),
        "sera" => Ok(SampleMaterial::Sera),
        "stool" => Ok(SampleMaterial::Stool),
        "nasal_swab" => Ok(SampleMaterial::NasalSwab),
        "throat_swab" => Ok(SampleMaterial::ThroatSwab),
        "other" => Ok(SampleMaterial::Other),
        other => Err(AppError::database(format!(
            "Unknown sample material value: {other}"
        ))),
    }
}

pub(crate) fn sex_to_db(value: Sex) -> &'static str {
    match value {
        Sex::Male => "male",
        Sex::Female => "female",
        Sex::Other => "other",
        Sex::Unknown => "unknown",
    }
}

pub(crate) fn sex_from_db(value: &str) -> AppResult<Sex> {
    match value {
        "male" => Ok(Sex::Male),
        "female" => Ok(Sex::Female),
        "other" => Ok(Sex::Other),
        "unknown" => Ok(Sex::Unknown),
        other => Err(AppError::database(format!("Unknown sex value: {other}"))),
    }
}

pub(crate) fn share_target_kind(target: &ShareTarget) -> &'static str {
    match target {
        ShareTarget::Case(_) => "case",
        ShareTarget::Contact(_) => "contact",
        ShareTarget::Sample(_) => "sample",
    }
}

pub(crate) fn share_target_from_db(kind: &str, uuid: String) -> AppResult<ShareTarget> {
    match kind {
        "case" => Ok(ShareTarget::Case(uuid)),
        "contact" => Ok(ShareTarget::Contact(uuid)),
        "sample" => Ok(ShareTarget::Sample(uuid)),
        other => Err(AppError::database(format!(
            "Unknown share target kind: {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disease_roundtrip() {
        for disease in [
            Disease::Covid19,
            Disease::Cholera,
            Disease::Measles,
            Disease::Ebola,
            Disease::Plague,
            Disease::Dengue,
            Disease::Other,
        ] {
            assert_eq!(disease_from_db(disease_to_db(disease)).unwrap(), disease);
        }
    }

    #[test]
    fn test_unknown_value_rejected() {
        assert!(disease_from_db("smallpox").is_err());
        assert!(share_target_from_db("event", "e1".to_string()).is_err());
    }

    #[test]
    fn test_share_target_kind_matches_wire_tag() {
        assert_eq!(share_target_kind(&ShareTarget::Case("c1".into())), "case");
        assert_eq!(
            share_target_from_db("sample", "s1".to_string()).unwrap(),
            ShareTarget::Sample("s1".to_string())
        );
    }
}
