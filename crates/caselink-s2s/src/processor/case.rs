//! Shared case processor.

use chrono::Utc;
use uuid::Uuid;

use caselink_core::types::ValidationErrors;
use caselink_core::types::validation::{case_group, contact_group, sample_group};
use caselink_entity::case::{Case, CaseClassification};
use caselink_entity::contact::{Contact, ContactClassification};
use caselink_entity::sample::Sample;

use crate::dto::CaseShareDto;

use super::{contact_from_dto, origin_info_from_dto, person_from_dto, sample_from_dto};

/// A validated case package entry, ready to persist.
///
/// Constructed only when validation of the entire entry succeeded; never
/// partially filled.
#[derive(Debug)]
pub struct ProcessedCaseData {
    /// The case, provenance attached.
    pub case: Case,
    /// Linked contacts, provenance attached.
    pub associated_contacts: Vec<Contact>,
    /// Samples of the case and its contacts.
    pub samples: Vec<Sample>,
}

/// Validates incoming case packages.
#[derive(Debug, Clone, Default)]
pub struct SharedCaseProcessor;

impl SharedCaseProcessor {
    /// Validate one package entry and convert it to its persistable form.
    ///
    /// `sender_organization_id` is the cryptographically verified sender
    /// from the envelope; the package's claimed origin must match it.
    pub fn process_shared_data(
        &self,
        dto: &CaseShareDto,
        sender_organization_id: &str,
    ) -> Result<ProcessedCaseData, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let group = case_group(&dto.case.uuid);

        if dto.case.uuid.is_empty() {
            errors.add(&group, "case", "Case has no identifier");
        }
        if dto.case.case_classification == CaseClassification::NoCase {
            errors.add(&group, "case", "A discarded case may not be shared");
        }
        if dto.case.person.uuid.is_empty() {
            errors.add(&group, "person", "Case person has no identifier");
        }
        if dto.origin_info.organization_id != sender_organization_id {
            errors.add(
                &group,
                "origin",
                "Origin organization does not match the sending instance",
            );
        }

        for contact in &dto.associated_contacts {
            let contact_key = contact_group(&contact.uuid);
            if contact.uuid.is_empty() {
                errors.add(&contact_key, "contact", "Contact has no identifier");
            }
            if contact.disease != dto.case.disease {
                errors.add(
                    &contact_key,
                    "contact",
                    "Contact disease differs from the case disease",
                );
            }
            if contact.contact_classification == ContactClassification::NoContact {
                errors.add(&contact_key, "contact", "A dropped contact may not be shared");
            }
            if contact.case_uuid.as_deref() != Some(dto.case.uuid.as_str()) {
                errors.add(
                    &contact_key,
                    "contact",
                    "Contact does not belong to the shared case",
                );
            }
            if contact.person.uuid.is_empty() {
                errors.add(&contact_key, "person", "Contact person has no identifier");
            }
        }

        let contact_uuids: Vec<&str> = dto
            .associated_contacts
            .iter()
            .map(|c| c.uuid.as_str())
            .collect();

        for sample in &dto.samples {
            let sample_key = sample_group(&sample.uuid);
            match (&sample.associated_case_uuid, &sample.associated_contact_uuid) {
                (Some(_), Some(_)) => {
                    errors.add(
                        &sample_key,
                        "sample",
                        "Sample references both a case and a contact",
                    );
                }
                (Some(case_uuid), None) => {
                    if case_uuid != &dto.case.uuid {
                        errors.add(
                            &sample_key,
                            "sample",
                            "Sample does not belong to the shared case",
                        );
                    }
                }
                (None, Some(contact_uuid)) => {
                    if !contact_uuids.contains(&contact_uuid.as_str()) {
                        errors.add(
                            &sample_key,
                            "sample",
                            "Sample belongs to a contact that is not part of the package",
                        );
                    }
                }
                (None, None) => {
                    errors.add(&sample_key, "sample", "Sample has no association");
                }
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let origin = origin_info_from_dto(&dto.origin_info);

        let case = Case {
            id: Uuid::new_v4(),
            uuid: dto.case.uuid.clone(),
            disease: dto.case.disease,
            case_classification: dto.case.case_classification,
            report_date: dto.case.report_date,
            person: person_from_dto(&dto.case.person),
            symptoms: dto.case.symptoms.clone(),
            region: dto.case.region.clone(),
            health_facility: dto.case.health_facility.clone(),
            origin_info: Some(origin.clone()),
            change_date: Utc::now(),
        };

        let associated_contacts = dto
            .associated_contacts
            .iter()
            .map(|contact| contact_from_dto(contact, origin.clone()))
            .collect();

        let samples = dto.samples.iter().map(sample_from_dto).collect();

        Ok(ProcessedCaseData {
            case,
            associated_contacts,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{case_share_dto, sample_dto_for_case};

    #[test]
    fn test_valid_package_converts_fully() {
        let processor = SharedCaseProcessor;
        let dto = case_share_dto("case-1", "org-b");

        let processed = processor.process_shared_data(&dto, "org-b").expect("valid");
        assert_eq!(processed.case.uuid, "case-1");
        let origin = processed.case.origin_info.as_ref().expect("origin");
        assert_eq!(origin.organization_id, "org-b");
    }

    #[test]
    fn test_discarded_classification_rejected() {
        let processor = SharedCaseProcessor;
        let mut dto = case_share_dto("case-1", "org-b");
        dto.case.case_classification = CaseClassification::NoCase;

        let errors = processor.process_shared_data(&dto, "org-b").unwrap_err();
        assert!(errors.contains_group("case-case-1"));
    }

    #[test]
    fn test_sender_mismatch_rejected() {
        let processor = SharedCaseProcessor;
        let dto = case_share_dto("case-1", "org-b");

        let errors = processor.process_shared_data(&dto, "org-c").unwrap_err();
        assert!(errors.contains_group("case-case-1"));
    }

    #[test]
    fn test_foreign_sample_rejected_under_sample_group() {
        let processor = SharedCaseProcessor;
        let mut dto = case_share_dto("case-1", "org-b");
        dto.samples.push(sample_dto_for_case("s-9", "other-case"));

        let errors = processor.process_shared_data(&dto, "org-b").unwrap_err();
        assert!(errors.contains_group("sample-s-9"));
        assert!(!errors.contains_group("case-case-1"));
    }
}
