//! Shared contact processor.

use caselink_core::types::ValidationErrors;
use caselink_core::types::validation::{contact_group, sample_group};
use caselink_entity::contact::{Contact, ContactClassification};
use caselink_entity::sample::Sample;

use crate::dto::ContactShareDto;

use super::{contact_from_dto, origin_info_from_dto, sample_from_dto};

/// A validated contact package entry, ready to persist.
#[derive(Debug)]
pub struct ProcessedContactData {
    /// The contact, provenance attached.
    pub contact: Contact,
    /// Samples of the contact.
    pub samples: Vec<Sample>,
}

/// Validates incoming contact packages.
#[derive(Debug, Clone, Default)]
pub struct SharedContactProcessor;

impl SharedContactProcessor {
    /// Validate one package entry and convert it to its persistable form.
    pub fn process_shared_data(
        &self,
        dto: &ContactShareDto,
        sender_organization_id: &str,
    ) -> Result<ProcessedContactData, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let group = contact_group(&dto.contact.uuid);

        if dto.contact.uuid.is_empty() {
            errors.add(&group, "contact", "Contact has no identifier");
        }
        if dto.contact.contact_classification == ContactClassification::NoContact {
            errors.add(&group, "contact", "A dropped contact may not be shared");
        }
        if dto.contact.person.uuid.is_empty() {
            errors.add(&group, "person", "Contact person has no identifier");
        }
        if dto.origin_info.organization_id != sender_organization_id {
            errors.add(
                &group,
                "origin",
                "Origin organization does not match the sending instance",
            );
        }

        for sample in &dto.samples {
            let sample_key = sample_group(&sample.uuid);
            if sample.associated_case_uuid.is_some() {
                errors.add(
                    &sample_key,
                    "sample",
                    "Sample of a contact package references a case",
                );
            }
            if sample.associated_contact_uuid.as_deref() != Some(dto.contact.uuid.as_str()) {
                errors.add(
                    &sample_key,
                    "sample",
                    "Sample does not belong to the shared contact",
                );
            }
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let origin = origin_info_from_dto(&dto.origin_info);
        let contact = contact_from_dto(&dto.contact, origin);
        let samples = dto.samples.iter().map(sample_from_dto).collect();

        Ok(ProcessedContactData { contact, samples })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::contact_share_dto;

    #[test]
    fn test_valid_contact_package() {
        let processor = SharedContactProcessor;
        let dto = contact_share_dto("contact-1", "org-b");

        let processed = processor.process_shared_data(&dto, "org-b").expect("valid");
        assert_eq!(processed.contact.uuid, "contact-1");
        assert!(processed.contact.origin_info.is_some());
    }

    #[test]
    fn test_dropped_contact_rejected() {
        let processor = SharedContactProcessor;
        let mut dto = contact_share_dto("contact-1", "org-b");
        dto.contact.contact_classification = ContactClassification::NoContact;

        let errors = processor.process_shared_data(&dto, "org-b").unwrap_err();
        assert!(errors.contains_group("contact-contact-1"));
    }
}
