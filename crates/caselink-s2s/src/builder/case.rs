//! Case share data builder.

use std::sync::Arc;

use caselink_core::AppResult;
use caselink_entity::case::Case;
use caselink_entity::contact::Contact;
use caselink_entity::sample::Sample;
use caselink_entity::user::User;

use crate::dto::{CaseDataDto, CaseShareDto};
use crate::fields::FieldRegistry;
use crate::options::ShareOptions;
use crate::pseudonymizer::Pseudonymizer;
use crate::store::EntityStore;

use super::{contact_to_dto, origin_info_dto, person_to_dto, sample_to_dto};

/// A built case package entry together with the dependent entities it was
/// assembled from. The entity lists feed the share ledger after the remote
/// instance accepted the batch.
pub struct CaseShareData {
    /// The wire DTO.
    pub dto: CaseShareDto,
    /// Contacts included in the package.
    pub associated_contacts: Vec<Contact>,
    /// Samples included in the package.
    pub samples: Vec<Sample>,
}

/// Builds share packages for cases.
pub struct CaseShareDataBuilder {
    store: Arc<dyn EntityStore>,
    fields: Arc<FieldRegistry>,
    pseudonymizer: Arc<dyn Pseudonymizer>,
    sender_organization_id: String,
}

impl CaseShareDataBuilder {
    /// Create a new builder.
    pub fn new(
        store: Arc<dyn EntityStore>,
        fields: Arc<FieldRegistry>,
        pseudonymizer: Arc<dyn Pseudonymizer>,
        sender_organization_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            fields,
            pseudonymizer,
            sender_organization_id: sender_organization_id.into(),
        }
    }

    /// Assemble the share package for one case.
    ///
    /// The caller has already verified that the acting user may edit the
    /// case; this method only transforms and collects.
    pub async fn build_share_data(
        &self,
        case: &Case,
        user: &User,
        options: &ShareOptions,
    ) -> AppResult<CaseShareData> {
        let associated_contacts = if options.with_associated_contacts {
            self.store.contacts_for_case(&case.uuid).await?
        } else {
            Vec::new()
        };

        let mut samples = Vec::new();
        if options.with_samples {
            samples.extend(self.store.samples_for_case(&case.uuid).await?);
            for contact in &associated_contacts {
                samples.extend(self.store.samples_for_contact(&contact.uuid).await?);
            }
        }

        let mut person = person_to_dto(&case.person);
        if options.pseudonymize_personal_data {
            self.pseudonymizer.pseudonymize(&mut person, false);
        }

        let contact_dtos = associated_contacts
            .iter()
            .map(|contact| {
                let mut contact_person = person_to_dto(&contact.person);
                if options.pseudonymize_personal_data {
                    self.pseudonymizer.pseudonymize(&mut contact_person, false);
                }
                contact_to_dto(contact, contact_person)
            })
            .collect();

        let dto = CaseShareDto {
            case: CaseDataDto {
                uuid: case.uuid.clone(),
                disease: case.disease,
                case_classification: case.case_classification,
                report_date: case.report_date,
                region: case.region.clone(),
                health_facility: case.health_facility.clone(),
                person,
                symptoms: self.fields.redact_symptoms(case.disease, &case.symptoms),
            },
            associated_contacts: contact_dtos,
            samples: samples.iter().map(sample_to_dto).collect(),
            origin_info: origin_info_dto(&self.sender_organization_id, user, options),
        };

        Ok(CaseShareData {
            dto,
            associated_contacts,
            samples,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::pseudonymizer::{DefaultPseudonymizer, PSEUDONYM};
    use crate::testutil::{contact_for_case, local_case, sample_for_case, sharing_user, MemoryStore};

    fn builder(store: Arc<MemoryStore>) -> CaseShareDataBuilder {
        CaseShareDataBuilder::new(
            store,
            Arc::new(FieldRegistry::standard()),
            Arc::new(DefaultPseudonymizer),
            "org-a",
        )
    }

    #[tokio::test]
    async fn test_package_includes_linked_contacts_and_samples() {
        let store = Arc::new(MemoryStore::default());
        let case = local_case("case-1", "north");
        store.insert_case(case.clone());
        store.insert_contact(contact_for_case("contact-1", "case-1", "north"));
        store.insert_sample(sample_for_case("sample-1", "case-1"));

        let builder = builder(Arc::clone(&store));
        let user = sharing_user("north");
        let options = ShareOptions::to_organization("org-b");

        let data = builder.build_share_data(&case, &user, &options).await.unwrap();
        assert_eq!(data.dto.associated_contacts.len(), 1);
        assert_eq!(data.dto.samples.len(), 1);
        assert_eq!(data.dto.origin_info.organization_id, "org-a");
        assert_eq!(data.dto.origin_info.sender_name, user.name);
    }

    #[tokio::test]
    async fn test_options_exclude_contacts_and_samples() {
        let store = Arc::new(MemoryStore::default());
        let case = local_case("case-1", "north");
        store.insert_case(case.clone());
        store.insert_contact(contact_for_case("contact-1", "case-1", "north"));
        store.insert_sample(sample_for_case("sample-1", "case-1"));

        let builder = builder(Arc::clone(&store));
        let user = sharing_user("north");
        let mut options = ShareOptions::to_organization("org-b");
        options.with_associated_contacts = false;
        options.with_samples = false;

        let data = builder.build_share_data(&case, &user, &options).await.unwrap();
        assert!(data.dto.associated_contacts.is_empty());
        assert!(data.dto.samples.is_empty());
        assert!(data.associated_contacts.is_empty());
        assert!(data.samples.is_empty());
    }

    #[tokio::test]
    async fn test_invisible_symptom_fields_redacted() {
        let store = Arc::new(MemoryStore::default());
        let mut case = local_case("case-1", "north");
        // rash is not part of the COVID-19 questionnaire.
        case.symptoms.rash = Some(true);
        case.symptoms.loss_of_taste_or_smell = Some(true);
        store.insert_case(case.clone());

        let builder = builder(Arc::clone(&store));
        let user = sharing_user("north");
        let options = ShareOptions::to_organization("org-b");

        let data = builder.build_share_data(&case, &user, &options).await.unwrap();
        assert_eq!(data.dto.case.symptoms.rash, None);
        assert_eq!(data.dto.case.symptoms.loss_of_taste_or_smell, Some(true));
    }

    #[tokio::test]
    async fn test_pseudonymization_blanks_person() {
        let store = Arc::new(MemoryStore::default());
        let case = local_case("case-1", "north");
        store.insert_case(case.clone());

        let builder = builder(Arc::clone(&store));
        let user = sharing_user("north");
        let mut options = ShareOptions::to_organization("org-b");
        options.pseudonymize_personal_data = true;

        let data = builder.build_share_data(&case, &user, &options).await.unwrap();
        assert_eq!(data.dto.case.person.first_name, PSEUDONYM);
        assert_eq!(data.dto.case.person.uuid, case.person.uuid);
    }
}
