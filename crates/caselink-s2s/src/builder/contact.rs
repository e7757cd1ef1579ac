//! Contact share data builder.

use std::sync::Arc;

use caselink_core::AppResult;
use caselink_entity::contact::Contact;
use caselink_entity::sample::Sample;
use caselink_entity::user::User;

use crate::dto::ContactShareDto;
use crate::options::ShareOptions;
use crate::pseudonymizer::Pseudonymizer;
use crate::store::EntityStore;

use super::{contact_to_dto, origin_info_dto, person_to_dto, sample_to_dto};

/// A built contact package entry with its dependent entities.
pub struct ContactShareData {
    /// The wire DTO.
    pub dto: ContactShareDto,
    /// Samples included in the package.
    pub samples: Vec<Sample>,
}

/// Builds share packages for contacts.
pub struct ContactShareDataBuilder {
    store: Arc<dyn EntityStore>,
    pseudonymizer: Arc<dyn Pseudonymizer>,
    sender_organization_id: String,
}

impl ContactShareDataBuilder {
    /// Create a new builder.
    pub fn new(
        store: Arc<dyn EntityStore>,
        pseudonymizer: Arc<dyn Pseudonymizer>,
        sender_organization_id: impl Into<String>,
    ) -> Self {
        Self {
            store,
            pseudonymizer,
            sender_organization_id: sender_organization_id.into(),
        }
    }

    /// Assemble the share package for one contact.
    pub async fn build_share_data(
        &self,
        contact: &Contact,
        user: &User,
        options: &ShareOptions,
    ) -> AppResult<ContactShareData> {
        let samples = if options.with_samples {
            self.store.samples_for_contact(&contact.uuid).await?
        } else {
            Vec::new()
        };

        let mut person = person_to_dto(&contact.person);
        if options.pseudonymize_personal_data {
            self.pseudonymizer.pseudonymize(&mut person, false);
        }

        let dto = ContactShareDto {
            contact: contact_to_dto(contact, person),
            samples: samples.iter().map(sample_to_dto).collect(),
            origin_info: origin_info_dto(&self.sender_organization_id, user, options),
        };

        Ok(ContactShareData { dto, samples })
    }
}
