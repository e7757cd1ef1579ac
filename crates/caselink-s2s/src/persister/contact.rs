//! Contact data persister.

use std::sync::Arc;

use caselink_core::AppResult;

use crate::processor::ProcessedContactData;
use crate::store::{EntityStore, WriteSet};

use std::collections::HashMap;

use uuid::Uuid;

use super::{merge_contact_identity, unify_person_identity};

/// Persists processed contact packages.
pub struct ProcessedContactDataPersister {
    store: Arc<dyn EntityStore>,
}

impl ProcessedContactDataPersister {
    /// Create a new persister.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Persist a whole batch of processed contact packages atomically.
    pub async fn persist_batch(&self, batch: Vec<ProcessedContactData>) -> AppResult<()> {
        let contact_uuids: Vec<String> = batch
            .iter()
            .map(|data| data.contact.uuid.clone())
            .collect();
        let existing_contacts = self.store.contacts_by_uuids(&contact_uuids).await?;

        let mut known_persons: HashMap<String, Uuid> = existing_contacts
            .iter()
            .map(|c| (c.person.uuid.clone(), c.person.id))
            .collect();

        let mut writes = WriteSet::default();
        for data in batch {
            let mut contact = data.contact;
            if let Some(existing) = existing_contacts.iter().find(|c| c.uuid == contact.uuid) {
                merge_contact_identity(&mut contact, existing);
            }
            writes.contacts.push(contact);
            writes.samples.extend(data.samples);
        }

        unify_person_identity(&mut writes, &mut known_persons);

        self.store.apply(writes).await
    }
}
