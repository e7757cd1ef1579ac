//! Case data persister.

use std::sync::Arc;

use caselink_core::AppResult;

use crate::processor::ProcessedCaseData;
use crate::store::{EntityStore, WriteSet};

use std::collections::HashMap;

use uuid::Uuid;

use super::{merge_case_identity, merge_contact_identity, unify_person_identity};

/// Persists processed case packages.
pub struct ProcessedCaseDataPersister {
    store: Arc<dyn EntityStore>,
}

impl ProcessedCaseDataPersister {
    /// Create a new persister.
    pub fn new(store: Arc<dyn EntityStore>) -> Self {
        Self { store }
    }

    /// Persist a whole batch of processed case packages atomically.
    ///
    /// Entities already known locally (matched by external uuid) are updated
    /// in place, keeping their local primary key and the identity of their
    /// provenance record.
    pub async fn persist_batch(&self, batch: Vec<ProcessedCaseData>) -> AppResult<()> {
        let case_uuids: Vec<String> = batch.iter().map(|data| data.case.uuid.clone()).collect();
        let contact_uuids: Vec<String> = batch
            .iter()
            .flat_map(|data| data.associated_contacts.iter().map(|c| c.uuid.clone()))
            .collect();

        let existing_cases = self.store.cases_by_uuids(&case_uuids).await?;
        let existing_contacts = self.store.contacts_by_uuids(&contact_uuids).await?;

        let mut known_persons: HashMap<String, Uuid> = existing_cases
            .iter()
            .map(|c| (c.person.uuid.clone(), c.person.id))
            .chain(
                existing_contacts
                    .iter()
                    .map(|c| (c.person.uuid.clone(), c.person.id)),
            )
            .collect();

        let mut writes = WriteSet::default();
        for data in batch {
            let mut case = data.case;
            if let Some(existing) = existing_cases.iter().find(|c| c.uuid == case.uuid) {
                merge_case_identity(&mut case, existing);
            }
            writes.cases.push(case);

            for mut contact in data.associated_contacts {
                if let Some(existing) = existing_contacts.iter().find(|c| c.uuid == contact.uuid) {
                    merge_contact_identity(&mut contact, existing);
                }
                writes.contacts.push(contact);
            }

            writes.samples.extend(data.samples);
        }

        unify_person_identity(&mut writes, &mut known_persons);

        self.store.apply(writes).await
    }
}
