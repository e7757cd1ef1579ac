//! Data persisters: idempotent absorption of processed share packages.
//!
//! Persisters match incoming entities against existing local copies by their
//! stable external uuid. A re-received entity keeps its local primary key and
//! its provenance record's identity; everything else is updated in place, so
//! re-sends never create duplicates. All writes of a batch go through one
//! atomic [`crate::store::EntityStore::apply`] call.
//!
//! A person appearing more than once in a batch — or already known locally —
//! keeps a single identity: every entity referencing that person's uuid is
//! written with the same person primary key.

mod case;
mod contact;

pub use case::ProcessedCaseDataPersister;
pub use contact::ProcessedContactDataPersister;

use std::collections::HashMap;

use uuid::Uuid;

use caselink_entity::case::Case;
use caselink_entity::contact::Contact;

use crate::store::WriteSet;

pub(crate) fn merge_case_identity(incoming: &mut Case, existing: &Case) {
    incoming.id = existing.id;
    incoming.person.id = existing.person.id;
    merge_origin_identity(incoming.origin_info.as_mut(), existing);
}

pub(crate) fn merge_contact_identity(incoming: &mut Contact, existing: &Contact) {
    incoming.id = existing.id;
    incoming.person.id = existing.person.id;
    if let (Some(incoming_origin), Some(existing_origin)) =
        (incoming.origin_info.as_mut(), existing.origin_info.as_ref())
    {
        incoming_origin.id = existing_origin.id;
        incoming_origin.creation_date = existing_origin.creation_date;
    }
}

/// Give every entity of the write set referencing the same person uuid the
/// same person primary key. `known` is pre-seeded with the person ids of
/// entities that matched an existing local copy, so a locally known person
/// always wins over a freshly generated id.
pub(crate) fn unify_person_identity(writes: &mut WriteSet, known: &mut HashMap<String, Uuid>) {
    for case in &mut writes.cases {
        let id = *known
            .entry(case.person.uuid.clone())
            .or_insert(case.person.id);
        case.person.id = id;
    }
    for contact in &mut writes.contacts {
        let id = *known
            .entry(contact.person.uuid.clone())
            .or_insert(contact.person.id);
        contact.person.id = id;
    }
}

fn merge_origin_identity(
    incoming: Option<&mut caselink_entity::share::OriginInfo>,
    existing: &Case,
) {
    if let (Some(incoming_origin), Some(existing_origin)) =
        (incoming, existing.origin_info.as_ref())
    {
        incoming_origin.id = existing_origin.id;
        incoming_origin.creation_date = existing_origin.creation_date;
    }
}
