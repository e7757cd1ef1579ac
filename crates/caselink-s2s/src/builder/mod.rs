//! Share data builders: assemble self-contained share packages.
//!
//! A builder produces the primary DTO plus all dependent entities converted
//! to their own shareable DTOs, applying field visibility and
//! pseudonymization before the package leaves the process. Builders read
//! from storage but never write.

mod case;
mod contact;

pub use case::{CaseShareData, CaseShareDataBuilder};
pub use contact::{ContactShareData, ContactShareDataBuilder};

use caselink_entity::contact::Contact;
use caselink_entity::person::Person;
use caselink_entity::sample::Sample;
use caselink_entity::user::User;

use crate::dto::{ContactDataDto, OriginInfoDto, PersonDto, SampleDto};
use crate::options::ShareOptions;

pub(crate) fn person_to_dto(person: &Person) -> PersonDto {
    PersonDto {
        uuid: person.uuid.clone(),
        first_name: person.first_name.clone(),
        last_name: person.last_name.clone(),
        sex: person.sex,
        birth_date: person.birth_date,
        phone: person.phone.clone(),
        email_address: person.email_address.clone(),
    }
}

pub(crate) fn sample_to_dto(sample: &Sample) -> SampleDto {
    SampleDto {
        uuid: sample.uuid.clone(),
        associated_case_uuid: sample.associated_case_uuid.clone(),
        associated_contact_uuid: sample.associated_contact_uuid.clone(),
        sample_material: sample.sample_material,
        sample_date: sample.sample_date,
        lab_name: sample.lab_name.clone(),
    }
}

pub(crate) fn contact_to_dto(contact: &Contact, person: PersonDto) -> ContactDataDto {
    ContactDataDto {
        uuid: contact.uuid.clone(),
        case_uuid: contact.case_uuid.clone(),
        disease: contact.disease,
        contact_classification: contact.contact_classification,
        contact_status: contact.contact_status,
        report_date: contact.report_date,
        region: contact.region.clone(),
        person,
    }
}

pub(crate) fn origin_info_dto(
    sender_organization_id: &str,
    user: &User,
    options: &ShareOptions,
) -> OriginInfoDto {
    OriginInfoDto {
        organization_id: sender_organization_id.to_string(),
        sender_name: user.name.clone(),
        sender_email: user.email.clone(),
        sender_phone: user.phone.clone(),
        ownership_handed_over: options.hand_over_ownership,
        comment: options.comment.clone(),
    }
}
