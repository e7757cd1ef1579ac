//! Shared data processors: validate incoming packages and prepare them for
//! persistence.
//!
//! Processors are side-effect free with respect to storage. They either
//! produce a fully processed entity graph or a structured set of validation
//! errors keyed by deterministic group names; this separation is what makes
//! the all-or-nothing batch guarantee of the facade possible.

mod case;
mod contact;

pub use case::{ProcessedCaseData, SharedCaseProcessor};
pub use contact::{ProcessedContactData, SharedContactProcessor};

use chrono::Utc;
use uuid::Uuid;

use caselink_entity::contact::Contact;
use caselink_entity::person::Person;
use caselink_entity::sample::Sample;
use caselink_entity::share::OriginInfo;

use crate::dto::{ContactDataDto, OriginInfoDto, PersonDto, SampleDto};

pub(crate) fn origin_info_from_dto(dto: &OriginInfoDto) -> OriginInfo {
    OriginInfo {
        id: Uuid::new_v4(),
        creation_date: Utc::now(),
        organization_id: dto.organization_id.clone(),
        sender_name: dto.sender_name.clone(),
        sender_email: dto.sender_email.clone(),
        sender_phone: dto.sender_phone.clone(),
        ownership_handed_over: dto.ownership_handed_over,
        comment: dto.comment.clone(),
    }
}

pub(crate) fn person_from_dto(dto: &PersonDto) -> Person {
    Person {
        id: Uuid::new_v4(),
        uuid: dto.uuid.clone(),
        first_name: dto.first_name.clone(),
        last_name: dto.last_name.clone(),
        sex: dto.sex,
        birth_date: dto.birth_date,
        phone: dto.phone.clone(),
        email_address: dto.email_address.clone(),
    }
}

pub(crate) fn contact_from_dto(dto: &ContactDataDto, origin: OriginInfo) -> Contact {
    Contact {
        id: Uuid::new_v4(),
        uuid: dto.uuid.clone(),
        case_uuid: dto.case_uuid.clone(),
        disease: dto.disease,
        contact_classification: dto.contact_classification,
        contact_status: dto.contact_status,
        report_date: dto.report_date,
        person: person_from_dto(&dto.person),
        region: dto.region.clone(),
        origin_info: Some(origin),
        change_date: Utc::now(),
    }
}

pub(crate) fn sample_from_dto(dto: &SampleDto) -> Sample {
    Sample {
        id: Uuid::new_v4(),
        uuid: dto.uuid.clone(),
        associated_case_uuid: dto.associated_case_uuid.clone(),
        associated_contact_uuid: dto.associated_contact_uuid.clone(),
        sample_material: dto.sample_material,
        sample_date: dto.sample_date,
        lab_name: dto.lab_name.clone(),
        change_date: Utc::now(),
    }
}
