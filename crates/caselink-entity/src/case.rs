//! Case entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::person::Person;
use crate::share::OriginInfo;
use crate::symptoms::Symptoms;

/// Diseases under surveillance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Disease {
    Covid19,
    Cholera,
    Measles,
    Ebola,
    Plague,
    Dengue,
    Other,
}

/// Epidemiological classification of a case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseClassification {
    NotYetClassified,
    Suspect,
    Probable,
    Confirmed,
    NoCase,
}

/// A surveillance case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    /// Local primary key.
    pub id: Uuid,
    /// Stable external identifier, shared across instances. Deduplication of
    /// received data is keyed on this, never on the local primary key.
    pub uuid: String,
    /// Disease this case is recorded for.
    pub disease: Disease,
    /// Current classification.
    pub case_classification: CaseClassification,
    /// Date the case was reported.
    pub report_date: DateTime<Utc>,
    /// The affected person.
    pub person: Person,
    /// Reported symptoms.
    pub symptoms: Symptoms,
    /// Responsible jurisdiction (region identifier).
    pub region: String,
    /// Facility where the case is handled.
    pub health_facility: Option<String>,
    /// Provenance record, present only when this case was received from
    /// another instance.
    pub origin_info: Option<OriginInfo>,
    /// Last modification timestamp, used for optimistic concurrency.
    pub change_date: DateTime<Utc>,
}

impl Case {
    /// Whether this instance may edit the case.
    ///
    /// A case received from another instance stays read-only until the sender
    /// hands over ownership; locally created cases are always editable.
    pub fn is_locally_editable(&self) -> bool {
        match &self.origin_info {
            None => true,
            Some(origin) => origin.ownership_handed_over,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn case_with_origin(handed_over: bool) -> Case {
        Case {
            id: Uuid::new_v4(),
            uuid: "case-ext-1".to_string(),
            disease: Disease::Covid19,
            case_classification: CaseClassification::Confirmed,
            report_date: Utc::now(),
            person: Person::new("Ada", "Lovelace"),
            symptoms: Symptoms::default(),
            region: "north".to_string(),
            health_facility: None,
            origin_info: Some(OriginInfo {
                id: Uuid::new_v4(),
                creation_date: Utc::now(),
                organization_id: "org-b".to_string(),
                sender_name: "Dr. Sender".to_string(),
                sender_email: None,
                sender_phone: None,
                ownership_handed_over: handed_over,
                comment: None,
            }),
            change_date: Utc::now(),
        }
    }

    #[test]
    fn test_received_case_read_only_until_handover() {
        assert!(!case_with_origin(false).is_locally_editable());
        assert!(case_with_origin(true).is_locally_editable());
    }

    #[test]
    fn test_local_case_editable() {
        let mut case = case_with_origin(false);
        case.origin_info = None;
        assert!(case.is_locally_editable());
    }
}
