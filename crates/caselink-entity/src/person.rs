//! Person entity model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Biological sex of a person.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
    Other,
    Unknown,
}

/// A person associated with a case or contact.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Local primary key.
    pub id: Uuid,
    /// Stable external identifier, shared across instances.
    pub uuid: String,
    /// First name.
    pub first_name: String,
    /// Last name.
    pub last_name: String,
    /// Sex.
    pub sex: Option<Sex>,
    /// Date of birth.
    pub birth_date: Option<NaiveDate>,
    /// Phone number.
    pub phone: Option<String>,
    /// Email address.
    pub email_address: Option<String>,
}

impl Person {
    /// Create a minimal person with a fresh external identifier.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            uuid: Uuid::new_v4().to_string(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            sex: None,
            birth_date: None,
            phone: None,
            email_address: None,
        }
    }
}
