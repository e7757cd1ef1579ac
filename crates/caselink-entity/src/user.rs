//! User entity model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Rights a user can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserRight {
    /// Edit cases within the user's jurisdiction.
    CaseEdit,
    /// Edit contacts within the user's jurisdiction.
    ContactEdit,
    /// Share cases and contacts with other instances.
    InstanceShare,
}

/// A user of this instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Local primary key.
    pub id: Uuid,
    /// Stable external identifier.
    pub uuid: String,
    /// Display name, sent along as sender information on shares.
    pub name: String,
    /// Contact email.
    pub email: Option<String>,
    /// Contact phone number.
    pub phone: Option<String>,
    /// Jurisdiction (region identifier) the user operates in.
    pub region: String,
    /// Granted rights.
    pub rights: Vec<UserRight>,
}

impl User {
    /// Whether the user holds the given right.
    pub fn has_right(&self, right: UserRight) -> bool {
        self.rights.contains(&right)
    }
}
