//! Directory entry models.

use serde::{Deserialize, Serialize};

/// Everything needed to reach one counterpart organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationAccessData {
    /// Stable organization identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Hostname (and optional port) of the counterpart instance.
    pub host_name: String,
    /// Password of the sharing service account on the counterpart instance.
    pub rest_user_password: String,
    /// X25519 public key of the organization.
    pub public_key: [u8; 32],
}

impl OrganizationAccessData {
    /// Lightweight reference for selection lists.
    pub fn to_reference(&self) -> OrganizationRef {
        OrganizationRef {
            id: self.id.clone(),
            name: self.name.clone(),
        }
    }
}

/// Reference to an organization, used in selection lists and ledger views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationRef {
    /// Stable organization identifier.
    pub id: String,
    /// Display name.
    pub name: String,
}
