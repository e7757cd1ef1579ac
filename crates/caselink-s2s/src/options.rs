//! Options selected by the user when sharing entities.

use serde::{Deserialize, Serialize};

/// Options for one share action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShareOptions {
    /// Identifier of the target organization.
    pub organization_id: String,
    /// Hand over ownership: the receiving instance becomes the editable
    /// master copy of the shared entities.
    #[serde(default)]
    pub hand_over_ownership: bool,
    /// Include samples of the shared entities.
    #[serde(default = "default_true")]
    pub with_samples: bool,
    /// Include contacts linked to shared cases.
    #[serde(default = "default_true")]
    pub with_associated_contacts: bool,
    /// Replace personal data with pseudonyms before the package leaves the
    /// process.
    #[serde(default)]
    pub pseudonymize_personal_data: bool,
    /// Free-text comment stored in the share ledger and sent to the target.
    pub comment: Option<String>,
}

impl ShareOptions {
    /// Options for sharing with the given organization, everything else at
    /// defaults.
    pub fn to_organization(organization_id: impl Into<String>) -> Self {
        Self {
            organization_id: organization_id.into(),
            hand_over_ownership: false,
            with_samples: true,
            with_associated_contacts: true,
            pseudonymize_personal_data: false,
            comment: None,
        }
    }
}

fn default_true() -> bool {
    true
}
