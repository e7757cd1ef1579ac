//! Edit-permission checks performed before anything leaves the instance.

use caselink_entity::case::Case;
use caselink_entity::contact::Contact;
use caselink_entity::user::{User, UserRight};

/// Decides whether a user may edit (and therefore share) an entity.
pub trait JurisdictionCheck: Send + Sync {
    /// Whether the user may edit the case.
    fn is_case_edit_allowed(&self, case: &Case, user: &User) -> bool;

    /// Whether the user may edit the contact.
    fn is_contact_edit_allowed(&self, contact: &Contact, user: &User) -> bool;
}

/// Region-based jurisdiction check.
///
/// An entity is editable when the acting user holds the edit right, operates
/// in the entity's region, and the entity is not a read-only copy received
/// from another instance without ownership handover.
#[derive(Debug, Clone, Default)]
pub struct RegionJurisdictionCheck;

impl JurisdictionCheck for RegionJurisdictionCheck {
    fn is_case_edit_allowed(&self, case: &Case, user: &User) -> bool {
        user.has_right(UserRight::CaseEdit)
            && user.region == case.region
            && case.is_locally_editable()
    }

    fn is_contact_edit_allowed(&self, contact: &Contact, user: &User) -> bool {
        user.has_right(UserRight::ContactEdit)
            && user.region == contact.region
            && contact.is_locally_editable()
    }
}
