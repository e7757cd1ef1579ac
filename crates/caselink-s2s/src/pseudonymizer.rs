//! Pseudonymization seam.
//!
//! The full pseudonymization rule engine is an external collaborator; the
//! builders only depend on this contract. The default implementation covers
//! the sharing use case: strip direct identifiers when the share options ask
//! for it or the target is outside the entity's jurisdiction.

use crate::dto::PersonDto;

/// Placeholder written over pseudonymized name fields.
pub const PSEUDONYM: &str = "Confidential";

/// Replaces or restores personal data on shareable DTOs.
pub trait Pseudonymizer: Send + Sync {
    /// Replace personal data in place. `in_jurisdiction` is `true` when the
    /// receiving party is entitled to unredacted fields.
    fn pseudonymize(&self, person: &mut PersonDto, in_jurisdiction: bool);

    /// Restore previously pseudonymized fields from local knowledge, where
    /// possible. Receiving instances call this before display.
    fn restore(&self, person: &mut PersonDto);
}

/// Default pseudonymizer: blanks direct identifiers, keeps epidemiological
/// fields untouched. Restoration is not possible without the external rule
/// engine, so `restore` leaves the DTO unchanged.
#[derive(Debug, Clone, Default)]
pub struct DefaultPseudonymizer;

impl Pseudonymizer for DefaultPseudonymizer {
    fn pseudonymize(&self, person: &mut PersonDto, in_jurisdiction: bool) {
        if in_jurisdiction {
            return;
        }
        person.first_name = PSEUDONYM.to_string();
        person.last_name = PSEUDONYM.to_string();
        person.birth_date = None;
        person.phone = None;
        person.email_address = None;
    }

    fn restore(&self, _person: &mut PersonDto) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> PersonDto {
        PersonDto {
            uuid: "p1".to_string(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            sex: None,
            birth_date: None,
            phone: Some("555-0100".to_string()),
            email_address: Some("ada@example.org".to_string()),
        }
    }

    #[test]
    fn test_out_of_jurisdiction_blanks_identifiers() {
        let mut dto = person();
        DefaultPseudonymizer.pseudonymize(&mut dto, false);
        assert_eq!(dto.first_name, PSEUDONYM);
        assert_eq!(dto.phone, None);
        assert_eq!(dto.email_address, None);
        assert_eq!(dto.uuid, "p1");
    }

    #[test]
    fn test_in_jurisdiction_untouched() {
        let mut dto = person();
        DefaultPseudonymizer.pseudonymize(&mut dto, true);
        assert_eq!(dto.first_name, "Ada");
        assert_eq!(dto.phone, Some("555-0100".to_string()));
    }
}
