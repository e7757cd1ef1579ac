//! Symptom record attached to a case.
//!
//! Only a subset of symptom fields is relevant per disease; which fields may
//! leave the instance during sharing is decided by the field-visibility
//! registry in the sharing crate, not here.

use serde::{Deserialize, Serialize};

/// Symptoms reported for a case.
///
/// Every field is optional: `None` means "not asked / not applicable",
/// which is distinct from an explicit `Some(false)`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Symptoms {
    /// Fever above 38°C.
    pub fever: Option<bool>,
    /// Persistent cough.
    pub cough: Option<bool>,
    /// Difficulty breathing.
    pub difficulty_breathing: Option<bool>,
    /// Skin rash.
    pub rash: Option<bool>,
    /// Acute diarrhea.
    pub diarrhea: Option<bool>,
    /// Vomiting.
    pub vomiting: Option<bool>,
    /// Unexplained bleeding.
    pub hemorrhage: Option<bool>,
    /// Loss of taste or smell.
    pub loss_of_taste_or_smell: Option<bool>,
}

impl Symptoms {
    /// Whether any symptom has been explicitly reported as present.
    pub fn any_present(&self) -> bool {
        [
            self.fever,
            self.cough,
            self.difficulty_breathing,
            self.rash,
            self.diarrhea,
            self.vomiting,
            self.hemorrhage,
            self.loss_of_taste_or_smell,
        ]
        .iter()
        .any(|s| *s == Some(true))
    }
}
