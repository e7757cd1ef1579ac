//! Disease-conditional field visibility.
//!
//! Not every symptom field is collected for every disease, and fields that
//! are not part of a disease's questionnaire must not leave the instance.
//! Visibility is a static registry of field keys with a predicate over the
//! disease, built once at startup and consulted by the share data builders.

use caselink_entity::case::Disease;
use caselink_entity::symptoms::Symptoms;

/// A single registered field with its visibility predicate.
struct FieldEntry {
    key: &'static str,
    visible_for: fn(Disease) -> bool,
}

/// Registry of disease-conditional fields.
pub struct FieldRegistry {
    entries: Vec<FieldEntry>,
}

impl FieldRegistry {
    /// The standard registry covering the symptom questionnaire.
    pub fn standard() -> Self {
        Self {
            entries: vec![
                FieldEntry {
                    key: "symptoms.fever",
                    visible_for: |_| true,
                },
                FieldEntry {
                    key: "symptoms.cough",
                    visible_for: respiratory,
                },
                FieldEntry {
                    key: "symptoms.difficultyBreathing",
                    visible_for: respiratory,
                },
                FieldEntry {
                    key: "symptoms.rash",
                    visible_for: |d| matches!(d, Disease::Measles | Disease::Dengue),
                },
                FieldEntry {
                    key: "symptoms.diarrhea",
                    visible_for: |d| matches!(d, Disease::Cholera | Disease::Ebola),
                },
                FieldEntry {
                    key: "symptoms.vomiting",
                    visible_for: |d| {
                        matches!(d, Disease::Cholera | Disease::Ebola | Disease::Dengue)
                    },
                },
                FieldEntry {
                    key: "symptoms.hemorrhage",
                    visible_for: |d| matches!(d, Disease::Ebola | Disease::Dengue),
                },
                FieldEntry {
                    key: "symptoms.lossOfTasteOrSmell",
                    visible_for: |d| matches!(d, Disease::Covid19),
                },
            ],
        }
    }

    /// Whether the field is part of the questionnaire for the disease.
    ///
    /// Unregistered fields are visible unconditionally.
    pub fn is_visible(&self, key: &str, disease: Disease) -> bool {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .is_none_or(|entry| (entry.visible_for)(disease))
    }

    /// Reduce a symptom record to the fields visible for the disease.
    pub fn redact_symptoms(&self, disease: Disease, symptoms: &Symptoms) -> Symptoms {
        let keep = |key: &str, value: Option<bool>| -> Option<bool> {
            if self.is_visible(key, disease) {
                value
            } else {
                None
            }
        };

        Symptoms {
            fever: keep("symptoms.fever", symptoms.fever),
            cough: keep("symptoms.cough", symptoms.cough),
            difficulty_breathing: keep(
                "symptoms.difficultyBreathing",
                symptoms.difficulty_breathing,
            ),
            rash: keep("symptoms.rash", symptoms.rash),
            diarrhea: keep("symptoms.diarrhea", symptoms.diarrhea),
            vomiting: keep("symptoms.vomiting", symptoms.vomiting),
            hemorrhage: keep("symptoms.hemorrhage", symptoms.hemorrhage),
            loss_of_taste_or_smell: keep(
                "symptoms.lossOfTasteOrSmell",
                symptoms.loss_of_taste_or_smell,
            ),
        }
    }
}

fn respiratory(disease: Disease) -> bool {
    matches!(disease, Disease::Covid19 | Disease::Measles | Disease::Plague)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fever_always_visible() {
        let registry = FieldRegistry::standard();
        assert!(registry.is_visible("symptoms.fever", Disease::Cholera));
        assert!(registry.is_visible("symptoms.fever", Disease::Covid19));
    }

    #[test]
    fn test_unregistered_field_visible() {
        let registry = FieldRegistry::standard();
        assert!(registry.is_visible("case.reportDate", Disease::Cholera));
    }

    #[test]
    fn test_redaction_clears_invisible_fields() {
        let registry = FieldRegistry::standard();
        let symptoms = Symptoms {
            fever: Some(true),
            rash: Some(true),
            loss_of_taste_or_smell: Some(false),
            ..Default::default()
        };

        let redacted = registry.redact_symptoms(Disease::Cholera, &symptoms);
        assert_eq!(redacted.fever, Some(true));
        assert_eq!(redacted.rash, None);
        assert_eq!(redacted.loss_of_taste_or_smell, None);

        let kept = registry.redact_symptoms(Disease::Measles, &symptoms);
        assert_eq!(kept.rash, Some(true));
    }
}
