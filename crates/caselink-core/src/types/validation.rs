//! Aggregated validation errors for share batches.
//!
//! Validation failures are collected across a whole batch before any decision
//! is made, keyed by a deterministic per-entity group name so the sender can
//! correlate each error with the entity it belongs to. The same key is
//! produced for retries of the same share.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A single validation failure within an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationError {
    /// The field area the failure belongs to (e.g. `"case"`, `"sample"`).
    pub area: String,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(area: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            area: area.into(),
            message: message.into(),
        }
    }
}

/// Validation errors aggregated per entity group.
///
/// The map is ordered so that serialized output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<String, Vec<ValidationError>>);

impl ValidationErrors {
    /// Create an empty error collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection containing a single error.
    pub fn create(
        group: impl Into<String>,
        area: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        let mut errors = Self::new();
        errors.add(group, area, message);
        errors
    }

    /// Add an error to the given entity group.
    pub fn add(
        &mut self,
        group: impl Into<String>,
        area: impl Into<String>,
        message: impl Into<String>,
    ) {
        self.0
            .entry(group.into())
            .or_default()
            .push(ValidationError::new(area, message));
    }

    /// Merge all errors from `other` into this collection.
    pub fn extend(&mut self, other: ValidationErrors) {
        for (group, errors) in other.0 {
            self.0.entry(group).or_default().extend(errors);
        }
    }

    /// Whether no errors have been recorded.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of entity groups with at least one error.
    pub fn group_count(&self) -> usize {
        self.0.len()
    }

    /// Whether the given group has recorded errors.
    pub fn contains_group(&self, group: &str) -> bool {
        self.0.contains_key(group)
    }

    /// The errors recorded for a group, if any.
    pub fn get(&self, group: &str) -> Option<&[ValidationError]> {
        self.0.get(group).map(Vec::as_slice)
    }

    /// Iterate over (group, errors) pairs in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<ValidationError>)> {
        self.0.iter()
    }
}

/// Build the stable validation group key for a case.
pub fn case_group(uuid: &str) -> String {
    format!("case-{uuid}")
}

/// Build the stable validation group key for a contact.
pub fn contact_group(uuid: &str) -> String {
    format!("contact-{uuid}")
}

/// Build the stable validation group key for a sample.
pub fn sample_group(uuid: &str) -> String {
    format!("sample-{uuid}")
}
