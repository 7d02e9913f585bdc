//! Validation error types

use crate::field::Field;
use serde::Serialize;
use std::collections::BTreeMap;

/// What went wrong with a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldErrorKind {
    /// The field is empty but must be filled in
    Required,
    /// The value does not have the expected shape
    FormatInvalid,
    /// The confirmation does not match the password
    Mismatch,
}

/// A single failed check, with the message shown beside the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct FieldError {
    pub kind: FieldErrorKind,
    pub message: &'static str,
}

impl FieldError {
    pub fn required(message: &'static str) -> Self {
        Self {
            kind: FieldErrorKind::Required,
            message,
        }
    }

    pub fn format_invalid(message: &'static str) -> Self {
        Self {
            kind: FieldErrorKind::FormatInvalid,
            message,
        }
    }

    pub fn mismatch(message: &'static str) -> Self {
        Self {
            kind: FieldErrorKind::Mismatch,
            message,
        }
    }
}

/// Errors for a whole form, at most one per field
///
/// A field with no entry is valid.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, FieldError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an error, replacing any previous one for the same field
    pub fn insert(&mut self, field: Field, error: FieldError) {
        self.0.insert(field, error);
    }

    /// Remove the error for one field, returning it if there was one
    pub fn clear(&mut self, field: Field) -> Option<FieldError> {
        self.0.remove(&field)
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.0.get(&field)
    }

    /// Message for a field, if it has an error
    pub fn message(&self, field: Field) -> Option<&'static str> {
        self.0.get(&field).map(|error| error.message)
    }

    pub fn has_error(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.0.keys().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &FieldError)> {
        self.0.iter().map(|(field, error)| (*field, error))
    }
}

impl FromIterator<(Field, FieldError)> for ValidationErrors {
    fn from_iter<I: IntoIterator<Item = (Field, FieldError)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
