use std::collections::BTreeMap;

use settings_core::profile;

/// A tracked form field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Description,
    Image,
}

/// An active error on a field. Upload failures set a marker without text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub message: Option<String>,
}

/// Per-field error state of a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<Field, FieldError>,
}

impl FieldErrors {
    pub fn set(&mut self, field: Field, message: impl Into<String>) {
        self.errors.insert(
            field,
            FieldError {
                message: Some(message.into()),
            },
        );
    }

    /// Flag a field as errored without a message.
    pub fn mark(&mut self, field: Field) {
        self.errors.insert(field, FieldError { message: None });
    }

    pub fn clear(&mut self, field: Field) {
        self.errors.remove(&field);
    }

    pub fn get(&self, field: Field) -> Option<&FieldError> {
        self.errors.get(&field)
    }

    pub fn message(&self, field: Field) -> Option<&str> {
        self.get(field).and_then(|e| e.message.as_deref())
    }

    pub fn has(&self, field: Field) -> bool {
        self.errors.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// True when any error carries a message. Upload markers alone do not
    /// block a retry.
    pub fn blocks_submit(&self) -> bool {
        self.errors.values().any(|e| e.message.is_some())
    }

    pub(crate) fn clear_markers(&mut self) {
        self.errors.retain(|_, e| e.message.is_some());
    }

    /// Record the outcome of a rule for one field.
    pub(crate) fn apply(&mut self, field: Field, result: Result<(), &str>) {
        match result {
            Ok(()) => self.clear(field),
            Err(m) => self.set(field, m),
        }
    }
}

pub(crate) fn check(field: Field, value: &str) -> Result<(), &'static str> {
    match field {
        Field::Name => profile::validate_name(value),
        Field::Description => Ok(()),
        Field::Image => profile::validate_image_url(value),
    }
}
