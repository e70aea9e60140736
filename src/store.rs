use crate::types::ErrorMap;

/// Failure messages per field, as last recorded.
///
/// The store is derived state: each validation pass or failed submission
/// replaces it rather than patching it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ErrorStore {
    errors: ErrorMap,
}

impl ErrorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if the field has recorded errors.
    pub fn has(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    /// True if any field has recorded errors.
    pub fn any(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Number of fields with errors.
    pub fn size(&self) -> usize {
        self.errors.len()
    }

    /// All messages for a field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    /// First message for a field.
    pub fn get_first(&self, field: &str) -> Option<&str> {
        self.errors
            .get(field)
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    /// First message of the first field with errors.
    pub fn first(&self) -> Option<&str> {
        self.errors
            .values()
            .next()
            .and_then(|messages| messages.first())
            .map(String::as_str)
    }

    pub fn all(&self) -> &ErrorMap {
        &self.errors
    }

    /// Replace the whole store.
    pub fn record(&mut self, errors: ErrorMap) {
        self.errors = errors;
    }

    pub fn clear(&mut self) {
        self.errors.clear();
    }

    pub fn clear_field(&mut self, field: &str) {
        self.errors.shift_remove(field);
    }

    /// Replace the entries of `fields` only, leaving other fields untouched.
    pub(crate) fn replace_fields(&mut self, fields: &[String], errors: ErrorMap) {
        for field in fields {
            self.errors.shift_remove(field);
        }
        self.errors.extend(errors);
    }
}
