//! Form configuration.
//!
//! Keys are accepted in camelCase (`validateOnSubmit`) or snake_case
//! (`validate_on_submit`). Every key is optional.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Options controlling validation, sections and submission.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct FormOptions {
    /// Run client-side validation before submitting. When disabled, validation
    /// must be done manually or per section.
    #[serde(alias = "validate_on_submit")]
    pub validate_on_submit: bool,

    /// Once at least one section is defined, require every field to belong
    /// to a section.
    #[serde(alias = "strict_sections")]
    pub strict_sections: bool,

    /// The last section is a review step and does not count towards progress.
    #[serde(alias = "final_section_for_review")]
    pub final_section_for_review: bool,

    /// Response statuses treated as success.
    #[serde(alias = "success_status")]
    pub success_status: StatusRange,

    /// Extra request headers sent with every submission.
    pub headers: IndexMap<String, String>,

    /// Transport-specific settings (timeouts, credentials, ...) passed through
    /// to the HTTP client untouched.
    #[serde(alias = "request_config")]
    pub request_config: Map<String, Value>,
}

impl Default for FormOptions {
    fn default() -> Self {
        FormOptions {
            validate_on_submit: true,
            strict_sections: false,
            final_section_for_review: false,
            success_status: StatusRange::default(),
            headers: IndexMap::new(),
            request_config: Map::new(),
        }
    }
}

impl FormOptions {
    pub fn validate_on_submit(mut self, enabled: bool) -> Self {
        self.validate_on_submit = enabled;
        self
    }

    pub fn strict_sections(mut self, enabled: bool) -> Self {
        self.strict_sections = enabled;
        self
    }

    pub fn final_section_for_review(mut self, enabled: bool) -> Self {
        self.final_section_for_review = enabled;
        self
    }

    pub fn success_status(mut self, min: u16, max: u16) -> Self {
        self.success_status = StatusRange { min, max };
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Merge one transport setting into the outgoing request config.
    pub fn request_config(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.request_config.insert(key.into(), value.into());
        self
    }
}

/// Inclusive range of HTTP statuses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRange {
    pub min: u16,
    pub max: u16,
}

impl Default for StatusRange {
    fn default() -> Self {
        StatusRange { min: 200, max: 299 }
    }
}

impl StatusRange {
    pub fn contains(&self, status: u16) -> bool {
        (self.min..=self.max).contains(&status)
    }
}
