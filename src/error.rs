use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::ErrorMap;

/// Programmer errors raised by form and section operations.
///
/// These are returned to the caller and never swallowed internally.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    /// A section was referenced that has not been defined.
    #[error("section '{name}' is not defined")]
    SectionNotDefined { name: String },

    /// A custom section order is not a permutation of the defined sections.
    #[error("invalid section order: missing [{}], unknown [{}]", .missing.join(", "), .unknown.join(", "))]
    InvalidSectionOrder {
        /// Defined sections absent from the requested order.
        missing: Vec<String>,
        /// Requested names that are not defined sections.
        unknown: Vec<String>,
    },

    /// Progress was requested but no sections exist.
    #[error("no sections are defined")]
    NoSections,

    /// A field was referenced that the form does not define.
    #[error("field '{name}' is not defined")]
    UnknownField { name: String },
}

/// Error kind for schema loading failures.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SchemaErrorKind {
    Syntax,
    TypeMismatch,
    MissingField,
    UnknownField,
}

/// Produced when a YAML/JSON form schema cannot be loaded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaError {
    pub kind: SchemaErrorKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{}: {}", path, self.message),
            None => write!(f, "{}", self.message),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Network-level failure reported by an [`crate::transport::HttpClient`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("transport error: {message}")]
pub struct TransportError {
    pub message: String,
}

impl TransportError {
    pub fn new(message: impl Into<String>) -> Self {
        TransportError {
            message: message.into(),
        }
    }
}

/// Message carried by [`SubmitError::Invalid`].
pub const INVALID_FORM_MESSAGE: &str = "Form failed validation and was not submitted.";

/// Why a submission did not succeed.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    /// Client-side validation failed; the transport was not called.
    #[error("{}", INVALID_FORM_MESSAGE)]
    Invalid,

    /// The form has been marked as not submittable.
    #[error("form cannot be submitted")]
    NotSubmittable,

    /// The server answered with a non-success status.
    #[error("request failed with status {status}")]
    Rejected { status: u16, errors: ErrorMap },

    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] TransportError),
}
