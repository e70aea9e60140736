//! Form state management with a declarative, rule-based validation engine.
//!
//! A [`Form`] holds named fields, each with a value, an optional list of
//! validation rules, message overrides and a section. Rules are written as
//! pipe-separated tokens (`"required|max:8"`) or arrays of tokens, and can be
//! mixed with custom predicates in code:
//!
//! ```text
//! load(yaml) → Form → validate() → FormValidation + ErrorStore
//!                   → submit(client) → HttpClient::request → Response
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! let yaml = r#"
//! fields:
//!   first_name:
//!     value: ""
//!     rules: "required|min:5"
//!   email:
//!     value: ada@example.com
//!     rules: [required, email]
//! "#;
//!
//! let mut form = formstate::load(yaml).expect("valid schema");
//! let result = form.validate();
//!
//! assert!(!result.valid);
//! assert_eq!(
//!     form.errors().get_first("first_name"),
//!     Some("The first name field is required.")
//! );
//! assert!(!form.errors().has("email"));
//! ```
//!
//! # Rule families
//!
//! | Family      | Inputs                                 | Examples |
//! |-------------|----------------------------------------|----------|
//! | independent | the value                              | `required`, `email`, `date` |
//! | dependent   | the value and the rule parameters      | `max:8`, `between:1,10`, `in:a,b` |
//! | comparison  | the field name, parameters, all values | `same:password`, `after:start`, `required_if:kind,company` |
//!
//! See [`registry::RULE_REGISTRY`] for the full list.

pub mod enums;
pub mod error;
pub mod form;
pub mod messages;
pub mod options;
pub mod parse;
pub mod registry;
pub mod rules;
pub mod sections;
pub mod store;
pub mod transport;
pub mod types;
pub mod validator;

pub use enums::{Method, RuleFamily, RuleId};
pub use error::*;
pub use form::Form;
pub use options::{FormOptions, StatusRange};
pub use sections::{Section, SectionTracker};
pub use store::ErrorStore;
pub use transport::{HttpClient, Payload, Request, Response};
pub use types::*;
pub use validator::{FormReport, Validator};

// Re-export entry-point functions at the crate root for convenience.
pub use parse::{parse_rule, parse_schema};

/// Convenience entry point: parse a YAML or JSON schema and build the form.
///
/// # Errors
///
/// Returns a [`SchemaError`] if the document is empty, malformed, or does not
/// describe a `fields` mapping.
///
/// # Example
///
/// ```rust
/// let form = formstate::load("fields: { name: Ada }").expect("valid schema");
/// assert_eq!(form.value("name"), Some(&serde_json::json!("Ada")));
/// ```
pub fn load(input: &str) -> Result<Form, SchemaError> {
    Form::from_yaml(input)
}
