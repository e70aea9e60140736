use indexmap::IndexMap;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

use crate::enums::RuleId;
use crate::options::FormOptions;

/// Current field values keyed by field name, in definition order.
pub type FieldMap = serde_json::Map<String, Value>;

/// Failure messages keyed by field name.
pub type ErrorMap = IndexMap<String, Vec<String>>;

/// Message overrides keyed by rule name.
pub type MessageMap = IndexMap<String, String>;

// ─── Rules ──────────────────────────────────────────────────────────────────

/// A rule token after parsing: `"between:1,10"` → `between` + `["1", "10"]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedRule {
    pub name: String,
    /// `None` when the name is not in the built-in registry.
    pub id: Option<RuleId>,
    /// `None` when the token has no `:` (or nothing after it).
    pub parameters: Option<Vec<String>>,
}

impl ParsedRule {
    /// Parameters as a slice, empty when absent.
    pub fn params(&self) -> &[String] {
        self.parameters.as_deref().unwrap_or(&[])
    }
}

type Predicate = dyn Fn(&str, &Value) -> Result<(), String> + Send + Sync;

/// A user-supplied predicate rule.
///
/// Called with the field name and value. `Err` carries the failure message.
#[derive(Clone)]
pub struct CustomRule(Arc<Predicate>);

impl CustomRule {
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        CustomRule(Arc::new(predicate))
    }

    pub fn call(&self, field: &str, value: &Value) -> Result<(), String> {
        (self.0)(field, value)
    }
}

impl fmt::Debug for CustomRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("CustomRule(..)")
    }
}

/// One entry of a field's rule list.
#[derive(Clone, Debug)]
pub enum Rule {
    Named(ParsedRule),
    Custom(CustomRule),
}

impl Rule {
    /// Name used for message overrides and failure reports.
    pub fn name(&self) -> &str {
        match self {
            Rule::Named(rule) => &rule.name,
            Rule::Custom(_) => "custom",
        }
    }

    /// Wraps a closure as a custom rule.
    pub fn custom<F>(predicate: F) -> Self
    where
        F: Fn(&str, &Value) -> Result<(), String> + Send + Sync + 'static,
    {
        Rule::Custom(CustomRule::new(predicate))
    }
}

impl From<&str> for Rule {
    fn from(token: &str) -> Self {
        Rule::Named(crate::parse::parse_rule(token))
    }
}

impl From<CustomRule> for Rule {
    fn from(rule: CustomRule) -> Self {
        Rule::Custom(rule)
    }
}

/// Ordered list of rules attached to a field.
///
/// Deserializes from a pipe-separated string (`"required|max:8"`) or an array
/// of rule tokens.
#[derive(Clone, Debug, Default)]
pub struct RuleList(Vec<Rule>);

impl RuleList {
    pub fn new() -> Self {
        RuleList(Vec::new())
    }

    /// Parses a pipe-separated rule string.
    pub fn parse(rules: &str) -> Self {
        RuleList(
            crate::parse::split_rules(rules)
                .map(|token| Rule::Named(crate::parse::parse_rule(token)))
                .collect(),
        )
    }

    pub fn push(&mut self, rule: impl Into<Rule>) {
        self.0.push(rule.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Rule names in order; custom rules appear as `"custom"`.
    pub fn names(&self) -> Vec<&str> {
        self.0.iter().map(Rule::name).collect()
    }

    /// True if a named rule with this id is present.
    pub fn contains(&self, id: RuleId) -> bool {
        self.0
            .iter()
            .any(|r| matches!(r, Rule::Named(p) if p.id == Some(id)))
    }
}

impl From<&str> for RuleList {
    fn from(rules: &str) -> Self {
        RuleList::parse(rules)
    }
}

impl<R: Into<Rule>> From<Vec<R>> for RuleList {
    fn from(rules: Vec<R>) -> Self {
        RuleList(rules.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a RuleList {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for RuleList {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Piped(String),
            Tokens(Vec<String>),
        }

        Ok(match Repr::deserialize(deserializer)? {
            Repr::Piped(s) => RuleList::parse(&s),
            Repr::Tokens(tokens) => RuleList(
                tokens
                    .iter()
                    .map(|t| Rule::Named(crate::parse::parse_rule(t)))
                    .collect(),
            ),
        })
    }
}

// ─── Fields ─────────────────────────────────────────────────────────────────

/// Definition of a single form field.
#[derive(Clone, Debug, Default)]
pub struct FieldDefinition {
    pub value: Value,
    pub rules: RuleList,
    pub messages: MessageMap,
    pub section: Option<String>,
}

impl FieldDefinition {
    pub fn new(value: impl Into<Value>) -> Self {
        FieldDefinition {
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn rules(mut self, rules: impl Into<RuleList>) -> Self {
        self.rules = rules.into();
        self
    }

    pub fn rule(mut self, rule: impl Into<Rule>) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn message(mut self, rule: impl Into<String>, template: impl Into<String>) -> Self {
        self.messages.insert(rule.into(), template.into());
        self
    }

    pub fn section(mut self, section: impl Into<String>) -> Self {
        self.section = Some(section.into());
        self
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct FieldDefinitionRepr {
    value: Value,
    #[serde(default)]
    rules: RuleList,
    #[serde(default)]
    messages: MessageMap,
    #[serde(default)]
    section: Option<String>,
}

impl TryFrom<Value> for FieldDefinition {
    type Error = serde_json::Error;

    /// An object carrying a `value` key is a full definition; anything else is
    /// a bare value with no rules.
    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::Object(ref map) if map.contains_key("value") => {
                let repr: FieldDefinitionRepr = serde_json::from_value(value)?;
                Ok(FieldDefinition {
                    value: repr.value,
                    rules: repr.rules,
                    messages: repr.messages,
                    section: repr.section,
                })
            }
            other => Ok(FieldDefinition::new(other)),
        }
    }
}

impl<'de> Deserialize<'de> for FieldDefinition {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        FieldDefinition::try_from(value).map_err(D::Error::custom)
    }
}

/// A form description loaded from YAML or JSON.
#[derive(Clone, Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FormSchema {
    #[serde(default)]
    pub options: FormOptions,
    pub fields: IndexMap<String, FieldDefinition>,
}

// ─── Files ──────────────────────────────────────────────────────────────────

/// A file attached to a form field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileUpload {
    pub name: String,
    pub content_type: String,
    pub contents: Vec<u8>,
}

impl FileUpload {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        contents: impl Into<Vec<u8>>,
    ) -> Self {
        FileUpload {
            name: name.into(),
            content_type: content_type.into(),
            contents: contents.into(),
        }
    }

    /// The file-like value stored in the field map: `{name, type, size}`.
    pub fn descriptor(&self) -> Value {
        serde_json::json!({
            "name": self.name,
            "type": self.content_type,
            "size": self.contents.len(),
        })
    }
}

// ─── Validation results ─────────────────────────────────────────────────────

/// A single failed rule.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RuleFailure {
    pub rule: String,
    pub message: String,
}

/// Outcome of validating one field.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize)]
pub struct FieldValidation {
    pub valid: bool,
    /// Failed rules in rule-list order.
    pub errors: Vec<RuleFailure>,
}

impl FieldValidation {
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    /// Message for the first failure of the named rule.
    pub fn error(&self, rule: &str) -> Option<&str> {
        self.errors
            .iter()
            .find(|e| e.rule == rule)
            .map(|e| e.message.as_str())
    }
}

/// Outcome of validating a whole form or one section.
#[derive(Clone, Debug, PartialEq, Eq, Default, Serialize)]
pub struct FormValidation {
    pub valid: bool,
    /// Per-field validity for every field that has rules.
    pub validations: IndexMap<String, bool>,
}
