//! Rule-list evaluation for single fields and groups of fields.
//!
//! Every rule in a list is evaluated; a failure never stops the remaining
//! rules from running. Each failing rule contributes one message.

use crate::enums::RuleId;
use crate::messages::{CUSTOM_RULE_TEMPLATE, format_message, substitute};
use crate::registry::Evaluator;
use crate::types::*;
use indexmap::IndexMap;
use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;

/// Result of validating several fields at once.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FormReport {
    pub validation: FormValidation,
    /// Messages for every invalid field.
    pub errors: ErrorMap,
}

/// Evaluates rule lists against field values.
///
/// Besides the built-in registry, a validator can carry named extension rules
/// added with [`Validator::extend`], usable in rule strings like any other
/// rule name.
#[derive(Clone, Debug, Default)]
pub struct Validator {
    extensions: HashMap<String, CustomRule>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a named rule. Built-in rule names take precedence.
    pub fn extend(&mut self, name: impl Into<String>, rule: CustomRule) {
        self.extensions.insert(name.into(), rule);
    }

    /// True if the name is a built-in or extension rule.
    pub fn is_supported(&self, name: &str) -> bool {
        crate::registry::lookup_rule(name).is_some() || self.extensions.contains_key(name)
    }

    /// Validate one field's rule list against the current values.
    ///
    /// A null value short-circuits the named rules other than `null` and
    /// `nullable`: they pass if the list contains `nullable`, and otherwise
    /// fail without running unless the list contains `null`. Custom predicates
    /// always run.
    pub fn validate_field(
        &self,
        field: &str,
        rules: &RuleList,
        fields: &FieldMap,
        messages: &MessageMap,
    ) -> FieldValidation {
        let value = fields.get(field).unwrap_or(&Value::Null);
        let nullable = rules.contains(RuleId::Nullable);
        let short_circuit = value.is_null() && (nullable || !rules.contains(RuleId::Null));
        let mut errors = Vec::new();

        for rule in rules {
            let outcome = match rule {
                Rule::Custom(custom) => custom.call(field, value).map_err(Some),
                Rule::Named(parsed)
                    if short_circuit
                        && !matches!(parsed.id, Some(RuleId::Null | RuleId::Nullable)) =>
                {
                    if nullable { Ok(()) } else { Err(None) }
                }
                Rule::Named(parsed) => self.evaluate(field, parsed, value, fields),
            };

            if let Err(reason) = outcome {
                errors.push(RuleFailure {
                    rule: rule.name().to_string(),
                    message: self.message_for(field, rule, reason, messages),
                });
            }
        }

        FieldValidation {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// Validate the named fields of a form. Fields without rules are skipped.
    pub fn validate_fields<'a>(
        &self,
        definitions: &IndexMap<String, FieldDefinition>,
        names: impl IntoIterator<Item = &'a str>,
        fields: &FieldMap,
    ) -> FormReport {
        let mut report = FormReport::default();

        for name in names {
            let Some(definition) = definitions.get(name) else {
                continue;
            };
            if definition.rules.is_empty() {
                continue;
            }
            let result = self.validate_field(name, &definition.rules, fields, &definition.messages);
            if !result.valid {
                report.errors.insert(name.to_string(), result.messages());
            }
            report
                .validation
                .validations
                .insert(name.to_string(), result.valid);
        }

        report.validation.valid = report.validation.validations.values().all(|v| *v);
        debug!(
            "validated {} field(s): {} invalid",
            report.validation.validations.len(),
            report.errors.len()
        );
        report
    }

    /// Evaluate a single rule token for a field of `fields`.
    pub fn passes(&self, field: &str, token: &str, fields: &FieldMap) -> bool {
        self.validate_field(field, &RuleList::from(vec![token]), fields, &MessageMap::new())
            .valid
    }

    /// Evaluate a single rule token against a standalone value.
    pub fn passes_value(&self, token: &str, value: Value) -> bool {
        let mut fields = FieldMap::new();
        fields.insert("value".to_string(), value);
        self.passes("value", token, &fields)
    }

    /// `Err(Some(message))` when the rule supplies its own message,
    /// `Err(None)` when the default template applies.
    fn evaluate(
        &self,
        field: &str,
        rule: &ParsedRule,
        value: &Value,
        fields: &FieldMap,
    ) -> Result<(), Option<String>> {
        let Some(id) = rule.id else {
            if let Some(extension) = self.extensions.get(&rule.name) {
                return extension.call(field, value).map_err(Some);
            }
            warn!(
                "unsupported validation rule '{}' on field '{}'; treating as failed",
                rule.name, field
            );
            return Err(None);
        };

        let descriptor = id.descriptor();
        let params = rule.params();
        if params.len() < descriptor.min_params {
            warn!(
                "rule '{}' on field '{}' needs {} parameter(s), got {}; treating as failed",
                rule.name,
                field,
                descriptor.min_params,
                params.len()
            );
            return Err(None);
        }

        let passed = match descriptor.evaluator {
            Evaluator::Independent(f) => f(value),
            Evaluator::Dependent(f) => f(value, params),
            Evaluator::Comparison(f) => f(field, params, fields),
        };
        if passed { Ok(()) } else { Err(None) }
    }

    /// A message given by the rule itself wins, then the caller's override,
    /// then the default template.
    fn message_for(
        &self,
        field: &str,
        rule: &Rule,
        reason: Option<String>,
        overrides: &MessageMap,
    ) -> String {
        if let Some(message) = reason.filter(|m| !m.is_empty()) {
            return message;
        }
        match rule {
            Rule::Named(parsed)
                if parsed.id.is_some() || !self.extensions.contains_key(&parsed.name) =>
            {
                format_message(field, parsed, overrides)
            }
            _ => overrides
                .get(rule.name())
                .cloned()
                .unwrap_or_else(|| substitute(CUSTOM_RULE_TEMPLATE, field, &[])),
        }
    }
}
