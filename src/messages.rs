//! Default failure messages and placeholder substitution.
//!
//! Templates use `:field` for the field name and `:param0`, `:param1`, ...
//! for rule parameters.

use crate::enums::RuleId;
use crate::types::{MessageMap, ParsedRule};
use regex::Regex;
use std::sync::LazyLock;

static PARAM_PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r":param([0-9]+)").unwrap());

/// Used for rule names that are not registered.
pub const UNSUPPORTED_RULE_TEMPLATE: &str = "The :field field uses an unsupported rule.";

/// Used when a custom rule fails without giving a message.
pub const CUSTOM_RULE_TEMPLATE: &str = "The :field field is invalid.";

/// The default template for a registered rule.
pub fn default_template(id: RuleId) -> &'static str {
    match id {
        RuleId::After => "The :field field must be a date after the :param0 field date.",
        RuleId::Alpha => "The :field field must only contain alphabetic characters.",
        RuleId::AlphaDash => {
            "The :field field must only contain alphabetic characters, hyphens and underscores."
        }
        RuleId::AlphaNum => "The :field field must only contain alphanumeric characters.",
        RuleId::Array => "The :field field must be of type Array.",
        RuleId::Before => "The :field field must be a date before the :param0 field date.",
        RuleId::Between => "The :field field must be between :param0 and :param1.",
        RuleId::Boolean => "The :field field must be of type Boolean.",
        RuleId::Confirmed => "The :field field must be confirmed.",
        RuleId::Date => "The :field field must be a valid Date object or date string.",
        RuleId::DateEquals => "The :field field must be the same date as the :param0 field.",
        RuleId::Different => {
            "The :field field value must be different than the :param0 field value."
        }
        RuleId::Email => "The :field field must be a valid email address.",
        RuleId::Equal => "The :field field must be equal to :param0.",
        RuleId::File => "The :field field must be a file.",
        RuleId::Filled => "The :field field must be present and not be empty.",
        RuleId::Gt => "The :field field must be greater than :param0.",
        RuleId::Gte => "The :field field must be greater than or equal to :param0.",
        RuleId::In => "The :field field must be in the given array.",
        RuleId::Integer => "The :field field must be of type Integer.",
        RuleId::Ip => "The :field field must be a valid IP address.",
        RuleId::Ipv4 => "The :field field must be a valid IPv4 address.",
        RuleId::Ipv6 => "The :field field must be a valid IPv6 address.",
        RuleId::Json => "The :field field must be a valid JSON string.",
        RuleId::Length => "The :field field must be of length :param0.",
        RuleId::Lt => "The :field field must be less than :param0.",
        RuleId::Lte => "The :field field must be less than or equal to :param0.",
        RuleId::Max => "The :field field must be less than :param0.",
        RuleId::Min => "The :field field must be greater than :param0.",
        RuleId::Null => "The :field field must be null.",
        RuleId::Nullable => "The :field field may be null.",
        RuleId::Numeric => "The :field field must be a number.",
        RuleId::Object => "The :field field must be of type Object.",
        RuleId::Required => "The :field field is required.",
        RuleId::RequiredIf => "The :field field is required if the :param0 field equals :param1.",
        RuleId::RequiredUnless => {
            "The :field field is required unless the :param0 field equals :param1."
        }
        RuleId::RequiredWith => {
            "The :field field is required with at least one of the listed fields."
        }
        RuleId::RequiredWithAll => "The :field field is required with all of the listed fields.",
        RuleId::Same => "The :field field must be equal to the :param0 field.",
        RuleId::String => "The :field field must be of type String.",
        RuleId::Url => "The :field field must be a valid URL.",
    }
}

/// Resolve the message for a failed rule.
///
/// An override for the rule name is returned verbatim. Otherwise the default
/// template is filled in with the field name and the rule parameters.
pub fn format_message(field: &str, rule: &ParsedRule, overrides: &MessageMap) -> String {
    if let Some(message) = overrides.get(&rule.name) {
        return message.clone();
    }
    let template = match rule.id {
        Some(id) => default_template(id),
        None => UNSUPPORTED_RULE_TEMPLATE,
    };
    substitute(template, field, rule.params())
}

/// Fill in `:field` (first occurrence) and every `:paramN` placeholder.
///
/// The first underscore in the field name becomes a space. Placeholders without a
/// matching parameter are left untouched.
pub fn substitute(template: &str, field: &str, params: &[String]) -> String {
    let readable = field.replacen('_', " ", 1);
    let with_field = template.replacen(":field", &readable, 1);
    PARAM_PLACEHOLDER_RE
        .replace_all(&with_field, |caps: &regex::Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| params.get(i))
                .cloned()
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
