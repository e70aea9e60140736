//! Closed enumerations used by the rule engine and the transport layer.
//!
//! Rule names that are not listed in [`RuleId`] are still accepted by the
//! parser; they are reported as unsupported when evaluated.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Every rule the built-in registry knows how to evaluate.
///
/// Variant order matches [`crate::registry::RULE_REGISTRY`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    After,
    Alpha,
    AlphaDash,
    AlphaNum,
    Array,
    Before,
    Between,
    Boolean,
    Confirmed,
    Date,
    DateEquals,
    Different,
    Email,
    Equal,
    File,
    Filled,
    Gt,
    Gte,
    In,
    Integer,
    Ip,
    Ipv4,
    Ipv6,
    Json,
    Length,
    Lt,
    Lte,
    Max,
    Min,
    Null,
    Nullable,
    Numeric,
    Object,
    Required,
    RequiredIf,
    RequiredUnless,
    RequiredWith,
    RequiredWithAll,
    Same,
    String,
    Url,
}

impl RuleId {
    /// The rule name as written in rule strings.
    pub fn name(self) -> &'static str {
        self.descriptor().name
    }

    /// Registry entry for this rule.
    pub fn descriptor(self) -> &'static crate::registry::RuleDescriptor {
        &crate::registry::RULE_REGISTRY[self as usize]
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What an evaluator needs to see besides the rule parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFamily {
    /// Looks at the field value only.
    Independent,
    /// Looks at the field value and static parameters.
    Dependent,
    /// Looks up other fields in the full value map.
    Comparison,
}

/// HTTP verb used for a submission.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
