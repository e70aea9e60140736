use crate::enums::{RuleFamily, RuleId};
use crate::rules;
use crate::types::FieldMap;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Evaluator signature, tagged by the family of inputs it reads.
#[derive(Clone, Copy)]
pub enum Evaluator {
    Independent(fn(&Value) -> bool),
    Dependent(fn(&Value, &[String]) -> bool),
    Comparison(fn(&str, &[String], &FieldMap) -> bool),
}

impl Evaluator {
    pub fn family(&self) -> RuleFamily {
        match self {
            Evaluator::Independent(_) => RuleFamily::Independent,
            Evaluator::Dependent(_) => RuleFamily::Dependent,
            Evaluator::Comparison(_) => RuleFamily::Comparison,
        }
    }
}

impl std::fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Evaluator::{:?}", self.family())
    }
}

/// A rule registry entry mapping a rule name to its evaluator.
#[derive(Clone, Debug)]
pub struct RuleDescriptor {
    pub id: RuleId,
    pub name: &'static str,
    /// Parameters the evaluator cannot run without.
    pub min_params: usize,
    pub evaluator: Evaluator,
}

impl RuleDescriptor {
    pub fn family(&self) -> RuleFamily {
        self.evaluator.family()
    }
}

const fn independent(id: RuleId, name: &'static str, f: fn(&Value) -> bool) -> RuleDescriptor {
    RuleDescriptor {
        id,
        name,
        min_params: 0,
        evaluator: Evaluator::Independent(f),
    }
}

const fn dependent(
    id: RuleId,
    name: &'static str,
    min_params: usize,
    f: fn(&Value, &[String]) -> bool,
) -> RuleDescriptor {
    RuleDescriptor {
        id,
        name,
        min_params,
        evaluator: Evaluator::Dependent(f),
    }
}

const fn comparison(
    id: RuleId,
    name: &'static str,
    min_params: usize,
    f: fn(&str, &[String], &FieldMap) -> bool,
) -> RuleDescriptor {
    RuleDescriptor {
        id,
        name,
        min_params,
        evaluator: Evaluator::Comparison(f),
    }
}

/// The built-in rule registry. Indexed by `RuleId as usize`.
pub static RULE_REGISTRY: &[RuleDescriptor] = &[
    comparison(RuleId::After, "after", 1, rules::after),
    independent(RuleId::Alpha, "alpha", rules::alpha),
    independent(RuleId::AlphaDash, "alpha_dash", rules::alpha_dash),
    independent(RuleId::AlphaNum, "alpha_num", rules::alpha_num),
    independent(RuleId::Array, "array", rules::array),
    comparison(RuleId::Before, "before", 1, rules::before),
    dependent(RuleId::Between, "between", 2, rules::between),
    independent(RuleId::Boolean, "boolean", rules::boolean),
    comparison(RuleId::Confirmed, "confirmed", 0, rules::confirmed),
    independent(RuleId::Date, "date", rules::date),
    comparison(RuleId::DateEquals, "date_equals", 1, rules::date_equals),
    comparison(RuleId::Different, "different", 1, rules::different),
    independent(RuleId::Email, "email", rules::email),
    dependent(RuleId::Equal, "equal", 1, rules::equal),
    independent(RuleId::File, "file", rules::file),
    comparison(RuleId::Filled, "filled", 0, rules::filled),
    dependent(RuleId::Gt, "gt", 1, rules::gt),
    dependent(RuleId::Gte, "gte", 1, rules::gte),
    dependent(RuleId::In, "in", 1, rules::in_list),
    independent(RuleId::Integer, "integer", rules::integer),
    independent(RuleId::Ip, "ip", rules::ip),
    independent(RuleId::Ipv4, "ipv4", rules::ipv4),
    independent(RuleId::Ipv6, "ipv6", rules::ipv6),
    independent(RuleId::Json, "json", rules::json),
    dependent(RuleId::Length, "length", 1, rules::length),
    dependent(RuleId::Lt, "lt", 1, rules::lt),
    dependent(RuleId::Lte, "lte", 1, rules::lte),
    dependent(RuleId::Max, "max", 1, rules::max),
    dependent(RuleId::Min, "min", 1, rules::min),
    independent(RuleId::Null, "null", rules::null),
    independent(RuleId::Nullable, "nullable", rules::nullable),
    independent(RuleId::Numeric, "numeric", rules::numeric),
    independent(RuleId::Object, "object", rules::object),
    independent(RuleId::Required, "required", rules::required),
    comparison(RuleId::RequiredIf, "required_if", 2, rules::required_if),
    comparison(RuleId::RequiredUnless, "required_unless", 2, rules::required_unless),
    comparison(RuleId::RequiredWith, "required_with", 1, rules::required_with),
    comparison(RuleId::RequiredWithAll, "required_with_all", 1, rules::required_with_all),
    comparison(RuleId::Same, "same", 1, rules::same),
    independent(RuleId::String, "string", rules::string),
    independent(RuleId::Url, "url", rules::url),
];

static RULE_INDEX: LazyLock<HashMap<&'static str, RuleId>> =
    LazyLock::new(|| RULE_REGISTRY.iter().map(|d| (d.name, d.id)).collect());

/// Look up a registered rule by name.
pub fn lookup_rule(name: &str) -> Option<&'static RuleDescriptor> {
    RULE_INDEX.get(name).map(|id| id.descriptor())
}

/// Names of every registered rule, in registry order.
pub fn supported_rules() -> impl Iterator<Item = &'static str> {
    RULE_REGISTRY.iter().map(|d| d.name)
}
