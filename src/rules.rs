//! Rule evaluators.
//!
//! Every evaluator is a pure predicate. Three shapes exist, matching
//! [`crate::enums::RuleFamily`]:
//!
//! - independent: `fn(&Value) -> bool`
//! - dependent: `fn(&Value, &[String]) -> bool`
//! - comparison: `fn(&str, &[String], &FieldMap) -> bool`
//!
//! Parameters arrive as raw strings and are coerced here. Coercions follow
//! loose (JavaScript-style) equality and ordering so that `"5"`, `5` and
//! `5.0` compare equal where a form would expect them to.

use crate::types::FieldMap;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::sync::LazyLock;

// ─── Cached regexes ─────────────────────────────────────────────────────────

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)[A-Z0-9._%+-]+@[A-Z0-9.-]+\.[A-Z]{2,}").unwrap());

static ALPHA_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[a-z]+$").unwrap());

static ALPHA_DASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[a-z_-]+$").unwrap());

static ALPHA_NUM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^[a-z0-9]+$").unwrap());

static IPV4_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|(?:2[0-4]|1[0-9]|[1-9])?[0-9])\.){3}(?:25[0-5]|(?:2[0-4]|1[0-9]|[1-9])?[0-9])$",
    )
    .unwrap()
});

static IPV6_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:",
        r"(?:[0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}",
        r"|(?:[0-9a-fA-F]{1,4}:){1,7}:",
        r"|(?:[0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4}",
        r"|(?:[0-9a-fA-F]{1,4}:){1,5}(?::[0-9a-fA-F]{1,4}){1,2}",
        r"|(?:[0-9a-fA-F]{1,4}:){1,4}(?::[0-9a-fA-F]{1,4}){1,3}",
        r"|(?:[0-9a-fA-F]{1,4}:){1,3}(?::[0-9a-fA-F]{1,4}){1,4}",
        r"|(?:[0-9a-fA-F]{1,4}:){1,2}(?::[0-9a-fA-F]{1,4}){1,5}",
        r"|[0-9a-fA-F]{1,4}:(?::[0-9a-fA-F]{1,4}){1,6}",
        r"|:(?:(?::[0-9a-fA-F]{1,4}){1,7}|:)",
        r"|fe80:(?::[0-9a-fA-F]{0,4}){0,4}%[0-9a-zA-Z]+",
        r"|::(?:ffff(?::0{1,4})?:)?(?:(?:25[0-5]|(?:2[0-4]|1?[0-9])?[0-9])\.){3}(?:25[0-5]|(?:2[0-4]|1?[0-9])?[0-9])",
        r"|(?:[0-9a-fA-F]{1,4}:){1,4}:(?:(?:25[0-5]|(?:2[0-4]|1?[0-9])?[0-9])\.){3}(?:25[0-5]|(?:2[0-4]|1?[0-9])?[0-9])",
        r")$",
    ))
    .unwrap()
});

// Host alternatives: dotted IPv4 (range-checked separately) or a domain with
// an alphabetic TLD.
static URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?:(?i:https?|ftp):)?//",
        r"(?:\S+(?::\S*)?@)?",
        r"(?P<host>",
        r"(?:[0-9]{1,3}(?:\.[0-9]{1,3}){3})",
        r"|(?:(?:[a-zA-Z0-9\x{00a1}-\x{ffff}][a-zA-Z0-9\x{00a1}-\x{ffff}_-]{0,62})?[a-zA-Z0-9\x{00a1}-\x{ffff}]\.)+",
        r"(?:[a-zA-Z\x{00a1}-\x{ffff}]{2,}\.?)",
        r")",
        r"(?::[0-9]{2,5})?",
        r"(?:[/?#]\S*)?$",
    ))
    .unwrap()
});

// ─── Coercion helpers ───────────────────────────────────────────────────────

/// Numeric coercion in the manner of JavaScript's unary plus.
///
/// Returns `None` where JavaScript would produce `NaN`.
pub(crate) fn to_number(value: &Value) -> Option<f64> {
    match value {
        Value::Null => Some(0.0),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::Number(n) => n.as_f64(),
        Value::String(s) => string_to_number(s),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn string_to_number(s: &str) -> Option<f64> {
    let t = s.trim();
    if t.is_empty() {
        return Some(0.0);
    }
    if let Some(hex) = t.strip_prefix("0x").or_else(|| t.strip_prefix("0X")) {
        // from_str_radix accepts a sign; hex literals do not.
        if hex.starts_with(['+', '-']) {
            return None;
        }
        return i64::from_str_radix(hex, 16).ok().map(|n| n as f64);
    }
    match t {
        "Infinity" | "+Infinity" => return Some(f64::INFINITY),
        "-Infinity" => return Some(f64::NEG_INFINITY),
        _ => {}
    }
    // Rust also accepts "inf" and "nan"; JavaScript does not.
    if !t
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '+' | '-' | 'e' | 'E'))
    {
        return None;
    }
    t.parse::<f64>().ok()
}

fn number_to_string(n: f64) -> String {
    if n == 0.0 {
        // Covers -0.
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e21 {
        format!("{n:.0}")
    } else {
        n.to_string()
    }
}

/// String form of a value as JavaScript's `String(value)` would produce it.
pub(crate) fn to_js_string(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_u64(), n.as_f64()) {
            (Some(i), _, _) => i.to_string(),
            (_, Some(u), _) => u.to_string(),
            (_, _, Some(f)) => number_to_string(f),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(|v| if v.is_null() { String::new() } else { to_js_string(v) })
            .collect::<Vec<_>>()
            .join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}

/// Collapse arrays and objects to their string form; scalars pass through.
fn to_primitive(value: &Value) -> Value {
    match value {
        Value::Array(_) | Value::Object(_) => Value::String(to_js_string(value)),
        other => other.clone(),
    }
}

/// Loose equality (`==`).
pub(crate) fn loose_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Null, _) | (_, Value::Null) => false,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Number(_), Value::Number(_)) => to_number(a) == to_number(b),
        (Value::Array(_) | Value::Object(_), Value::Array(_) | Value::Object(_)) => strict_eq(a, b),
        (Value::Array(_) | Value::Object(_), _) => loose_eq(&to_primitive(a), b),
        (_, Value::Array(_) | Value::Object(_)) => loose_eq(a, &to_primitive(b)),
        // Remaining pairs mix numbers, strings and booleans: compare numerically.
        _ => match (to_number(a), to_number(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        },
    }
}

/// Strict, deep equality with numbers compared by value.
pub(crate) fn strict_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(x), Value::Array(y)) => {
            x.len() == y.len() && x.iter().zip(y).all(|(a, b)| strict_eq(a, b))
        }
        (Value::Object(x), Value::Object(y)) => {
            x.len() == y.len()
                && x
                    .iter()
                    .all(|(k, v)| y.get(k).is_some_and(|w| strict_eq(v, w)))
        }
        _ => a == b,
    }
}

/// Equality used by `equal`/`same`: arrays compare by their JSON text, all
/// other values loosely.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    if let (Value::Array(_), Value::Array(_)) = (a, b) {
        return serde_json::to_string(a).ok() == serde_json::to_string(b).ok();
    }
    loose_eq(a, b)
}

/// Relational comparison (`<`, `>`): numerically when both sides coerce to
/// numbers, lexically for two non-numeric strings. `None` when the values
/// are not comparable.
fn compare(a: &Value, b: &Value) -> Option<Ordering> {
    match (to_primitive(a), to_primitive(b)) {
        (Value::String(x), Value::String(y)) => match (strict_number(&x), strict_number(&y)) {
            (Some(m), Some(n)) => m.partial_cmp(&n),
            _ => Some(x.cmp(&y)),
        },
        (x, y) => {
            let (x, y) = (to_number(&x)?, to_number(&y)?);
            x.partial_cmp(&y)
        }
    }
}

/// Like [`string_to_number`] but a blank string is not a number.
fn strict_number(s: &str) -> Option<f64> {
    if s.trim().is_empty() {
        None
    } else {
        string_to_number(s)
    }
}

/// Length of strings (in characters) and arrays.
fn value_length(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn param_value(param: &str) -> Value {
    Value::String(param.to_string())
}

/// `"true"`/`"false"` become booleans; other parameters stay strings.
fn coerce_param(param: &str) -> Value {
    match param {
        "true" => Value::Bool(true),
        "false" => Value::Bool(false),
        other => param_value(other),
    }
}

fn field_value<'a>(fields: &'a FieldMap, name: &str) -> &'a Value {
    fields.get(name).unwrap_or(&Value::Null)
}

/// Milliseconds since the Unix epoch for anything that reads as a date.
pub(crate) fn parse_date(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64),
        Value::String(s) => parse_date_str(s.trim()),
        _ => None,
    }
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%B %d, %Y", "%b %d, %Y", "%d %B %Y"];

fn parse_date_str(s: &str) -> Option<i64> {
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.timestamp_millis());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc().timestamp_millis());
        }
    }
    None
}

fn compare_dates(fields: &FieldMap, field: &str, other: &str) -> Option<Ordering> {
    let first = parse_date(field_value(fields, field))?;
    let second = parse_date(field_value(fields, other))?;
    Some(first.cmp(&second))
}

// ─── Independent rules ──────────────────────────────────────────────────────

/// Not null, not loosely equal to `""`, and not of zero length.
///
/// Loose equality makes `0`, `false`, `[""]` and `[null]` fail.
pub fn required(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Array(items) if items.is_empty() => false,
        Value::Object(map) => map
            .get("length")
            .is_none_or(|length| !loose_eq(length, &Value::from(0))),
        _ => !loose_eq(value, &Value::String(String::new())),
    }
}

pub fn null(value: &Value) -> bool {
    value.is_null()
}

/// Always passes. Its presence lets a null value skip the other rules.
pub fn nullable(_value: &Value) -> bool {
    true
}

pub fn string(value: &Value) -> bool {
    value.is_string()
}

/// Whole number after numeric coercion (`"12"` and `12.0` pass).
pub fn integer(value: &Value) -> bool {
    to_number(value).is_some_and(|n| n.is_finite() && n.fract() == 0.0)
}

pub fn numeric(value: &Value) -> bool {
    to_number(value).is_some()
}

/// One of `true`, `false`, `1`, `0`, `"1"`, `"0"`.
pub fn boolean(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Number(n) => matches!(n.as_f64(), Some(f) if f == 0.0 || f == 1.0),
        Value::String(s) => s == "1" || s == "0",
        _ => false,
    }
}

pub fn array(value: &Value) -> bool {
    value.is_array()
}

pub fn object(value: &Value) -> bool {
    value.is_object()
}

pub fn email(value: &Value) -> bool {
    value.as_str().is_some_and(|s| EMAIL_RE.is_match(s))
}

pub fn url(value: &Value) -> bool {
    let Some(s) = value.as_str() else {
        return false;
    };
    let Some(caps) = URL_RE.captures(s) else {
        return false;
    };
    match caps.name("host") {
        Some(host) if host.as_str().bytes().all(|b| b.is_ascii_digit() || b == b'.') => {
            public_ipv4_host(host.as_str())
        }
        Some(_) => true,
        None => false,
    }
}

/// Dotted IPv4 host usable in a public URL: no private, loopback or
/// link-local ranges, no network or broadcast addresses.
fn public_ipv4_host(host: &str) -> bool {
    let octets = match host
        .split('.')
        .map(str::parse::<u16>)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(o) => o,
        Err(_) => return false,
    };
    let [a, b, c, d] = octets[..] else {
        return false;
    };
    if !(1..=223).contains(&a) || b > 255 || c > 255 || !(1..=254).contains(&d) {
        return false;
    }
    let private = a == 10
        || a == 127
        || (a == 169 && b == 254)
        || (a == 192 && b == 168)
        || (a == 172 && (16..=31).contains(&b));
    !private
}

pub fn ip(value: &Value) -> bool {
    ipv4(value) || ipv6(value)
}

pub fn ipv4(value: &Value) -> bool {
    value.as_str().is_some_and(|s| IPV4_RE.is_match(s))
}

pub fn ipv6(value: &Value) -> bool {
    value.as_str().is_some_and(|s| IPV6_RE.is_match(s))
}

/// A string holding valid JSON.
pub fn json(value: &Value) -> bool {
    value
        .as_str()
        .is_some_and(|s| serde_json::from_str::<Value>(s).is_ok())
}

pub fn date(value: &Value) -> bool {
    parse_date(value).is_some()
}

pub fn alpha(value: &Value) -> bool {
    value.as_str().is_some_and(|s| ALPHA_RE.is_match(s))
}

pub fn alpha_dash(value: &Value) -> bool {
    value.as_str().is_some_and(|s| ALPHA_DASH_RE.is_match(s))
}

pub fn alpha_num(value: &Value) -> bool {
    value.as_str().is_some_and(|s| ALPHA_NUM_RE.is_match(s))
}

/// A file descriptor as produced by [`crate::types::FileUpload::descriptor`].
pub fn file(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        obj.get("name").is_some_and(Value::is_string)
            && obj.get("type").is_some_and(Value::is_string)
            && obj.get("size").is_some_and(Value::is_number)
    })
}

// ─── Dependent rules ────────────────────────────────────────────────────────

fn arg(params: &[String], index: usize) -> Option<&str> {
    params.get(index).map(String::as_str)
}

/// Numbers compare by value, strings and arrays by length.
pub fn max(value: &Value, params: &[String]) -> bool {
    arg(params, 0).is_some_and(|limit| bound(value, limit, |actual, limit| actual <= limit))
}

/// Numbers compare by value, strings and arrays by length.
pub fn min(value: &Value, params: &[String]) -> bool {
    arg(params, 0).is_some_and(|limit| bound(value, limit, |actual, limit| actual >= limit))
}

fn bound(value: &Value, limit: &str, check: fn(f64, f64) -> bool) -> bool {
    let Some(limit) = string_to_number(limit) else {
        return false;
    };
    let actual = match value {
        Value::Number(n) => n.as_f64(),
        other => value_length(other).map(|len| len as f64),
    };
    actual.is_some_and(|actual| check(actual, limit))
}

pub fn length(value: &Value, params: &[String]) -> bool {
    match (value_length(value), arg(params, 0).and_then(string_to_number)) {
        (Some(len), Some(expected)) => len as f64 == expected,
        _ => false,
    }
}

pub fn equal(value: &Value, params: &[String]) -> bool {
    arg(params, 0).is_some_and(|p| values_equal(value, &param_value(p)))
}

fn ordering_against(value: &Value, param: Option<&str>) -> Option<Ordering> {
    compare(value, &param_value(param?))
}

pub fn gt(value: &Value, params: &[String]) -> bool {
    ordering_against(value, arg(params, 0)) == Some(Ordering::Greater)
}

pub fn lt(value: &Value, params: &[String]) -> bool {
    ordering_against(value, arg(params, 0)) == Some(Ordering::Less)
}

pub fn gte(value: &Value, params: &[String]) -> bool {
    gt(value, params) || equal(value, params)
}

pub fn lte(value: &Value, params: &[String]) -> bool {
    lt(value, params) || equal(value, params)
}

/// Exclusive on both ends: `between:1,10` rejects 1 and 10.
pub fn between(value: &Value, params: &[String]) -> bool {
    arg(params, 1).is_some()
        && ordering_against(value, arg(params, 0)) == Some(Ordering::Greater)
        && ordering_against(value, arg(params, 1)) == Some(Ordering::Less)
}

/// The value's string form is one of the parameters.
pub fn in_list(value: &Value, params: &[String]) -> bool {
    match value {
        Value::String(_) | Value::Number(_) | Value::Bool(_) => {
            let needle = to_js_string(value);
            params.iter().any(|p| *p == needle)
        }
        _ => false,
    }
}

// ─── Comparison rules ───────────────────────────────────────────────────────

fn dates(field: &str, params: &[String], fields: &FieldMap) -> Option<Ordering> {
    compare_dates(fields, field, arg(params, 0)?)
}

pub fn after(field: &str, params: &[String], fields: &FieldMap) -> bool {
    dates(field, params, fields) == Some(Ordering::Greater)
}

pub fn before(field: &str, params: &[String], fields: &FieldMap) -> bool {
    dates(field, params, fields) == Some(Ordering::Less)
}

pub fn date_equals(field: &str, params: &[String], fields: &FieldMap) -> bool {
    dates(field, params, fields) == Some(Ordering::Equal)
}

pub fn same(field: &str, params: &[String], fields: &FieldMap) -> bool {
    arg(params, 0)
        .is_some_and(|other| values_equal(field_value(fields, field), field_value(fields, other)))
}

pub fn different(field: &str, params: &[String], fields: &FieldMap) -> bool {
    arg(params, 0)
        .is_some_and(|other| !strict_eq(field_value(fields, field), field_value(fields, other)))
}

/// `{field}_confirmation` exists and equals the field.
pub fn confirmed(field: &str, _params: &[String], fields: &FieldMap) -> bool {
    let confirmation = format!("{}_confirmation", field);
    match fields.get(&confirmation) {
        Some(other) => values_equal(field_value(fields, field), other),
        None => false,
    }
}

/// Present, not null and not `""`. `0` and `false` pass.
pub fn filled(field: &str, _params: &[String], fields: &FieldMap) -> bool {
    match fields.get(field) {
        Some(Value::Null) | None => false,
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Whether the field named by the first parameter equals the second.
fn other_matches(params: &[String], fields: &FieldMap) -> Option<bool> {
    let other = field_value(fields, arg(params, 0)?);
    Some(loose_eq(other, &coerce_param(arg(params, 1)?)))
}

/// Required when the other field equals the target value.
pub fn required_if(field: &str, params: &[String], fields: &FieldMap) -> bool {
    match other_matches(params, fields) {
        Some(true) => required(field_value(fields, field)),
        Some(false) => true,
        None => false,
    }
}

/// Required unless the other field equals the target value.
pub fn required_unless(field: &str, params: &[String], fields: &FieldMap) -> bool {
    match other_matches(params, fields) {
        Some(true) => true,
        Some(false) => required(field_value(fields, field)),
        None => false,
    }
}

/// Required when any of the listed fields is filled in.
pub fn required_with(field: &str, params: &[String], fields: &FieldMap) -> bool {
    if params.iter().any(|other| required(field_value(fields, other))) {
        required(field_value(fields, field))
    } else {
        !params.is_empty()
    }
}

/// Required when all of the listed fields are filled in.
pub fn required_with_all(field: &str, params: &[String], fields: &FieldMap) -> bool {
    if params.is_empty() {
        return false;
    }
    if params.iter().all(|other| required(field_value(fields, other))) {
        required(field_value(fields, field))
    } else {
        true
    }
}
