use crate::error::{SchemaError, SchemaErrorKind};
use crate::registry::lookup_rule;
use crate::types::{FormSchema, ParsedRule};

/// Parse a single rule token.
///
/// The name is everything before the first `:`; the parameters are everything
/// after it, split on `,`. Parameters are kept verbatim (no trimming).
pub fn parse_rule(token: &str) -> ParsedRule {
    let (name, parameters) = match token.split_once(':') {
        Some((name, "")) => (name, None),
        Some((name, rest)) => (name, Some(rest.split(',').map(str::to_string).collect())),
        None => (token, None),
    };

    ParsedRule {
        name: name.to_string(),
        id: lookup_rule(name).map(|d| d.id),
        parameters,
    }
}

/// Split a pipe-separated rule string into tokens, dropping empty segments.
pub fn split_rules(rules: &str) -> impl Iterator<Item = &str> {
    rules.split('|').filter(|t| !t.is_empty())
}

/// Parse a YAML (or JSON) form schema.
///
/// The root must be a mapping with a `fields` mapping and an optional
/// `options` mapping. Field order is preserved.
pub fn parse_schema(input: &str) -> Result<FormSchema, SchemaError> {
    if input.trim().is_empty() {
        return Err(SchemaError {
            kind: SchemaErrorKind::Syntax,
            message: "empty input".to_string(),
            path: None,
        });
    }

    let value: serde_json::Value = serde_saphyr::from_str(input).map_err(|e| SchemaError {
        kind: SchemaErrorKind::Syntax,
        message: e.to_string(),
        path: None,
    })?;

    let Some(root) = value.as_object() else {
        return Err(SchemaError {
            kind: SchemaErrorKind::TypeMismatch,
            message: "schema root must be a mapping".to_string(),
            path: None,
        });
    };

    match root.get("fields") {
        Some(fields) if fields.is_object() => {}
        Some(_) => {
            return Err(SchemaError {
                kind: SchemaErrorKind::TypeMismatch,
                message: "fields must be a mapping of field names to definitions".to_string(),
                path: Some("fields".to_string()),
            });
        }
        None => {
            return Err(SchemaError {
                kind: SchemaErrorKind::MissingField,
                message: "missing field `fields`".to_string(),
                path: Some("fields".to_string()),
            });
        }
    }

    serde_json::from_value(value).map_err(|e| {
        let msg = e.to_string();
        SchemaError {
            kind: classify_json_error(&msg),
            message: msg,
            path: None,
        }
    })
}

fn classify_json_error(msg: &str) -> SchemaErrorKind {
    let lower = msg.to_lowercase();
    if lower.contains("unknown field") || lower.contains("unknown variant") {
        SchemaErrorKind::UnknownField
    } else if lower.contains("missing field") {
        SchemaErrorKind::MissingField
    } else {
        SchemaErrorKind::TypeMismatch
    }
}
