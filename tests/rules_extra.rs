use formstate::rules;
use formstate::types::{FieldMap, FileUpload};
use formstate::validator::Validator;
use serde_json::{Value, json};

/// Helper: evaluate a single rule token against a standalone value.
fn passes(token: &str, value: Value) -> bool {
    Validator::new().passes_value(token, value)
}

/// Helper: build a field map from a JSON object literal.
fn fields(value: Value) -> FieldMap {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn params(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ─── required / null / nullable ─────────────────────────────────────────────

#[test]
fn required_rejects_null_empty_string_and_empty_array() {
    assert!(!rules::required(&json!(null)));
    assert!(!rules::required(&json!("")));
    assert!(!rules::required(&json!([])));
}

#[test]
fn required_rejects_values_loosely_equal_to_empty_string() {
    for empty in [json!(0), json!(false), json!(0.0), json!([""]), json!([null])] {
        assert!(!passes("required", empty.clone()), "{empty} should be required-empty");
    }
    assert!(!rules::required(&json!({ "length": 0 })));
}

#[test]
fn required_accepts_other_filled_values() {
    for filled in [json!(1), json!(true), json!(" "), json!({}), json!([0, 0]), json!("0")] {
        assert!(rules::required(&filled), "{filled} should be required-valid");
    }
}

#[test]
fn null_rule_matches_only_null() {
    assert!(passes("null", json!(null)));
    assert!(!passes("null", json!("")));
    assert!(!passes("null", json!(0)));
}

#[test]
fn null_value_fails_other_rules_without_nullable() {
    assert!(!passes("email", json!(null)));
    assert!(!passes("string", json!(null)));
}

#[test]
fn nullable_lets_null_skip_other_rules() {
    let validator = Validator::new();
    let values = fields(json!({ "website": null }));
    let rules = "nullable|url|max:50".into();
    let result = validator.validate_field("website", &rules, &values, &Default::default());
    assert!(result.valid, "{:?}", result.errors);
}

#[test]
fn nullable_does_not_relax_non_null_values() {
    let validator = Validator::new();
    let values = fields(json!({ "website": "not a url" }));
    let rules = "nullable|url".into();
    let result = validator.validate_field("website", &rules, &values, &Default::default());
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].rule, "url");
}

// ─── Type predicates ────────────────────────────────────────────────────────

#[test]
fn json_type_predicates() {
    assert!(passes("string", json!("a")));
    assert!(!passes("string", json!(1)));
    assert!(passes("array", json!([1, 2])));
    assert!(!passes("array", json!("[1, 2]")));
    assert!(passes("object", json!({ "a": 1 })));
    assert!(!passes("object", json!([])));
}

#[test]
fn integer_coerces_numeric_strings() {
    assert!(passes("integer", json!(12)));
    assert!(passes("integer", json!("12")));
    assert!(passes("integer", json!(12.0)));
    assert!(!passes("integer", json!(12.5)));
    assert!(!passes("integer", json!("12.5")));
    assert!(!passes("integer", json!("twelve")));
}

#[test]
fn numeric_accepts_anything_that_coerces() {
    assert!(passes("numeric", json!(2.5)));
    assert!(passes("numeric", json!("2.5")));
    assert!(passes("numeric", json!("-1e3")));
    assert!(passes("numeric", json!("0x1F")));
    assert!(!passes("numeric", json!("abc")));
    assert!(!passes("numeric", json!("inf")));
    assert!(!passes("numeric", json!("0x-1")));
    assert!(!passes("numeric", json!("0x+1")));
    assert!(!passes("numeric", json!([1])));
}

#[test]
fn boolean_accepts_bools_and_zero_one() {
    for ok in [json!(true), json!(false), json!(1), json!(0), json!("1"), json!("0")] {
        assert!(passes("boolean", ok.clone()), "{ok} should be boolean");
    }
    for bad in [json!("true"), json!(2), json!(""), json!([])] {
        assert!(!passes("boolean", bad.clone()), "{bad} should not be boolean");
    }
}

// ─── Formats ────────────────────────────────────────────────────────────────

#[test]
fn email_format() {
    assert!(passes("email", json!("ada@example.com")));
    assert!(passes("email", json!("ADA.LOVELACE+forms@Example.CO.UK")));
    assert!(!passes("email", json!("ada@example")));
    assert!(!passes("email", json!("not-an-email")));
    assert!(!passes("email", json!(42)));
}

#[test]
fn url_accepts_public_hosts() {
    assert!(passes("url", json!("https://example.com")));
    assert!(passes("url", json!("http://example.com/path?q=1#frag")));
    assert!(passes("url", json!("ftp://files.example.org:21/pub")));
    assert!(passes("url", json!("HTTPS://user:pw@example.com")));
    assert!(passes("url", json!("//example.com")));
    assert!(passes("url", json!("http://8.8.8.8")));
}

#[test]
fn url_rejects_private_and_malformed_hosts() {
    assert!(!passes("url", json!("example.com")));
    assert!(!passes("url", json!("http://localhost")));
    assert!(!passes("url", json!("http://10.0.0.1")));
    assert!(!passes("url", json!("http://127.0.0.1")));
    assert!(!passes("url", json!("http://192.168.1.20")));
    assert!(!passes("url", json!("http://172.16.0.1")));
    assert!(!passes("url", json!("http://169.254.1.1")));
    assert!(!passes("url", json!("http://8.8.8.0")));
    assert!(!passes("url", json!("http://300.1.1.1")));
    assert!(!passes("url", json!("mailto:ada@example.com")));
}

#[test]
fn ip_rules() {
    assert!(passes("ipv4", json!("192.168.1.1")));
    assert!(!passes("ipv4", json!("256.1.1.1")));
    assert!(!passes("ipv4", json!("1.2.3")));
    assert!(passes("ipv6", json!("::1")));
    assert!(passes("ipv6", json!("2001:db8::1")));
    assert!(passes("ipv6", json!("2001:0db8:0000:0000:0000:ff00:0042:8329")));
    assert!(!passes("ipv6", json!("2001:db8::g")));
    assert!(!passes("ipv6", json!("192.168.1.1")));
    assert!(passes("ip", json!("10.0.0.1")));
    assert!(passes("ip", json!("fe80::1")));
    assert!(!passes("ip", json!("not an ip")));
}

#[test]
fn json_rule_parses_strings_only() {
    assert!(passes("json", json!(r#"{"a": 1}"#)));
    assert!(passes("json", json!("[1, 2, 3]")));
    assert!(!passes("json", json!("{a: 1}")));
    assert!(!passes("json", json!({ "a": 1 })));
}

#[test]
fn date_rule_accepts_common_forms() {
    assert!(passes("date", json!("2024-01-15")));
    assert!(passes("date", json!("2024/01/15")));
    assert!(passes("date", json!("01/15/2024")));
    assert!(passes("date", json!("2024-01-15T10:30:00Z")));
    assert!(passes("date", json!("January 15, 2024")));
    assert!(passes("date", json!(1_705_312_200_000_i64)));
    assert!(!passes("date", json!("not a date")));
    assert!(!passes("date", json!("2024-13-45")));
    assert!(!passes("date", json!(true)));
}

#[test]
fn character_class_rules() {
    assert!(passes("alpha", json!("Ada")));
    assert!(!passes("alpha", json!("Ada1")));
    assert!(passes("alpha_dash", json!("ada-lovelace_x")));
    assert!(!passes("alpha_dash", json!("ada lovelace")));
    assert!(passes("alpha_num", json!("ada1815")));
    assert!(!passes("alpha_num", json!("ada-1815")));
    assert!(!passes("alpha", json!("")));
}

#[test]
fn file_rule_accepts_upload_descriptors() {
    let upload = FileUpload::new("cv.pdf", "application/pdf", b"%PDF".to_vec());
    assert!(passes("file", upload.descriptor()));
    assert!(!passes("file", json!("cv.pdf")));
    assert!(!passes("file", json!({ "name": "cv.pdf" })));
}

// ─── Dependent rules ────────────────────────────────────────────────────────

#[test]
fn max_compares_numbers_by_value_and_strings_by_length() {
    assert!(!passes("max:5", json!("abcdef")));
    assert!(passes("max:5", json!("abcde")));
    assert!(!passes("max:5", json!(6)));
    assert!(passes("max:5", json!(5)));
    assert!(passes("max:2", json!([1, 2])));
    assert!(!passes("max:2", json!([1, 2, 3])));
}

#[test]
fn min_compares_numbers_by_value_and_strings_by_length() {
    assert!(!passes("min:5", json!("")));
    assert!(passes("min:5", json!("abcde")));
    assert!(!passes("min:5", json!(4)));
    assert!(passes("min:5", json!(5.5)));
}

#[test]
fn max_counts_characters_not_bytes() {
    assert!(passes("max:3", json!("日本語")));
}

#[test]
fn length_is_exact() {
    assert!(passes("length:3", json!("abc")));
    assert!(passes("length:3", json!([1, 2, 3])));
    assert!(!passes("length:3", json!("ab")));
    assert!(!passes("length:3", json!(123)));
}

#[test]
fn equal_compares_loosely_against_parameter() {
    assert!(passes("equal:5", json!(5)));
    assert!(passes("equal:5", json!("5")));
    assert!(passes("equal:yes", json!("yes")));
    assert!(!passes("equal:5", json!(6)));
}

#[test]
fn ordering_rules() {
    assert!(passes("gt:5", json!(6)));
    assert!(!passes("gt:5", json!(5)));
    assert!(passes("gte:5", json!(5)));
    assert!(passes("lt:5", json!(4)));
    assert!(!passes("lt:5", json!(5)));
    assert!(passes("lte:5", json!(5)));
    assert!(passes("gt:9", json!("10")));
    assert!(passes("gt:apple", json!("banana")));
    assert!(!passes("gt:5", json!([1, 2])));
}

#[test]
fn between_is_exclusive_on_both_ends() {
    assert!(!passes("between:1,10", json!(1)));
    assert!(!passes("between:1,10", json!(10)));
    assert!(passes("between:1,10", json!(5)));
    assert!(passes("between:1,10", json!("5")));
    assert!(!passes("between:1,10", json!(0)));
    assert!(!passes("between:1,10", json!(11)));
}

#[test]
fn in_matches_string_form() {
    assert!(passes("in:red,green", json!("red")));
    assert!(!passes("in:red,green", json!("blue")));
    assert!(passes("in:1,2", json!(1)));
    assert!(passes("in:true,false", json!(true)));
    assert!(passes("in:100000000000000000000", json!(1e20)));
    assert!(!passes("in:9223372036854775807", json!(1e20)));
    assert!(!passes("in:red", json!(["red"])));
}

#[test]
fn dependent_rules_never_panic_without_parameters() {
    for name in ["max", "min", "length", "equal", "gt", "gte", "lt", "lte", "between", "in"] {
        assert!(!passes(name, json!(1)), "{name} without parameters should fail");
    }
    assert!(!rules::max(&json!(1), &[]));
    assert!(!rules::between(&json!(5), &params(&["1"])));
}

// ─── Comparison rules ───────────────────────────────────────────────────────

#[test]
fn same_and_different() {
    let values = fields(json!({ "password": "secret", "repeat": "secret", "other": "x" }));
    let v = Validator::new();
    assert!(v.passes("repeat", "same:password", &values));
    assert!(!v.passes("other", "same:password", &values));
    assert!(v.passes("other", "different:password", &values));
    assert!(!v.passes("repeat", "different:password", &values));
}

#[test]
fn same_compares_arrays_by_content() {
    let values = fields(json!({ "a": [1, 2], "b": [1, 2], "c": [2, 1] }));
    let v = Validator::new();
    assert!(v.passes("a", "same:b", &values));
    assert!(!v.passes("a", "same:c", &values));
}

#[test]
fn confirmed_requires_matching_confirmation_field() {
    let v = Validator::new();
    let ok = fields(json!({ "password": "secret", "password_confirmation": "secret" }));
    let mismatch = fields(json!({ "password": "secret", "password_confirmation": "other" }));
    let missing = fields(json!({ "password": "secret" }));
    assert!(v.passes("password", "confirmed", &ok));
    assert!(!v.passes("password", "confirmed", &mismatch));
    assert!(!v.passes("password", "confirmed", &missing));
}

#[test]
fn date_comparisons() {
    let values = fields(json!({
        "start": "2024-01-01",
        "end": "2024-02-01",
        "also_start": "2024-01-01T00:00:00Z",
        "bad": "whenever",
    }));
    let v = Validator::new();
    assert!(v.passes("end", "after:start", &values));
    assert!(!v.passes("start", "after:end", &values));
    assert!(v.passes("start", "before:end", &values));
    assert!(v.passes("start", "date_equals:also_start", &values));
    assert!(!v.passes("end", "date_equals:start", &values));
    assert!(!v.passes("bad", "after:start", &values));
    assert!(!v.passes("end", "after:missing", &values));
}

#[test]
fn filled_requires_present_non_empty_value() {
    let values = fields(json!({ "zero": 0, "no": false, "empty": "" }));
    assert!(rules::filled("zero", &[], &values));
    assert!(rules::filled("no", &[], &values));
    assert!(!rules::filled("empty", &[], &values));
    assert!(!rules::filled("absent", &[], &values));
}

#[test]
fn required_if_applies_only_when_other_field_matches() {
    let v = Validator::new();
    let company = fields(json!({ "kind": "company", "company_name": "" }));
    let person = fields(json!({ "kind": "person", "company_name": "" }));
    assert!(!v.passes("company_name", "required_if:kind,company", &company));
    assert!(v.passes("company_name", "required_if:kind,company", &person));
}

#[test]
fn required_if_coerces_boolean_parameters() {
    let values = fields(json!({ "subscribe": true, "email": "" }));
    assert!(!rules::required_if("email", &params(&["subscribe", "true"]), &values));
    assert!(rules::required_if("email", &params(&["subscribe", "false"]), &values));
}

#[test]
fn required_unless_applies_when_other_field_differs() {
    let v = Validator::new();
    let company = fields(json!({ "kind": "company", "vat": "" }));
    let person = fields(json!({ "kind": "person", "vat": "" }));
    assert!(!v.passes("vat", "required_unless:kind,person", &company));
    assert!(v.passes("vat", "required_unless:kind,person", &person));
}

#[test]
fn required_with_and_required_with_all() {
    let v = Validator::new();
    let one = fields(json!({ "street": "Main St", "city": "", "zip": "" }));
    let both = fields(json!({ "street": "Main St", "city": "Springfield", "zip": "" }));
    let none = fields(json!({ "street": "", "city": "", "zip": "" }));

    assert!(!v.passes("zip", "required_with:street,city", &one));
    assert!(v.passes("zip", "required_with:street,city", &none));

    assert!(v.passes("zip", "required_with_all:street,city", &one));
    assert!(!v.passes("zip", "required_with_all:street,city", &both));
    assert!(v.passes("zip", "required_with_all:street,city", &none));
}

// ─── Unknown and malformed rules ────────────────────────────────────────────

#[test]
fn unknown_rule_fails_with_unsupported_message() {
    let values = fields(json!({ "name": "Ada" }));
    let rules = "required|shiny".into();
    let result = Validator::new().validate_field("name", &rules, &values, &Default::default());
    assert!(!result.valid);
    assert_eq!(
        result.error("shiny"),
        Some("The name field uses an unsupported rule.")
    );
    assert_eq!(result.errors.len(), 1);
}

#[test]
fn registered_rule_missing_parameters_fails() {
    assert!(!passes("required_if:kind", json!("x")));
    assert!(!passes("between:1", json!(5)));
    assert!(!passes("same", json!("x")));
}
