#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use formstate::validator::Validator;
use formstate::{FieldMap, RuleList};
use libfuzzer_sys::fuzz_target;
use serde_json::Value;

/// Generate a small arbitrary JSON value from fuzzer bytes.
fn arbitrary_value(u: &mut Unstructured<'_>, depth: u8) -> arbitrary::Result<Value> {
    match u.int_in_range(0..=5)? {
        0 => Ok(Value::Null),
        1 => Ok(Value::Bool(bool::arbitrary(u)?)),
        2 => {
            let n = f64::arbitrary(u)?;
            Ok(serde_json::Number::from_f64(n)
                .map(Value::Number)
                .unwrap_or(Value::Null))
        }
        3 => Ok(Value::String(String::arbitrary(u)?)),
        4 if depth > 0 => {
            let len = u.int_in_range(0..=3)?;
            let mut items = Vec::with_capacity(len);
            for _ in 0..len {
                items.push(arbitrary_value(u, depth - 1)?);
            }
            Ok(Value::Array(items))
        }
        _ => Ok(Value::Null),
    }
}

fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);

    let rules = match String::arbitrary(&mut u) {
        Ok(s) => RuleList::parse(&s),
        Err(_) => return,
    };

    let mut fields = FieldMap::new();
    for name in ["value", "other", "value_confirmation"] {
        match arbitrary_value(&mut u, 2) {
            Ok(v) => {
                fields.insert(name.to_string(), v);
            }
            Err(_) => return,
        }
    }

    let result = Validator::new().validate_field("value", &rules, &fields, &Default::default());
    assert_eq!(result.valid, result.errors.is_empty());
});
