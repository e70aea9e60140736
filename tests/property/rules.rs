use formstate::rules;
use formstate::validator::Validator;
use proptest::prelude::*;
use serde_json::{Value, json};

fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        any::<i64>().prop_map(|n| json!(n)),
        (-1.0e6f64..1.0e6).prop_map(|f| json!(f)),
        ".{0,12}".prop_map(Value::String),
    ]
}

fn value() -> impl Strategy<Value = Value> {
    scalar().prop_recursive(2, 16, 4, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec(("[a-z]{1,4}", inner), 0..4)
                .prop_map(|entries| Value::Object(entries.into_iter().collect())),
        ]
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn required_strings_and_arrays(s in ".{0,12}", items in prop::collection::vec("[a-z]{1,4}", 0..4)) {
        prop_assert_eq!(rules::required(&json!(s)), !s.is_empty());
        prop_assert_eq!(rules::required(&json!(items)), !items.is_empty());
    }

    #[test]
    fn required_numbers_fail_only_at_zero(n in any::<i64>()) {
        prop_assert_eq!(rules::required(&json!(n)), n != 0);
    }

    #[test]
    fn required_never_panics(v in value()) {
        let _ = rules::required(&v);
    }

    #[test]
    fn between_excludes_its_bounds(lo in -1000i64..1000, span in 2i64..1000, offset in 1i64..1000) {
        let hi = lo + span;
        let params = vec![lo.to_string(), hi.to_string()];
        prop_assert!(!rules::between(&json!(lo), &params));
        prop_assert!(!rules::between(&json!(hi), &params));
        let inside = lo + 1 + (offset % (span - 1));
        prop_assert!(rules::between(&json!(inside), &params), "{} in ({}, {})", inside, lo, hi);
    }

    #[test]
    fn max_and_min_on_numbers(n in -10_000i64..10_000, limit in -10_000i64..10_000) {
        let params = vec![limit.to_string()];
        prop_assert_eq!(rules::max(&json!(n), &params), n <= limit);
        prop_assert_eq!(rules::min(&json!(n), &params), n >= limit);
    }

    #[test]
    fn max_and_min_on_string_length(s in "[a-z]{0,20}", limit in 0usize..20) {
        let params = vec![limit.to_string()];
        prop_assert_eq!(rules::max(&json!(s), &params), s.len() <= limit);
        prop_assert_eq!(rules::min(&json!(s), &params), s.len() >= limit);
    }

    #[test]
    fn gte_is_gt_or_equal(a in -500i64..500, b in -500i64..500) {
        let params = vec![b.to_string()];
        prop_assert_eq!(rules::gte(&json!(a), &params), a >= b);
        prop_assert_eq!(rules::lte(&json!(a), &params), a <= b);
    }

    #[test]
    fn any_rule_on_any_value_never_panics(
        name in prop::sample::select(formstate::registry::supported_rules().collect::<Vec<_>>()),
        params in prop::collection::vec("[a-z0-9,.-]{0,6}", 0..3),
        v in value(),
    ) {
        let token = if params.is_empty() {
            name.to_string()
        } else {
            format!("{}:{}", name, params.join(","))
        };
        let _ = Validator::new().passes_value(&token, v);
    }

    #[test]
    fn nullable_accepts_null_for_every_rule(
        name in prop::sample::select(formstate::registry::supported_rules().collect::<Vec<_>>()),
    ) {
        let token = format!("nullable|{}:1,2", name);
        let validator = Validator::new();
        let mut fields = formstate::FieldMap::new();
        fields.insert("value".to_string(), Value::Null);
        let result = validator.validate_field("value", &token.as_str().into(), &fields, &Default::default());
        prop_assert!(result.valid, "{:?}", result.errors);
    }
}
