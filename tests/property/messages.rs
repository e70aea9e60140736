use formstate::messages::{format_message, substitute};
use formstate::parse::parse_rule;
use formstate::registry::supported_rules;
use formstate::types::MessageMap;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn field_placeholder_becomes_readable_name(field in "[a-z][a-z0-9_]{0,15}") {
        prop_assert_eq!(substitute(":field", &field, &[]), field.replace('_', " "));
    }

    #[test]
    fn parameters_are_substituted_in_place(a in "[0-9]{1,4}", b in "[a-z]{1,6}") {
        let params = vec![a.clone(), b.clone()];
        prop_assert_eq!(
            substitute("[:param1|:param0]", "f", &params),
            format!("[{}|{}]", b, a)
        );
    }

    #[test]
    fn overrides_are_verbatim(
        index in 0usize..41,
        field in "[a-z_]{1,10}",
        message in "[ -~]{0,30}",
    ) {
        let name = supported_rules().nth(index % supported_rules().count()).unwrap();
        let mut overrides = MessageMap::new();
        overrides.insert(name.to_string(), message.clone());
        prop_assert_eq!(format_message(&field, &parse_rule(name), &overrides), message);
    }

    #[test]
    fn default_messages_name_the_field(index in 0usize..41, field in "[a-z]{1,10}") {
        let name = supported_rules().nth(index % supported_rules().count()).unwrap();
        let message = format_message(&field, &parse_rule(name), &MessageMap::new());
        prop_assert!(message.contains(&field), "{}", message);
        prop_assert!(!message.contains(":field"), "{}", message);
    }
}
