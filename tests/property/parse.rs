use formstate::parse::{parse_rule, split_rules};
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn name_is_text_before_first_colon(name in "[a-z_]{1,12}", rest in "[a-z0-9,:. ]{0,20}") {
        let token = format!("{}:{}", name, rest);
        let rule = parse_rule(&token);
        prop_assert_eq!(&rule.name, &name);
        match rule.parameters {
            None => prop_assert!(rest.is_empty()),
            Some(params) => prop_assert_eq!(params.join(","), rest),
        }
    }

    #[test]
    fn token_without_colon_is_bare_name(token in "[^:]{0,20}") {
        let rule = parse_rule(&token);
        prop_assert_eq!(rule.name, token);
        prop_assert!(rule.parameters.is_none());
    }

    #[test]
    fn split_rules_yields_non_empty_tokens(input in "[a-z:,|]{0,40}") {
        let tokens: Vec<&str> = split_rules(&input).collect();
        for token in &tokens {
            prop_assert!(!token.is_empty());
            prop_assert!(!token.contains('|'));
        }
        prop_assert_eq!(tokens.join(""), input.replace('|', ""));
    }

    #[test]
    fn parsing_arbitrary_tokens_never_panics(token in ".{0,40}") {
        let _ = parse_rule(&token);
    }
}
