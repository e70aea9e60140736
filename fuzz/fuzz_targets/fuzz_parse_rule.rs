#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    for token in formstate::parse::split_rules(&s) {
        let rule = formstate::parse_rule(token);
        assert!(!rule.name.contains(':'));
        let _ = formstate::messages::format_message("field", &rule, &Default::default());
    }
});
