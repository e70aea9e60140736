#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let s = String::from_utf8_lossy(data);
    if let Ok(mut form) = formstate::load(&s) {
        let first = form.validate();
        let second = form.validate();
        assert_eq!(first, second);
    }
});
