#![no_main]

use libfuzzer_sys::fuzz_target;
use std::collections::BTreeMap;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let mut vars = BTreeMap::new();
        vars.insert("token".to_owned(), "abc".to_owned());
        let seed = input.chars().take(32).collect::<String>();
        vars.insert("input".to_owned(), seed);
        let rendered = reqprobe::fuzzing::render_template_input(input, &vars);
        if !input.contains("{{") {
            debug_assert_eq!(rendered, input);
        }
    }
});
