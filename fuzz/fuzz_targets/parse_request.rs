#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        if let Ok(request) = reqprobe::fuzzing::parse_request_input(input) {
            debug_assert!(!request.method.is_empty());
            debug_assert!(!request.path.is_empty());
            debug_assert!(!request.path.chars().any(char::is_whitespace));
        }
    }
});
