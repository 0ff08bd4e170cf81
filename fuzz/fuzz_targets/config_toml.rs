#![no_main]

use libfuzzer_sys::fuzz_target;
use reqprobe::config::types::ProbeFile;

fuzz_target!(|data: &[u8]| {
    if let Ok(input) = std::str::from_utf8(data) {
        let parsed: Option<ProbeFile> = toml::from_str(input).ok();
        if let (Ok(specs), Some(config)) = (reqprobe::fuzzing::apply_config_from_toml(input), parsed) {
            debug_assert_eq!(specs.len(), config.requests.len());
            debug_assert!(specs.iter().all(|spec| !spec.method.is_empty()));
        }
    }
});
