#![no_main]

use libfuzzer_sys::fuzz_target;
use reqprobe::config::types::ProbeFile;

fuzz_target!(|data: &[u8]| {
    let parsed: Option<ProbeFile> = serde_json::from_slice(data).ok();
    if let (Ok(specs), Some(config)) = (reqprobe::fuzzing::apply_config_from_json(data), parsed) {
        debug_assert_eq!(specs.len(), config.requests.len());
        debug_assert!(specs.iter().all(|spec| !spec.method.is_empty()));
    }
});
