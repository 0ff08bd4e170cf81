pub(crate) const DEFAULT_USER_AGENT: &str = concat!("reqprobe/", env!("CARGO_PKG_VERSION"));

/// Probe files picked up from the working directory when `--config` is absent.
pub(crate) const DEFAULT_CONFIG_FILES: [&str; 2] = ["reqprobe.toml", "reqprobe.json"];

/// Response bodies longer than this are truncated (1 MiB).
pub(crate) const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;
