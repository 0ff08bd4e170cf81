use clap::Parser;
use std::time::Duration;

use crate::probe::CredentialMode;

use super::defaults::DEFAULT_MAX_BODY_BYTES;
use super::parsers::{
    parse_bool_env, parse_duration_arg, parse_header, parse_positive_usize, parse_request,
    parse_tls_version, parse_var,
};
use super::types::{CliRequest, OutputFormat, PositiveUsize, TlsVersion};

#[derive(Debug, Parser, Clone)]
#[clap(
    version,
    about = "Sequential HTTP request probe: run an ordered list of requests against an API and inspect every status, header and body."
)]
pub struct ProbeArgs {
    /// Base URL every request path is appended to (e.g. https://localhost:8082)
    #[arg(long = "base-url", short = 'u', env = "REQPROBE_BASE_URL")]
    pub base_url: Option<String>,

    /// Request to issue as 'METHOD PATH [JSON-BODY]' (repeatable, runs in order)
    #[arg(long = "request", short = 'r', value_parser = parse_request)]
    pub requests: Vec<CliRequest>,

    /// HTTP headers in 'Key: Value' format applied to --request entries (repeatable)
    #[arg(long = "header", short = 'H', value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    /// Credential mode for --request entries
    #[arg(long, value_enum, default_value_t = CredentialMode::SameOrigin)]
    pub credentials: CredentialMode,

    /// Template variable in 'key=value' format, referenced as {{key}} (repeatable)
    #[arg(long = "var", value_parser = parse_var)]
    pub vars: Vec<(String, String)>,

    /// Path to probe file (TOML/JSON). Defaults to ./reqprobe.toml or ./reqprobe.json if present.
    #[arg(long, short = 'c')]
    pub config: Option<String>,

    /// Per-request timeout (supports ms/s/m/h)
    #[arg(
        long = "timeout",
        default_value = "10s",
        value_parser = parse_duration_arg
    )]
    pub request_timeout: Duration,

    /// Overall deadline for the whole run (supports ms/s/m/h)
    #[arg(long = "run-timeout", value_parser = parse_duration_arg)]
    pub run_timeout: Option<Duration>,

    /// Skip TLS certificate verification
    #[arg(long, short = 'k')]
    pub insecure: bool,

    /// Additional root certificate (PEM)
    #[arg(long)]
    pub cacert: Option<String>,

    /// Minimum TLS version (1.0, 1.1, 1.2, 1.3)
    #[arg(long = "tls-min", value_parser = parse_tls_version)]
    pub tls_min: Option<TlsVersion>,

    /// Maximum TLS version (1.0, 1.1, 1.2, 1.3)
    #[arg(long = "tls-max", value_parser = parse_tls_version)]
    pub tls_max: Option<TlsVersion>,

    /// Maximum response body bytes kept per request
    #[arg(
        long = "max-body",
        default_value_t = default_max_body(),
        value_parser = parse_positive_usize
    )]
    pub max_body: PositiveUsize,

    /// Report format
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Write the report to this file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<String>,

    /// Exit with an error when any request records a failure
    #[arg(long = "fail-on-error")]
    pub fail_on_error: bool,

    /// Enable verbose logging (sets log level to debug unless overridden by REQPROBE_LOG/RUST_LOG)
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Disable colored log output
    #[arg(long = "no-color", env = "NO_COLOR", value_parser = parse_bool_env)]
    pub no_color: bool,
}

fn default_max_body() -> PositiveUsize {
    PositiveUsize::try_from(DEFAULT_MAX_BODY_BYTES).unwrap_or(PositiveUsize::MIN)
}
