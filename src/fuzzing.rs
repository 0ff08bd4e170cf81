use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgMatches, CommandFactory, FromArgMatches};

use crate::args::parsers::{parse_duration_arg, parse_request, parse_var};
use crate::args::{CliRequest, ProbeArgs, TlsVersion, parse_header};
use crate::config::types::ProbeFile;
use crate::config::{apply_config, file_requests};
use crate::error::{AppError, AppResult, ConfigError};
use crate::probe::{RequestSpec, render_template};

thread_local! {
    static BASE_MATCHES: ArgMatches = ProbeArgs::command().get_matches_from(["reqprobe"]);
}

/// Parses a header string in `Key: Value` format.
///
/// # Errors
///
/// Returns an error when the header is malformed.
pub fn parse_header_input(input: &str) -> AppResult<(String, String)> {
    parse_header(input).map_err(AppError::from)
}

/// Parses a template variable in `key=value` format.
///
/// # Errors
///
/// Returns an error when the variable is malformed.
pub fn parse_var_input(input: &str) -> AppResult<(String, String)> {
    parse_var(input).map_err(AppError::from)
}

/// Parses a `METHOD PATH [JSON-BODY]` request argument.
///
/// # Errors
///
/// Returns an error when the request or its body is malformed.
pub fn parse_request_input(input: &str) -> AppResult<CliRequest> {
    parse_request(input).map_err(AppError::from)
}

/// Parses a duration argument (e.g. `10s`, `500ms`).
///
/// # Errors
///
/// Returns an error when the duration is invalid.
pub fn parse_duration_arg_input(input: &str) -> AppResult<Duration> {
    parse_duration_arg(input)
}

/// Parses a TLS version (e.g. `1.2`, `1.3`).
///
/// # Errors
///
/// Returns an error when the version is invalid.
pub fn parse_tls_version_input(input: &str) -> AppResult<TlsVersion> {
    input.parse::<TlsVersion>()
}

#[must_use]
pub fn render_template_input(input: &str, vars: &BTreeMap<String, String>) -> String {
    render_template(input, vars)
}

/// Parses a TOML probe file, applies it to defaults and builds its requests.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_toml(input: &str) -> AppResult<Vec<RequestSpec>> {
    let config: ProbeFile = toml::from_str(input).map_err(|err| {
        AppError::config(ConfigError::ParseToml {
            path: PathBuf::from("<fuzz>"),
            source: err,
        })
    })?;
    apply_config_to_defaults(&config)
}

/// Parses a JSON probe file, applies it to defaults and builds its requests.
///
/// # Errors
///
/// Returns an error when parsing or validation fails.
pub fn apply_config_from_json(input: &[u8]) -> AppResult<Vec<RequestSpec>> {
    let config: ProbeFile = serde_json::from_slice(input)?;
    apply_config_to_defaults(&config)
}

/// Loads a probe file from disk to exercise extension handling.
///
/// # Errors
///
/// Returns an error when the probe file cannot be read or parsed.
pub fn load_config_file_input(path: &std::path::Path) -> AppResult<()> {
    crate::config::load_config_file(path).map(|_| ())
}

fn apply_config_to_defaults(config: &ProbeFile) -> AppResult<Vec<RequestSpec>> {
    BASE_MATCHES.with(|matches| {
        let mut args = ProbeArgs::from_arg_matches(matches)?;
        apply_config(&mut args, matches, config)?;
        file_requests(config)
    })
}
