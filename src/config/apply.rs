use clap::ArgMatches;
use clap::parser::ValueSource;

use crate::args::{PositiveUsize, ProbeArgs, parse_header};
use crate::error::{AppError, AppResult, ConfigError, ValidationError};
use crate::probe::RequestSpec;

use super::types::{DurationValue, ProbeFile};

const DEFAULT_METHOD: &str = "GET";

/// Applies probe file values to CLI arguments. Values given on the command
/// line (or through the environment) win.
///
/// # Errors
///
/// Returns an error when a file value is invalid.
pub fn apply_config(
    args: &mut ProbeArgs,
    matches: &ArgMatches,
    config: &ProbeFile,
) -> AppResult<()> {
    if !is_cli(matches, "base_url")
        && let Some(base_url) = config.base_url.clone()
    {
        args.base_url = Some(base_url);
    }

    if !is_cli(matches, "request_timeout")
        && let Some(timeout) = config.timeout.as_ref()
    {
        args.request_timeout = to_duration(timeout, "timeout")?;
    }

    if !is_cli(matches, "run_timeout")
        && let Some(timeout) = config.run_timeout.as_ref()
    {
        args.run_timeout = Some(to_duration(timeout, "run_timeout")?);
    }

    if !is_cli(matches, "insecure")
        && let Some(insecure) = config.insecure
    {
        args.insecure = insecure;
    }

    if !is_cli(matches, "cacert")
        && let Some(cacert) = config.cacert.clone()
    {
        args.cacert = Some(cacert);
    }

    if !is_cli(matches, "tls_min")
        && let Some(tls_min) = config.tls_min
    {
        args.tls_min = Some(tls_min);
    }

    if !is_cli(matches, "tls_max")
        && let Some(tls_max) = config.tls_max
    {
        args.tls_max = Some(tls_max);
    }

    if !is_cli(matches, "max_body")
        && let Some(max_body) = config.max_body
    {
        args.max_body = PositiveUsize::try_from(max_body)
            .map_err(|_err| AppError::config(ConfigError::MaxBodyZero))?;
    }

    if !is_cli(matches, "format")
        && let Some(format) = config.format
    {
        args.format = format;
    }

    if !is_cli(matches, "output")
        && let Some(output) = config.output.clone()
    {
        args.output = Some(output);
    }

    if !is_cli(matches, "fail_on_error")
        && let Some(fail_on_error) = config.fail_on_error
    {
        args.fail_on_error = fail_on_error;
    }

    if let Some(vars) = config.vars.as_ref() {
        let mut merged: Vec<(String, String)> = vars
            .iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect();
        merged.append(&mut args.vars);
        args.vars = merged;
    }

    Ok(())
}

/// Builds the request list declared in a probe file, in file order.
///
/// # Errors
///
/// Returns an error when a request has no path or a malformed header.
pub fn file_requests(config: &ProbeFile) -> AppResult<Vec<RequestSpec>> {
    let shared = match config.headers.as_ref() {
        Some(headers) => parse_headers(headers)
            .map_err(|err| AppError::config(ConfigError::InvalidHeader { source: err }))?,
        None => Vec::new(),
    };

    let mut specs = Vec::with_capacity(config.requests.len());
    for (index, request) in config.requests.iter().enumerate() {
        let position = index.saturating_add(1);
        let path = request
            .path
            .clone()
            .ok_or(ConfigError::RequestMissingPath { index: position })?;
        let mut headers = shared.clone();
        if let Some(own) = request.headers.as_ref() {
            headers.extend(parse_headers(own).map_err(|err| {
                AppError::config(ConfigError::InvalidRequestHeader {
                    index: position,
                    source: err,
                })
            })?);
        }
        specs.push(RequestSpec {
            name: request.name.clone(),
            method: request
                .method
                .clone()
                .unwrap_or_else(|| DEFAULT_METHOD.to_owned()),
            path,
            headers,
            body: request.body.clone(),
            credentials: request.credentials.unwrap_or_default(),
        });
    }
    Ok(specs)
}

fn is_cli(matches: &ArgMatches, name: &str) -> bool {
    matches!(
        matches.value_source(name),
        Some(ValueSource::CommandLine | ValueSource::EnvVariable)
    )
}

fn to_duration(value: &DurationValue, field: &'static str) -> AppResult<std::time::Duration> {
    value
        .to_duration()
        .map_err(|message| AppError::config(ConfigError::InvalidDuration { field, message }))
}

fn parse_headers(headers: &[String]) -> Result<Vec<(String, String)>, ValidationError> {
    headers.iter().map(|header| parse_header(header)).collect()
}
