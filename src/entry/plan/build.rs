use std::path::PathBuf;

use clap::ArgMatches;

use crate::args::{CliRequest, DEFAULT_USER_AGENT, ProbeArgs};
use crate::config::types::ProbeFile;
use crate::error::{AppError, AppResult, ValidationError};
use crate::probe::{ProbeOptions, RequestSpec};

use super::types::ProbePlan;

pub(in crate::entry) fn build_plan(
    mut args: ProbeArgs,
    matches: &ArgMatches,
) -> AppResult<ProbePlan> {
    let config = crate::config::load_config(args.config.as_deref())?;
    let mut specs = match config.as_ref() {
        Some(config) => apply_config(&mut args, matches, config)?,
        None => Vec::new(),
    };
    specs.extend(args.requests.iter().map(|request| cli_spec(request, &args)));

    let Some(base_url) = args.base_url.clone() else {
        return Err(AppError::validation(ValidationError::MissingBaseUrl));
    };
    if specs.is_empty() {
        return Err(AppError::validation(ValidationError::NoRequests));
    }

    let options = ProbeOptions {
        verify_tls: !args.insecure,
        request_timeout: args.request_timeout,
        run_timeout: args.run_timeout,
        max_body_bytes: args.max_body.get(),
        cacert: args.cacert.as_ref().map(PathBuf::from),
        tls_min: args.tls_min,
        tls_max: args.tls_max,
        user_agent: DEFAULT_USER_AGENT.to_owned(),
        vars: args.vars.iter().cloned().collect(),
    };

    Ok(ProbePlan {
        base_url,
        specs,
        options,
        format: args.format,
        output: args.output,
        fail_on_error: args.fail_on_error,
    })
}

fn apply_config(
    args: &mut ProbeArgs,
    matches: &ArgMatches,
    config: &ProbeFile,
) -> AppResult<Vec<RequestSpec>> {
    crate::config::apply_config(args, matches, config)?;
    crate::config::file_requests(config)
}

fn cli_spec(request: &CliRequest, args: &ProbeArgs) -> RequestSpec {
    RequestSpec {
        name: None,
        method: request.method.clone(),
        path: request.path.clone(),
        headers: args.headers.clone(),
        body: request.body.clone(),
        credentials: args.credentials,
    }
}
