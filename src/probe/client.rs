use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use reqwest::redirect::Policy;
use reqwest::{Client, ClientBuilder};
use tracing::debug;

use crate::args::{DEFAULT_MAX_BODY_BYTES, DEFAULT_USER_AGENT, TlsVersion};
use crate::error::{AppError, AppResult, HttpError};

/// Transport and run settings shared by every request of a runner.
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    pub verify_tls: bool,
    pub request_timeout: Duration,
    pub run_timeout: Option<Duration>,
    pub max_body_bytes: usize,
    pub cacert: Option<PathBuf>,
    pub tls_min: Option<TlsVersion>,
    pub tls_max: Option<TlsVersion>,
    pub user_agent: String,
    pub vars: BTreeMap<String, String>,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            verify_tls: true,
            request_timeout: Duration::from_secs(10),
            run_timeout: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            cacert: None,
            tls_min: None,
            tls_max: None,
            user_agent: DEFAULT_USER_AGENT.to_owned(),
            vars: BTreeMap::new(),
        }
    }
}

pub(super) fn build_client(options: &ProbeOptions) -> AppResult<Client> {
    let mut builder = Client::builder()
        .timeout(options.request_timeout)
        .user_agent(options.user_agent.as_str())
        .redirect(Policy::none());

    builder = apply_tls_settings(builder, options)?;

    builder
        .build()
        .map_err(|err| AppError::http(HttpError::BuildClientFailed { source: err }))
}

fn apply_tls_settings(
    mut builder: ClientBuilder,
    options: &ProbeOptions,
) -> AppResult<ClientBuilder> {
    if let (Some(min), Some(max)) = (options.tls_min, options.tls_max)
        && tls_version_rank(min) > tls_version_rank(max)
    {
        return Err(AppError::http(HttpError::TlsMinGreaterThanMax));
    }

    if let Some(min) = options.tls_min {
        builder = builder.min_tls_version(to_reqwest_tls_version(min));
    }
    if let Some(max) = options.tls_max {
        builder = builder.max_tls_version(to_reqwest_tls_version(max));
    }

    if let Some(path) = options.cacert.as_ref() {
        let bytes = std::fs::read(path).map_err(|err| {
            AppError::http(HttpError::ReadCacert {
                path: path.clone(),
                source: err,
            })
        })?;
        let cert = reqwest::Certificate::from_pem(&bytes).map_err(|err| {
            AppError::http(HttpError::InvalidCacert {
                path: path.clone(),
                source: err,
            })
        })?;
        builder = builder.add_root_certificate(cert);
    }

    if !options.verify_tls {
        debug!("TLS verification disabled");
        builder = builder
            .danger_accept_invalid_certs(true)
            .danger_accept_invalid_hostnames(true);
    }

    Ok(builder)
}

const fn to_reqwest_tls_version(version: TlsVersion) -> reqwest::tls::Version {
    match version {
        TlsVersion::V1_0 => reqwest::tls::Version::TLS_1_0,
        TlsVersion::V1_1 => reqwest::tls::Version::TLS_1_1,
        TlsVersion::V1_2 => reqwest::tls::Version::TLS_1_2,
        TlsVersion::V1_3 => reqwest::tls::Version::TLS_1_3,
    }
}

const fn tls_version_rank(version: TlsVersion) -> u8 {
    match version {
        TlsVersion::V1_0 => 0,
        TlsVersion::V1_1 => 1,
        TlsVersion::V1_2 => 2,
        TlsVersion::V1_3 => 3,
    }
}
