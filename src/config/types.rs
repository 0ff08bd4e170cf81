use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::args::parsers::parse_duration_arg;
use crate::args::{OutputFormat, TlsVersion};
use crate::probe::CredentialMode;

#[derive(Debug, Default, Deserialize)]
pub struct ProbeFile {
    pub base_url: Option<String>,
    pub insecure: Option<bool>,
    pub cacert: Option<String>,
    pub tls_min: Option<TlsVersion>,
    pub tls_max: Option<TlsVersion>,
    pub timeout: Option<DurationValue>,
    pub run_timeout: Option<DurationValue>,
    pub max_body: Option<usize>,
    pub format: Option<OutputFormat>,
    pub output: Option<String>,
    pub fail_on_error: Option<bool>,
    pub headers: Option<Vec<String>>,
    pub vars: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub requests: Vec<RequestConfig>,
}

#[derive(Debug, Default, Deserialize, Clone)]
pub struct RequestConfig {
    pub name: Option<String>,
    pub method: Option<String>,
    #[serde(alias = "url")]
    pub path: Option<String>,
    pub headers: Option<Vec<String>>,
    pub body: Option<serde_json::Value>,
    pub credentials: Option<CredentialMode>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, String> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err("Duration must be > 0.".to_owned())
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => parse_duration_arg(text).map_err(|err| err.to_string()),
        }
    }
}
