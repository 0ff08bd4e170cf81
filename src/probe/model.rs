use clap::ValueEnum;
use serde::ser::SerializeSeq;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Whether cookies accompany a request and whether cookies it receives are kept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialMode {
    Omit,
    #[default]
    #[serde(alias = "sameOrigin", alias = "same_origin")]
    SameOrigin,
    Include,
}

impl CredentialMode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            CredentialMode::Omit => "omit",
            CredentialMode::SameOrigin => "same-origin",
            CredentialMode::Include => "include",
        }
    }
}

/// One HTTP request to issue.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestSpec {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub method: String,
    pub path: String,
    #[serde(serialize_with = "serialize_headers")]
    pub headers: Vec<(String, String)>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body: Option<Value>,
    pub credentials: CredentialMode,
}

impl RequestSpec {
    #[must_use]
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            name: None,
            method: method.to_owned(),
            path: path.to_owned(),
            headers: Vec::new(),
            body: None,
            credentials: CredentialMode::default(),
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_owned());
        self
    }

    #[must_use]
    pub fn with_header(mut self, key: &str, value: &str) -> Self {
        self.headers.push((key.to_owned(), value.to_owned()));
        self
    }

    #[must_use]
    pub fn with_json(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    #[must_use]
    pub const fn with_credentials(mut self, credentials: CredentialMode) -> Self {
        self.credentials = credentials;
        self
    }

    /// Display label: the explicit name or `request N` (1-based).
    #[must_use]
    pub fn label(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("request {}", index.saturating_add(1)))
    }

    pub(crate) fn has_header(&self, name: &str) -> bool {
        self.headers
            .iter()
            .any(|(key, _)| key.eq_ignore_ascii_case(name))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transport,
    Timeout,
    Parse,
    InvalidSpec,
}

impl FailureKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            FailureKind::Transport => "transport",
            FailureKind::Timeout => "timeout",
            FailureKind::Parse => "parse",
            FailureKind::InvalidSpec => "invalid_spec",
        }
    }
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a single request did not produce a clean result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProbeFailure {
    pub kind: FailureKind,
    pub message: String,
}

impl ProbeFailure {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub(crate) fn from_reqwest(err: &reqwest::Error) -> Self {
        let kind = if err.is_timeout() {
            FailureKind::Timeout
        } else {
            FailureKind::Transport
        };
        Self::new(kind, describe_error(err))
    }
}

/// Renders an error with its source chain, `reqwest` hides the useful part there.
pub(crate) fn describe_error(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}

#[derive(Debug, Clone, PartialEq, Serialize, Default)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum ProbeBody {
    #[default]
    Empty,
    Json(Value),
    Text(String),
}

impl ProbeBody {
    #[must_use]
    pub const fn json(&self) -> Option<&Value> {
        match self {
            ProbeBody::Json(value) => Some(value),
            ProbeBody::Empty | ProbeBody::Text(_) => None,
        }
    }

    #[must_use]
    pub fn text(&self) -> Option<&str> {
        match self {
            ProbeBody::Text(value) => Some(value),
            ProbeBody::Empty | ProbeBody::Json(_) => None,
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, ProbeBody::Empty)
    }
}

/// Captured outcome of one request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeResult {
    pub request: RequestSpec,
    pub url: Option<String>,
    pub status: Option<u16>,
    #[serde(serialize_with = "serialize_headers")]
    pub headers: Vec<(String, String)>,
    pub body: ProbeBody,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub truncated: bool,
    pub error: Option<ProbeFailure>,
    pub started_at: Option<String>,
    pub elapsed_ms: Option<u64>,
}

impl ProbeResult {
    /// Result for a request that never reached the network.
    pub(crate) const fn undispatched(
        request: RequestSpec,
        url: Option<String>,
        failure: ProbeFailure,
    ) -> Self {
        Self {
            request,
            url,
            status: None,
            headers: Vec::new(),
            body: ProbeBody::Empty,
            truncated: false,
            error: Some(failure),
            started_at: None,
            elapsed_ms: None,
        }
    }

    /// First response header with this name, compared case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    #[must_use]
    pub const fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    #[must_use]
    pub fn error_kind(&self) -> Option<FailureKind> {
        self.error.as_ref().map(|failure| failure.kind)
    }
}

/// Ordered results of one run, one per submitted request.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProbeRun {
    pub base_url: String,
    pub results: Vec<ProbeResult>,
}

impl ProbeRun {
    #[must_use]
    pub const fn len(&self) -> usize {
        self.results.len()
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&ProbeResult> {
        self.results.get(index)
    }

    #[must_use]
    pub fn iter(&self) -> std::slice::Iter<'_, ProbeResult> {
        self.results.iter()
    }

    /// Number of results carrying a failure.
    #[must_use]
    pub fn failures(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.error.is_some())
            .count()
    }

    #[must_use]
    pub fn into_results(self) -> Vec<ProbeResult> {
        self.results
    }
}

impl<'run> IntoIterator for &'run ProbeRun {
    type Item = &'run ProbeResult;
    type IntoIter = std::slice::Iter<'run, ProbeResult>;

    fn into_iter(self) -> Self::IntoIter {
        self.results.iter()
    }
}

#[derive(Serialize)]
struct HeaderEntry<'entry> {
    name: &'entry str,
    value: &'entry str,
}

fn serialize_headers<S>(headers: &[(String, String)], serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let mut seq = serializer.serialize_seq(Some(headers.len()))?;
    for (name, value) in headers {
        seq.serialize_element(&HeaderEntry { name, value })?;
    }
    seq.end()
}
