use chrono::{SecondsFormat, Utc};
use reqwest::header::{CONTENT_TYPE, COOKIE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Request, Url};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::error::AppResult;

use super::body::{parse_body, read_body};
use super::client::{ProbeOptions, build_client};
use super::cookies::CookieSession;
use super::model::{
    FailureKind, ProbeBody, ProbeFailure, ProbeResult, ProbeRun, RequestSpec, describe_error,
};
use super::target::{parse_base_url, resolve_target};
use super::template::{render_json, render_template};

const NOT_DISPATCHED: &str = "run deadline elapsed before dispatch";
const DEADLINE_IN_FLIGHT: &str = "run deadline elapsed while waiting for the response";

/// Issues requests one after another against a base URL.
///
/// The HTTP client is built once; cookies live only for the duration of a
/// single [`ProbeRunner::run`] call.
#[derive(Debug, Clone)]
pub struct ProbeRunner {
    client: Client,
    options: ProbeOptions,
}

enum Flow {
    Continue,
    Stop,
}

#[derive(Default)]
struct Exchange {
    status: Option<u16>,
    headers: Vec<(String, String)>,
    body: ProbeBody,
    truncated: bool,
    error: Option<ProbeFailure>,
}

impl Exchange {
    fn failed(failure: ProbeFailure) -> Self {
        Self {
            error: Some(failure),
            ..Self::default()
        }
    }
}

impl ProbeRunner {
    /// Builds the runner and its HTTP client.
    ///
    /// # Errors
    ///
    /// Returns an error when the TLS settings are inconsistent, the CA
    /// certificate cannot be loaded, or the client cannot be built.
    pub fn new(options: ProbeOptions) -> AppResult<Self> {
        let client = build_client(&options)?;
        Ok(Self { client, options })
    }

    #[must_use]
    pub const fn options(&self) -> &ProbeOptions {
        &self.options
    }

    /// Runs `specs` in order against `base_url`.
    ///
    /// Every spec yields exactly one [`ProbeResult`], in submission order.
    /// Per-request problems are recorded in the result and never abort the
    /// run. When the run timeout elapses, the in-flight request and every
    /// remaining one are recorded as timeouts.
    ///
    /// # Errors
    ///
    /// Returns an error only when `base_url` is not an absolute http(s) URL.
    pub async fn run(&self, base_url: &str, specs: &[RequestSpec]) -> AppResult<ProbeRun> {
        let base = parse_base_url(base_url)?;
        let session = CookieSession::new(&base);
        let deadline = self
            .options
            .run_timeout
            .and_then(|timeout| Instant::now().checked_add(timeout));

        info!(base_url = %base, requests = specs.len(), "Starting probe run");

        let mut results = Vec::with_capacity(specs.len());
        let mut stopped = false;
        for (index, spec) in specs.iter().enumerate() {
            if stopped {
                results.push(ProbeResult::undispatched(
                    spec.clone(),
                    None,
                    ProbeFailure::new(FailureKind::Timeout, NOT_DISPATCHED),
                ));
                continue;
            }
            let (result, flow) = self.probe(&base, &session, spec, deadline).await;
            log_result(&result, index);
            results.push(result);
            if matches!(flow, Flow::Stop) {
                warn!(
                    remaining = specs.len().saturating_sub(index.saturating_add(1)),
                    "Run deadline elapsed; skipping remaining requests"
                );
                stopped = true;
            }
        }

        Ok(ProbeRun {
            base_url: base.to_string(),
            results,
        })
    }

    async fn probe(
        &self,
        base: &Url,
        session: &CookieSession,
        spec: &RequestSpec,
        deadline: Option<Instant>,
    ) -> (ProbeResult, Flow) {
        let path = render_template(&spec.path, &self.options.vars);
        let url = match resolve_target(base, &path) {
            Ok(url) => url,
            Err(failure) => {
                return (
                    ProbeResult::undispatched(spec.clone(), None, failure),
                    Flow::Continue,
                );
            }
        };
        let request = match self.build_request(session, spec, &url) {
            Ok(request) => request,
            Err(failure) => {
                return (
                    ProbeResult::undispatched(spec.clone(), Some(url.to_string()), failure),
                    Flow::Continue,
                );
            }
        };
        if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
            return (
                ProbeResult::undispatched(
                    spec.clone(),
                    Some(url.to_string()),
                    ProbeFailure::new(FailureKind::Timeout, NOT_DISPATCHED),
                ),
                Flow::Stop,
            );
        }

        debug!(method = %request.method(), url = %url, "Dispatching request");
        let started_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        let started = std::time::Instant::now();
        let exchange = self.exchange(session, spec, &url, request);
        let (outcome, flow) = match deadline {
            Some(deadline) => match tokio::time::timeout_at(deadline, exchange).await {
                Ok(outcome) => (outcome, Flow::Continue),
                Err(_elapsed) => (
                    Exchange::failed(ProbeFailure::new(FailureKind::Timeout, DEADLINE_IN_FLIGHT)),
                    Flow::Stop,
                ),
            },
            None => (exchange.await, Flow::Continue),
        };
        let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        let result = ProbeResult {
            request: spec.clone(),
            url: Some(url.to_string()),
            status: outcome.status,
            headers: outcome.headers,
            body: outcome.body,
            truncated: outcome.truncated,
            error: outcome.error,
            started_at: Some(started_at),
            elapsed_ms: Some(elapsed_ms),
        };
        (result, flow)
    }

    fn build_request(
        &self,
        session: &CookieSession,
        spec: &RequestSpec,
        url: &Url,
    ) -> Result<Request, ProbeFailure> {
        let invalid = |message: String| ProbeFailure::new(FailureKind::InvalidSpec, message);
        let vars = &self.options.vars;

        let method = Method::from_bytes(spec.method.trim().to_ascii_uppercase().as_bytes())
            .map_err(|err| invalid(format!("invalid method '{}': {}", spec.method, err)))?;

        let mut headers = HeaderMap::with_capacity(spec.headers.len().saturating_add(2));
        for (key, value) in &spec.headers {
            let name = HeaderName::from_bytes(key.trim().as_bytes())
                .map_err(|err| invalid(format!("invalid header name '{}': {}", key, err)))?;
            let rendered = render_template(value, vars);
            let header_value = HeaderValue::from_str(&rendered)
                .map_err(|err| invalid(format!("invalid value for header '{}': {}", key, err)))?;
            headers.append(name, header_value);
        }

        let body = match spec.body.as_ref() {
            Some(body) => {
                let rendered = render_json(body, vars);
                let bytes = serde_json::to_vec(&rendered)
                    .map_err(|err| invalid(format!("body is not serializable: {}", err)))?;
                if !headers.contains_key(CONTENT_TYPE) {
                    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
                }
                Some(bytes)
            }
            None => None,
        };

        if !headers.contains_key(COOKIE)
            && let Some(cookie) = session.cookie_header(spec.credentials, url)
        {
            headers.insert(COOKIE, cookie);
        }

        let mut builder = self.client.request(method, url.clone()).headers(headers);
        if let Some(bytes) = body {
            builder = builder.body(bytes);
        }
        builder.build().map_err(|err| invalid(describe_error(&err)))
    }

    async fn exchange(
        &self,
        session: &CookieSession,
        spec: &RequestSpec,
        url: &Url,
        request: Request,
    ) -> Exchange {
        let response = match self.client.execute(request).await {
            Ok(response) => response,
            Err(err) => return Exchange::failed(ProbeFailure::from_reqwest(&err)),
        };
        let status = response.status().as_u16();
        let headers = collect_headers(response.headers());
        if session.store(spec.credentials, url, response.headers()) {
            debug!(url = %url, "Stored cookies from response");
        }

        let (body, read_error) = read_body(response, self.options.max_body_bytes).await;
        let (parsed, parse_failure) = parse_body(&body);
        let error = match read_error {
            Some(err) => Some(ProbeFailure::from_reqwest(&err)),
            None => parse_failure,
        };
        Exchange {
            status: Some(status),
            headers,
            body: parsed,
            truncated: body.truncated,
            error,
        }
    }
}

/// Runs `specs` with a runner built from `options`.
///
/// # Errors
///
/// Returns an error when the client cannot be built or `base_url` is invalid.
pub async fn run(
    base_url: &str,
    specs: &[RequestSpec],
    options: ProbeOptions,
) -> AppResult<ProbeRun> {
    ProbeRunner::new(options)?.run(base_url, specs).await
}

/// Names in first-occurrence order; repeated names are grouped, values in wire order.
fn collect_headers(headers: &HeaderMap) -> Vec<(String, String)> {
    headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_owned(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

fn log_result(result: &ProbeResult, index: usize) {
    let label = result.request.label(index);
    match result.error.as_ref() {
        None => info!(
            request = %label,
            status = result.status.unwrap_or_default(),
            elapsed_ms = result.elapsed_ms.unwrap_or_default(),
            "Request completed"
        ),
        Some(failure) => warn!(
            request = %label,
            status = ?result.status,
            kind = %failure.kind,
            "Request failed: {}",
            failure.message
        ),
    }
}
