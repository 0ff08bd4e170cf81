use reqwest::Url;

use crate::error::{AppError, AppResult, HttpError};

use super::model::{FailureKind, ProbeFailure};

/// Parses the run-level base URL; only absolute http(s) URLs are accepted.
pub(crate) fn parse_base_url(raw: &str) -> AppResult<Url> {
    let url = Url::parse(raw.trim()).map_err(|err| {
        AppError::http(HttpError::InvalidBaseUrl {
            url: raw.to_owned(),
            source: err,
        })
    })?;
    if !is_http(&url) {
        return Err(AppError::http(HttpError::UnsupportedBaseScheme {
            url: raw.to_owned(),
        }));
    }
    Ok(url)
}

/// Appends `path` to the base URL, or takes it as-is when it is an absolute URL.
pub(super) fn resolve_target(base: &Url, path: &str) -> Result<Url, ProbeFailure> {
    let path = path.trim();
    match Url::parse(path) {
        Ok(url) if is_http(&url) => return Ok(url),
        Ok(url) => {
            return Err(ProbeFailure::new(
                FailureKind::InvalidSpec,
                format!("unsupported URL scheme '{}' in '{}'", url.scheme(), path),
            ));
        }
        Err(url::ParseError::RelativeUrlWithoutBase) => {}
        Err(err) => {
            return Err(ProbeFailure::new(
                FailureKind::InvalidSpec,
                format!("invalid URL '{}': {}", path, err),
            ));
        }
    }

    let mut prefix = base.clone();
    prefix.set_query(None);
    prefix.set_fragment(None);
    let mut joined = prefix.as_str().trim_end_matches('/').to_owned();
    if !path.is_empty() && !path.starts_with('/') && !path.starts_with('?') {
        joined.push('/');
    }
    joined.push_str(path);
    Url::parse(&joined).map_err(|err| {
        ProbeFailure::new(
            FailureKind::InvalidSpec,
            format!("cannot append path '{}' to base URL: {}", path, err),
        )
    })
}

fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
