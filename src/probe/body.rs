use futures_util::StreamExt;

use super::model::{FailureKind, ProbeBody, ProbeFailure};

pub(super) struct BodyBytes {
    pub(super) bytes: Vec<u8>,
    pub(super) truncated: bool,
}

/// Reads the response body, keeping at most `limit` bytes. Reading stops at
/// the cap. A read error is returned next to the bytes kept so far.
pub(super) async fn read_body(
    response: reqwest::Response,
    limit: usize,
) -> (BodyBytes, Option<reqwest::Error>) {
    let declared = response.content_length();
    let mut stream = response.bytes_stream();
    let mut bytes: Vec<u8> = Vec::new();
    let mut truncated = false;
    while bytes.len() < limit {
        let chunk = match stream.next().await {
            Some(Ok(chunk)) => chunk,
            Some(Err(err)) => return (BodyBytes { bytes, truncated }, Some(err)),
            None => break,
        };
        let room = limit.saturating_sub(bytes.len());
        if chunk.len() > room {
            truncated = true;
        }
        if let Some(kept) = chunk.get(..room.min(chunk.len())) {
            bytes.extend_from_slice(kept);
        }
    }
    if !truncated && bytes.len() >= limit {
        let limit_u64 = u64::try_from(limit).unwrap_or(u64::MAX);
        truncated = declared.is_none_or(|length| length > limit_u64);
    }
    (BodyBytes { bytes, truncated }, None)
}

/// Decodes a body as JSON, falling back to text plus a parse failure.
pub(super) fn parse_body(body: &BodyBytes) -> (ProbeBody, Option<ProbeFailure>) {
    if body.bytes.iter().all(u8::is_ascii_whitespace) {
        return (ProbeBody::Empty, None);
    }
    match serde_json::from_slice(&body.bytes) {
        Ok(value) => (ProbeBody::Json(value), None),
        Err(err) => {
            let text = String::from_utf8_lossy(&body.bytes).into_owned();
            let message = if body.truncated {
                format!(
                    "body is not valid JSON (truncated to {} bytes): {}",
                    body.bytes.len(),
                    err
                )
            } else {
                format!("body is not valid JSON: {}", err)
            };
            (
                ProbeBody::Text(text),
                Some(ProbeFailure::new(FailureKind::Parse, message)),
            )
        }
    }
}
