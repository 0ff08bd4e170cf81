use super::*;
use crate::args::OutputFormat;
use crate::probe::{
    CredentialMode, FailureKind, ProbeBody, ProbeFailure, ProbeResult, ProbeRun, RequestSpec,
};
use serde_json::json;
use tempfile::tempdir;

fn sample_run() -> ProbeRun {
    let login = ProbeResult {
        request: RequestSpec::new("post", "/login")
            .with_name("login")
            .with_json(json!({"email": "a@b.com", "password": ""})),
        url: Some("https://localhost:8082/login".to_owned()),
        status: Some(200),
        headers: vec![
            ("content-type".to_owned(), "application/json".to_owned()),
            ("set-cookie".to_owned(), "dt-auth=abc; Path=/".to_owned()),
        ],
        body: ProbeBody::Json(json!({"jwt": "x"})),
        truncated: false,
        error: None,
        started_at: Some("2026-10-19T10:00:00.000Z".to_owned()),
        elapsed_ms: Some(12),
    };
    let user = ProbeResult {
        request: RequestSpec::new("POST", "/auth/getUser")
            .with_credentials(CredentialMode::Include),
        url: Some("https://localhost:8082/auth/getUser".to_owned()),
        status: None,
        headers: Vec::new(),
        body: ProbeBody::Empty,
        truncated: false,
        error: Some(ProbeFailure {
            kind: FailureKind::Transport,
            message: "connection refused".to_owned(),
        }),
        started_at: Some("2026-10-19T10:00:00.020Z".to_owned()),
        elapsed_ms: Some(1),
    };
    ProbeRun {
        base_url: "https://localhost:8082/".to_owned(),
        results: vec![login, user],
    }
}

#[test]
fn text_report_lists_every_result_in_order() -> Result<(), String> {
    let report = render_report(&sample_run(), OutputFormat::Text).map_err(|err| err.to_string())?;
    let expected_fragments = [
        "Base URL: https://localhost:8082/",
        "[1] login POST https://localhost:8082/login -> 200 (12 ms)",
        "        set-cookie: dt-auth=abc; Path=/",
        "          \"jwt\": \"x\"",
        "[2] request 2 POST https://localhost:8082/auth/getUser -> no response (1 ms)",
        "    credentials: include",
        "    error (transport): connection refused",
        "Summary: 2 requests, 1 failed",
    ];
    for fragment in expected_fragments {
        if !report.contains(fragment) {
            return Err(format!("Missing '{}' in report:\n{}", fragment, report));
        }
    }
    let first = report.find("[1]").ok_or("Missing first entry")?;
    let second = report.find("[2]").ok_or("Missing second entry")?;
    if first > second {
        return Err("Results out of order".to_owned());
    }
    Ok(())
}

#[test]
fn json_report_keeps_structure() -> Result<(), String> {
    let report = render_report(&sample_run(), OutputFormat::Json).map_err(|err| err.to_string())?;
    let value: serde_json::Value =
        serde_json::from_str(&report).map_err(|err| format!("invalid JSON: {}", err))?;
    let results = value
        .get("results")
        .and_then(serde_json::Value::as_array)
        .ok_or("Missing results")?;
    if results.len() != 2 {
        return Err(format!("Expected 2 results, got {}", results.len()));
    }
    let login = results.first().ok_or("Missing login")?;
    let checks = [
        (login.pointer("/body/kind") == Some(&json!("json")), "body kind"),
        (login.pointer("/body/value/jwt") == Some(&json!("x")), "body value"),
        (
            login.pointer("/headers/1/name") == Some(&json!("set-cookie")),
            "header name",
        ),
        (
            login.pointer("/request/credentials") == Some(&json!("same-origin")),
            "credentials",
        ),
        (login.pointer("/error") == Some(&json!(null)), "error"),
    ];
    for (ok, field) in checks {
        if !ok {
            return Err(format!("Unexpected {} in {}", field, login));
        }
    }
    let user = results.get(1).ok_or("Missing user")?;
    if user.pointer("/error/kind") != Some(&json!("transport")) {
        return Err(format!("Unexpected error in {}", user));
    }
    Ok(())
}

#[test]
fn jsonl_report_has_one_line_per_result() -> Result<(), String> {
    let report = render_report(&sample_run(), OutputFormat::Jsonl).map_err(|err| err.to_string())?;
    let lines: Vec<&str> = report.lines().collect();
    if lines.len() != 2 {
        return Err(format!("Expected 2 lines, got {}", lines.len()));
    }
    for line in lines {
        serde_json::from_str::<serde_json::Value>(line)
            .map_err(|err| format!("invalid JSON line: {}", err))?;
    }
    Ok(())
}

#[test]
fn write_report_to_file() -> Result<(), String> {
    let dir = tempdir().map_err(|err| format!("tempdir failed: {}", err))?;
    let path = dir.path().join("report.json");
    let path_str = path.to_string_lossy().into_owned();
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| format!("Failed to build runtime: {}", err))?;
    runtime
        .block_on(write_report("{}\n", Some(&path_str)))
        .map_err(|err| err.to_string())?;
    let written = std::fs::read_to_string(&path).map_err(|err| format!("read failed: {}", err))?;
    if written != "{}\n" {
        return Err(format!("Unexpected content: {}", written));
    }
    Ok(())
}
