use std::fmt::Write as _;

use crate::args::OutputFormat;
use crate::error::{AppError, AppResult, SinkError};
use crate::probe::{ProbeBody, ProbeResult, ProbeRun};

const INDENT: &str = "    ";

/// Renders a run in the requested format. The output always ends with a newline.
///
/// # Errors
///
/// Returns an error when the run cannot be serialized.
pub fn render_report(run: &ProbeRun, format: OutputFormat) -> AppResult<String> {
    match format {
        OutputFormat::Text => render_text(run),
        OutputFormat::Json => {
            let mut output = serde_json::to_string_pretty(run)
                .map_err(|err| AppError::sink(SinkError::Serialize { source: err }))?;
            output.push('\n');
            Ok(output)
        }
        OutputFormat::Jsonl => {
            let mut output = String::new();
            for result in run {
                let line = serde_json::to_string(result)
                    .map_err(|err| AppError::sink(SinkError::Serialize { source: err }))?;
                write_line(&mut output, &line)?;
            }
            Ok(output)
        }
    }
}

fn write_line(output: &mut String, line: &str) -> AppResult<()> {
    writeln!(output, "{}", line).map_err(|err| AppError::sink(SinkError::WriteLine { source: err }))
}

fn render_text(run: &ProbeRun) -> AppResult<String> {
    let mut output = String::new();
    write_line(&mut output, &format!("Base URL: {}", run.base_url))?;
    for (index, result) in run.iter().enumerate() {
        write_line(&mut output, "")?;
        write_result(&mut output, index, result)?;
    }
    write_line(&mut output, "")?;
    write_line(
        &mut output,
        &format!(
            "Summary: {} requests, {} failed",
            run.len(),
            run.failures()
        ),
    )?;
    Ok(output)
}

fn write_result(output: &mut String, index: usize, result: &ProbeResult) -> AppResult<()> {
    let request = &result.request;
    let target = result.url.as_deref().unwrap_or(request.path.as_str());
    let status = result
        .status
        .map_or_else(|| "no response".to_owned(), |status| status.to_string());
    let timing = result
        .elapsed_ms
        .map(|elapsed| format!(" ({} ms)", elapsed))
        .unwrap_or_default();
    write_line(
        output,
        &format!(
            "[{}] {} {} {} -> {}{}",
            index.saturating_add(1),
            request.label(index),
            request.method.to_ascii_uppercase(),
            target,
            status,
            timing
        ),
    )?;
    write_line(
        output,
        &format!("{}credentials: {}", INDENT, request.credentials.as_str()),
    )?;

    if !result.headers.is_empty() {
        write_line(output, &format!("{}headers:", INDENT))?;
        for (name, value) in &result.headers {
            write_line(output, &format!("{}{}{}: {}", INDENT, INDENT, name, value))?;
        }
    }

    match &result.body {
        ProbeBody::Empty => {}
        ProbeBody::Json(value) => {
            let pretty = serde_json::to_string_pretty(value)
                .map_err(|err| AppError::sink(SinkError::Serialize { source: err }))?;
            write_body(output, &pretty, result.truncated)?;
        }
        ProbeBody::Text(text) => write_body(output, text, result.truncated)?,
    }

    if let Some(failure) = result.error.as_ref() {
        write_line(
            output,
            &format!("{}error ({}): {}", INDENT, failure.kind, failure.message),
        )?;
    }
    Ok(())
}

fn write_body(output: &mut String, body: &str, truncated: bool) -> AppResult<()> {
    let suffix = if truncated { " (truncated)" } else { "" };
    write_line(output, &format!("{}body{}:", INDENT, suffix))?;
    for line in body.lines() {
        write_line(output, &format!("{}{}{}", INDENT, INDENT, line))?;
    }
    Ok(())
}
