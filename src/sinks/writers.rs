use std::path::PathBuf;

use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{AppError, AppResult, SinkError};

/// Writes a rendered report to `path`, or to stdout when no path is given.
///
/// # Errors
///
/// Returns an error when the destination cannot be written.
pub async fn write_report(report: &str, path: Option<&str>) -> AppResult<()> {
    if let Some(path) = path {
        tokio::fs::write(path, report).await.map_err(|err| {
            AppError::sink(SinkError::WriteFile {
                path: PathBuf::from(path),
                source: err,
            })
        })?;
        info!(path, "Report written");
        return Ok(());
    }

    let mut stdout = tokio::io::stdout();
    stdout
        .write_all(report.as_bytes())
        .await
        .map_err(|err| AppError::sink(SinkError::WriteStdout { source: err }))?;
    stdout
        .flush()
        .await
        .map_err(|err| AppError::sink(SinkError::WriteStdout { source: err }))
}
