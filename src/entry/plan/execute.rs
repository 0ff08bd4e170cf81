use tracing::warn;

use crate::error::{AppError, AppResult};
use crate::probe::ProbeRunner;
use crate::sinks::{render_report, write_report};

use super::types::ProbePlan;

pub(in crate::entry) async fn execute_plan(plan: ProbePlan) -> AppResult<()> {
    let runner = ProbeRunner::new(plan.options)?;
    let run = runner.run(&plan.base_url, &plan.specs).await?;

    let report = render_report(&run, plan.format)?;
    write_report(&report, plan.output.as_deref()).await?;

    let failed = run.failures();
    if failed == 0 {
        return Ok(());
    }
    warn!(failed, total = run.len(), "Probe finished with failures");
    if plan.fail_on_error {
        return Err(AppError::ProbeFailures {
            failed,
            total: run.len(),
        });
    }
    Ok(())
}
