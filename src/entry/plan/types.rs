use crate::args::OutputFormat;
use crate::probe::{ProbeOptions, RequestSpec};

/// Everything a run needs once the CLI and the probe file are merged.
#[derive(Debug)]
pub(in crate::entry) struct ProbePlan {
    pub(in crate::entry) base_url: String,
    pub(in crate::entry) specs: Vec<RequestSpec>,
    pub(in crate::entry) options: ProbeOptions,
    pub(in crate::entry) format: OutputFormat,
    pub(in crate::entry) output: Option<String>,
    pub(in crate::entry) fail_on_error: bool,
}
