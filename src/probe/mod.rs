//! Sequential request probing: data model, runner, and transport setup.
mod body;
mod client;
mod cookies;
mod model;
mod runner;
mod target;
mod template;

#[cfg(test)]
mod test_support;

pub use client::ProbeOptions;
pub use model::{
    CredentialMode, FailureKind, ProbeBody, ProbeFailure, ProbeResult, ProbeRun, RequestSpec,
};
pub use runner::{ProbeRunner, run};

pub(crate) use template::render_template;
