//! CLI argument types and parsing helpers.
mod cli;
mod defaults;
pub(crate) mod parsers;
mod types;

#[cfg(test)]
mod test_support;

pub use cli::ProbeArgs;
pub use types::{CliRequest, OutputFormat, PositiveUsize, TlsVersion};

pub(crate) use defaults::{DEFAULT_CONFIG_FILES, DEFAULT_MAX_BODY_BYTES, DEFAULT_USER_AGENT};
pub(crate) use parsers::parse_header;
