//! Probe file loading and application.
mod apply;
mod loader;
pub mod types;


pub use apply::{apply_config, file_requests};
pub use loader::load_config;

pub(crate) use loader::load_config_file;
