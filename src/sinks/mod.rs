//! Report rendering for completed probe runs.
mod format;
mod writers;

#[cfg(test)]
mod tests;

pub use format::render_report;
pub use writers::write_report;
