//! Core library for the `reqprobe` CLI.
//!
//! `reqprobe` issues an ordered list of HTTP requests against a base URL and
//! records, for every request, the status, headers and parsed body it got
//! back. Cookies set by one response are replayed on later requests according
//! to each request's credential mode, which makes it suitable for walking
//! through login flows. The crate provides the building blocks used by the
//! binary: CLI argument types, probe file parsing, the sequential runner and
//! report sinks.
pub mod args;
pub mod config;
pub mod entry;
pub mod error;
pub mod probe;
pub mod sinks;

mod logger;

#[cfg(feature = "fuzzing")]
pub mod fuzzing;
