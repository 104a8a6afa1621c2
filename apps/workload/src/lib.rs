//! # workload
//!
//! HTTP server, CLI and configuration loading around `workload-core`.

pub mod api;
pub mod cli;
pub mod settings;
