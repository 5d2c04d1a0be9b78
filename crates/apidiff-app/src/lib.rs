//! Use case orchestration for apidiff.
//!
//! This crate provides the application layer: use cases that coordinate the domain, repo,
//! settings, and render layers. The CLI crate depends on this; it only handles argument parsing,
//! file output, and exit codes.

#![forbid(unsafe_code)]

mod diff;
mod render;
mod report;

pub use diff::{DiffInput, DiffOutput, run_diff, verdict_exit_code};
pub use render::{render_annotations, render_markdown};
pub use report::{parse_report_json, runtime_error_report, serialize_report, to_renderable};
