//! Stable DTOs and IDs used across the apidiff workspace.
//!
//! This crate is intentionally boring:
//! - element kinds and annotated diff entries
//! - the emitted report envelope
//! - stable schema identifiers

#![forbid(unsafe_code)]

pub mod diff;
pub mod ids;
pub mod receipt;

pub use diff::{AnnotatedDiff, ChangeKind, DiffEntry, ElementKind, UnknownKind};
pub use receipt::{
    ApidiffData, ApidiffReport, ModuleReport, PackageRef, SCHEMA_REPORT_V1, ToolMeta, Verdict,
};
