//! Tool config and exclusion specification parsing.
//!
//! This crate is IO-free: it parses and resolves configuration provided as strings. Reading the
//! files is the caller's job.

#![forbid(unsafe_code)]

mod exclusions;
mod model;
mod resolve;

pub use exclusions::{load_exclusions, parse_exclusions_toml, resolve_entries};
pub use model::{ApidiffConfigV1, ExclusionRecord, ExclusionSpecV1};
pub use resolve::{NameFilter, Overrides, ResolvedConfig};

/// Parse `apidiff.toml` (or equivalent) into a typed model.
pub fn parse_config_toml(input: &str) -> anyhow::Result<ApidiffConfigV1> {
    let cfg: ApidiffConfigV1 = toml::from_str(input)?;
    Ok(cfg)
}

/// Resolve the effective config used by a diff run (file values + CLI overrides).
pub fn resolve_config(
    cfg: ApidiffConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    resolve::resolve_config(cfg, overrides)
}
