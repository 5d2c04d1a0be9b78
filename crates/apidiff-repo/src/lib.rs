//! Package snapshot adapters: read package metadata, discover platforms and modules, and parse
//! module descriptions produced by a module reader.
//!
//! This crate is allowed to do filesystem IO. Acquiring and extracting packages happens before
//! it runs; it only sees extracted snapshot directories.

#![forbid(unsafe_code)]

mod discover;
mod parse;

use anyhow::Context;
use apidiff_domain::model::ModuleModel;
use camino::Utf8Path;
use rayon::prelude::*;
use tracing::debug;

pub use discover::{discover_modules, discover_platforms, module_path};
pub use parse::{PackageMeta, parse_module_json, parse_package_meta};

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as a module description.
    ///
    /// Returns `Ok(...)` when the text is a valid description, `Err(...)` otherwise.
    /// **Never panics** on any input.
    pub fn parse_module(text: &str) -> anyhow::Result<()> {
        let _ = parse::parse_module_json("Fuzz.dll", text)?;
        Ok(())
    }

    /// Parse arbitrary text as `package.json`. **Never panics** on any input.
    pub fn parse_package(text: &str) -> anyhow::Result<()> {
        let _ = parse::parse_package_meta(text)?;
        Ok(())
    }
}

/// Read `<root>/package.json`.
pub fn load_package_meta(root: &Utf8Path) -> anyhow::Result<PackageMeta> {
    let path = root.join(apidiff_types::ids::PACKAGE_META_FILE);
    let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
    parse::parse_package_meta(&text).with_context(|| format!("parse {path}"))
}

/// Platforms present in both snapshots, and baseline platforms the candidate lacks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PlatformPairing {
    pub matched: Vec<String>,
    pub unmatched: Vec<String>,
}

/// Inner-join platform names, keeping baseline order. Candidate-only platforms are additions and
/// are not reported.
pub fn pair_platforms(baseline: &[String], candidate: &[String]) -> PlatformPairing {
    let mut pairing = PlatformPairing::default();
    for platform in baseline {
        if candidate.contains(platform) {
            pairing.matched.push(platform.clone());
        } else {
            pairing.unmatched.push(platform.clone());
        }
    }
    pairing
}

/// Parse the named modules of one platform directory in parallel. Results keep `names` order.
pub fn load_modules(
    platform_dir: &Utf8Path,
    names: &[String],
) -> anyhow::Result<Vec<ModuleModel>> {
    debug!(dir = %platform_dir, count = names.len(), "loading module descriptions");
    names
        .par_iter()
        .map(|name| {
            let path = discover::module_path(platform_dir, name);
            let text = std::fs::read_to_string(&path).with_context(|| format!("read {path}"))?;
            parse::parse_module_json(name, &text).with_context(|| format!("load {path}"))
        })
        .collect()
}

/// Read a file that may legitimately be absent.
pub fn read_optional_text(path: &Utf8Path) -> anyhow::Result<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err).with_context(|| format!("read {path}")),
    }
}
