use crate::model::ApidiffConfigV1;
use anyhow::Context;
use apidiff_types::ids;
use globset::{Glob, GlobSet, GlobSetBuilder};

#[derive(Clone, Debug, Default)]
pub struct Overrides {
    /// `--exclusions`, relative to the working directory.
    pub exclusions: Option<String>,
    /// `--platform` flags; replace the config allow-list when non-empty.
    pub platforms: Vec<String>,
    /// `--module` flags; replace the config allow-list when non-empty.
    pub modules: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct ResolvedConfig {
    pub exclusions_path: String,
    /// False when the path came from the command line and is relative to the working directory.
    pub exclusions_relative_to_config: bool,
    pub platform_filter: NameFilter,
    pub module_filter: NameFilter,
}

/// Glob allow-list over platform or module names. An empty list admits every name.
#[derive(Clone, Debug)]
pub struct NameFilter {
    patterns: Vec<String>,
    set: Option<GlobSet>,
}

impl NameFilter {
    pub fn all() -> Self {
        Self {
            patterns: Vec::new(),
            set: None,
        }
    }

    pub fn new(what: &str, patterns: &[String]) -> anyhow::Result<Self> {
        if patterns.is_empty() {
            return Ok(Self::all());
        }

        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .with_context(|| format!("invalid {what} glob: {pattern}"))?;
            builder.add(glob);
        }
        let set = builder
            .build()
            .with_context(|| format!("failed to build {what} filter"))?;

        Ok(Self {
            patterns: patterns.to_vec(),
            set: Some(set),
        })
    }

    pub fn is_match(&self, name: &str) -> bool {
        match &self.set {
            None => true,
            Some(set) => set.is_match(name),
        }
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }
}

impl Default for NameFilter {
    fn default() -> Self {
        Self::all()
    }
}

pub fn resolve_config(
    cfg: ApidiffConfigV1,
    overrides: Overrides,
) -> anyhow::Result<ResolvedConfig> {
    if let Some(schema) = cfg.schema.as_deref() {
        if schema != ids::SCHEMA_CONFIG_V1 {
            anyhow::bail!(
                "unsupported config schema: {schema} (expected {})",
                ids::SCHEMA_CONFIG_V1
            );
        }
    }

    let (exclusions_path, exclusions_relative_to_config) = match overrides.exclusions {
        Some(path) => (path, false),
        None => (
            cfg.exclusions
                .unwrap_or_else(|| ids::DEFAULT_EXCLUSIONS_FILE.to_string()),
            true,
        ),
    };

    let platforms = if overrides.platforms.is_empty() {
        cfg.platforms
    } else {
        overrides.platforms
    };
    let modules = if overrides.modules.is_empty() {
        cfg.modules
    } else {
        overrides.modules
    };

    Ok(ResolvedConfig {
        exclusions_path,
        exclusions_relative_to_config,
        platform_filter: NameFilter::new("platform", &platforms)?,
        module_filter: NameFilter::new("module", &modules)?,
    })
}
