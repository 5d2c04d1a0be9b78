use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `apidiff.toml` schema v1.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ApidiffConfigV1 {
    /// Optional schema string for tooling (`apidiff.config.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Path to the exclusion specification, relative to the config file's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exclusions: Option<String>,

    /// Glob allow-list of platform directory names. Empty compares every platform.
    #[serde(default)]
    pub platforms: Vec<String>,

    /// Glob allow-list of module names (e.g. `Acme.*.dll`). Empty compares every module.
    #[serde(default)]
    pub modules: Vec<String>,
}

/// Exclusion specification schema v1 (`apidiff.exclusions.toml`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExclusionSpecV1 {
    /// Optional schema string for tooling (`apidiff.exclusions.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Canonical signature format the entries were authored against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signature_format: Option<u32>,

    #[serde(default)]
    pub exclusions: Vec<ExclusionRecord>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct ExclusionRecord {
    /// `type`, `method`, `field`, `property` or `event`.
    pub kind: String,

    /// Canonical signature, e.g. `Acme.Widget::Close(int32)`.
    pub signature: String,

    /// Baseline versions the entry applies to: `*`, `=1.2.0`, `<=1.3.0`, `>=1.0, <2.0`.
    /// Absent means every version.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}
