use crate::AnnotatedDiff;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for apidiff reports.
pub const SCHEMA_REPORT_V1: &str = "apidiff.report.v1";

/// Verdict is binary: it gates CI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl Verdict {
    /// Fold two verdicts: any failure wins.
    pub fn and(self, other: Verdict) -> Verdict {
        match (self, other) {
            (Verdict::Pass, Verdict::Pass) => Verdict::Pass,
            _ => Verdict::Fail,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Package identity as declared by a snapshot's `package.json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PackageRef {
    pub id: String,
    pub version: String,
}

/// Result of comparing one module of one platform.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ModuleReport {
    pub platform: String,
    pub module: String,
    /// True when the candidate package has no module of this name on this platform.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub candidate_missing: bool,
    pub verdict: Verdict,
    pub diff: AnnotatedDiff,
}

/// Run summary payload for the report.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Default)]
pub struct ApidiffData {
    pub platforms_compared: u32,
    pub modules_compared: u32,

    pub entries_total: u32,
    pub entries_active: u32,
    pub entries_ignored: u32,

    /// Exclusion entries that applied to the baseline version.
    pub exclusions_loaded: u32,

    /// Baseline platforms with no same-named platform in the candidate.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub unmatched_platforms: Vec<String>,

    /// Set only on runtime-error reports.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// The emitted report envelope.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ApidiffReport {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub baseline: Option<PackageRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate: Option<PackageRef>,
    #[serde(default)]
    pub modules: Vec<ModuleReport>,
    pub data: ApidiffData,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_fold_is_fail_dominant() {
        assert_eq!(Verdict::Pass.and(Verdict::Pass), Verdict::Pass);
        assert_eq!(Verdict::Pass.and(Verdict::Fail), Verdict::Fail);
        assert_eq!(Verdict::Fail.and(Verdict::Pass), Verdict::Fail);
    }

    #[test]
    fn report_round_trips_through_json() {
        let report = ApidiffReport {
            schema: SCHEMA_REPORT_V1.to_string(),
            tool: ToolMeta {
                name: "apidiff".to_string(),
                version: "0.1.0".to_string(),
            },
            started_at: time::macros::datetime!(2025-01-01 0:00 UTC),
            finished_at: time::macros::datetime!(2025-01-01 0:00:01 UTC),
            verdict: Verdict::Pass,
            baseline: Some(PackageRef {
                id: "Acme.Core".to_string(),
                version: "1.3.0".to_string(),
            }),
            candidate: None,
            modules: Vec::new(),
            data: ApidiffData::default(),
        };

        let text = serde_json::to_string(&report).expect("serialize");
        assert!(text.contains("\"started_at\":\"2025-01-01T00:00:00Z\""));
        assert!(!text.contains("candidate"));
        assert!(!text.contains("unmatched_platforms"));

        let back: ApidiffReport = serde_json::from_str(&text).expect("parse");
        assert_eq!(back, report);
    }
}
