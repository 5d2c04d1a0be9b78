use anyhow::Context;
use apidiff_render::{
    RenderableEntry, RenderableKind, RenderableModule, RenderablePackage, RenderableReport,
    RenderableVerdict,
};
use apidiff_types::{
    ApidiffData, ApidiffReport, ChangeKind, ElementKind, PackageRef, SCHEMA_REPORT_V1, ToolMeta,
    Verdict, ids,
};
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<ApidiffReport> {
    let value: serde_json::Value = serde_json::from_str(text).context("parse report json")?;

    let schema = value
        .get("schema")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();
    if schema != SCHEMA_REPORT_V1 {
        anyhow::bail!("unknown report schema: {schema} (expected {SCHEMA_REPORT_V1})");
    }

    serde_json::from_value(value).context("parse apidiff v1 report")
}

pub fn serialize_report(report: &ApidiffReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

pub(crate) fn tool_meta() -> ToolMeta {
    ToolMeta {
        name: ids::TOOL_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }
}

/// Report written when the run could not complete. It always fails the gate.
pub fn runtime_error_report(message: &str) -> ApidiffReport {
    let now = OffsetDateTime::now_utc();
    ApidiffReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        baseline: None,
        candidate: None,
        modules: Vec::new(),
        data: ApidiffData {
            error: Some(message.to_string()),
            ..ApidiffData::default()
        },
    }
}

pub fn to_renderable(report: &ApidiffReport) -> RenderableReport {
    RenderableReport {
        verdict: match report.verdict {
            Verdict::Pass => RenderableVerdict::Pass,
            Verdict::Fail => RenderableVerdict::Fail,
        },
        baseline: report.baseline.as_ref().map(renderable_package),
        candidate: report.candidate.as_ref().map(renderable_package),
        modules: report
            .modules
            .iter()
            .map(|m| RenderableModule {
                platform: m.platform.clone(),
                module: m.module.clone(),
                candidate_missing: m.candidate_missing,
                entries: m
                    .diff
                    .entries()
                    .map(|e| RenderableEntry {
                        kind: renderable_kind(e.kind),
                        owner: e.owner.clone(),
                        signature: e.signature.clone(),
                        changed: e.change == ChangeKind::Changed,
                        ignored: e.ignored,
                    })
                    .collect(),
            })
            .collect(),
        unmatched_platforms: report.data.unmatched_platforms.clone(),
        error: report.data.error.clone(),
    }
}

fn renderable_package(p: &PackageRef) -> RenderablePackage {
    RenderablePackage {
        id: p.id.clone(),
        version: p.version.clone(),
    }
}

fn renderable_kind(kind: ElementKind) -> RenderableKind {
    match kind {
        ElementKind::Type => RenderableKind::Type,
        ElementKind::Method => RenderableKind::Method,
        ElementKind::Field => RenderableKind::Field,
        ElementKind::Property => RenderableKind::Property,
        ElementKind::Event => RenderableKind::Event,
    }
}
