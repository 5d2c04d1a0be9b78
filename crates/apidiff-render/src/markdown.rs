use crate::{RenderableKind, RenderableModule, RenderableReport, RenderableVerdict};

pub fn render_markdown(report: &RenderableReport) -> String {
    let mut out = String::new();

    if let (Some(base), Some(other)) = (&report.baseline, &report.candidate) {
        out.push_str(&format!(
            "Comparison report for {} **{}** with {} **{}**\n\n",
            base.id, base.version, other.id, other.version
        ));
    } else {
        out.push_str("Comparison report\n\n");
    }

    let verdict = match report.verdict {
        RenderableVerdict::Pass => "PASS",
        RenderableVerdict::Fail => "FAIL",
    };
    let (active, ignored) = count_entries(report);
    out.push_str(&format!(
        "- Verdict: **{verdict}**\n- Breaking changes: {active} active, {ignored} ignored\n\n"
    ));

    if let Some(error) = &report.error {
        out.push_str(&format!("> Error: {error}\n"));
        return out;
    }

    if !report.unmatched_platforms.is_empty() {
        out.push_str(&format!(
            "> Platforms missing from the candidate: {}\n\n",
            report.unmatched_platforms.join(", ")
        ));
    }

    let mut current_platform: Option<&str> = None;
    for module in &report.modules {
        if current_platform != Some(module.platform.as_str()) {
            out.push_str(&format!("# {} Platform\n", module.platform));
            current_platform = Some(module.platform.as_str());
        }
        render_module(&mut out, module);
    }

    out
}

fn count_entries(report: &RenderableReport) -> (usize, usize) {
    let entries = report.modules.iter().flat_map(|m| m.entries.iter());
    entries.fold((0, 0), |(active, ignored), e| {
        if e.ignored {
            (active, ignored + 1)
        } else {
            (active + 1, ignored)
        }
    })
}

fn render_module(out: &mut String, module: &RenderableModule) {
    out.push_str(&format!("## {}\n", module.module));
    if module.candidate_missing {
        out.push_str("> Module is absent from the candidate package.\n");
    }

    for kind in RenderableKind::SECTIONS {
        let entries: Vec<_> = module.entries.iter().filter(|e| e.kind == kind).collect();

        if kind == RenderableKind::Type {
            out.push_str(&format!("### {} missing types:\n", entries.len()));
            for e in entries {
                out.push_str(&format!("\t* {}\n", code(&e.signature, e.ignored, false)));
            }
            continue;
        }

        out.push_str(&format!(
            "### {} missing or changed {} in existing types:\n",
            entries.len(),
            plural(kind)
        ));

        // Entries arrive grouped by owner; a new heading starts whenever the owner changes.
        let mut current_owner: Option<&str> = None;
        for e in entries {
            if current_owner != Some(e.owner.as_str()) {
                out.push_str(&format!("- {}\n", code_span(&e.owner, 1)));
                current_owner = Some(e.owner.as_str());
            }
            out.push_str(&format!("\t* {}\n", code(&e.signature, e.ignored, e.changed)));
        }
    }
}

fn plural(kind: RenderableKind) -> &'static str {
    match kind {
        RenderableKind::Type => "types",
        RenderableKind::Method => "methods",
        RenderableKind::Event => "events",
        RenderableKind::Field => "fields",
        RenderableKind::Property => "properties",
    }
}

fn code(signature: &str, ignored: bool, changed: bool) -> String {
    let strike = if ignored { "~~" } else { "" };
    let suffix = if changed { " (changed)" } else { "" };
    format!("{strike}{}{strike}{suffix}", code_span(signature, 2))
}

/// CommonMark code span around `text`. Generic arities put backtick runs in signatures
/// (`` `N `` on types, ``` ``N ``` on methods), so the fence is one longer than the longest run
/// and never shorter than `min_fence`.
fn code_span(text: &str, min_fence: usize) -> String {
    let longest_run = text
        .split(|c| c != '`')
        .map(str::len)
        .max()
        .unwrap_or(0);
    let fence = "`".repeat(min_fence.max(longest_run + 1));
    let pad = if text.starts_with('`') || text.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{fence}{pad}{text}{pad}{fence}")
}
