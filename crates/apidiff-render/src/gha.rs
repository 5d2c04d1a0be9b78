use crate::RenderableReport;

/// Render active entries as GitHub Actions workflow command annotations.
///
/// Format: `::error title=Breaking API change::{message}`. Ignored entries are not annotated.
pub fn render_github_annotations(report: &RenderableReport) -> Vec<String> {
    let mut out = Vec::new();

    if let Some(error) = &report.error {
        out.push(format!("::error title=apidiff::{}", escape(error)));
        return out;
    }

    for module in &report.modules {
        for e in module.entries.iter().filter(|e| !e.ignored) {
            let what = if e.changed { "changed" } else { "missing" };
            let message = format!(
                "[{}/{}] {} {} is {} in the candidate",
                module.platform,
                module.module,
                e.kind.noun(),
                e.signature,
                what
            );
            out.push(format!("::error title=Breaking API change::{}", escape(&message)));
        }
    }

    out
}

fn escape(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
