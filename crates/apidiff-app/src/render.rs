//! Render use cases: markdown and GitHub annotations from in-memory reports.

use crate::report::to_renderable;
use apidiff_types::ApidiffReport;

pub fn render_markdown(report: &ApidiffReport) -> String {
    apidiff_render::render_markdown(&to_renderable(report))
}

pub fn render_annotations(report: &ApidiffReport, max: usize) -> Vec<String> {
    apidiff_render::render_github_annotations(&to_renderable(report))
        .into_iter()
        .take(max)
        .collect()
}
