//! The `diff` use case: compare two package snapshots and produce a report.

use crate::report::tool_meta;
use anyhow::Context;
use apidiff_domain::model::ModuleModel;
use apidiff_domain::{ExclusionSet, evaluate};
use apidiff_repo::PackageMeta;
use apidiff_settings::{ApidiffConfigV1, Overrides, ResolvedConfig};
use apidiff_types::{
    ApidiffData, ApidiffReport, ModuleReport, PackageRef, SCHEMA_REPORT_V1, Verdict, ids,
};
use camino::{Utf8Path, Utf8PathBuf};
use std::collections::HashMap;
use time::OffsetDateTime;
use tracing::{info, warn};

/// Input for the diff use case.
#[derive(Clone, Debug)]
pub struct DiffInput<'a> {
    /// Baseline snapshot root (contains `package.json` and `lib/`).
    pub baseline_root: &'a Utf8Path,
    /// Candidate snapshot root.
    pub candidate_root: &'a Utf8Path,
    /// Config file contents (empty string if not found).
    pub config_text: &'a str,
    /// Directory config-relative paths are resolved against.
    pub config_dir: &'a Utf8Path,
    /// CLI overrides.
    pub overrides: Overrides,
}

/// Output from the diff use case.
#[derive(Clone, Debug)]
pub struct DiffOutput {
    pub report: ApidiffReport,
    pub resolved_config: ResolvedConfig,
}

/// Run the diff use case: resolve config, load exclusions, compare every paired module.
pub fn run_diff(input: DiffInput<'_>) -> anyhow::Result<DiffOutput> {
    let started_at = OffsetDateTime::now_utc();

    // Parse config (empty is allowed, defaults apply).
    let cfg = if input.config_text.trim().is_empty() {
        ApidiffConfigV1::default()
    } else {
        apidiff_settings::parse_config_toml(input.config_text).context("parse config")?
    };
    let resolved =
        apidiff_settings::resolve_config(cfg, input.overrides.clone()).context("resolve config")?;

    let baseline_meta =
        apidiff_repo::load_package_meta(input.baseline_root).context("load baseline package")?;
    let candidate_meta =
        apidiff_repo::load_package_meta(input.candidate_root).context("load candidate package")?;

    let exclusions = load_exclusion_set(&input, &resolved, &baseline_meta);

    let baseline_platforms: Vec<String> = apidiff_repo::discover_platforms(input.baseline_root)
        .context("discover baseline platforms")?
        .into_iter()
        .filter(|p| resolved.platform_filter.is_match(p))
        .collect();
    let candidate_platforms = apidiff_repo::discover_platforms(input.candidate_root)
        .context("discover candidate platforms")?;

    let pairing = apidiff_repo::pair_platforms(&baseline_platforms, &candidate_platforms);
    for platform in &pairing.unmatched {
        warn!(platform = %platform, "baseline platform has no counterpart in the candidate");
    }

    let mut modules = Vec::new();
    for platform in &pairing.matched {
        let baseline_dir = platform_dir(input.baseline_root, platform);
        let candidate_dir = platform_dir(input.candidate_root, platform);
        compare_platform(
            platform,
            &baseline_dir,
            &candidate_dir,
            &resolved,
            &exclusions,
            &mut modules,
        )?;
    }

    let verdict = modules
        .iter()
        .fold(Verdict::Pass, |acc, m: &ModuleReport| acc.and(m.verdict));

    let entries_total: usize = modules.iter().map(|m| m.diff.len()).sum();
    let entries_ignored: usize = modules.iter().map(|m| m.diff.ignored_count()).sum();
    let data = ApidiffData {
        platforms_compared: count(pairing.matched.len()),
        modules_compared: count(modules.len()),
        entries_total: count(entries_total),
        entries_active: count(entries_total - entries_ignored),
        entries_ignored: count(entries_ignored),
        exclusions_loaded: count(exclusions.len()),
        unmatched_platforms: pairing.unmatched,
        error: None,
    };

    info!(
        verdict = ?verdict,
        modules = data.modules_compared,
        active = data.entries_active,
        ignored = data.entries_ignored,
        "diff finished"
    );

    let report = ApidiffReport {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: tool_meta(),
        started_at,
        finished_at: OffsetDateTime::now_utc(),
        verdict,
        baseline: Some(package_ref(baseline_meta)),
        candidate: Some(package_ref(candidate_meta)),
        modules,
        data,
    };

    Ok(DiffOutput {
        report,
        resolved_config: resolved,
    })
}

/// Map verdict to exit code: 0 = pass, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Fail => 2,
    }
}

fn load_exclusion_set(
    input: &DiffInput<'_>,
    resolved: &ResolvedConfig,
    baseline: &PackageMeta,
) -> ExclusionSet {
    let path = if resolved.exclusions_relative_to_config {
        input.config_dir.join(&resolved.exclusions_path)
    } else {
        Utf8PathBuf::from(resolved.exclusions_path.as_str())
    };

    // Unreadable exclusions degrade to none, like unparseable ones.
    let text = match apidiff_repo::read_optional_text(&path) {
        Ok(text) => text,
        Err(err) => {
            let error = format!("{err:#}");
            warn!(path = %path, error = %error, "exclusion file is unreadable; no exclusions apply");
            return ExclusionSet::empty();
        }
    };
    if text.is_none() && !resolved.exclusions_relative_to_config {
        warn!(path = %path, "exclusion file not found; no exclusions apply");
    }

    apidiff_settings::load_exclusions(text.as_deref(), &baseline.version)
}

/// Report counters saturate at `u32::MAX`.
fn count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

fn platform_dir(root: &Utf8Path, platform: &str) -> Utf8PathBuf {
    root.join(ids::PLATFORMS_DIR).join(platform)
}

fn compare_platform(
    platform: &str,
    baseline_dir: &Utf8Path,
    candidate_dir: &Utf8Path,
    resolved: &ResolvedConfig,
    exclusions: &ExclusionSet,
    out: &mut Vec<ModuleReport>,
) -> anyhow::Result<()> {
    let names: Vec<String> = apidiff_repo::discover_modules(baseline_dir)
        .with_context(|| format!("discover baseline modules for {platform}"))?
        .into_iter()
        .filter(|m| resolved.module_filter.is_match(m))
        .collect();
    let candidate_names = apidiff_repo::discover_modules(candidate_dir)
        .with_context(|| format!("discover candidate modules for {platform}"))?;

    let present: Vec<String> = names
        .iter()
        .filter(|n| candidate_names.contains(n))
        .cloned()
        .collect();

    let baselines = apidiff_repo::load_modules(baseline_dir, &names)?;
    let mut candidates: HashMap<String, ModuleModel> = present
        .iter()
        .cloned()
        .zip(apidiff_repo::load_modules(candidate_dir, &present)?)
        .collect();

    for (name, baseline) in names.iter().zip(&baselines) {
        let (candidate, candidate_missing) = match candidates.remove(name) {
            Some(c) => (c, false),
            None => {
                warn!(
                    platform,
                    module = %name,
                    "module is absent from the candidate; every baseline type reports missing"
                );
                (ModuleModel::empty(name), true)
            }
        };

        let result = evaluate(baseline, &candidate, exclusions)
            .with_context(|| format!("compare {platform}/{name}"))?;

        out.push(ModuleReport {
            platform: platform.to_string(),
            module: name.clone(),
            candidate_missing,
            verdict: result.verdict,
            diff: result.diff,
        });
    }

    Ok(())
}

fn package_ref(meta: PackageMeta) -> PackageRef {
    PackageRef {
        id: meta.id,
        version: meta.version,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const WIDGET_V1: &str = r#"{
  "name": "Acme.Core.dll",
  "types": [
    {
      "namespace": "Acme",
      "name": "Widget",
      "members": [
        { "member": "method", "name": "Open" },
        { "member": "method", "name": "Close", "parameters": [{ "kind": "primitive", "name": "int32" }] }
      ]
    }
  ]
}"#;

    const WIDGET_V2: &str = r#"{
  "name": "Acme.Core.dll",
  "types": [
    {
      "namespace": "Acme",
      "name": "Widget",
      "members": [{ "member": "method", "name": "Open" }]
    }
  ]
}"#;

    struct Fixture {
        _tmp: TempDir,
        root: Utf8PathBuf,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().expect("temp dir");
            let root = Utf8PathBuf::from_path_buf(tmp.path().to_path_buf()).expect("utf8 path");
            Self { _tmp: tmp, root }
        }

        fn write(&self, rel: &str, contents: &str) {
            let path = self.root.join(rel);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).expect("create parent");
            }
            std::fs::write(path, contents).expect("write file");
        }

        fn package(&self, dir: &str, version: &str) {
            self.write(
                &format!("{dir}/package.json"),
                &format!(r#"{{ "id": "Acme.Widgets", "version": "{version}" }}"#),
            );
        }
    }

    fn run(fx: &Fixture, config: &str, overrides: Overrides) -> anyhow::Result<DiffOutput> {
        run_diff(DiffInput {
            baseline_root: &fx.root.join("base"),
            candidate_root: &fx.root.join("other"),
            config_text: config,
            config_dir: &fx.root,
            overrides,
        })
    }

    fn widget_fixture() -> Fixture {
        let fx = Fixture::new();
        fx.package("base", "1.3.0");
        fx.package("other", "2.0.0");
        fx.write("base/lib/net8.0/Acme.Core.dll.json", WIDGET_V1);
        fx.write("other/lib/net8.0/Acme.Core.dll.json", WIDGET_V2);
        fx
    }

    #[test]
    fn removed_method_fails_the_run() {
        let fx = widget_fixture();
        let out = run(&fx, "", Overrides::default()).expect("run_diff");

        let report = out.report;
        assert_eq!(report.verdict, Verdict::Fail);
        assert_eq!(report.data.modules_compared, 1);
        assert_eq!(report.data.entries_active, 1);
        assert_eq!(report.modules[0].diff.methods[0].signature, "Acme.Widget::Close(int32)");
        assert_eq!(report.baseline.as_ref().map(|p| p.version.as_str()), Some("1.3.0"));
        assert_eq!(verdict_exit_code(report.verdict), 2);
    }

    #[test]
    fn default_exclusion_file_next_to_config_is_applied() {
        let fx = widget_fixture();
        fx.write(
            "apidiff.exclusions.toml",
            r#"
[[exclusions]]
kind = "method"
signature = "Acme.Widget::Close(int32)"
version = "<=1.3.0"
"#,
        );

        let out = run(&fx, "", Overrides::default()).expect("run_diff");
        assert_eq!(out.report.verdict, Verdict::Pass);
        assert_eq!(out.report.data.entries_ignored, 1);
        assert_eq!(out.report.data.exclusions_loaded, 1);
        assert_eq!(verdict_exit_code(out.report.verdict), 0);
    }

    #[test]
    fn version_scoped_exclusion_for_another_version_does_not_apply() {
        let fx = widget_fixture();
        fx.write(
            "ci/exclusions.toml",
            r#"
[[exclusions]]
kind = "method"
signature = "Acme.Widget::Close(int32)"
version = "=1.2.0"
"#,
        );
        let overrides = Overrides {
            exclusions: Some(fx.root.join("ci/exclusions.toml").to_string()),
            ..Overrides::default()
        };

        let out = run(&fx, "", overrides).expect("run_diff");
        assert_eq!(out.report.verdict, Verdict::Fail);
        assert_eq!(out.report.data.exclusions_loaded, 0);
    }

    #[test]
    fn missing_candidate_module_reports_all_types_missing() {
        let fx = widget_fixture();
        fx.write(
            "base/lib/net8.0/Acme.Extra.dll.json",
            r#"{ "name": "Acme.Extra.dll", "types": [{ "namespace": "Acme", "name": "Extra" }] }"#,
        );

        let out = run(&fx, "", Overrides::default()).expect("run_diff");
        let extra = out
            .report
            .modules
            .iter()
            .find(|m| m.module == "Acme.Extra.dll")
            .expect("extra module compared");
        assert!(extra.candidate_missing);
        assert_eq!(extra.diff.types.len(), 1);
        assert_eq!(extra.diff.types[0].signature, "Acme.Extra");
    }

    #[test]
    fn unmatched_platforms_are_listed_and_filters_apply() {
        let fx = widget_fixture();
        fx.write("base/lib/net472/Acme.Core.dll.json", WIDGET_V1);
        fx.write("base/lib/netstandard2.0/Acme.Core.dll.json", WIDGET_V1);
        fx.write("other/lib/netstandard2.0/Acme.Core.dll.json", WIDGET_V1);

        let out = run(&fx, "", Overrides::default()).expect("run_diff");
        assert_eq!(out.report.data.platforms_compared, 2);
        assert_eq!(out.report.data.unmatched_platforms, vec!["net472".to_string()]);

        let out = run(&fx, "platforms = [\"netstandard*\"]\n", Overrides::default())
            .expect("run_diff");
        assert_eq!(out.report.data.platforms_compared, 1);
        assert_eq!(out.report.verdict, Verdict::Pass);
        assert!(out.report.data.unmatched_platforms.is_empty());
    }

    #[test]
    fn malformed_module_is_a_runtime_error() {
        let fx = widget_fixture();
        fx.write("other/lib/net8.0/Acme.Core.dll.json", "{ broken");
        let err = run(&fx, "", Overrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("Acme.Core.dll"));
    }

    #[test]
    fn missing_package_metadata_is_a_runtime_error() {
        let fx = Fixture::new();
        fx.package("other", "2.0.0");
        let err = run(&fx, "", Overrides::default()).unwrap_err();
        assert!(format!("{err:#}").contains("load baseline package"));
    }

    #[test]
    fn unparseable_exclusions_degrade_to_none() {
        let fx = widget_fixture();
        fx.write("apidiff.exclusions.toml", "this is not toml [");
        let out = run(&fx, "", Overrides::default()).expect("run_diff");
        assert_eq!(out.report.verdict, Verdict::Fail);
        assert_eq!(out.report.data.exclusions_loaded, 0);
    }

    #[test]
    fn counters_saturate_instead_of_wrapping() {
        assert_eq!(count(7), 7);
        assert_eq!(count(u32::MAX as usize), u32::MAX);
        if let Some(big) = (u32::MAX as usize).checked_add(2) {
            assert_eq!(count(big), u32::MAX);
        }
    }

    #[test]
    fn non_utf8_exclusions_degrade_to_none() {
        let fx = widget_fixture();
        let path = fx.root.join("apidiff.exclusions.toml");
        std::fs::write(&path, b"\xff\xfe[[exclusions]]\n").expect("write bytes");

        let out = run(&fx, "", Overrides::default()).expect("run_diff");
        assert_eq!(out.report.verdict, Verdict::Fail);
        assert_eq!(out.report.data.exclusions_loaded, 0);
        assert_eq!(out.report.data.entries_active, 1);
    }
}
