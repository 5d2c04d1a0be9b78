//! Developer tasks (schema generation, contract conformance).
//!
//! Keeping this separate avoids bloating the end-user CLI.

use anyhow::{Context, bail};
use apidiff_test_util::normalize_nondeterministic;
use schemars::schema_for;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};

/// Get the project root (parent of xtask directory).
fn project_root() -> anyhow::Result<PathBuf> {
    let manifest_dir = match std::env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(_) => std::env::current_dir().context("Cannot determine current directory")?,
    };

    if manifest_dir.ends_with("xtask") {
        manifest_dir
            .parent()
            .map(Path::to_path_buf)
            .context("xtask has no parent")
    } else {
        Ok(manifest_dir)
    }
}

fn schemas_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("schemas"))
}

fn contracts_fixtures_dir() -> anyhow::Result<PathBuf> {
    Ok(project_root()?.join("contracts").join("fixtures"))
}

/// Schema definition with its target filename.
struct SchemaSpec {
    filename: &'static str,
    generate: fn() -> schemars::Schema,
}

fn generate_report_schema() -> schemars::Schema {
    schema_for!(apidiff_types::ApidiffReport)
}

fn generate_config_schema() -> schemars::Schema {
    schema_for!(apidiff_settings::ApidiffConfigV1)
}

fn generate_exclusions_schema() -> schemars::Schema {
    schema_for!(apidiff_settings::ExclusionSpecV1)
}

fn schema_specs() -> Vec<SchemaSpec> {
    vec![
        SchemaSpec {
            filename: "apidiff.report.v1.json",
            generate: generate_report_schema,
        },
        SchemaSpec {
            filename: "apidiff.config.v1.json",
            generate: generate_config_schema,
        },
        SchemaSpec {
            filename: "apidiff.exclusions.v1.json",
            generate: generate_exclusions_schema,
        },
    ]
}

/// Serialize a schema to pretty-printed JSON with trailing newline.
fn serialize_schema(schema: &schemars::Schema) -> anyhow::Result<String> {
    let mut json = serde_json::to_string_pretty(schema).context("Failed to serialize schema")?;
    json.push('\n');
    Ok(json)
}

fn emit_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    fs::create_dir_all(&dir).context("Failed to create schemas directory")?;

    for spec in schema_specs() {
        let json = serialize_schema(&(spec.generate)())?;
        let path = dir.join(spec.filename);
        fs::write(&path, &json)
            .with_context(|| format!("Failed to write schema to {}", path.display()))?;
        println!("Wrote {}", path.display());
    }

    println!("\nSchemas emitted successfully.");
    Ok(())
}

/// Check that schemas in the repo match what would be generated.
fn validate_schemas() -> anyhow::Result<()> {
    let dir = schemas_dir()?;
    let mut missing = Vec::new();
    let mut mismatched = Vec::new();

    for spec in schema_specs() {
        let path = dir.join(spec.filename);
        if !path.exists() {
            missing.push(spec.filename);
            continue;
        }

        let expected = serialize_schema(&(spec.generate)())?;
        let actual = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if expected != actual {
            mismatched.push(spec.filename);
        }
    }

    if missing.is_empty() && mismatched.is_empty() {
        println!("All schemas are up to date.");
        return Ok(());
    }

    if !missing.is_empty() {
        eprintln!("Missing schemas:");
        for name in &missing {
            eprintln!("  - {name}");
        }
    }
    if !mismatched.is_empty() {
        eprintln!("Schemas out of date:");
        for name in &mismatched {
            eprintln!("  - {name}");
        }
    }
    eprintln!("\nRun `cargo xtask emit-schemas` to regenerate.");
    bail!("Schema validation failed")
}

fn print_help() {
    eprintln!("xtask commands:");
    eprintln!("  help              Show this message");
    eprintln!("  emit-schemas      Generate JSON schemas from Rust types to schemas/");
    eprintln!("  validate-schemas  Check if schemas/ matches generated output (for CI)");
    eprintln!("  print-schema-ids  Print known schema IDs");
    eprintln!("  conform           Validate contract fixtures against the report schema");
    eprintln!("  conform-full      Contract fixtures + apidiff output on tests/fixtures");
}

fn compile_report_schema() -> anyhow::Result<jsonschema::Validator> {
    let schema = serde_json::to_value(generate_report_schema()).context("schema to JSON")?;
    jsonschema::validator_for(&schema).map_err(|e| anyhow::anyhow!("Failed to compile schema: {e}"))
}

fn is_fingerprint(s: &str) -> bool {
    s.len() == 64 && s.bytes().all(|b| b.is_ascii_digit() || (b'a'..=b'f').contains(&b))
}

const CATEGORIES: [&str; 5] = ["types", "methods", "fields", "properties", "events"];

/// Semantic checks the schema cannot express: fingerprints are lowercase SHA-256 hex, the
/// summary counts add up, and the verdict fails exactly when an entry is active or the run
/// errored.
fn report_invariants(name: &str, report: &Value) -> Vec<String> {
    let mut errors = Vec::new();
    let mut total = 0u64;
    let mut active = 0u64;

    for (mi, module) in report["modules"].as_array().into_iter().flatten().enumerate() {
        let mut module_active = 0u64;
        for category in CATEGORIES {
            for (ei, entry) in module["diff"][category].as_array().into_iter().flatten().enumerate() {
                total += 1;
                if entry["ignored"] == Value::Bool(false) {
                    module_active += 1;
                }
                let fp = entry["fingerprint"].as_str().unwrap_or_default();
                if !is_fingerprint(fp) {
                    errors.push(format!(
                        "{name}: modules[{mi}].diff.{category}[{ei}].fingerprint '{fp}' is not a SHA-256 hex digest"
                    ));
                }
            }
        }
        let expected = if module_active > 0 { "fail" } else { "pass" };
        if module["verdict"] != expected {
            errors.push(format!("{name}: modules[{mi}].verdict should be {expected}"));
        }
        active += module_active;
    }

    let data = &report["data"];
    if data["entries_total"].as_u64() != Some(total) {
        errors.push(format!("{name}: data.entries_total should be {total}"));
    }
    if data["entries_active"].as_u64() != Some(active) {
        errors.push(format!("{name}: data.entries_active should be {active}"));
    }
    if data["entries_ignored"].as_u64() != Some(total - active) {
        errors.push(format!("{name}: data.entries_ignored should be {}", total - active));
    }

    let errored = data["error"].is_string();
    let expected = if active > 0 || errored { "fail" } else { "pass" };
    if report["verdict"] != expected {
        errors.push(format!("{name}: verdict should be {expected}"));
    }

    errors
}

/// Validate every `contracts/fixtures/*.json` against the generated report schema and the
/// report invariants.
fn conform() -> anyhow::Result<()> {
    let compiled = compile_report_schema()?;
    println!("✓ apidiff.report.v1 schema compiles");

    let fixtures_dir = contracts_fixtures_dir()?;
    if !fixtures_dir.exists() {
        bail!("contracts/fixtures/ not found at {}", fixtures_dir.display());
    }

    let mut entries: Vec<PathBuf> = fs::read_dir(&fixtures_dir)
        .context("Failed to read contracts/fixtures/")?
        .map(|e| e.map(|e| e.path()))
        .collect::<Result<_, _>>()?;
    entries.sort();

    let mut fixture_count = 0;
    let mut errors = Vec::new();

    for path in entries {
        if path.extension().is_none_or(|ext| ext != "json") {
            continue;
        }

        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();
        let content =
            fs::read_to_string(&path).with_context(|| format!("Failed to read {filename}"))?;
        let value: Value = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse {filename} as JSON"))?;

        for err in compiled.iter_errors(&value) {
            errors.push(format!("{filename}: schema validation: {err}"));
        }
        errors.extend(report_invariants(&filename, &value));

        fixture_count += 1;
        println!("  ✓ {filename} checked");
    }

    if fixture_count == 0 {
        bail!("No JSON fixtures found in {}", fixtures_dir.display());
    }

    if !errors.is_empty() {
        eprintln!("\nConformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ All {fixture_count} contract fixtures pass conformance checks!");
    Ok(())
}

/// `conform` plus: run the built apidiff binary on every `tests/fixtures/<name>` that has
/// `base/` and `other/` snapshots, validate the output, and compare it with
/// `expected.report.json` when present.
fn conform_full() -> anyhow::Result<()> {
    conform()?;

    println!("\n--- Full conformance: apidiff binary output ---\n");

    let compiled = compile_report_schema()?;
    let root = project_root()?;
    let apidiff_bin = root
        .join("target")
        .join("debug")
        .join(format!("apidiff{}", std::env::consts::EXE_SUFFIX));
    if !apidiff_bin.exists() {
        bail!(
            "apidiff binary not found at {}.\nRun `cargo build -p apidiff-cli` first.",
            apidiff_bin.display()
        );
    }

    let test_fixtures_dir = root.join("tests").join("fixtures");
    let mut errors = Vec::new();

    for entry in fs::read_dir(&test_fixtures_dir).context("Failed to read tests/fixtures/")? {
        let fixture_dir = entry?.path();
        if !fixture_dir.join("base").is_dir() || !fixture_dir.join("other").is_dir() {
            continue;
        }

        let fixture_name = fixture_dir
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let temp_dir = tempfile::tempdir().context("Failed to create temp dir")?;
        let report_out = temp_dir.path().join("report.json");

        let output = std::process::Command::new(&apidiff_bin)
            .arg("diff")
            .arg("--base")
            .arg(fixture_dir.join("base"))
            .arg("--other")
            .arg(fixture_dir.join("other"))
            .arg("--config")
            .arg(temp_dir.path().join("apidiff.toml"))
            .arg("--report-out")
            .arg(&report_out)
            .output()
            .with_context(|| format!("Failed to run apidiff on fixture '{fixture_name}'"))?;

        // 0 and 2 both mean a report was produced.
        if !matches!(output.status.code(), Some(0 | 2)) {
            errors.push(format!(
                "fixture '{fixture_name}': apidiff exited with {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr)
            ));
            continue;
        }

        let report_content = fs::read_to_string(&report_out)
            .with_context(|| format!("fixture '{fixture_name}': no report output generated"))?;
        let report_value: Value = serde_json::from_str(&report_content)
            .with_context(|| format!("Failed to parse report for fixture '{fixture_name}'"))?;

        for err in compiled.iter_errors(&report_value) {
            errors.push(format!("fixture '{fixture_name}': schema validation: {err}"));
        }
        errors.extend(report_invariants(&fixture_name, &report_value));

        let golden_path = fixture_dir.join("expected.report.json");
        if golden_path.exists() {
            let golden_content = fs::read_to_string(&golden_path)?;
            let golden_value: Value = serde_json::from_str(&golden_content)?;
            if normalize_nondeterministic(report_value) != normalize_nondeterministic(golden_value)
            {
                errors.push(format!(
                    "fixture '{fixture_name}': output differs from expected.report.json"
                ));
            } else {
                println!("  ✓ fixture '{fixture_name}' matches golden report");
            }
        } else {
            println!("  ✓ fixture '{fixture_name}' produces a valid report (no golden file)");
        }
    }

    if !errors.is_empty() {
        eprintln!("\nFull conformance errors:");
        for err in &errors {
            eprintln!("  - {err}");
        }
        bail!("Full conformance validation failed with {} errors", errors.len());
    }

    println!("\n✓ Full conformance checks passed!");
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let cmd = args.get(1).map(|s| s.as_str()).unwrap_or("help");

    match cmd {
        "help" | "--help" | "-h" => {
            print_help();
            Ok(())
        }
        "emit-schemas" => emit_schemas(),
        "validate-schemas" => validate_schemas(),
        "conform" => conform(),
        "conform-full" => conform_full(),
        "print-schema-ids" => {
            println!("{}", apidiff_types::SCHEMA_REPORT_V1);
            println!("{}", apidiff_types::ids::SCHEMA_CONFIG_V1);
            println!("{}", apidiff_types::ids::SCHEMA_EXCLUSIONS_V1);
            Ok(())
        }
        other => bail!("unknown xtask command: {other}\n\nRun `cargo xtask help` for usage."),
    }
    .context("xtask failed")
}
