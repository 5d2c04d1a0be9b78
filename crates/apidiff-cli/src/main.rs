//! CLI entry point for apidiff.
//!
//! This module is intentionally thin: it handles argument parsing, logging setup, file output,
//! and exit codes. All business logic lives in the `apidiff-app` crate.

use anyhow::Context;
use apidiff_app::{
    DiffInput, parse_report_json, render_annotations, render_markdown, run_diff,
    runtime_error_report, serialize_report, verdict_exit_code,
};
use apidiff_settings::Overrides;
use apidiff_types::{ApidiffReport, ids};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{ArgAction, Parser, Subcommand};
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser, Debug)]
#[command(
    name = "apidiff",
    version,
    about = "Breaking API surface diff gate for compiled package modules"
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compare a baseline snapshot against a candidate snapshot and write the report.
    Diff {
        /// Baseline package snapshot (directory with package.json and lib/).
        #[arg(long)]
        base: Utf8PathBuf,

        /// Candidate package snapshot.
        #[arg(long)]
        other: Utf8PathBuf,

        /// Exclusion specification; overrides the path from the config file.
        #[arg(long)]
        exclusions: Option<Utf8PathBuf>,

        /// Path to apidiff config TOML (optional file).
        #[arg(long, default_value = ids::DEFAULT_CONFIG_FILE)]
        config: Utf8PathBuf,

        /// Only compare platforms matching this glob (repeatable).
        #[arg(long = "platform")]
        platforms: Vec<String>,

        /// Only compare modules matching this glob (repeatable).
        #[arg(long = "module")]
        modules: Vec<String>,

        /// Where to write the JSON report.
        #[arg(long, default_value = "artifacts/apidiff/report.json")]
        report_out: Utf8PathBuf,

        /// Write a Markdown report alongside the JSON.
        #[arg(long)]
        write_markdown: bool,

        /// Where to write the Markdown report (if enabled).
        #[arg(long, default_value = "artifacts/apidiff/report.md")]
        markdown_out: Utf8PathBuf,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/apidiff/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Render GitHub Actions annotations from an existing JSON report.
    Annotations {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/apidiff/report.json")]
        report: Utf8PathBuf,

        /// Maximum number of annotations to emit.
        #[arg(long, default_value = "10")]
        max: usize,
    },
}

fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    match cli.cmd {
        Commands::Diff {
            base,
            other,
            exclusions,
            config,
            platforms,
            modules,
            report_out,
            write_markdown,
            markdown_out,
        } => cmd_diff(DiffArgs {
            base,
            other,
            overrides: Overrides {
                exclusions: exclusions.map(|p| p.to_string()),
                platforms,
                modules,
            },
            config,
            report_out,
            write_markdown,
            markdown_out,
        }),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Annotations { report, max } => cmd_annotations(report, max),
    }
}

struct DiffArgs {
    base: Utf8PathBuf,
    other: Utf8PathBuf,
    overrides: Overrides,
    config: Utf8PathBuf,
    report_out: Utf8PathBuf,
    write_markdown: bool,
    markdown_out: Utf8PathBuf,
}

fn cmd_diff(args: DiffArgs) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        for (what, root) in [("baseline", &args.base), ("candidate", &args.other)] {
            if !root.is_dir() {
                anyhow::bail!("{what} snapshot does not exist: {root}");
            }
        }

        // Missing config file is allowed (defaults apply).
        let cfg_text = apidiff_repo::read_optional_text(&args.config)
            .context("read config")?
            .unwrap_or_default();
        let config_dir = match args.config.parent() {
            Some(dir) if !dir.as_str().is_empty() => dir,
            _ => Utf8Path::new("."),
        };

        let output = run_diff(DiffInput {
            baseline_root: &args.base,
            candidate_root: &args.other,
            config_text: &cfg_text,
            config_dir,
            overrides: args.overrides.clone(),
        })?;

        write_report_file(&args.report_out, &output.report).context("write report json")?;

        if args.write_markdown {
            let md = render_markdown(&output.report);
            write_text_file(&args.markdown_out, &md).context("write markdown")?;
        }

        Ok(verdict_exit_code(output.report.verdict))
    })();

    match result {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
            Ok(())
        }
        Err(err) => {
            let message = format!("{err:#}");
            let report = runtime_error_report(&message);
            if let Err(write_err) = write_report_file(&args.report_out, &report) {
                let write_err = format!("{write_err:#}");
                error!(error = %write_err, "failed to write runtime error report");
            }
            eprintln!("apidiff error: {message}");
            std::process::exit(1);
        }
    }
}

fn write_report_file(path: &Utf8Path, report: &ApidiffReport) -> anyhow::Result<()> {
    let data = serialize_report(report).context("serialize report")?;
    write_bytes(path, &data)
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    write_bytes(path, text.as_bytes())
}

fn write_bytes(path: &Utf8Path, data: &[u8]) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_str().is_empty()
    {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {parent}"))?;
    }
    std::fs::write(path, data).with_context(|| format!("write {path}"))?;
    Ok(())
}

fn read_report(path: &Utf8Path) -> anyhow::Result<ApidiffReport> {
    let text =
        std::fs::read_to_string(path).with_context(|| format!("read report: {path}"))?;
    parse_report_json(&text)
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    let md = render_markdown(&report);

    if let Some(out_path) = output {
        write_text_file(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{md}");
    }

    Ok(())
}

fn cmd_annotations(report_path: Utf8PathBuf, max: usize) -> anyhow::Result<()> {
    let report = read_report(&report_path)?;
    for annotation in render_annotations(&report, max) {
        println!("{annotation}");
    }
    Ok(())
}
