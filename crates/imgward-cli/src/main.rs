//! CLI entry point for imgward.
//!
//! This module is intentionally thin: it handles argument parsing, I/O, and exit codes.
//! All business logic lives in the `imgward-app` crate.

use anyhow::Context;
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand};
use imgward_app::{
    parse_report_json, run_audit, run_explain, runtime_error_report, serialize_report,
    verdict_exit_code, AuditInput, ExplainOutput, FailOn,
};
use imgward_render::{findings_to_csv, inventory_to_csv, render_markdown};
use imgward_types::AuditReport;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

#[derive(Parser, Debug)]
#[command(
    name = "imgward",
    version,
    about = "Governance rule auditor for cloud VM image inventories"
)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evaluate governance rules against an inventory snapshot and write artifacts.
    Audit(AuditArgs),

    /// Parse and classify a snapshot, then emit the inventory CSV.
    Inventory {
        /// Path to the catalog snapshot JSON (an array of raw VM rows).
        snapshot: Utf8PathBuf,

        /// Where to write the CSV (if not specified, prints to stdout).
        #[arg(long)]
        out: Option<Utf8PathBuf>,
    },

    /// Render markdown from an existing JSON report.
    Md {
        /// Path to the JSON report file.
        #[arg(long, default_value = "artifacts/imgward/report.json")]
        report: Utf8PathBuf,

        /// Where to write the Markdown output (if not specified, prints to stdout).
        #[arg(long, short)]
        output: Option<Utf8PathBuf>,
    },

    /// Explain a rule operator with its matching semantics and an example.
    Explain {
        /// The operator name (e.g. "older_than_days") to explain.
        operator: String,
    },
}

#[derive(Args, Debug)]
struct AuditArgs {
    /// Path to the governance rules YAML.
    #[arg(long, default_value = "rules.yaml")]
    rules: Utf8PathBuf,

    /// Path to the catalog snapshot JSON (an array of raw VM rows).
    #[arg(long)]
    snapshot: Utf8PathBuf,

    /// Where to write the JSON report.
    #[arg(long, default_value = "artifacts/imgward/report.json")]
    report_out: Utf8PathBuf,

    /// Lowest severity that fails the run (low|medium|high|critical|never).
    #[arg(long, default_value = "low")]
    fail_on: String,

    /// Reference time for age operators, RFC 3339 (defaults to the current time).
    #[arg(long)]
    now: Option<String>,

    /// Write a Markdown summary alongside the JSON.
    #[arg(long)]
    write_markdown: bool,

    /// Where to write the Markdown summary (if enabled).
    #[arg(long, default_value = "artifacts/imgward/summary.md")]
    markdown_out: Utf8PathBuf,

    /// Write the findings CSV alongside the JSON.
    #[arg(long)]
    write_findings_csv: bool,

    /// Where to write the findings CSV (if enabled).
    #[arg(long, default_value = "artifacts/imgward/governance_findings.csv")]
    findings_csv_out: Utf8PathBuf,

    /// Write the classified inventory CSV alongside the JSON.
    #[arg(long)]
    write_inventory_csv: bool,

    /// Where to write the inventory CSV (if enabled).
    #[arg(long, default_value = "artifacts/imgward/vm_inventory.csv")]
    inventory_csv_out: Utf8PathBuf,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Audit(args) => cmd_audit(&args),
        Commands::Inventory { snapshot, out } => cmd_inventory(&snapshot, out),
        Commands::Md { report, output } => cmd_md(report, output),
        Commands::Explain { operator } => cmd_explain(&operator),
    }
}

fn cmd_audit(args: &AuditArgs) -> anyhow::Result<()> {
    let result = (|| -> anyhow::Result<i32> {
        let rules_text = std::fs::read_to_string(&args.rules)
            .with_context(|| format!("read rules: {}", args.rules))?;
        let snapshot_text = std::fs::read_to_string(&args.snapshot)
            .with_context(|| format!("read snapshot: {}", args.snapshot))?;

        let fail_on = FailOn::parse(&args.fail_on)?;
        let now = parse_now(args.now.as_deref())?;

        let output = run_audit(AuditInput {
            rules_text: &rules_text,
            snapshot_text: &snapshot_text,
            now,
            fail_on,
        })?;

        write_report_file(&args.report_out, &output.report).context("write report json")?;

        if args.write_markdown {
            let md = render_markdown(&output.report);
            write_text_file(&args.markdown_out, &md).context("write markdown")?;
        }

        if args.write_findings_csv {
            let csv = findings_to_csv(&output.report.findings);
            write_text_file(&args.findings_csv_out, &csv).context("write findings csv")?;
        }

        if args.write_inventory_csv {
            let csv = inventory_to_csv(&output.rows);
            write_text_file(&args.inventory_csv_out, &csv).context("write inventory csv")?;
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
            let report = runtime_error_report(&format!("{err:#}"));
            let _ = write_report_file(&args.report_out, &report);
            eprintln!("imgward error: {err:#}");
            std::process::exit(1);
        }
    }
}

/// Parse `--now` as RFC 3339, defaulting to the current wall clock.
fn parse_now(now: Option<&str>) -> anyhow::Result<OffsetDateTime> {
    match now {
        Some(text) => OffsetDateTime::parse(text, &Rfc3339).with_context(|| {
            format!("parse --now: {text} (expected RFC 3339, e.g. 2024-01-31T00:00:00Z)")
        }),
        None => Ok(OffsetDateTime::now_utc()),
    }
}

fn write_report_file(path: &Utf8Path, report: &AuditReport) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    let data = serialize_report(report).context("serialize report")?;
    std::fs::write(path, data).with_context(|| format!("write report: {}", path))?;
    Ok(())
}

fn write_text_file(path: &Utf8Path, text: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create directory: {}", parent))?;
    }
    std::fs::write(path, text).with_context(|| format!("write text: {}", path))?;
    Ok(())
}

fn cmd_inventory(snapshot: &Utf8Path, out: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let rows = imgward_inventory::load_snapshot(snapshot)?;
    let csv = inventory_to_csv(&rows);

    if let Some(out_path) = out {
        write_text_file(&out_path, &csv).context("write inventory csv")?;
        eprintln!(
            "imgward: inventory complete: {} ({} VM(s))",
            out_path,
            rows.len()
        );
    } else {
        print!("{}", csv);
    }

    Ok(())
}

fn cmd_md(report_path: Utf8PathBuf, output: Option<Utf8PathBuf>) -> anyhow::Result<()> {
    let report_text = std::fs::read_to_string(&report_path)
        .with_context(|| format!("read report: {}", report_path))?;
    let report = parse_report_json(&report_text)?;
    let md = render_markdown(&report);

    if let Some(out_path) = output {
        write_text_file(&out_path, &md).context("write markdown output")?;
    } else {
        print!("{}", md);
    }

    Ok(())
}

fn cmd_explain(operator: &str) -> anyhow::Result<()> {
    match run_explain(operator) {
        ExplainOutput::Found(exp) => {
            print!("{}", imgward_app::format_explanation(&exp));
            Ok(())
        }
        ExplainOutput::NotFound { name, available } => {
            eprint!("{}", imgward_app::format_not_found(&name, available));
            std::process::exit(1);
        }
    }
}
