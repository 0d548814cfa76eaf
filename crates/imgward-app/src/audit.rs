//! The `audit` use case: evaluate governance rules against an inventory snapshot.

use anyhow::Context;
use imgward_types::{
    AuditData, AuditReport, Finding, Record, ReportEnvelope, Severity, SeverityCounts, ToolMeta,
    Verdict, VmImageRow, SCHEMA_REPORT_V1,
};
use std::collections::BTreeMap;
use time::OffsetDateTime;

/// Verdict threshold: findings at or above this severity fail the run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FailOn {
    #[default]
    Low,
    Medium,
    High,
    Critical,
    /// Report-only mode: findings still surface as `warn`, but never `fail`.
    Never,
}

impl FailOn {
    pub fn parse(v: &str) -> anyhow::Result<FailOn> {
        match v {
            "low" => Ok(FailOn::Low),
            "medium" => Ok(FailOn::Medium),
            "high" => Ok(FailOn::High),
            "critical" => Ok(FailOn::Critical),
            "never" => Ok(FailOn::Never),
            other => {
                anyhow::bail!("unknown fail_on: {other} (expected low|medium|high|critical|never)")
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FailOn::Low => "low",
            FailOn::Medium => "medium",
            FailOn::High => "high",
            FailOn::Critical => "critical",
            FailOn::Never => "never",
        }
    }

    fn threshold(self) -> Option<Severity> {
        match self {
            FailOn::Low => Some(Severity::Low),
            FailOn::Medium => Some(Severity::Medium),
            FailOn::High => Some(Severity::High),
            FailOn::Critical => Some(Severity::Critical),
            FailOn::Never => None,
        }
    }
}

/// Input for the audit use case.
#[derive(Clone, Debug)]
pub struct AuditInput<'a> {
    /// Rules document contents (YAML).
    pub rules_text: &'a str,
    /// Inventory snapshot contents (JSON array of VM rows).
    pub snapshot_text: &'a str,
    /// Evaluation reference time for age operators.
    pub now: OffsetDateTime,
    /// Verdict threshold.
    pub fail_on: FailOn,
}

/// Output from the audit use case.
#[derive(Clone, Debug)]
pub struct AuditOutput {
    /// The generated report.
    pub report: AuditReport,
    /// The normalized inventory the report was computed from.
    pub rows: Vec<VmImageRow>,
}

/// Run the audit use case: parse rules, parse the snapshot, evaluate, and
/// assemble the report envelope.
pub fn run_audit(input: AuditInput<'_>) -> anyhow::Result<AuditOutput> {
    let started_at = OffsetDateTime::now_utc();

    let rules = imgward_rules::parse_rules_yaml(input.rules_text).context("parse rules")?;
    let rows = imgward_inventory::parse_snapshot(input.snapshot_text)?;

    let records: Vec<Record> = rows.iter().map(VmImageRow::to_record).collect();
    let findings =
        imgward_engine::evaluate_inventory(&records, &rules, input.now).context("evaluate rules")?;

    let verdict = verdict_for(&findings, input.fail_on);
    let counts = SeverityCounts::from_findings(&findings);

    let mut by_image_type: BTreeMap<String, u32> = BTreeMap::new();
    for row in &rows {
        *by_image_type
            .entry(row.image_type.as_str().to_string())
            .or_default() += 1;
    }

    let finished_at = OffsetDateTime::now_utc();

    let report = ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "imgward".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at,
        finished_at,
        verdict,
        findings,
        data: AuditData {
            rules_loaded: rules.len() as u32,
            records_scanned: rows.len() as u32,
            findings_total: counts.total(),
            counts,
            by_image_type,
            fail_on: input.fail_on.as_str().to_string(),
            evaluated_at: input.now,
        },
    };

    Ok(AuditOutput { report, rows })
}

/// Map findings to a verdict: any finding at or above the threshold fails the
/// run, findings only below it warn, and a clean run passes.
pub fn verdict_for(findings: &[Finding], fail_on: FailOn) -> Verdict {
    if findings.is_empty() {
        return Verdict::Pass;
    }
    match fail_on.threshold() {
        Some(threshold) if findings.iter().any(|f| f.severity >= threshold) => Verdict::Fail,
        _ => Verdict::Warn,
    }
}

/// Map verdict to exit code: 0 = pass/warn, 2 = fail.
pub fn verdict_exit_code(verdict: Verdict) -> i32 {
    match verdict {
        Verdict::Pass => 0,
        Verdict::Warn => 0,
        Verdict::Fail => 2,
    }
}
