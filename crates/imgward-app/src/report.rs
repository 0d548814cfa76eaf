use anyhow::Context;
use imgward_types::{
    ids, AuditData, AuditReport, Finding, ReportEnvelope, Severity, SeverityCounts, ToolMeta,
    Verdict, SCHEMA_REPORT_V1,
};
use std::collections::BTreeMap;
use time::OffsetDateTime;

pub fn parse_report_json(text: &str) -> anyhow::Result<AuditReport> {
    let report: AuditReport = serde_json::from_str(text).context("parse report json")?;
    Ok(report)
}

pub fn serialize_report(report: &AuditReport) -> anyhow::Result<Vec<u8>> {
    serde_json::to_vec_pretty(report).context("serialize report")
}

/// Build the report written when the audit itself cannot run (malformed rules,
/// unreadable snapshot, unknown operator).
///
/// The failure surfaces as a single synthetic finding under a reserved rule
/// id, so downstream ingestion that only looks at findings still sees the
/// broken run instead of an absent file.
pub fn runtime_error_report(message: &str) -> AuditReport {
    let now = OffsetDateTime::now_utc();
    let findings = vec![Finding {
        rule_id: ids::RULE_TOOL_RUNTIME.to_string(),
        severity: Severity::Critical,
        title: "imgward runtime error".to_string(),
        description: "The audit did not complete; inventory findings are not available.".to_string(),
        subscription_id: String::new(),
        resource_group: String::new(),
        location: String::new(),
        vm_name: String::new(),
        image_type: String::new(),
        image_id: String::new(),
        publisher: String::new(),
        offer: String::new(),
        sku: String::new(),
        version: String::new(),
        time_created: String::new(),
        field: String::new(),
        actual: String::new(),
        expected: String::new(),
        message: message.to_string(),
        fingerprint: None,
    }];
    let counts = SeverityCounts::from_findings(&findings);

    ReportEnvelope {
        schema: SCHEMA_REPORT_V1.to_string(),
        tool: ToolMeta {
            name: "imgward".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        },
        started_at: now,
        finished_at: now,
        verdict: Verdict::Fail,
        findings,
        data: AuditData {
            rules_loaded: 0,
            records_scanned: 0,
            findings_total: counts.total(),
            counts,
            by_image_type: BTreeMap::new(),
            fail_on: "unknown".to_string(),
            evaluated_at: now,
        },
    }
}
