use imgward_types::{AuditReport, Severity, Verdict};

pub fn render_markdown(report: &AuditReport) -> String {
    let mut out = String::new();

    out.push_str("# Imgward report\n\n");
    let verdict = match report.verdict {
        Verdict::Pass => "PASS",
        Verdict::Warn => "WARN",
        Verdict::Fail => "FAIL",
    };
    out.push_str(&format!(
        "- Verdict: **{}** (fail on: {})\n- Findings: {} across {} record(s), {} rule(s)\n",
        verdict,
        report.data.fail_on,
        report.data.findings_total,
        report.data.records_scanned,
        report.data.rules_loaded
    ));
    let counts = &report.data.counts;
    out.push_str(&format!(
        "- Severity: {} critical / {} high / {} medium / {} low\n\n",
        counts.critical, counts.high, counts.medium, counts.low
    ));

    if !report.data.by_image_type.is_empty() {
        out.push_str("## Inventory\n\n");
        for (image_type, vms) in &report.data.by_image_type {
            out.push_str(&format!("- {}: {}\n", image_type, vms));
        }
        out.push('\n');
    }

    if report.findings.is_empty() {
        out.push_str("No findings.\n");
        return out;
    }

    out.push_str("## Findings\n\n");

    for f in &report.findings {
        let sev = match f.severity {
            Severity::Low => "LOW",
            Severity::Medium => "MEDIUM",
            Severity::High => "HIGH",
            Severity::Critical => "CRITICAL",
        };
        out.push_str(&format!(
            "- [{}] `{}` — {} (`{}` in {}/{})\n",
            sev, f.rule_id, f.message, f.vm_name, f.subscription_id, f.resource_group
        ));
    }

    out
}
