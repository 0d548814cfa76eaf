use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Stable schema identifier for imgward audit reports.
pub const SCHEMA_REPORT_V1: &str = "imgward.report.v1";

/// Rule severity. Ordered so threshold comparisons (`fail-on`) can use `>=`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Low => "low",
            Severity::Medium => "medium",
            Severity::High => "high",
            Severity::Critical => "critical",
        }
    }
}

impl Default for Severity {
    fn default() -> Self {
        Severity::Low
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed rule match on one record.
///
/// Wire keys are camelCase to match the catalog's own field naming; the field
/// order here is the findings CSV column order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    pub rule_id: String,
    pub severity: Severity,
    pub title: String,
    pub description: String,

    pub subscription_id: String,
    pub resource_group: String,
    pub location: String,
    pub vm_name: String,
    pub image_type: String,
    pub image_id: String,
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    pub version: String,
    pub time_created: String,

    pub field: String,
    pub actual: String,
    pub expected: String,
    pub message: String,

    /// Stable identifier intended for dedup and trending across runs. A hash
    /// of the rule id plus the record's identity fields; carried in JSON
    /// output only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Warn,
    Fail,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ToolMeta {
    pub name: String,
    pub version: String,
}

/// Findings tallied per severity.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SeverityCounts {
    pub low: u32,
    pub medium: u32,
    pub high: u32,
    pub critical: u32,
}

impl SeverityCounts {
    pub fn from_findings(findings: &[Finding]) -> Self {
        let mut counts = SeverityCounts::default();
        for finding in findings {
            match finding.severity {
                Severity::Low => counts.low += 1,
                Severity::Medium => counts.medium += 1,
                Severity::High => counts.high += 1,
                Severity::Critical => counts.critical += 1,
            }
        }
        counts
    }

    pub fn total(&self) -> u32 {
        self.low + self.medium + self.high + self.critical
    }
}

/// Imgward-specific summary payload for the report.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AuditData {
    pub rules_loaded: u32,
    pub records_scanned: u32,

    pub findings_total: u32,
    pub counts: SeverityCounts,

    /// Inventory composition keyed by image type, present even when no rule
    /// flags anything.
    pub by_image_type: BTreeMap<String, u32>,

    /// Effective `fail-on` threshold the verdict was computed against.
    pub fail_on: String,

    /// Reference time age comparisons were evaluated against. Injectable, so
    /// it is reproducible when the caller pins it.
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub evaluated_at: OffsetDateTime,
}

/// A generic report envelope.
///
/// Keeping this generic allows imgward to embed tool-specific data while still
/// enforcing a stable outer shape.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ReportEnvelope<TData = AuditData> {
    /// Versioned schema identifier for the envelope shape.
    pub schema: String,
    pub tool: ToolMeta,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub started_at: OffsetDateTime,
    #[schemars(with = "String")]
    #[serde(with = "time::serde::rfc3339")]
    pub finished_at: OffsetDateTime,
    pub verdict: Verdict,
    pub findings: Vec<Finding>,
    pub data: TData,
}

pub type AuditReport = ReportEnvelope<AuditData>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severity_ordering_matches_escalation() {
        assert!(Severity::Low < Severity::Medium);
        assert!(Severity::Medium < Severity::High);
        assert!(Severity::High < Severity::Critical);
    }

    #[test]
    fn severity_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Severity::High).unwrap(), "\"high\"");
        let s: Severity = serde_json::from_str("\"critical\"").unwrap();
        assert_eq!(s, Severity::Critical);
    }

    fn sample_finding(severity: Severity) -> Finding {
        Finding {
            rule_id: "no-deprecated-offer".into(),
            severity,
            title: "No deprecated offers".into(),
            description: String::new(),
            subscription_id: "sub-1".into(),
            resource_group: "rg-app".into(),
            location: "eastus".into(),
            vm_name: "vm-web-01".into(),
            image_type: "marketplace".into(),
            image_id: String::new(),
            publisher: "Canonical".into(),
            offer: "deprecated-offer-2019".into(),
            sku: "18.04-lts".into(),
            version: "latest".into(),
            time_created: "2024-01-15T08:30:00Z".into(),
            field: "offer".into(),
            actual: "deprecated-offer-2019".into(),
            expected: "deprecated".into(),
            message: "Rule failed: offer not_contains deprecated".into(),
            fingerprint: None,
        }
    }

    #[test]
    fn finding_wire_keys_are_camel_case() {
        let json = serde_json::to_value(sample_finding(Severity::Medium)).unwrap();
        assert_eq!(json["ruleId"], "no-deprecated-offer");
        assert_eq!(json["vmName"], "vm-web-01");
        assert_eq!(json["timeCreated"], "2024-01-15T08:30:00Z");
        assert_eq!(json["imageType"], "marketplace");
        // Unset fingerprint stays off the wire.
        assert!(json.get("fingerprint").is_none());
    }

    #[test]
    fn severity_counts_tally() {
        let findings = vec![
            sample_finding(Severity::Low),
            sample_finding(Severity::High),
            sample_finding(Severity::High),
        ];
        let counts = SeverityCounts::from_findings(&findings);
        assert_eq!(counts.low, 1);
        assert_eq!(counts.medium, 0);
        assert_eq!(counts.high, 2);
        assert_eq!(counts.critical, 0);
        assert_eq!(counts.total(), 3);
    }
}
