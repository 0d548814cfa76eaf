use crate::model::{RawCondition, RawGuard, RawRule, RulesDoc};
use imgward_engine::policy::{Condition, Guard, Rule, RuleSet};
use imgward_types::Severity;
use std::collections::BTreeSet;

/// Rejection of a rules document on shape grounds.
///
/// Raised before any record is evaluated, so a run never produces findings
/// alongside one of these. Operator names are deliberately not checked here;
/// the engine owns the operator set and rejects unknown names when the rule
/// set is compiled.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyFormatError {
    /// The document is not valid YAML, or its top-level shape is wrong.
    #[error("malformed rules document: {reason}")]
    Malformed { reason: String },

    /// The document has no `rules` list.
    #[error("rules document has no `rules` list")]
    MissingRules,

    /// A rule entry has no `id`. The index is zero-based document order.
    #[error("rule #{index} has no id")]
    MissingRuleId { index: usize },

    /// Two rule entries share an id.
    #[error("duplicate rule id: {rule_id}")]
    DuplicateRuleId { rule_id: String },

    /// A rule has no `match` block.
    #[error("rule {rule_id} has no match block")]
    MissingMatch { rule_id: String },

    /// A rule names a severity outside the closed set.
    #[error("unknown severity for rule {rule_id}: {value} (expected low|medium|high|critical)")]
    UnknownSeverity { rule_id: String, value: String },
}

/// Resolve the user-facing model into the rule set the engine evaluates.
///
/// Rule order is preserved; findings later cite rules in this order.
pub fn resolve_rules(doc: RulesDoc) -> Result<RuleSet, PolicyFormatError> {
    let Some(raw_rules) = doc.rules else {
        return Err(PolicyFormatError::MissingRules);
    };

    let mut seen: BTreeSet<String> = BTreeSet::new();
    let mut rules = Vec::with_capacity(raw_rules.len());
    for (index, raw) in raw_rules.into_iter().enumerate() {
        rules.push(resolve_rule(index, raw, &mut seen)?);
    }
    Ok(RuleSet { rules })
}

fn resolve_rule(
    index: usize,
    raw: RawRule,
    seen: &mut BTreeSet<String>,
) -> Result<Rule, PolicyFormatError> {
    let Some(id) = raw.id else {
        return Err(PolicyFormatError::MissingRuleId { index });
    };
    if !seen.insert(id.clone()) {
        return Err(PolicyFormatError::DuplicateRuleId { rule_id: id });
    }
    let Some(match_raw) = raw.match_block else {
        return Err(PolicyFormatError::MissingMatch { rule_id: id });
    };

    let severity = match raw.severity.as_deref() {
        None => Severity::default(),
        Some(text) => parse_severity(text).ok_or_else(|| PolicyFormatError::UnknownSeverity {
            rule_id: id.clone(),
            value: text.to_string(),
        })?,
    };

    Ok(Rule {
        title: raw.title.unwrap_or_else(|| id.clone()),
        severity,
        description: raw.description.unwrap_or_default(),
        when: raw.when.map(resolve_guard),
        match_block: resolve_condition(match_raw),
        id,
    })
}

fn parse_severity(text: &str) -> Option<Severity> {
    match text {
        "low" => Some(Severity::Low),
        "medium" => Some(Severity::Medium),
        "high" => Some(Severity::High),
        "critical" => Some(Severity::Critical),
        _ => None,
    }
}

fn resolve_guard(raw: RawGuard) -> Guard {
    match raw {
        RawGuard::All { all } => Guard::All(all.into_iter().map(resolve_condition).collect()),
        RawGuard::Any { any } => Guard::Any(any.into_iter().map(resolve_condition).collect()),
        RawGuard::Single(cond) => Guard::Single(resolve_condition(cond)),
    }
}

fn resolve_condition(raw: RawCondition) -> Condition {
    Condition {
        field: raw.field.unwrap_or_default(),
        op: raw.op.unwrap_or_default(),
        value: raw.value,
        values: raw.values,
    }
}
