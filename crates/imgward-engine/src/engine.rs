use imgward_types::{ids, FieldValue, Finding, Record};
use time::OffsetDateTime;

use crate::fingerprint::finding_fingerprint;
use crate::op::{self, Op};
use crate::policy::{Condition, Guard, Rule, RuleSet};

/// Rule-set problems that abort an evaluation run.
///
/// Raised while compiling the rule set, before any record is looked at, so a
/// run never produces partial findings alongside one of these.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("unsupported operator: {op} (rule {rule_id})")]
    UnsupportedOperator { rule_id: String, op: String },
    #[error("invalid older_than_days threshold {value:?} (rule {rule_id})")]
    InvalidAgeThreshold { rule_id: String, value: String },
}

/// Evaluate every record against every rule, in document order.
///
/// For each (record, rule) pair: a rule with a `when` guard that evaluates
/// false is skipped for that record; otherwise a false `match` produces a
/// finding. Output order is record-order outer, rule-order inner, with no
/// sorting or dedup, so reruns over the same inputs are byte-identical.
pub fn evaluate_inventory(
    records: &[Record],
    rules: &RuleSet,
    now: OffsetDateTime,
) -> Result<Vec<Finding>, ConfigurationError> {
    let compiled = compile(rules)?;

    let mut findings: Vec<Finding> = Vec::new();
    for record in records {
        for rule in &compiled {
            if let Some(guard) = &rule.when
                && !eval_guard(guard, record, now)
            {
                continue;
            }
            if eval_condition(&rule.match_block, record, now) {
                continue;
            }
            findings.push(build_finding(rule.rule, rule.match_block.cond, record));
        }
    }
    Ok(findings)
}

// --- Compilation ------------------------------------------------------------

struct CompiledRule<'a> {
    rule: &'a Rule,
    when: Option<CompiledGuard<'a>>,
    match_block: CompiledCondition<'a>,
}

enum CompiledGuard<'a> {
    All(Vec<CompiledCondition<'a>>),
    Any(Vec<CompiledCondition<'a>>),
    Single(CompiledCondition<'a>),
}

struct CompiledCondition<'a> {
    cond: &'a Condition,
    test: CompiledTest,
}

/// A condition with its operator token resolved and its expected value
/// pre-shaped for the operator family.
enum CompiledTest {
    Eq(String),
    Ne(String),
    Contains(String),
    NotContains(String),
    StartsWith(String),
    EndsWith(String),
    In(Vec<String>),
    NotIn(Vec<String>),
    OlderThanDays(i64),
}

fn compile<'a>(rules: &'a RuleSet) -> Result<Vec<CompiledRule<'a>>, ConfigurationError> {
    rules.rules.iter().map(compile_rule).collect()
}

fn compile_rule(rule: &Rule) -> Result<CompiledRule<'_>, ConfigurationError> {
    let when = match &rule.when {
        Some(Guard::All(conds)) => Some(CompiledGuard::All(compile_conditions(&rule.id, conds)?)),
        Some(Guard::Any(conds)) => Some(CompiledGuard::Any(compile_conditions(&rule.id, conds)?)),
        Some(Guard::Single(cond)) => Some(CompiledGuard::Single(compile_condition(&rule.id, cond)?)),
        None => None,
    };
    let match_block = compile_condition(&rule.id, &rule.match_block)?;
    Ok(CompiledRule {
        rule,
        when,
        match_block,
    })
}

fn compile_conditions<'a>(
    rule_id: &str,
    conds: &'a [Condition],
) -> Result<Vec<CompiledCondition<'a>>, ConfigurationError> {
    conds
        .iter()
        .map(|cond| compile_condition(rule_id, cond))
        .collect()
}

fn compile_condition<'a>(
    rule_id: &str,
    cond: &'a Condition,
) -> Result<CompiledCondition<'a>, ConfigurationError> {
    let Some(op) = Op::parse(&cond.op) else {
        return Err(ConfigurationError::UnsupportedOperator {
            rule_id: rule_id.to_string(),
            op: cond.op.clone(),
        });
    };
    let test = match op {
        Op::Eq => CompiledTest::Eq(eval_expected_text(cond)),
        Op::Ne => CompiledTest::Ne(eval_expected_text(cond)),
        Op::Contains => CompiledTest::Contains(eval_expected_text(cond)),
        Op::NotContains => CompiledTest::NotContains(eval_expected_text(cond)),
        Op::StartsWith => CompiledTest::StartsWith(eval_expected_text(cond)),
        Op::EndsWith => CompiledTest::EndsWith(eval_expected_text(cond)),
        Op::In => CompiledTest::In(membership_items(cond)),
        Op::NotIn => CompiledTest::NotIn(membership_items(cond)),
        Op::OlderThanDays => CompiledTest::OlderThanDays(age_threshold(rule_id, cond)?),
    };
    Ok(CompiledCondition { cond, test })
}

/// Expected value as the scalar operators compare it: `values` (rendered as a
/// bracketed list) takes precedence over `value`; absent reads as empty.
fn eval_expected_text(cond: &Condition) -> String {
    if let Some(values) = &cond.values {
        render_values(values)
    } else if let Some(value) = &cond.value {
        value.as_text().into_owned()
    } else {
        String::new()
    }
}

/// Expected list for the membership operators. A scalar `value` acts as a
/// one-element list; nothing at all is the empty list.
fn membership_items(cond: &Condition) -> Vec<String> {
    if let Some(values) = &cond.values {
        values.iter().map(|v| v.as_text().into_owned()).collect()
    } else if let Some(value) = &cond.value {
        vec![value.as_text().into_owned()]
    } else {
        Vec::new()
    }
}

fn age_threshold(rule_id: &str, cond: &Condition) -> Result<i64, ConfigurationError> {
    let invalid = |shown: String| ConfigurationError::InvalidAgeThreshold {
        rule_id: rule_id.to_string(),
        value: shown,
    };
    if let Some(values) = &cond.values {
        return Err(invalid(render_values(values)));
    }
    match &cond.value {
        Some(FieldValue::Int(days)) => Ok(*days),
        Some(FieldValue::Float(days)) if days.is_finite() => Ok(*days as i64),
        Some(FieldValue::Str(raw)) => raw
            .trim()
            .parse::<i64>()
            .map_err(|_| invalid(raw.clone())),
        Some(other) => Err(invalid(other.as_text().into_owned())),
        None => Err(invalid(String::new())),
    }
}

fn render_values(values: &[FieldValue]) -> String {
    let items: Vec<_> = values.iter().map(|v| v.as_text()).collect();
    format!("[{}]", items.join(", "))
}

// --- Evaluation -------------------------------------------------------------

fn eval_guard(guard: &CompiledGuard<'_>, record: &Record, now: OffsetDateTime) -> bool {
    match guard {
        CompiledGuard::All(conds) => conds.iter().all(|c| eval_condition(c, record, now)),
        CompiledGuard::Any(conds) => conds.iter().any(|c| eval_condition(c, record, now)),
        CompiledGuard::Single(cond) => eval_condition(cond, record, now),
    }
}

fn eval_condition(cc: &CompiledCondition<'_>, record: &Record, now: OffsetDateTime) -> bool {
    let actual = record.get_text(&cc.cond.field);
    match &cc.test {
        CompiledTest::Eq(expected) => actual == expected.as_str(),
        CompiledTest::Ne(expected) => actual != expected.as_str(),
        CompiledTest::Contains(expected) => actual.contains(expected.as_str()),
        CompiledTest::NotContains(expected) => !actual.contains(expected.as_str()),
        CompiledTest::StartsWith(expected) => actual.starts_with(expected.as_str()),
        CompiledTest::EndsWith(expected) => actual.ends_with(expected.as_str()),
        CompiledTest::In(items) => items.iter().any(|item| item == actual.as_ref()),
        CompiledTest::NotIn(items) => !items.iter().any(|item| item == actual.as_ref()),
        // Missing or unparseable timestamps pass: incomplete telemetry is
        // never flagged by age rules.
        CompiledTest::OlderThanDays(days) => match op::parse_timestamp(&actual) {
            Some(created) => op::age_in_whole_days(now, created) <= *days,
            None => true,
        },
    }
}

// --- Finding construction ---------------------------------------------------

/// Expected value as reported in the finding: `value` takes precedence over
/// `values` here, mirroring how the failure message reads.
fn expected_detail(cond: &Condition) -> String {
    if let Some(value) = &cond.value {
        value.as_text().into_owned()
    } else if let Some(values) = &cond.values {
        render_values(values)
    } else {
        String::new()
    }
}

fn build_finding(rule: &Rule, match_cond: &Condition, record: &Record) -> Finding {
    let expected = expected_detail(match_cond);
    let message = format!(
        "Rule failed: {} {} {}",
        match_cond.field, match_cond.op, expected
    );
    let subscription_id = record.get_text(ids::FIELD_SUBSCRIPTION_ID).into_owned();
    let resource_group = record.get_text(ids::FIELD_RESOURCE_GROUP).into_owned();
    let vm_name = record.get_text(ids::FIELD_VM_NAME).into_owned();
    let fingerprint = finding_fingerprint(
        &rule.id,
        &subscription_id,
        &resource_group,
        &vm_name,
        &match_cond.field,
    );

    Finding {
        rule_id: rule.id.clone(),
        severity: rule.severity,
        title: rule.title.clone(),
        description: rule.description.clone(),
        subscription_id,
        resource_group,
        location: record.get_text(ids::FIELD_LOCATION).into_owned(),
        vm_name,
        image_type: record.get_text(ids::FIELD_IMAGE_TYPE).into_owned(),
        image_id: record.get_text(ids::FIELD_IMAGE_ID).into_owned(),
        publisher: record.get_text(ids::FIELD_PUBLISHER).into_owned(),
        offer: record.get_text(ids::FIELD_OFFER).into_owned(),
        sku: record.get_text(ids::FIELD_SKU).into_owned(),
        version: record.get_text(ids::FIELD_VERSION).into_owned(),
        time_created: record.get_text(ids::FIELD_TIME_CREATED).into_owned(),
        field: match_cond.field.clone(),
        actual: record.get_text(&match_cond.field).into_owned(),
        expected,
        message,
        fingerprint: Some(fingerprint),
    }
}
