//! Fuzz target for rule evaluation over arbitrary policies and records.
//!
//! Goal: `evaluate_inventory` should **never panic**. Unknown operators and
//! bad age thresholds must surface as configuration errors, not crashes.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_rule_eval
//! ```

#![no_main]

use arbitrary::Arbitrary;
use imgward_engine::evaluate_inventory;
use imgward_engine::policy::{Condition, Guard, Rule, RuleSet};
use imgward_types::{FieldValue, Record, Severity};
use libfuzzer_sys::fuzz_target;

/// Operator table the generator draws from. The trailing entries are not real
/// operators, so compile-time rejection gets fuzzed alongside evaluation.
const OPS: &[&str] = &[
    "eq",
    "ne",
    "contains",
    "not_contains",
    "startswith",
    "endswith",
    "in",
    "not_in",
    "older_than_days",
    "matches_regex",
    "",
];

#[derive(Arbitrary, Debug)]
enum ValueInput {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
}

impl ValueInput {
    fn into_field_value(self) -> FieldValue {
        match self {
            ValueInput::Str(s) => FieldValue::Str(s),
            ValueInput::Int(i) => FieldValue::Int(i),
            ValueInput::Float(f) => FieldValue::Float(f),
            ValueInput::Bool(b) => FieldValue::Bool(b),
        }
    }
}

#[derive(Arbitrary, Debug)]
struct ConditionInput {
    field: String,
    op: u8,
    value: Option<ValueInput>,
    values: Option<Vec<ValueInput>>,
}

impl ConditionInput {
    fn into_condition(self) -> Condition {
        Condition {
            field: self.field,
            op: OPS[self.op as usize % OPS.len()].to_string(),
            value: self.value.map(ValueInput::into_field_value),
            values: self
                .values
                .map(|vs| vs.into_iter().map(ValueInput::into_field_value).collect()),
        }
    }
}

#[derive(Arbitrary, Debug)]
struct RuleInput {
    id: String,
    severity: u8,
    guard_mode: u8,
    guard: Option<Vec<ConditionInput>>,
    match_block: ConditionInput,
}

impl RuleInput {
    fn into_rule(self) -> Rule {
        let when = self.guard.map(|conds| {
            let conds: Vec<Condition> = conds
                .into_iter()
                .take(8)
                .map(ConditionInput::into_condition)
                .collect();
            match self.guard_mode % 3 {
                0 => Guard::All(conds),
                1 => Guard::Any(conds),
                _ => Guard::Single(conds.into_iter().next().unwrap_or_default()),
            }
        });
        Rule {
            title: self.id.clone(),
            severity: match self.severity % 4 {
                0 => Severity::Low,
                1 => Severity::Medium,
                2 => Severity::High,
                _ => Severity::Critical,
            },
            description: String::new(),
            when,
            match_block: self.match_block.into_condition(),
            id: self.id,
        }
    }
}

/// Structured input for evaluation fuzzing.
/// Using Arbitrary allows libFuzzer to generate more meaningful test cases.
#[derive(Arbitrary, Debug)]
struct EngineInput {
    rules: Vec<RuleInput>,
    records: Vec<Vec<(String, ValueInput)>>,
}

fuzz_target!(|input: EngineInput| {
    // Limit input size to avoid OOM and keep fuzzing fast
    if input.rules.len() > 20 || input.records.len() > 50 {
        return;
    }

    let rules = RuleSet {
        rules: input.rules.into_iter().map(RuleInput::into_rule).collect(),
    };

    let records: Vec<Record> = input
        .records
        .into_iter()
        .map(|fields| {
            fields
                .into_iter()
                .take(32)
                .map(|(name, value)| (name, value.into_field_value()))
                .collect()
        })
        .collect();

    // Should never panic - configuration errors are fine
    let _ = evaluate_inventory(&records, &rules, time::OffsetDateTime::UNIX_EPOCH);
});
