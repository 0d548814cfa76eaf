//! Property-based tests for the evaluation engine.
//!
//! These tests use proptest to verify invariants around:
//! - Operator negation pairs (eq/ne, in/not_in, contains/not_contains)
//! - Output ordering and determinism of the driver
//! - The fail-open policy for unparseable timestamps

use crate::engine::evaluate_inventory;
use crate::policy::{Condition, Rule, RuleSet};
use imgward_types::{ids, Record, Severity};
use proptest::prelude::*;
use time::macros::datetime;
use time::OffsetDateTime;

fn now() -> OffsetDateTime {
    datetime!(2024-01-31 00:00:00 UTC)
}

// ============================================================================
// Strategies for generating arbitrary values
// ============================================================================

/// Strategy for catalog-ish field values: short printable tokens.
fn arb_text() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z0-9_.-]{0,16}").unwrap()
}

/// Strategy for one of the canonical record field names.
fn arb_field_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(ids::FIELD_LOCATION.to_string()),
        Just(ids::FIELD_OFFER.to_string()),
        Just(ids::FIELD_SKU.to_string()),
        Just(ids::FIELD_PUBLISHER.to_string()),
        Just(ids::FIELD_IMAGE_TYPE.to_string()),
    ]
}

/// Strategy for a record over the canonical fields.
fn arb_record() -> impl Strategy<Value = Record> {
    prop::collection::vec((arb_field_name(), arb_text()), 0..6).prop_map(|pairs| {
        let mut record = Record::new();
        for (name, value) in pairs {
            record.set(name, value);
        }
        record
    })
}

/// Strategy for the scalar comparison operator names.
fn arb_scalar_op() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(ids::OP_EQ.to_string()),
        Just(ids::OP_NE.to_string()),
        Just(ids::OP_CONTAINS.to_string()),
        Just(ids::OP_NOT_CONTAINS.to_string()),
        Just(ids::OP_STARTSWITH.to_string()),
        Just(ids::OP_ENDSWITH.to_string()),
    ]
}

/// Strategy for severities.
fn arb_severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
        Just(Severity::Critical),
    ]
}

fn scalar_condition(field: &str, op: &str, value: &str) -> Condition {
    Condition {
        field: field.to_string(),
        op: op.to_string(),
        value: Some(value.into()),
        values: None,
    }
}

fn single_rule(id: &str, severity: Severity, match_block: Condition) -> RuleSet {
    RuleSet {
        rules: vec![Rule {
            id: id.to_string(),
            title: id.to_string(),
            severity,
            description: String::new(),
            when: None,
            match_block,
        }],
    }
}

// ============================================================================
// Property tests: operator negation pairs
// ============================================================================

proptest! {
    /// For any record, `eq` and `ne` on the same inputs flag complementary
    /// record sets: exactly one of the two rules produces a finding.
    #[test]
    fn eq_and_ne_are_complementary(record in arb_record(), field in arb_field_name(), expected in arb_text()) {
        let records = vec![record];
        let eq = evaluate_inventory(&records, &single_rule("eq", Severity::Low, scalar_condition(&field, ids::OP_EQ, &expected)), now()).unwrap();
        let ne = evaluate_inventory(&records, &single_rule("ne", Severity::Low, scalar_condition(&field, ids::OP_NE, &expected)), now()).unwrap();
        prop_assert_eq!(eq.len() + ne.len(), 1, "exactly one of eq/ne must fail");
    }

    /// Same complementarity for contains/not_contains.
    #[test]
    fn contains_pair_is_complementary(record in arb_record(), field in arb_field_name(), fragment in arb_text()) {
        let records = vec![record];
        let pos = evaluate_inventory(&records, &single_rule("c", Severity::Low, scalar_condition(&field, ids::OP_CONTAINS, &fragment)), now()).unwrap();
        let neg = evaluate_inventory(&records, &single_rule("nc", Severity::Low, scalar_condition(&field, ids::OP_NOT_CONTAINS, &fragment)), now()).unwrap();
        prop_assert_eq!(pos.len() + neg.len(), 1);
    }

    /// Same complementarity for in/not_in over an arbitrary list.
    #[test]
    fn membership_pair_is_complementary(
        record in arb_record(),
        field in arb_field_name(),
        items in prop::collection::vec(arb_text(), 0..5),
    ) {
        let make = |op: &str| {
            let match_block = Condition {
                field: field.clone(),
                op: op.to_string(),
                value: None,
                values: Some(items.iter().map(|item| item.as_str().into()).collect()),
            };
            single_rule(op, Severity::Low, match_block)
        };
        let records = vec![record];
        let inside = evaluate_inventory(&records, &make(ids::OP_IN), now()).unwrap();
        let outside = evaluate_inventory(&records, &make(ids::OP_NOT_IN), now()).unwrap();
        prop_assert_eq!(inside.len() + outside.len(), 1);
    }
}

// ============================================================================
// Property tests: driver determinism and ordering
// ============================================================================

proptest! {
    /// Evaluating the same inputs twice yields identical findings.
    #[test]
    fn evaluation_is_deterministic(
        records in prop::collection::vec(arb_record(), 0..8),
        field in arb_field_name(),
        op in arb_scalar_op(),
        expected in arb_text(),
    ) {
        let rules = single_rule("r", Severity::Low, scalar_condition(&field, &op, &expected));
        let first = evaluate_inventory(&records, &rules, now()).unwrap();
        let second = evaluate_inventory(&records, &rules, now()).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Findings are bounded by records x rules and never deduplicated:
    /// duplicating the record list exactly doubles the findings.
    #[test]
    fn duplicate_records_double_the_findings(
        records in prop::collection::vec(arb_record(), 0..6),
        field in arb_field_name(),
        op in arb_scalar_op(),
        expected in arb_text(),
    ) {
        let rules = single_rule("r", Severity::Low, scalar_condition(&field, &op, &expected));
        let once = evaluate_inventory(&records, &rules, now()).unwrap();

        let mut doubled = records.clone();
        doubled.extend(records.iter().cloned());
        let twice = evaluate_inventory(&doubled, &rules, now()).unwrap();

        prop_assert_eq!(twice.len(), once.len() * 2);
        prop_assert!(once.len() <= records.len());
    }

    /// Every finding carries the severity of the rule that produced it, and
    /// the generated message quotes field, operator, and expected value.
    #[test]
    fn findings_carry_rule_severity_and_message_shape(
        records in prop::collection::vec(arb_record(), 1..6),
        field in arb_field_name(),
        op in arb_scalar_op(),
        expected in arb_text(),
        severity in arb_severity(),
    ) {
        let rules = single_rule("r", severity, scalar_condition(&field, &op, &expected));
        let findings = evaluate_inventory(&records, &rules, now()).unwrap();
        for finding in &findings {
            prop_assert_eq!(finding.severity, severity);
            prop_assert_eq!(&finding.field, &field);
            let want = format!("Rule failed: {} {} {}", field, op, expected);
            prop_assert_eq!(&finding.message, &want);
        }
    }
}

// ============================================================================
// Property tests: age comparisons fail open on bad data
// ============================================================================

proptest! {
    /// Whatever garbage sits in the timestamp field, an age rule never flags
    /// it; only parseable-and-old timestamps produce findings.
    #[test]
    fn age_rules_never_flag_unparseable_timestamps(garbage in "[a-zA-Z ]{0,20}", days in 0i64..400) {
        let mut record = Record::new();
        record.set(ids::FIELD_TIME_CREATED, garbage.as_str());
        let match_block = Condition {
            field: ids::FIELD_TIME_CREATED.to_string(),
            op: ids::OP_OLDER_THAN_DAYS.to_string(),
            value: Some(days.into()),
            values: None,
        };
        let findings = evaluate_inventory(
            &[record],
            &single_rule("age", Severity::Low, match_block),
            now(),
        )
        .unwrap();
        prop_assert!(findings.is_empty(), "garbage timestamp {:?} was flagged", garbage);
    }

    /// Ages floor to whole days, so the boundary sits at the next full day:
    /// `days` days old passes, even `days` days 23:59:59 old passes, and one
    /// more full day fails.
    #[test]
    fn age_threshold_is_a_whole_day_boundary(days in 1i64..365) {
        let stamp = |t: OffsetDateTime| {
            t.format(&time::format_description::well_known::Rfc3339).unwrap()
        };

        let match_block = Condition {
            field: ids::FIELD_TIME_CREATED.to_string(),
            op: ids::OP_OLDER_THAN_DAYS.to_string(),
            value: Some(days.into()),
            values: None,
        };
        let rules = single_rule("age", Severity::Low, match_block);

        let eval_stamp = |t: OffsetDateTime| {
            let mut record = Record::new();
            record.set(ids::FIELD_TIME_CREATED, stamp(t));
            evaluate_inventory(&[record], &rules, now()).unwrap().len()
        };

        prop_assert_eq!(eval_stamp(now() - time::Duration::days(days)), 0);
        prop_assert_eq!(
            eval_stamp(now() - time::Duration::days(days) - time::Duration::seconds(86_399)),
            0
        );
        prop_assert_eq!(eval_stamp(now() - time::Duration::days(days + 1)), 1);
    }
}
