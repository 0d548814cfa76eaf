//! Rules document parsing and resolution into the engine's policy model.
//!
//! This crate is intentionally IO-free: it parses and resolves rule documents
//! provided as strings. Reading the rules file is the caller's job.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{RawCondition, RawGuard, RawRule, RulesDoc};
pub use resolve::{resolve_rules, PolicyFormatError};

use imgward_engine::policy::RuleSet;

/// Parse a rules document (`rules.yaml` or equivalent) into the permissive
/// user-facing model.
pub fn parse_rules_doc(input: &str) -> Result<RulesDoc, PolicyFormatError> {
    serde_yaml::from_str(input).map_err(|err| PolicyFormatError::Malformed {
        reason: err.to_string(),
    })
}

/// Parse and resolve a rules document into the rule set the engine evaluates.
pub fn parse_rules_yaml(input: &str) -> Result<RuleSet, PolicyFormatError> {
    resolve_rules(parse_rules_doc(input)?)
}

/// Fuzz-friendly API for testing parsing robustness without a rules file on disk.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse and resolve arbitrary text as a rules document.
    ///
    /// Returns `Ok(rule_count)` when the text is a well-formed rules document,
    /// `Err(...)` otherwise. **Never panics** on any input.
    pub fn parse_rules(text: &str) -> Result<usize, PolicyFormatError> {
        let rules = parse_rules_yaml(text)?;
        Ok(rules.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use imgward_engine::policy::Guard;
    use imgward_types::{FieldValue, Record, Severity};
    use proptest::prelude::*;

    #[test]
    fn parses_a_full_rule() {
        let rules = parse_rules_yaml(
            r#"
schema: imgward.rules.v1
rules:
  - id: no-deprecated-offer
    title: Offer must not be deprecated
    severity: high
    description: Deprecated offers stop receiving security patches.
    when:
      field: imageType
      op: eq
      value: marketplace
    match:
      field: offer
      op: not_contains
      value: deprecated
"#,
        )
        .expect("parse rules");

        assert_eq!(rules.len(), 1);
        let rule = &rules.rules[0];
        assert_eq!(rule.id, "no-deprecated-offer");
        assert_eq!(rule.title, "Offer must not be deprecated");
        assert_eq!(rule.severity, Severity::High);
        assert_eq!(
            rule.description,
            "Deprecated offers stop receiving security patches."
        );
        assert!(matches!(rule.when, Some(Guard::Single(_))));
        assert_eq!(rule.match_block.field, "offer");
        assert_eq!(rule.match_block.op, "not_contains");
        assert_eq!(
            rule.match_block.value,
            Some(FieldValue::Str("deprecated".to_string()))
        );
        assert_eq!(rule.match_block.values, None);
    }

    #[test]
    fn defaults_title_severity_and_description() {
        let rules = parse_rules_yaml(
            r#"
rules:
  - id: r1
    match: { field: offer, op: eq, value: ok }
"#,
        )
        .expect("parse rules");

        let rule = &rules.rules[0];
        assert_eq!(rule.title, "r1");
        assert_eq!(rule.severity, Severity::Low);
        assert_eq!(rule.description, "");
        assert!(rule.when.is_none());
    }

    #[test]
    fn preserves_rule_order() {
        let rules = parse_rules_yaml(
            r#"
rules:
  - id: zebra
    match: { op: eq }
  - id: alpha
    match: { op: eq }
"#,
        )
        .expect("parse rules");

        let ids: Vec<&str> = rules.rules.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["zebra", "alpha"]);
    }

    #[test]
    fn guard_all_and_any_forms() {
        let rules = parse_rules_yaml(
            r#"
rules:
  - id: all-guard
    when:
      all:
        - { field: imageType, op: eq, value: marketplace }
        - { field: publisher, op: eq, value: Canonical }
    match: { field: offer, op: ne, value: bad }
  - id: any-guard
    when:
      any:
        - { field: location, op: eq, value: eastus }
        - { field: location, op: eq, value: westus }
    match: { field: offer, op: ne, value: bad }
"#,
        )
        .expect("parse rules");

        match &rules.rules[0].when {
            Some(Guard::All(conds)) => assert_eq!(conds.len(), 2),
            other => panic!("expected all guard, got {other:?}"),
        }
        match &rules.rules[1].when {
            Some(Guard::Any(conds)) => assert_eq!(conds.len(), 2),
            other => panic!("expected any guard, got {other:?}"),
        }
    }

    #[test]
    fn guard_with_both_keys_reads_as_all() {
        let rules = parse_rules_yaml(
            r#"
rules:
  - id: r1
    when:
      all:
        - { field: imageType, op: eq, value: marketplace }
      any:
        - { field: location, op: eq, value: eastus }
    match: { op: eq }
"#,
        )
        .expect("parse rules");

        assert!(matches!(rules.rules[0].when, Some(Guard::All(_))));
    }

    #[test]
    fn condition_defaults_and_typed_values() {
        let rules = parse_rules_yaml(
            r#"
rules:
  - id: r1
    match:
      field: version
      op: in
      values: [latest, 22, 1.5, true]
  - id: r2
    match:
      op: older_than_days
      value: 180
  - id: r3
    match:
      field: sku
      op: eq
      value: ~
"#,
        )
        .expect("parse rules");

        assert_eq!(
            rules.rules[0].match_block.values,
            Some(vec![
                FieldValue::Str("latest".to_string()),
                FieldValue::Int(22),
                FieldValue::Float(1.5),
                FieldValue::Bool(true),
            ])
        );
        // Missing field defaults to the empty string.
        assert_eq!(rules.rules[1].match_block.field, "");
        assert_eq!(rules.rules[1].match_block.value, Some(FieldValue::Int(180)));
        // An explicit null reads the same as an absent value.
        assert_eq!(rules.rules[2].match_block.value, None);
    }

    #[test]
    fn empty_rules_list_is_an_empty_rule_set() {
        let rules = parse_rules_yaml("rules: []").expect("parse rules");
        assert!(rules.is_empty());
    }

    #[test]
    fn unknown_keys_are_tolerated() {
        let rules = parse_rules_yaml(
            r#"
rules:
  - id: r1
    owner: platform-team
    match: { field: offer, op: eq, value: ok, note: ignored }
"#,
        )
        .expect("parse rules");
        assert_eq!(rules.len(), 1);
    }

    #[test]
    fn invalid_yaml_is_malformed() {
        let err = parse_rules_yaml("rules: [unclosed").expect_err("must fail");
        assert!(matches!(err, PolicyFormatError::Malformed { .. }));
    }

    #[test]
    fn top_level_list_is_malformed() {
        let err = parse_rules_yaml("- id: r1").expect_err("must fail");
        assert!(matches!(err, PolicyFormatError::Malformed { .. }));
    }

    #[test]
    fn missing_rules_list_is_rejected() {
        let err = parse_rules_yaml("schema: imgward.rules.v1").expect_err("must fail");
        assert_eq!(err, PolicyFormatError::MissingRules);

        let err = parse_rules_yaml("rules: ~").expect_err("must fail");
        assert_eq!(err, PolicyFormatError::MissingRules);
    }

    #[test]
    fn rule_without_id_is_rejected_with_its_index() {
        let err = parse_rules_yaml(
            r#"
rules:
  - id: r1
    match: { op: eq }
  - match: { op: eq }
"#,
        )
        .expect_err("must fail");
        assert_eq!(err, PolicyFormatError::MissingRuleId { index: 1 });
        assert_eq!(err.to_string(), "rule #1 has no id");
    }

    #[test]
    fn duplicate_rule_ids_are_rejected() {
        let err = parse_rules_yaml(
            r#"
rules:
  - id: r1
    match: { op: eq }
  - id: r1
    match: { op: ne }
"#,
        )
        .expect_err("must fail");
        assert_eq!(
            err,
            PolicyFormatError::DuplicateRuleId {
                rule_id: "r1".to_string()
            }
        );
    }

    #[test]
    fn rule_without_match_is_rejected() {
        let err = parse_rules_yaml(
            r#"
rules:
  - id: r1
    when: { field: imageType, op: eq, value: marketplace }
"#,
        )
        .expect_err("must fail");
        assert_eq!(
            err,
            PolicyFormatError::MissingMatch {
                rule_id: "r1".to_string()
            }
        );
        assert_eq!(err.to_string(), "rule r1 has no match block");
    }

    #[test]
    fn unknown_severity_is_rejected() {
        let err = parse_rules_yaml(
            r#"
rules:
  - id: r1
    severity: urgent
    match: { op: eq }
"#,
        )
        .expect_err("must fail");
        assert_eq!(
            err.to_string(),
            "unknown severity for rule r1: urgent (expected low|medium|high|critical)"
        );
    }

    #[test]
    fn operator_names_are_not_validated_here() {
        let rules = parse_rules_yaml(
            r#"
rules:
  - id: r1
    match: { field: offer, op: matches_regex, value: ".*" }
"#,
        )
        .expect("loader accepts unknown operators");
        assert_eq!(rules.rules[0].match_block.op, "matches_regex");
    }

    #[test]
    fn resolved_rules_drive_the_engine() {
        let rules = parse_rules_yaml(
            r#"
rules:
  - id: no-deprecated-offer
    severity: high
    match: { field: offer, op: not_contains, value: deprecated }
"#,
        )
        .expect("parse rules");

        let record: Record = [("offer", FieldValue::from("deprecated-offer-2019"))]
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();

        let findings =
            imgward_engine::evaluate_inventory(&[record], &rules, time::OffsetDateTime::UNIX_EPOCH)
                .expect("evaluate");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].rule_id, "no-deprecated-offer");
        assert_eq!(findings[0].expected, "deprecated");
    }

    proptest! {
        #[test]
        fn fuzz_parser_never_panics(input in ".*") {
            let _ = fuzz::parse_rules(&input);
        }
    }
}
