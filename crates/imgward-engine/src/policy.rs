//! Typed policy model: rules as resolved from a policy document.
//!
//! Loading and validation of the document live elsewhere; this is the shape
//! the evaluator consumes. `Condition.op` stays a raw token here so the
//! loader never has to know the operator set; the engine resolves tokens when
//! it compiles a rule set.

use imgward_types::{FieldValue, Severity};

/// A single declarative condition: field, operator token, expected value(s).
///
/// At most one of `value`/`values` is meaningful per operator; membership
/// operators read `values` (falling back to a one-element `value`), scalar
/// operators compare against `value`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Condition {
    pub field: String,
    pub op: String,
    pub value: Option<FieldValue>,
    pub values: Option<Vec<FieldValue>>,
}

/// Boolean pre-condition restricting which records a rule applies to.
#[derive(Clone, Debug, PartialEq)]
pub enum Guard {
    /// True iff every condition holds; vacuously true when empty.
    All(Vec<Condition>),
    /// True iff at least one condition holds; vacuously false when empty.
    Any(Vec<Condition>),
    /// A bare single condition.
    Single(Condition),
}

/// One governance rule.
///
/// `match_block` states the compliant condition: a finding is raised exactly
/// when the guard (if any) holds and the match evaluates false.
#[derive(Clone, Debug, PartialEq)]
pub struct Rule {
    pub id: String,
    pub title: String,
    pub severity: Severity,
    pub description: String,
    pub when: Option<Guard>,
    pub match_block: Condition,
}

/// An ordered rule list; evaluation preserves this order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RuleSet {
    pub rules: Vec<Rule>,
}

impl RuleSet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
