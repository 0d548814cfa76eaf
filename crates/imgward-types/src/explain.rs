//! Explain registry for rule operators.
//!
//! Maps operator names to human-readable explanations with usage guidance, so
//! policy authors can discover semantics without reading engine code.

use crate::ids;

/// Explanation entry for a rule operator.
#[derive(Debug, Clone)]
pub struct Explanation {
    /// Short name of the operator.
    pub title: &'static str,
    /// What the operator compares and why it exists.
    pub description: &'static str,
    /// Edge-case behavior worth knowing when writing rules.
    pub notes: &'static str,
    /// A rule snippet using the operator.
    pub example: &'static str,
}

/// Look up an explanation by operator name.
///
/// Returns `None` if the name is not a recognized operator.
pub fn lookup_explanation(name: &str) -> Option<Explanation> {
    match name {
        ids::OP_EQ => Some(explain_eq()),
        ids::OP_NE => Some(explain_ne()),
        ids::OP_CONTAINS => Some(explain_contains()),
        ids::OP_NOT_CONTAINS => Some(explain_not_contains()),
        ids::OP_IN => Some(explain_in()),
        ids::OP_NOT_IN => Some(explain_not_in()),
        ids::OP_STARTSWITH => Some(explain_startswith()),
        ids::OP_ENDSWITH => Some(explain_endswith()),
        ids::OP_OLDER_THAN_DAYS => Some(explain_older_than_days()),
        _ => None,
    }
}

/// List all recognized operator names.
pub fn all_operator_names() -> &'static [&'static str] {
    &[
        ids::OP_EQ,
        ids::OP_NE,
        ids::OP_CONTAINS,
        ids::OP_NOT_CONTAINS,
        ids::OP_IN,
        ids::OP_NOT_IN,
        ids::OP_STARTSWITH,
        ids::OP_ENDSWITH,
        ids::OP_OLDER_THAN_DAYS,
    ]
}

fn explain_eq() -> Explanation {
    Explanation {
        title: "Equals",
        description: "\
Passes when the field's string form is exactly the expected value.

Both sides are coerced to strings before comparison, so `value: 22` matches a
field holding the text \"22\". Comparison is case-sensitive.",
        notes: "\
A missing field reads as the empty string, so `value: \"\"` matches records
that lack the field entirely.",
        example: r#"match:
  field: imageType
  op: eq
  value: marketplace"#,
    }
}

fn explain_ne() -> Explanation {
    Explanation {
        title: "Not Equals",
        description: "\
Passes when the field's string form differs from the expected value.

The exact negation of `eq`, including its string coercion and
case-sensitivity.",
        notes: "\
Because a missing field reads as the empty string, `ne` with a non-empty
expected value passes on records that lack the field.",
        example: r#"match:
  field: imageType
  op: ne
  value: unknown"#,
    }
}

fn explain_contains() -> Explanation {
    Explanation {
        title: "Contains",
        description: "\
Passes when the expected value occurs as a substring of the field's string
form.

Useful for matching fragments of resource IDs, offer names, or locations
without spelling out the full value.",
        notes: "\
An empty expected value is a substring of everything, so the condition always
passes. Matching is case-sensitive; catalog values keep their original
casing.",
        example: r#"match:
  field: offer
  op: contains
  value: ubuntu"#,
    }
}

fn explain_not_contains() -> Explanation {
    Explanation {
        title: "Not Contains",
        description: "\
Passes when the expected value does not occur in the field's string form.

The usual shape for deny-listing fragments: the rule fails (and produces a
finding) exactly on records whose field contains the fragment.",
        notes: "\
A missing field reads as the empty string and therefore contains nothing, so
records without the field pass.",
        example: r#"match:
  field: offer
  op: not_contains
  value: deprecated"#,
    }
}

fn explain_in() -> Explanation {
    Explanation {
        title: "In List",
        description: "\
Passes when the field's string form is a member of the expected list.

List elements are string-coerced before membership testing, so numeric and
quoted entries behave identically.",
        notes: "\
A scalar `value:` is treated as a one-element list. An empty or absent list
never matches, which makes a bare `in` with no list a rule that always fails.",
        example: r#"match:
  field: location
  op: in
  values: [eastus, westus]"#,
    }
}

fn explain_not_in() -> Explanation {
    Explanation {
        title: "Not In List",
        description: "\
Passes when the field's string form is absent from the expected list.

The exact negation of `in`, typically used to deny-list regions, publishers,
or SKUs.",
        notes: "\
With an empty or absent list nothing is a member, so the condition always
passes.",
        example: r#"match:
  field: location
  op: not_in
  values: [brazilsouth, southindia]"#,
    }
}

fn explain_startswith() -> Explanation {
    Explanation {
        title: "Starts With",
        description: "\
Passes when the field's string form begins with the expected value.

Handy for pinning publisher or SKU families that share a common prefix.",
        notes: "\
An empty expected value is a prefix of everything. Matching is
case-sensitive.",
        example: r#"match:
  field: sku
  op: startswith
  value: 22_04"#,
    }
}

fn explain_endswith() -> Explanation {
    Explanation {
        title: "Ends With",
        description: "\
Passes when the field's string form ends with the expected value.

Typically used for SKU suffixes such as LTS markers or architecture tags.",
        notes: "\
An empty expected value is a suffix of everything. Matching is
case-sensitive.",
        example: r#"match:
  field: sku
  op: endswith
  value: -lts"#,
    }
}

fn explain_older_than_days() -> Explanation {
    Explanation {
        title: "Older Than Days",
        description: "\
Compares the field's timestamp age against a whole-day threshold.

The expected value is an integer number of days. The field is parsed as an
ISO 8601 timestamp (a trailing `Z` means UTC; timestamps without an offset
are assumed UTC). The condition passes while the asset's age in whole days
is at or below the threshold and fails once the asset is strictly older, so
pairing it with `match:` flags stale images.",
        notes: "\
Missing or unparseable timestamps pass rather than fail: incomplete telemetry
is never flagged by this operator. Rules that must catch untracked assets
should pair it with an `eq`/`ne` check on the timestamp field itself. Age is
measured against the run's reference time, which the caller can pin for
reproducible audits.",
        example: r#"match:
  field: timeCreated
  op: older_than_days
  value: 90"#,
    }
}
