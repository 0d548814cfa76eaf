use imgward_types::FieldValue;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Rules file schema (`rules.yaml`).
///
/// This is a *user-facing* model: it is intentionally permissive so that shape
/// problems surface as resolution errors naming the offending rule instead of
/// opaque deserialization failures.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RulesDoc {
    /// Optional schema string for tooling (`imgward.rules.v1`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// The rule list. A document without one is rejected at resolution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<RawRule>>,
}

/// One governance rule as written in the rules file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawRule {
    /// Stable identifier. Required; findings and loader errors cite it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Human headline. Defaults to the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// `low` (default), `medium`, `high`, or `critical`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub severity: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Optional guard: the rule only applies to records the guard accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<RawGuard>,

    /// The compliant condition every guarded record must satisfy. Required.
    #[serde(default, rename = "match", skip_serializing_if = "Option::is_none")]
    pub match_block: Option<RawCondition>,
}

/// Guard block: `all:`, `any:`, or a bare condition mapping.
///
/// Variants are tried in declaration order, so a mapping carrying both `all`
/// and `any` keys reads as `all`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
pub enum RawGuard {
    All { all: Vec<RawCondition> },
    Any { any: Vec<RawCondition> },
    Single(RawCondition),
}

/// One comparison as written in the rules file.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RawCondition {
    /// Record field to inspect. Defaults to the empty string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,

    /// Operator name. Resolution keeps it verbatim; the engine rejects names
    /// it does not know when the rule set is compiled.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub op: Option<String>,

    /// Scalar expectation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<FieldValue>,

    /// List expectation. Takes precedence over `value` during evaluation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<FieldValue>>,
}
