//! The closed operator set rules can dispatch on.
//!
//! Operator names are the tokens accepted in a rule's `op` key; the enum keeps
//! dispatch exhaustive so adding an operator forces every match site to be
//! revisited.

use imgward_types::ids;
use time::format_description::well_known::{Iso8601, Rfc3339};
use time::{Date, OffsetDateTime, PrimitiveDateTime};

/// A recognized rule operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    Eq,
    Ne,
    Contains,
    NotContains,
    In,
    NotIn,
    StartsWith,
    EndsWith,
    OlderThanDays,
}

impl Op {
    /// Resolve an `op` token. Returns `None` for anything outside the
    /// supported set; callers surface that as a configuration error.
    pub fn parse(name: &str) -> Option<Op> {
        match name {
            ids::OP_EQ => Some(Op::Eq),
            ids::OP_NE => Some(Op::Ne),
            ids::OP_CONTAINS => Some(Op::Contains),
            ids::OP_NOT_CONTAINS => Some(Op::NotContains),
            ids::OP_IN => Some(Op::In),
            ids::OP_NOT_IN => Some(Op::NotIn),
            ids::OP_STARTSWITH => Some(Op::StartsWith),
            ids::OP_ENDSWITH => Some(Op::EndsWith),
            ids::OP_OLDER_THAN_DAYS => Some(Op::OlderThanDays),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Op::Eq => ids::OP_EQ,
            Op::Ne => ids::OP_NE,
            Op::Contains => ids::OP_CONTAINS,
            Op::NotContains => ids::OP_NOT_CONTAINS,
            Op::In => ids::OP_IN,
            Op::NotIn => ids::OP_NOT_IN,
            Op::StartsWith => ids::OP_STARTSWITH,
            Op::EndsWith => ids::OP_ENDSWITH,
            Op::OlderThanDays => ids::OP_OLDER_THAN_DAYS,
        }
    }
}

impl std::fmt::Display for Op {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Parse a record timestamp leniently.
///
/// Accepts RFC 3339 (the catalog's native form, including a trailing `Z` and
/// sub-second precision), ISO 8601 date-times without an offset (assumed UTC),
/// and bare dates (midnight UTC). Returns `None` for empty or unparseable
/// input; age comparisons treat that as "no data", never as an error.
pub fn parse_timestamp(value: &str) -> Option<OffsetDateTime> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Rfc3339) {
        return Some(parsed);
    }
    if let Ok(parsed) = OffsetDateTime::parse(trimmed, &Iso8601::DEFAULT) {
        return Some(parsed);
    }
    if let Ok(parsed) = PrimitiveDateTime::parse(trimmed, &Iso8601::DEFAULT) {
        return Some(parsed.assume_utc());
    }
    if let Ok(parsed) = Date::parse(trimmed, &Iso8601::DEFAULT) {
        return Some(parsed.midnight().assume_utc());
    }
    None
}

/// Elapsed whole days between `then` and `now`, floored. Future timestamps
/// yield negative ages.
pub(crate) fn age_in_whole_days(now: OffsetDateTime, then: OffsetDateTime) -> i64 {
    (now - then).whole_seconds().div_euclid(86_400)
}
