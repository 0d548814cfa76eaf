//! Pure governance rule evaluation (no IO).
//!
//! Input: normalized flat records and a typed rule set constructed elsewhere.
//! Output: findings in record-order outer, rule-order inner. The engine never
//! sorts, truncates, or deduplicates; what the rules say is what comes out.

#![forbid(unsafe_code)]

pub mod op;
pub mod policy;

mod engine;
mod fingerprint;

pub use engine::{evaluate_inventory, ConfigurationError};
pub use fingerprint::finding_fingerprint;
pub use op::Op;

#[cfg(test)]
mod proptest;
