//! Use case orchestration for imgward.
//!
//! This crate provides the application layer: use cases that coordinate the
//! rules, inventory, and engine layers. It is intentionally thin and delegates
//! heavy lifting to the appropriate layers.
//!
//! The CLI crate depends on this; it only handles argument parsing and I/O.

#![forbid(unsafe_code)]

mod audit;
mod explain;
mod report;

pub use audit::{run_audit, verdict_exit_code, verdict_for, AuditInput, AuditOutput, FailOn};
pub use explain::{format_explanation, format_not_found, run_explain, ExplainOutput};
pub use report::{parse_report_json, runtime_error_report, serialize_report};
