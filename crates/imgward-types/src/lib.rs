//! Stable DTOs and IDs used across the imgward workspace.
//!
//! This crate is intentionally boring:
//! - the flat record abstraction rules evaluate against
//! - data types for the emitted audit report
//! - the normalized VM image inventory row
//! - stable field, operator, and column name constants
//! - explain registry for operator guidance

#![forbid(unsafe_code)]

pub mod explain;
pub mod ids;
pub mod record;
pub mod report;
pub mod vm;

pub use explain::{Explanation, all_operator_names, lookup_explanation};
pub use record::{FieldValue, Record};
pub use report::{
    AuditData, AuditReport, Finding, ReportEnvelope, Severity, SeverityCounts, ToolMeta, Verdict,
    SCHEMA_REPORT_V1,
};
pub use vm::{ImageType, VmImageRow};
