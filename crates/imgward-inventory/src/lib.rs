//! Inventory adapters: read catalog snapshots and classify VM image references.
//!
//! This crate is allowed to do filesystem IO, but only through
//! [`load_snapshot`]; parsing and classification are pure so they can be
//! exercised (and fuzzed) without touching disk. Querying a live catalog is
//! out of scope; callers hand this crate a snapshot file some exporter wrote.

#![forbid(unsafe_code)]

mod classify;
mod parse;

use anyhow::Context;
use camino::Utf8Path;
use imgward_types::VmImageRow;

pub use parse::parse_snapshot;

/// Read and parse an inventory snapshot file.
pub fn load_snapshot(path: &Utf8Path) -> anyhow::Result<Vec<VmImageRow>> {
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path))?;
    parse_snapshot(&text).with_context(|| format!("parse {}", path))
}

/// Fuzz-friendly API for testing parsing robustness without filesystem access.
/// These functions are designed to never panic on any input.
pub mod fuzz {
    use super::*;

    /// Parse arbitrary text as an inventory snapshot.
    ///
    /// Returns `Ok(row_count)` on a well-formed snapshot, `Err(...)` otherwise.
    /// **Never panics** on any input.
    pub fn parse_snapshot(text: &str) -> anyhow::Result<usize> {
        let rows = parse::parse_snapshot(text)?;
        Ok(rows.len())
    }
}
