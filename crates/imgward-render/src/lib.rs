//! Deterministic renderers for audit output: findings CSV, inventory CSV, and
//! a Markdown summary. Everything here is a pure string transform; callers
//! decide where the bytes go.

#![forbid(unsafe_code)]

mod csv;
mod markdown;

pub use csv::{findings_to_csv, inventory_to_csv};
pub use markdown::render_markdown;
