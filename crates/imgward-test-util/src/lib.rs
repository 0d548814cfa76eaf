//! Shared test utilities for the imgward workspace.
//!
//! This crate exists because the CLI golden-file tests need
//! `normalize_nondeterministic` as a real dependency (not behind
//! `#[cfg(test)]`), so a test module inside `imgward-types` would not
//! suffice.

use serde_json::Value;

/// Normalize non-deterministic JSON fields for golden-file comparison.
///
/// Two concerns are handled separately:
///
/// 1. **Root-only** — `tool.version` is replaced with `"__VERSION__"` only
///    when the *root* object looks like a report envelope (has all five keys:
///    `schema`, `tool`, `verdict`, `findings`, `data`).  This prevents
///    false normalization of nested objects that happen to share the same
///    shape.
///
/// 2. **Recursive** — timestamp keys (`started_at`, `finished_at`,
///    `evaluated_at`) are normalized at any depth because their placeholder
///    value is fixed and cannot collide with real data.
///
/// `evaluated_at` is covered even though audits can pin it with `--now`:
/// runtime-error reports stamp it from the wall clock.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    // Root-only: normalize tool.version if this is an envelope
    if let Some(obj) = value.as_object_mut() {
        let is_envelope = obj.contains_key("schema")
            && obj.contains_key("tool")
            && obj.contains_key("verdict")
            && obj.contains_key("findings")
            && obj.contains_key("data");
        if is_envelope
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("name")
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    // Recursive: timestamps at any depth
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in ["started_at", "finished_at", "evaluated_at"] {
                if map.contains_key(key) {
                    map.insert(key.to_string(), Value::String("__TIMESTAMP__".to_string()));
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}
