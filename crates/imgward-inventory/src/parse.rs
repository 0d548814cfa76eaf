use anyhow::Context;
use imgward_types::{FieldValue, VmImageRow};
use serde::Deserialize;
use serde_json::Value;

use crate::classify::classify_image;

/// One raw snapshot row, as loose JSON.
///
/// Snapshot producers disagree on scalar types (numbers where strings are
/// expected, null for absent data), so every field is taken as an arbitrary
/// JSON value and coerced afterwards.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct RawVmRow {
    subscription_id: Value,
    resource_group: Value,
    location: Value,
    vm_name: Value,
    image_ref: Value,
    time_created: Value,
}

/// Parse an inventory snapshot (a JSON array of VM rows) into normalized rows.
///
/// Row order is preserved; it becomes record order during evaluation.
pub fn parse_snapshot(text: &str) -> anyhow::Result<Vec<VmImageRow>> {
    let raw: Vec<RawVmRow> = serde_json::from_str(text)
        .context("parse inventory snapshot (expected a JSON array of VM rows)")?;
    Ok(raw.into_iter().map(normalize_row).collect())
}

fn normalize_row(raw: RawVmRow) -> VmImageRow {
    let classified = classify_image(&raw.image_ref);
    VmImageRow {
        subscription_id: scalar_text(&raw.subscription_id),
        resource_group: scalar_text(&raw.resource_group),
        location: scalar_text(&raw.location),
        vm_name: scalar_text(&raw.vm_name),
        image_type: classified.image_type,
        image_id: classified.image_id,
        publisher: classified.publisher,
        offer: classified.offer,
        sku: classified.sku,
        version: classified.version,
        time_created: scalar_text(&raw.time_created),
    }
}

/// Coerce a loose JSON scalar through the record value model, so snapshot
/// fields read exactly like rule expectations do.
pub(crate) fn scalar_text(value: &Value) -> String {
    let scalar = match value {
        Value::String(s) => FieldValue::from(s.as_str()),
        Value::Number(n) => match n.as_i64() {
            Some(i) => FieldValue::Int(i),
            None => FieldValue::Float(n.as_f64().unwrap_or(0.0)),
        },
        Value::Bool(b) => FieldValue::Bool(*b),
        // null, arrays, and objects carry no scalar text
        _ => FieldValue::Null,
    };
    scalar.as_text().into_owned()
}
