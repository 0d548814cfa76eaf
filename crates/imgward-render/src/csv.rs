use imgward_types::{ids, Finding, VmImageRow};

/// Render findings as CSV in the canonical 19-column order.
///
/// RFC 4180 dialect: CRLF row terminators, minimal quoting with doubled
/// quotes. The header row is always present, even for zero findings, so
/// downstream ingestion can tell "ran clean" from "never ran". The JSON-only
/// fingerprint is deliberately not a column.
pub fn findings_to_csv(findings: &[Finding]) -> String {
    let mut out = String::new();
    write_row(&mut out, ids::FINDINGS_COLUMNS.iter().copied());
    for finding in findings {
        write_row(&mut out, finding_fields(finding).into_iter());
    }
    out
}

/// Render inventory rows as CSV in the canonical 11-column order.
pub fn inventory_to_csv(rows: &[VmImageRow]) -> String {
    let mut out = String::new();
    write_row(&mut out, ids::INVENTORY_COLUMNS.iter().copied());
    for row in rows {
        write_row(&mut out, inventory_fields(row).into_iter());
    }
    out
}

fn finding_fields(f: &Finding) -> [&str; 19] {
    [
        f.rule_id.as_str(),
        f.severity.as_str(),
        f.title.as_str(),
        f.description.as_str(),
        f.subscription_id.as_str(),
        f.resource_group.as_str(),
        f.location.as_str(),
        f.vm_name.as_str(),
        f.image_type.as_str(),
        f.image_id.as_str(),
        f.publisher.as_str(),
        f.offer.as_str(),
        f.sku.as_str(),
        f.version.as_str(),
        f.time_created.as_str(),
        f.field.as_str(),
        f.actual.as_str(),
        f.expected.as_str(),
        f.message.as_str(),
    ]
}

fn inventory_fields(r: &VmImageRow) -> [&str; 11] {
    [
        r.subscription_id.as_str(),
        r.resource_group.as_str(),
        r.location.as_str(),
        r.vm_name.as_str(),
        r.image_type.as_str(),
        r.image_id.as_str(),
        r.publisher.as_str(),
        r.offer.as_str(),
        r.sku.as_str(),
        r.version.as_str(),
        r.time_created.as_str(),
    ]
}

fn write_row<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    let mut first = true;
    for field in fields {
        if !first {
            out.push(',');
        }
        first = false;
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if field.contains(['"', ',', '\r', '\n']) {
        out.push('"');
        for ch in field.chars() {
            if ch == '"' {
                out.push('"');
            }
            out.push(ch);
        }
        out.push('"');
    } else {
        out.push_str(field);
    }
}
