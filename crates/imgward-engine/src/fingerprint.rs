use sha2::{Digest, Sha256};

/// Compute a stable SHA-256 fingerprint for a governance finding.
///
/// Identity fields:
/// - rule id
/// - subscription id
/// - resource group
/// - VM name
/// - the field the match failed on
pub fn finding_fingerprint(
    rule_id: &str,
    subscription_id: &str,
    resource_group: &str,
    vm_name: &str,
    field: &str,
) -> String {
    let parts = [rule_id, subscription_id, resource_group, vm_name, field];
    let canonical = parts.join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    let digest = hasher.finalize();
    hex::encode(digest)
}
