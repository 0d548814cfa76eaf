//! Stable identifiers for record fields, rule operators, and report columns.
//!
//! Field names mirror the resource-catalog projection verbatim (camelCase);
//! operator names are the tokens accepted in a rule's `op` key.

// Record fields (catalog projection order)
pub const FIELD_SUBSCRIPTION_ID: &str = "subscriptionId";
pub const FIELD_RESOURCE_GROUP: &str = "resourceGroup";
pub const FIELD_LOCATION: &str = "location";
pub const FIELD_VM_NAME: &str = "vmName";
pub const FIELD_IMAGE_TYPE: &str = "imageType";
pub const FIELD_IMAGE_ID: &str = "imageId";
pub const FIELD_PUBLISHER: &str = "publisher";
pub const FIELD_OFFER: &str = "offer";
pub const FIELD_SKU: &str = "sku";
pub const FIELD_VERSION: &str = "version";
pub const FIELD_TIME_CREATED: &str = "timeCreated";

// Operators
pub const OP_EQ: &str = "eq";
pub const OP_NE: &str = "ne";
pub const OP_CONTAINS: &str = "contains";
pub const OP_NOT_CONTAINS: &str = "not_contains";
pub const OP_IN: &str = "in";
pub const OP_NOT_IN: &str = "not_in";
pub const OP_STARTSWITH: &str = "startswith";
pub const OP_ENDSWITH: &str = "endswith";
pub const OP_OLDER_THAN_DAYS: &str = "older_than_days";

// Tool-level (runtime-error reporting)
pub const RULE_TOOL_RUNTIME: &str = "tool.runtime";

/// Inventory CSV column order.
pub const INVENTORY_COLUMNS: [&str; 11] = [
    FIELD_SUBSCRIPTION_ID,
    FIELD_RESOURCE_GROUP,
    FIELD_LOCATION,
    FIELD_VM_NAME,
    FIELD_IMAGE_TYPE,
    FIELD_IMAGE_ID,
    FIELD_PUBLISHER,
    FIELD_OFFER,
    FIELD_SKU,
    FIELD_VERSION,
    FIELD_TIME_CREATED,
];

/// Findings CSV column order: rule metadata, then the record projection, then
/// the match-failure detail.
pub const FINDINGS_COLUMNS: [&str; 19] = [
    "ruleId",
    "severity",
    "title",
    "description",
    FIELD_SUBSCRIPTION_ID,
    FIELD_RESOURCE_GROUP,
    FIELD_LOCATION,
    FIELD_VM_NAME,
    FIELD_IMAGE_TYPE,
    FIELD_IMAGE_ID,
    FIELD_PUBLISHER,
    FIELD_OFFER,
    FIELD_SKU,
    FIELD_VERSION,
    FIELD_TIME_CREATED,
    "field",
    "actual",
    "expected",
    "message",
];
