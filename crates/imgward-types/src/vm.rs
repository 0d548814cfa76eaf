use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::ids;
use crate::record::Record;

/// Provenance class of a VM's image reference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ImageType {
    Marketplace,
    ComputeGallery,
    ManagedImage,
    #[default]
    Unknown,
}

impl ImageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageType::Marketplace => "marketplace",
            ImageType::ComputeGallery => "compute_gallery",
            ImageType::ManagedImage => "managed_image",
            ImageType::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One VM's normalized image inventory row.
///
/// All attribute values are plain strings (missing catalog data reads as
/// empty), matching the flat-record contract the rule engine evaluates
/// against. Field order is the inventory CSV column order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VmImageRow {
    pub subscription_id: String,
    pub resource_group: String,
    pub location: String,
    pub vm_name: String,
    pub image_type: ImageType,
    pub image_id: String,
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    pub version: String,
    pub time_created: String,
}

impl VmImageRow {
    /// Flattens the row into the record shape the rule engine consumes.
    pub fn to_record(&self) -> Record {
        let mut record = Record::new();
        record.set(ids::FIELD_SUBSCRIPTION_ID, self.subscription_id.as_str());
        record.set(ids::FIELD_RESOURCE_GROUP, self.resource_group.as_str());
        record.set(ids::FIELD_LOCATION, self.location.as_str());
        record.set(ids::FIELD_VM_NAME, self.vm_name.as_str());
        record.set(ids::FIELD_IMAGE_TYPE, self.image_type.as_str());
        record.set(ids::FIELD_IMAGE_ID, self.image_id.as_str());
        record.set(ids::FIELD_PUBLISHER, self.publisher.as_str());
        record.set(ids::FIELD_OFFER, self.offer.as_str());
        record.set(ids::FIELD_SKU, self.sku.as_str());
        record.set(ids::FIELD_VERSION, self.version.as_str());
        record.set(ids::FIELD_TIME_CREATED, self.time_created.as_str());
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_type_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&ImageType::ComputeGallery).unwrap(),
            "\"compute_gallery\""
        );
        let t: ImageType = serde_json::from_str("\"managed_image\"").unwrap();
        assert_eq!(t, ImageType::ManagedImage);
    }

    #[test]
    fn to_record_covers_every_inventory_column() {
        let row = VmImageRow {
            subscription_id: "sub-1".into(),
            resource_group: "rg-app".into(),
            location: "eastus".into(),
            vm_name: "vm-web-01".into(),
            image_type: ImageType::Marketplace,
            image_id: String::new(),
            publisher: "Canonical".into(),
            offer: "0001-com-ubuntu-server-jammy".into(),
            sku: "22_04-lts".into(),
            version: "latest".into(),
            time_created: "2024-01-15T08:30:00Z".into(),
        };
        let record = row.to_record();
        assert_eq!(record.len(), ids::INVENTORY_COLUMNS.len());
        for column in ids::INVENTORY_COLUMNS {
            assert!(!record.get(column).is_null(), "missing column {column}");
        }
        assert_eq!(record.get_text(ids::FIELD_IMAGE_TYPE), "marketplace");
        assert_eq!(record.get_text(ids::FIELD_IMAGE_ID), "");
    }
}
