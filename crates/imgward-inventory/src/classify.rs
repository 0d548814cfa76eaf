use imgward_types::ImageType;
use serde_json::Value;

use crate::parse::scalar_text;

/// Image attributes extracted from a VM's `imageRef` block.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct ClassifiedImage {
    pub image_type: ImageType,
    pub image_id: String,
    pub publisher: String,
    pub offer: String,
    pub sku: String,
    pub version: String,
}

/// Classify a VM image reference.
///
/// Catalogs emit two shapes: a marketplace-style reference
/// (`publisher`/`offer`/`sku`/`version`) or a resource-id reference
/// (`id: ".../galleries/.../versions/..."` for gallery images,
/// `id: ".../images/..."` for managed images). A resource id wins over any
/// marketplace fields riding along in the same block, which are then dropped
/// so findings never mix the two provenances.
pub(crate) fn classify_image(image_ref: &Value) -> ClassifiedImage {
    let Some(fields) = image_ref.as_object() else {
        return ClassifiedImage::default();
    };
    if fields.is_empty() {
        return ClassifiedImage::default();
    }

    let image_id = trimmed(fields.get("id"));
    let publisher = trimmed(fields.get("publisher"));
    let offer = trimmed(fields.get("offer"));
    let sku = trimmed(fields.get("sku"));
    let version = trimmed(fields.get("version"));

    if !image_id.is_empty() {
        // Id matching is case-insensitive; the reported id keeps its original case.
        let lowered = image_id.to_lowercase();
        let image_type = if lowered.contains("/galleries/") && lowered.contains("/versions/") {
            ImageType::ComputeGallery
        } else if lowered.contains("/images/") {
            ImageType::ManagedImage
        } else {
            ImageType::Unknown
        };
        return ClassifiedImage {
            image_type,
            image_id,
            ..ClassifiedImage::default()
        };
    }

    let image_type = if !publisher.is_empty() && !offer.is_empty() && !sku.is_empty() {
        ImageType::Marketplace
    } else {
        // Partial marketplace data is kept so rules can still inspect it.
        ImageType::Unknown
    };
    ClassifiedImage {
        image_type,
        image_id: String::new(),
        publisher,
        offer,
        sku,
        version,
    }
}

fn trimmed(value: Option<&Value>) -> String {
    match value {
        Some(v) => scalar_text(v).trim().to_string(),
        None => String::new(),
    }
}
