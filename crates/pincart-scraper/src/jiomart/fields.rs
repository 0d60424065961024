//! Versioned attribute tables for the JioMart search index.

use pincart_core::IndexRevision;

/// What one adapter revision asks the index for and what it can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexFieldMap {
    pub revision: IndexRevision,
    /// Sent as `attributesToRetrieve`, in this order.
    pub attributes: &'static [&'static str],
    /// `false` when the revision does not request the `buybox_mrp` price
    /// map; every hit then carries `mrp: null` and `selling_price: null`.
    pub emits_selling_price: bool,
}

const V1: IndexFieldMap = IndexFieldMap {
    revision: IndexRevision::V1,
    attributes: &[
        "product_code",
        "display_name",
        "brand",
        "buybox_mrp",
        "image_path",
        "url_path",
        "objectID",
    ],
    emits_selling_price: true,
};

// Price map not requested.
const V2: IndexFieldMap = IndexFieldMap {
    revision: IndexRevision::V2,
    attributes: &[
        "product_code",
        "display_name",
        "brand",
        "category_level.level4",
        "vertical_code",
        "image_path",
        "url_path",
        "objectID",
    ],
    emits_selling_price: false,
};

const V3: IndexFieldMap = IndexFieldMap {
    revision: IndexRevision::V3,
    attributes: &[
        "product_code",
        "display_name",
        "brand",
        "category_level.level4",
        "buybox_mrp",
        "vertical_code",
        "image_path",
        "url_path",
        "objectID",
    ],
    emits_selling_price: true,
};

impl IndexFieldMap {
    #[must_use]
    pub const fn for_revision(revision: IndexRevision) -> &'static IndexFieldMap {
        match revision {
            IndexRevision::V1 => &V1,
            IndexRevision::V2 => &V2,
            IndexRevision::V3 => &V3,
        }
    }

    /// `attributes` as the JSON array string the index expects.
    #[must_use]
    pub fn attributes_param(&self) -> String {
        let quoted: Vec<String> = self.attributes.iter().map(|a| format!("\"{a}\"")).collect();
        format!("[{}]", quoted.join(","))
    }
}
