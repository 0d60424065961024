//! Pincode → backend identifier resolution.
//!
//! Each backend owns one strategy:
//! - [`StoreTable`]: static pincode → store ID table (DMart).
//! - [`PassthroughToken`]: pincode reformatted into a composite token (9minutes).
//! - [`InventoryCodeResolver`]: remote lookup of region and store codes (JioMart).
//!
//! The first two implement [`LocationLookup`] so a different data source can
//! be injected. A miss is `None`, never an error; the owning backend decides
//! what a miss means.

mod remote;

use std::collections::BTreeMap;

pub use remote::{parse_inventory_codes, InventoryCodeResolver, InventoryCodes};

/// Synchronous pincode lookup.
pub trait LocationLookup: Send + Sync {
    /// Backend identifier for `pincode`, or `None` when no mapping exists.
    fn lookup(&self, pincode: &str) -> Option<String>;
}

/// Fixed pincode → store ID table.
#[derive(Debug, Clone, Default)]
pub struct StoreTable {
    stores: BTreeMap<String, String>,
}

impl StoreTable {
    #[must_use]
    pub fn new(stores: BTreeMap<String, String>) -> Self {
        Self { stores }
    }
}

impl LocationLookup for StoreTable {
    fn lookup(&self, pincode: &str) -> Option<String> {
        self.stores.get(pincode).cloned()
    }
}

/// Formats `"{pincode}_{area_slug}"` for pincodes with a known area slug,
/// e.g. `500032` → `500032_gachibowli_circle_hyd`.
#[derive(Debug, Clone, Default)]
pub struct PassthroughToken {
    area_slugs: BTreeMap<String, String>,
}

impl PassthroughToken {
    #[must_use]
    pub fn new(area_slugs: BTreeMap<String, String>) -> Self {
        Self { area_slugs }
    }
}

impl LocationLookup for PassthroughToken {
    fn lookup(&self, pincode: &str) -> Option<String> {
        self.area_slugs
            .get(pincode)
            .map(|slug| format!("{pincode}_{}", slug.trim_matches('_')))
    }
}
