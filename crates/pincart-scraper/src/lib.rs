pub mod aggregate;
pub mod backend;
pub mod client;
pub mod dmart;
pub mod error;
pub mod filter;
pub mod jiomart;
pub mod location;
pub mod nine_minutes;
mod parse_helpers;

pub use aggregate::{AggregateResult, Aggregator};
pub use backend::{BackendResult, ProductBackend, SearchContext};
pub use dmart::DmartBackend;
pub use error::{BackendError, RecordError};
pub use filter::{build_inventory_filter, build_or_filter, build_search_filters};
pub use jiomart::{IndexFieldMap, JiomartBackend};
pub use location::{InventoryCodeResolver, InventoryCodes, LocationLookup, PassthroughToken, StoreTable};
pub use nine_minutes::NineMinutesBackend;
