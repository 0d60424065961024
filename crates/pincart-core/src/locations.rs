//! Static pincode lookup tables for backends that cannot resolve locations
//! over the network.
//!
//! The tables live in `config/locations.yaml`:
//!
//! ```yaml
//! dmart:
//!   "500032": "10733"
//! nine_minutes:
//!   "500032": "gachibowli_circle_hyd"
//! ```
//!
//! `dmart` maps a pincode to a storefront store ID. `nine_minutes` maps a
//! pincode to the area slug that the proxy expects after the pincode in its
//! composite location token.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::search::is_valid_pincode;
use crate::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct LocationTables {
    #[serde(default)]
    pub dmart: BTreeMap<String, String>,
    #[serde(default)]
    pub nine_minutes: BTreeMap<String, String>,
}

/// Load and validate the location tables from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_location_tables(path: &Path) -> Result<LocationTables, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LocationsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    parse_location_tables(&content)
}

/// Parse and validate location tables from YAML text.
///
/// # Errors
///
/// Returns [`ConfigError::LocationsFileParse`] for malformed YAML and
/// [`ConfigError::Validation`] for bad keys or empty values.
pub fn parse_location_tables(content: &str) -> Result<LocationTables, ConfigError> {
    let tables: LocationTables =
        serde_yaml::from_str(content).map_err(ConfigError::LocationsFileParse)?;

    validate_table("dmart", &tables.dmart)?;
    validate_table("nine_minutes", &tables.nine_minutes)?;

    Ok(tables)
}

fn validate_table(table: &str, entries: &BTreeMap<String, String>) -> Result<(), ConfigError> {
    for (pincode, value) in entries {
        if !is_valid_pincode(pincode) {
            return Err(ConfigError::Validation(format!(
                "{table}: key '{pincode}' is not a 6-digit pincode"
            )));
        }
        if value.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "{table}: pincode {pincode} maps to an empty value"
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "locations_test.rs"]
mod tests;
