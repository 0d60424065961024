//! `locations` command: what each backend would search with for a pincode.

use std::collections::BTreeSet;

use anyhow::Context;
use pincart_core::{is_valid_pincode, AppConfig, BackendName, LocationTables};
use pincart_scraper::{LocationLookup, PassthroughToken, StoreTable};

/// How one backend resolves one pincode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Resolution {
    /// Static or passthrough identifier.
    Mapped(String),
    /// Resolved over the network at search time.
    Remote,
    Unmapped,
}

impl std::fmt::Display for Resolution {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolution::Mapped(id) => write!(f, "{id}"),
            Resolution::Remote => write!(f, "(resolved at search time)"),
            Resolution::Unmapped => write!(f, "-"),
        }
    }
}

/// Resolution for every backend, in response-key order.
pub(crate) fn describe_pincode(
    tables: &LocationTables,
    pincode: &str,
) -> Vec<(BackendName, Resolution)> {
    let stores = StoreTable::new(tables.dmart.clone());
    let areas = PassthroughToken::new(tables.nine_minutes.clone());

    BackendName::ALL
        .into_iter()
        .map(|backend| {
            let found = match backend {
                BackendName::Instamart | BackendName::Zepto | BackendName::Blinkit => {
                    areas.lookup(pincode)
                }
                BackendName::Dmart => stores.lookup(pincode),
                BackendName::Jiomart => return (backend, Resolution::Remote),
            };
            (backend, found.map_or(Resolution::Unmapped, Resolution::Mapped))
        })
        .collect()
}

/// # Errors
///
/// Returns an error if the tables cannot be loaded or `pincode` is not six
/// digits.
pub(crate) fn run_locations(config: &AppConfig, pincode: Option<&str>) -> anyhow::Result<()> {
    let tables = pincart_core::load_location_tables(&config.locations_path).with_context(|| {
        format!(
            "loading location tables from {}",
            config.locations_path.display()
        )
    })?;

    let pincodes: Vec<String> = match pincode {
        Some(p) if !is_valid_pincode(p) => anyhow::bail!("pincode must be 6 digits, got '{p}'"),
        Some(p) => vec![p.to_owned()],
        None => tables
            .dmart
            .keys()
            .chain(tables.nine_minutes.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect(),
    };

    if pincodes.is_empty() {
        println!("no pincodes configured in {}", config.locations_path.display());
        return Ok(());
    }

    for pincode in &pincodes {
        println!("{pincode}");
        for (backend, resolution) in describe_pincode(&tables, pincode) {
            println!("  {:<10} {resolution}", backend.as_str());
        }
    }
    Ok(())
}
