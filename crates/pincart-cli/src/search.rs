//! `search` command: one aggregate search, printed as the HTTP API would
//! return it.

use anyhow::Context;
use pincart_core::{AppConfig, SearchRequest};
use pincart_scraper::Aggregator;

/// # Errors
///
/// Returns an error if the query or pincode is invalid, the location tables
/// cannot be loaded, or the backends cannot be built. Backend failures are
/// not errors; they are logged to stderr and show up as empty lists.
pub(crate) async fn run_search(
    config: &AppConfig,
    query: &str,
    pincode: &str,
    pretty: bool,
) -> anyhow::Result<()> {
    let request = SearchRequest::new(Some(query), Some(pincode))?;

    let tables = pincart_core::load_location_tables(&config.locations_path).with_context(|| {
        format!(
            "loading location tables from {}",
            config.locations_path.display()
        )
    })?;
    let aggregator = Aggregator::from_config(config, &tables)
        .context("failed to build backends")?;

    let result = aggregator.search(request, "cli").await;

    tracing::info!(
        products = result.total_products(),
        failed = result.failures().count(),
        "search finished"
    );

    let rendered = if pretty {
        serde_json::to_string_pretty(&result)?
    } else {
        serde_json::to_string(&result)?
    };
    println!("{rendered}");
    Ok(())
}
