mod locations;
mod search;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "pincart-cli")]
#[command(about = "Search grocery storefronts by pincode from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run one aggregate search and print the JSON result
    Search {
        /// Free-text product query (e.g., "toned milk")
        #[arg(long)]
        query: String,
        /// Six-digit delivery pincode
        #[arg(long)]
        pincode: String,
        /// Pretty-print the JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Show which backends can resolve a pincode from the static tables
    Locations {
        /// Only show this pincode
        #[arg(long)]
        pincode: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = pincart_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Some(Commands::Search {
            query,
            pincode,
            pretty,
        }) => search::run_search(&config, &query, &pincode, pretty).await?,
        Some(Commands::Locations { pincode }) => {
            locations::run_locations(&config, pincode.as_deref())?;
        }
        None => println!("pincart-cli: run with --help to list commands"),
    }

    Ok(())
}
