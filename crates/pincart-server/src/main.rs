mod api;
mod middleware;

use std::sync::Arc;

use anyhow::Context;
use pincart_scraper::Aggregator;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = pincart_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let tables = pincart_core::load_location_tables(&config.locations_path).with_context(|| {
        format!(
            "loading location tables from {}",
            config.locations_path.display()
        )
    })?;
    tracing::info!(
        dmart_pincodes = tables.dmart.len(),
        nine_minutes_pincodes = tables.nine_minutes.len(),
        "location tables loaded"
    );

    let aggregator = Aggregator::from_config(&config, &tables)?;
    tracing::info!(
        backends = ?aggregator.backend_names(),
        deadline_secs = ?config.request_deadline_secs,
        jiomart_revision = %config.jiomart.revision,
        "aggregator ready"
    );

    let app = build_app(AppState {
        aggregator: Arc::new(aggregator),
    });

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
