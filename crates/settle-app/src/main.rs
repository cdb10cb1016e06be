//! SettleSpace application binary - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Open the SQLite store and seed demo data
//! 3. Build the assistant (completion client, resolver, escalation desk)
//! 4. Start the operator poller
//! 5. Serve the axum API until Ctrl-C

mod cli;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use settle_api::state::AppState;
use settle_assistant::{
    CompletionClient, DisabledClient, EscalationDesk, GeminiClient, OperatorPoller,
    ResponseResolver,
};
use settle_core::config::SettleConfig;
use settle_storage::{
    seed_demo_data, KeyValueStore, ListingRepository, SqliteStore, UserRepository,
};

use cli::CliArgs;

/// Expand ~ to home directory in a path string.
fn resolve_data_dir(data_dir: &str) -> PathBuf {
    if data_dir.starts_with("~/") || data_dir.starts_with("~\\") {
        #[cfg(target_os = "windows")]
        let home = std::env::var("USERPROFILE").unwrap_or_else(|_| ".".to_string());
        #[cfg(not(target_os = "windows"))]
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(&data_dir[2..])
    } else {
        PathBuf::from(data_dir)
    }
}

fn completion_client(config: &SettleConfig) -> Arc<dyn CompletionClient> {
    if !config.completion.is_configured() {
        tracing::info!("No completion API key configured, assistant will use its rule table");
        return Arc::new(DisabledClient);
    }
    match GeminiClient::new(&config.completion) {
        Ok(client) => {
            tracing::info!(endpoint = %config.completion.endpoint, "Remote completion enabled");
            Arc::new(client)
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to build completion client, using rule table");
            Arc::new(DisabledClient)
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = SettleConfig::load_or_default(&config_file);
    config.general.port = args.resolve_port(config.general.port);
    if let Some(dir) = args.resolve_data_dir() {
        config.general.data_dir = dir;
    }
    config.completion.api_key = args.resolve_api_key(&config.completion.api_key);
    if args.no_seed {
        config.general.seed_demo_data = false;
    }

    // Tracing. RUST_LOG wins over the resolved level.
    let log_level = args.resolve_log_level(&config.general.log_level);
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level)),
        )
        .init();

    tracing::info!("Starting SettleSpace assistant v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration resolved");

    // Storage.
    let data_dir = resolve_data_dir(&config.general.data_dir);
    if let Err(e) = std::fs::create_dir_all(&data_dir) {
        tracing::error!(path = %data_dir.display(), error = %e, "Failed to create data directory");
        return Err(e.into());
    }

    let db_path = data_dir.join("settlespace.db");
    let store: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&db_path)?);

    if config.general.seed_demo_data {
        let report = seed_demo_data(
            &UserRepository::new(Arc::clone(&store)),
            &ListingRepository::new(Arc::clone(&store)),
        )?;
        tracing::debug!(users = report.users, listings = report.listings, "Seed check complete");
    }

    // Assistant.
    let desk = Arc::new(EscalationDesk::new(Arc::clone(&store)));
    let resolver = Arc::new(ResponseResolver::new(
        &config,
        Arc::clone(&store),
        completion_client(&config),
        Arc::clone(&desk),
    ));

    // Operator poller.
    let poller = Arc::new(OperatorPoller::new(
        Arc::clone(&desk),
        Duration::from_secs(config.operator.poll_interval_secs),
    ));
    let poller_handle = poller.handle();
    let poller_task = {
        let poller = Arc::clone(&poller);
        tokio::spawn(async move { poller.run().await })
    };

    // === API server ===

    let state = AppState::new(config, resolver, desk, poller.sender());
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
        }
        tracing::info!("Shutdown requested");
    };

    let served = settle_api::start_server(state, shutdown).await;

    poller_handle.shutdown();
    if let Err(e) = poller_task.await {
        tracing::warn!(error = %e, "Operator poller task failed");
    }

    served?;
    tracing::info!("SettleSpace assistant stopped");
    Ok(())
}
