//! moto-tracker entry point.
//!
//! Loads configuration, opens the record store and runs one command.

use std::sync::Arc;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use moto_tracker::cli::{self, CliArgs};
use moto_tracker::config::TrackerConfig;
use moto_tracker::domain::EventBus;
use moto_tracker::persistence::FileStorage;
use moto_tracker::service::RecordStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();

    // Load configuration
    let config = args
        .apply_to(TrackerConfig::from_env()?)
        .context("invalid configuration")?;

    init_tracing(config.log_json);
    tracing::debug!(
        data_dir = %config.data_dir.display(),
        key = %config.storage_key,
        "configuration loaded"
    );

    let storage = Arc::new(FileStorage::new(&config.data_dir, config.storage_key.clone()));
    let store = RecordStore::open(
        storage,
        EventBus::new(config.event_bus_capacity),
        config.default_oil_change_interval,
    )
    .await
    .context("failed to open record")?;

    let mut events = store.event_bus().subscribe();
    let output = cli::execute(&store, args.command, Utc::now().date_naive()).await?;
    while let Ok(event) = events.try_recv() {
        tracing::debug!(
            event = event.event_type_str(),
            revision = event.revision(),
            "record changed"
        );
    }
    println!("{output}");

    Ok(())
}

/// Logs go to stderr so command output on stdout stays clean.
fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}
