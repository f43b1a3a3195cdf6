//! Command-line front end.
//!
//! A thin boundary over [`RecordStore`]: it parses arguments, fills in the
//! entry defaults (today's date, the current odometer reading) and renders
//! results. All validation happens in the store.

pub mod report;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use crate::config::TrackerConfig;
use crate::domain::{EntryId, NewOilChange, NewRefuel, Statistics};
use crate::error::TrackerError;
use crate::service::RecordStore;
use crate::validation;

/// CLI arguments for the tracker.
#[derive(Debug, Parser)]
#[command(name = "moto-tracker")]
#[command(about = "Motorcycle maintenance tracker: refuels, oil changes and statistics")]
#[command(version)]
pub struct CliArgs {
    /// Directory holding the record document (overrides MOTO_TRACKER_DATA_DIR).
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Storage key of the record document (overrides MOTO_TRACKER_STORAGE_KEY).
    #[arg(long, global = true)]
    pub key: Option<String>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

impl CliArgs {
    /// Applies the storage overrides to `config`.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Config`] if the overridden configuration is
    /// invalid.
    pub fn apply_to(&self, mut config: TrackerConfig) -> Result<TrackerConfig, TrackerError> {
        if let Some(dir) = &self.data_dir {
            config.data_dir.clone_from(dir);
        }
        if let Some(key) = &self.key {
            config.storage_key.clone_from(key);
        }
        config.validate()?;
        Ok(config)
    }
}

/// Top-level commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Set the current odometer reading.
    Km {
        /// Odometer reading in km.
        #[arg(allow_negative_numbers = true)]
        km: f64,
    },

    /// Record, delete or list refuels.
    #[command(subcommand)]
    Refuel(RefuelCommand),

    /// Record, delete or list oil changes.
    #[command(subcommand)]
    Oil(OilCommand),

    /// Set the distance between oil changes.
    Interval {
        /// Interval in km.
        #[arg(allow_negative_numbers = true)]
        km: f64,
    },

    /// Show derived statistics.
    Stats {
        /// Print the statistics as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Print the whole stored record as JSON.
    Show,
}

/// Refuel subcommands.
#[derive(Debug, Subcommand)]
pub enum RefuelCommand {
    /// Record a refuel.
    Add(AddRefuelArgs),
    /// Delete a refuel by id.
    Delete {
        /// Refuel id.
        id: String,
    },
    /// List refuels, most recently added first.
    List,
}

/// Arguments of `refuel add`.
#[derive(Debug, Args)]
pub struct AddRefuelArgs {
    /// Liters added.
    #[arg(long, allow_negative_numbers = true)]
    pub liters: f64,

    /// Amount paid.
    #[arg(long, allow_negative_numbers = true)]
    pub value: f64,

    /// Odometer reading; defaults to the current km.
    #[arg(long, allow_negative_numbers = true)]
    pub km: Option<f64>,

    /// Date as YYYY-MM-DD; defaults to today (UTC).
    #[arg(long)]
    pub date: Option<String>,

    /// The tank was filled up.
    #[arg(long)]
    pub full: bool,
}

/// Oil-change subcommands.
#[derive(Debug, Subcommand)]
pub enum OilCommand {
    /// Record an oil change.
    Add {
        /// Odometer reading; defaults to the current km.
        #[arg(long, allow_negative_numbers = true)]
        km: Option<f64>,

        /// Date as YYYY-MM-DD; defaults to today (UTC).
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an oil change by id.
    Delete {
        /// Oil change id.
        id: String,
    },
    /// List oil changes, most recently added first.
    List,
}

/// Runs `command` against `store` and returns the text to print.
///
/// `today` is the date given to entries recorded without `--date`.
///
/// # Errors
///
/// Returns any [`TrackerError`] raised by the store, or
/// [`TrackerError::InvalidDate`] for a malformed `--date`.
pub async fn execute(
    store: &RecordStore,
    command: Command,
    today: NaiveDate,
) -> Result<String, TrackerError> {
    match command {
        Command::Km { km } => {
            store.set_current_km(km).await?;
            Ok(format!("Current km set to {km:.0}"))
        }
        Command::Interval { km } => {
            store.set_oil_change_interval(km).await?;
            Ok(format!("Oil change interval set to {km:.0} km"))
        }
        Command::Refuel(RefuelCommand::Add(args)) => {
            let entry = NewRefuel {
                date: entry_date(args.date.as_deref(), today)?,
                km: entry_km(store, args.km).await,
                liters: args.liters,
                value: args.value,
                is_full: args.full,
            };
            let refuel = store.add_refuel(entry).await?;
            Ok(format!("Refuel recorded: {}", report::refuel_line(&refuel)))
        }
        Command::Refuel(RefuelCommand::Delete { id }) => {
            let removed = store.delete_refuel(&EntryId::from(id.as_str())).await?;
            Ok(deletion_message("refuel", &id, removed))
        }
        Command::Refuel(RefuelCommand::List) => Ok(report::refuels(&store.snapshot().await)),
        Command::Oil(OilCommand::Add { km, date }) => {
            let entry = NewOilChange {
                date: entry_date(date.as_deref(), today)?,
                km: entry_km(store, km).await,
            };
            let oil_change = store.add_oil_change(entry).await?;
            Ok(format!(
                "Oil change recorded: {}",
                report::oil_change_line(&oil_change)
            ))
        }
        Command::Oil(OilCommand::Delete { id }) => {
            let removed = store.delete_oil_change(&EntryId::from(id.as_str())).await?;
            Ok(deletion_message("oil change", &id, removed))
        }
        Command::Oil(OilCommand::List) => Ok(report::oil_changes(&store.snapshot().await)),
        Command::Stats { json } => {
            let record = store.snapshot().await;
            let stats = Statistics::compute(&record);
            if json {
                Ok(serde_json::to_string_pretty(&stats)?)
            } else {
                Ok(report::statistics(&stats, &record))
            }
        }
        Command::Show => Ok(serde_json::to_string_pretty(&store.snapshot().await)?),
    }
}

fn entry_date(raw: Option<&str>, today: NaiveDate) -> Result<NaiveDate, TrackerError> {
    raw.map_or(Ok(today), validation::parse_date)
}

async fn entry_km(store: &RecordStore, km: Option<f64>) -> f64 {
    match km {
        Some(km) => km,
        None => store.snapshot().await.current_km,
    }
}

fn deletion_message(kind: &str, id: &str, removed: bool) -> String {
    if removed {
        format!("Deleted {kind} {id}")
    } else {
        format!("No {kind} with id {id}")
    }
}
