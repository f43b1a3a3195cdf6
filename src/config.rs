//! Tracker configuration loaded from environment variables.
//!
//! All settings come from environment variables (or a `.env` file via
//! `dotenvy`). Command-line flags may override the storage location.

use std::path::PathBuf;

use crate::domain::DEFAULT_OIL_CHANGE_INTERVAL;
use crate::error::TrackerError;

/// Storage key used when none is configured.
pub const DEFAULT_STORAGE_KEY: &str = "moto-tracker-data";

/// Top-level tracker configuration.
///
/// Loaded once at startup via [`TrackerConfig::from_env`].
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// Directory backing the local key-value store.
    pub data_dir: PathBuf,

    /// Fixed key the record document is stored under.
    pub storage_key: String,

    /// Oil-change interval of a freshly created record, in km.
    pub default_oil_change_interval: f64,

    /// Capacity of the record event broadcast channel.
    pub event_bus_capacity: usize,

    /// Emit logs as JSON lines instead of human-readable text.
    pub log_json: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".data"),
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            default_oil_change_interval: DEFAULT_OIL_CHANGE_INTERVAL,
            event_bus_capacity: 256,
            log_json: false,
        }
    }
}

impl TrackerConfig {
    /// Loads configuration from environment variables.
    ///
    /// Falls back to defaults when a variable is missing or unparsable.
    /// Calls `dotenvy::dotenv().ok()` to optionally load a `.env` file.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Config`] if the resulting configuration
    /// fails [`TrackerConfig::validate`].
    pub fn from_env() -> Result<Self, TrackerError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            data_dir: std::env::var("MOTO_TRACKER_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            storage_key: std::env::var("MOTO_TRACKER_STORAGE_KEY")
                .unwrap_or(defaults.storage_key),
            default_oil_change_interval: parse_env(
                "MOTO_TRACKER_DEFAULT_OIL_INTERVAL",
                defaults.default_oil_change_interval,
            ),
            event_bus_capacity: parse_env(
                "MOTO_TRACKER_EVENT_BUS_CAPACITY",
                defaults.event_bus_capacity,
            ),
            log_json: parse_env_bool("MOTO_TRACKER_LOG_JSON", defaults.log_json),
        };

        config.validate()?;
        Ok(config)
    }

    /// Checks the values that would make the store unusable.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Config`] for an empty storage key, a key
    /// containing a path separator, or a non-positive default interval.
    pub fn validate(&self) -> Result<(), TrackerError> {
        if self.storage_key.trim().is_empty() {
            return Err(TrackerError::Config("storage key is empty".to_string()));
        }
        if self.storage_key.contains(['/', '\\']) {
            return Err(TrackerError::Config(format!(
                "storage key {:?} must not contain path separators",
                self.storage_key
            )));
        }
        if !(self.default_oil_change_interval.is_finite() && self.default_oil_change_interval > 0.0)
        {
            return Err(TrackerError::Config(format!(
                "default oil change interval must be positive, got {}",
                self.default_oil_change_interval
            )));
        }
        Ok(())
    }
}

/// Parses an environment variable as `T`, returning `default` on missing
/// or invalid values.
fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

/// Parses an environment variable as a boolean. Accepts `"true"`, `"1"`,
/// `"false"`, `"0"` (case-insensitive). Returns `default` otherwise.
fn parse_env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key)
        .ok()
        .map(|v| v.trim().to_ascii_lowercase())
        .as_deref()
    {
        Some("true" | "1") => true,
        Some("false" | "0") => false,
        _ => default,
    }
}
