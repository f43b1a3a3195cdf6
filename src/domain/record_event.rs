//! Events reflecting record mutations.
//!
//! Every successful mutation of the [`super::VehicleRecord`] publishes a
//! [`RecordEvent`] through the [`super::EventBus`], so that views can
//! refresh without polling the store.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::{EntryId, OilChange, Refuel};

/// Event emitted after a mutation has been persisted.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum RecordEvent {
    /// The odometer reading was replaced.
    CurrentKmUpdated {
        /// New odometer reading.
        km: f64,
        /// Revision written.
        revision: u64,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A refuel was appended.
    RefuelAdded {
        /// The stored entry, with its identifier.
        refuel: Refuel,
        /// Revision written.
        revision: u64,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// A refuel deletion was requested.
    RefuelDeleted {
        /// Identifier passed to the deletion.
        id: EntryId,
        /// Whether an entry actually matched.
        removed: bool,
        /// Revision written.
        revision: u64,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An oil change was appended.
    OilChangeAdded {
        /// The stored entry, with its identifier.
        oil_change: OilChange,
        /// Revision written.
        revision: u64,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// An oil-change deletion was requested.
    OilChangeDeleted {
        /// Identifier passed to the deletion.
        id: EntryId,
        /// Whether an entry actually matched.
        removed: bool,
        /// Revision written.
        revision: u64,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The oil-change interval was replaced.
    OilChangeIntervalUpdated {
        /// New interval in km.
        interval: f64,
        /// Revision written.
        revision: u64,
        /// Mutation timestamp.
        timestamp: DateTime<Utc>,
    },

    /// The store re-read the persisted document.
    RecordReloaded {
        /// Revision now held in memory.
        revision: u64,
        /// Reload timestamp.
        timestamp: DateTime<Utc>,
    },
}

impl RecordEvent {
    /// Returns the revision the record had once this event was emitted.
    #[must_use]
    pub const fn revision(&self) -> u64 {
        match self {
            Self::CurrentKmUpdated { revision, .. }
            | Self::RefuelAdded { revision, .. }
            | Self::RefuelDeleted { revision, .. }
            | Self::OilChangeAdded { revision, .. }
            | Self::OilChangeDeleted { revision, .. }
            | Self::OilChangeIntervalUpdated { revision, .. }
            | Self::RecordReloaded { revision, .. } => *revision,
        }
    }

    /// Returns the event type as a static string, matching the serialized
    /// `event_type` tag.
    #[must_use]
    pub const fn event_type_str(&self) -> &'static str {
        match self {
            Self::CurrentKmUpdated { .. } => "current_km_updated",
            Self::RefuelAdded { .. } => "refuel_added",
            Self::RefuelDeleted { .. } => "refuel_deleted",
            Self::OilChangeAdded { .. } => "oil_change_added",
            Self::OilChangeDeleted { .. } => "oil_change_deleted",
            Self::OilChangeIntervalUpdated { .. } => "oil_change_interval_updated",
            Self::RecordReloaded { .. } => "record_reloaded",
        }
    }
}
