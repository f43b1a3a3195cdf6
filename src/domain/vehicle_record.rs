//! The single persisted aggregate.
//!
//! [`VehicleRecord`] holds the whole tracking state. It is never edited in
//! place by the store: each mutation consumes a copy of the current
//! aggregate and returns the next one, which then replaces it wholesale.

use serde::{Deserialize, Serialize};

use super::{EntryId, OilChange, Refuel};

/// Oil-change interval of a freshly created record, in km.
pub const DEFAULT_OIL_CHANGE_INTERVAL: f64 = 5000.0;

/// Entire tracking state of one motorcycle.
///
/// `refuels` and `oil_changes` keep insertion order, which is NOT assumed
/// to be chronological. Consumers that need chronology sort by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleRecord {
    /// Latest known odometer reading.
    pub current_km: f64,
    /// Odometer reading of the most recently *added* oil change.
    pub last_oil_change_km: f64,
    /// Refuel history in insertion order.
    pub refuels: Vec<Refuel>,
    /// Oil-change history in insertion order.
    pub oil_changes: Vec<OilChange>,
    /// Distance between scheduled oil changes, in km.
    pub oil_change_interval: f64,
    /// Write counter used to detect concurrent writers. Documents written
    /// before the counter existed load as revision 0.
    #[serde(default)]
    pub revision: u64,
}

impl Default for VehicleRecord {
    fn default() -> Self {
        Self::with_interval(DEFAULT_OIL_CHANGE_INTERVAL)
    }
}

impl VehicleRecord {
    /// Creates an empty record with the given oil-change interval.
    #[must_use]
    pub fn with_interval(oil_change_interval: f64) -> Self {
        Self {
            current_km: 0.0,
            last_oil_change_km: 0.0,
            refuels: Vec::new(),
            oil_changes: Vec::new(),
            oil_change_interval,
            revision: 0,
        }
    }

    /// Returns the record with `current_km` replaced.
    #[must_use]
    pub fn with_current_km(self, km: f64) -> Self {
        Self {
            current_km: km,
            ..self
        }
    }

    /// Returns the record with `refuel` appended. Neither `current_km` nor
    /// `last_oil_change_km` is touched.
    #[must_use]
    pub fn with_refuel(mut self, refuel: Refuel) -> Self {
        self.refuels.push(refuel);
        self
    }

    /// Returns the record with `oil_change` appended and
    /// `last_oil_change_km` set to its km, whatever the km or date of the
    /// earlier entries. Insertion order wins.
    #[must_use]
    pub fn with_oil_change(mut self, oil_change: OilChange) -> Self {
        self.last_oil_change_km = oil_change.km;
        self.oil_changes.push(oil_change);
        self
    }

    /// Returns the record without the refuel `id`, and whether an entry
    /// was removed.
    #[must_use]
    pub fn without_refuel(mut self, id: &EntryId) -> (Self, bool) {
        let before = self.refuels.len();
        self.refuels.retain(|r| &r.id != id);
        let removed = self.refuels.len() != before;
        (self, removed)
    }

    /// Returns the record without the oil change `id`, and whether an entry
    /// was removed.
    ///
    /// `last_oil_change_km` is left as it was even when the removed entry
    /// was its source.
    #[must_use]
    pub fn without_oil_change(mut self, id: &EntryId) -> (Self, bool) {
        let before = self.oil_changes.len();
        self.oil_changes.retain(|o| &o.id != id);
        let removed = self.oil_changes.len() != before;
        (self, removed)
    }

    /// Returns the record with `oil_change_interval` replaced.
    #[must_use]
    pub fn with_oil_change_interval(self, interval: f64) -> Self {
        Self {
            oil_change_interval: interval,
            ..self
        }
    }

    /// Returns the record stamped with the next revision.
    #[must_use]
    pub(crate) fn next_revision(self) -> Self {
        let revision = self.revision.saturating_add(1);
        Self { revision, ..self }
    }

    /// Returns `true` if a refuel with this id exists.
    #[must_use]
    pub fn has_refuel(&self, id: &EntryId) -> bool {
        self.refuels.iter().any(|r| &r.id == id)
    }

    /// Returns `true` if an oil change with this id exists.
    #[must_use]
    pub fn has_oil_change(&self, id: &EntryId) -> bool {
        self.oil_changes.iter().any(|o| &o.id == id)
    }

    /// Refuels from the most recently added to the oldest added.
    pub fn refuels_newest_first(&self) -> impl Iterator<Item = &Refuel> {
        self.refuels.iter().rev()
    }

    /// Oil changes from the most recently added to the oldest added.
    pub fn oil_changes_newest_first(&self) -> impl Iterator<Item = &OilChange> {
        self.oil_changes.iter().rev()
    }

    /// Returns `true` when no refuel and no oil change has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.refuels.is_empty() && self.oil_changes.is_empty()
    }
}
