//! Oil-change entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EntryId;

/// One oil-change event as stored in the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OilChange {
    /// Entry identifier.
    pub id: EntryId,
    /// Calendar date of the change.
    pub date: NaiveDate,
    /// Odometer reading at the change.
    pub km: f64,
}

/// An oil change that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOilChange {
    /// Calendar date of the change.
    pub date: NaiveDate,
    /// Odometer reading at the change.
    pub km: f64,
}

impl NewOilChange {
    /// Attaches an identifier, producing the stored entry.
    #[must_use]
    pub fn with_id(self, id: EntryId) -> OilChange {
        OilChange {
            id,
            date: self.date,
            km: self.km,
        }
    }
}
