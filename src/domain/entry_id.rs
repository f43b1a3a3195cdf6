//! Identifier shared by refuel and oil-change entries.
//!
//! [`EntryId`] is a string newtype. Fresh identifiers are UUID v4 strings,
//! but any string found in an existing document (older documents used
//! millisecond timestamps) is kept verbatim.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a history entry.
///
/// Assigned once when the entry is added and immutable thereafter. Used
/// as the deletion key by [`crate::service::RecordStore`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Creates a new random `EntryId` (UUID v4).
    #[must_use]
    pub fn new() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for EntryId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<uuid::Uuid> for EntryId {
    fn from(uuid: uuid::Uuid) -> Self {
        Self(uuid.to_string())
    }
}
