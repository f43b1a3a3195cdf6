//! Tracker error types with stable numeric codes.
//!
//! [`TrackerError`] is the central error type of the crate. Each variant
//! carries a numeric code so that a front end can map failures without
//! matching on message text.

/// Library-wide error enum.
///
/// # Error Code Ranges
///
/// | Range     | Category       |
/// |-----------|----------------|
/// | 1000–1999 | Validation     |
/// | 2000–2999 | Record state   |
/// | 3000–3999 | Infrastructure |
#[derive(Debug, thiserror::Error)]
pub enum TrackerError {
    /// A numeric field failed validation before any mutation happened.
    #[error("invalid {field}: {reason}")]
    InvalidInput {
        /// Name of the rejected field (e.g. `"liters"`).
        field: &'static str,
        /// Human-readable reason.
        reason: String,
    },

    /// A calendar date could not be parsed as `YYYY-MM-DD`.
    #[error("invalid date: {0}")]
    InvalidDate(String),

    /// The persisted document was rewritten by another writer since it
    /// was loaded.
    #[error("record revision conflict: expected {expected}, found {found}")]
    RevisionConflict {
        /// Revision this store last loaded or wrote.
        expected: u64,
        /// Revision currently in storage.
        found: u64,
    },

    /// Reading or writing the persisted document failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// The aggregate could not be encoded.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A configuration value is unusable.
    #[error("configuration error: {0}")]
    Config(String),
}

impl TrackerError {
    /// Returns the numeric error code for this variant.
    #[must_use]
    pub const fn error_code(&self) -> u32 {
        match self {
            Self::InvalidInput { .. } => 1001,
            Self::InvalidDate(_) => 1002,
            Self::RevisionConflict { .. } => 2001,
            Self::Storage(_) => 3001,
            Self::Serialization(_) => 3002,
            Self::Config(_) => 3003,
        }
    }

    /// Returns `true` for failures caused by caller input rather than
    /// by the environment.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(self, Self::InvalidInput { .. } | Self::InvalidDate(_))
    }

    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for TrackerError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
