//! Input validation for record mutations.
//!
//! The store runs these checks before deriving a new aggregate, so a
//! rejected call persists nothing and emits no event. Documents loaded
//! from storage are not re-validated.

use chrono::NaiveDate;

use crate::domain::{NewOilChange, NewRefuel};
use crate::error::TrackerError;

/// Checks an odometer reading: finite and not negative.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidInput`] naming `field`.
pub fn odometer(field: &'static str, km: f64) -> Result<f64, TrackerError> {
    finite(field, km)?;
    if km < 0.0 {
        return Err(TrackerError::invalid(field, "must not be negative"));
    }
    Ok(km)
}

/// Checks an oil-change interval: finite and strictly positive.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidInput`] for `oilChangeInterval`.
pub fn oil_change_interval(interval: f64) -> Result<f64, TrackerError> {
    positive("oilChangeInterval", interval)
}

/// Checks every numeric field of a refuel.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidInput`] for the first failing field.
pub fn refuel(entry: &NewRefuel) -> Result<(), TrackerError> {
    odometer("km", entry.km)?;
    positive("liters", entry.liters)?;
    finite("value", entry.value)?;
    if entry.value < 0.0 {
        return Err(TrackerError::invalid("value", "must not be negative"));
    }
    Ok(())
}

/// Checks an oil change.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidInput`] if the km is invalid.
pub fn oil_change(entry: &NewOilChange) -> Result<(), TrackerError> {
    odometer("km", entry.km).map(|_| ())
}

/// Parses a `YYYY-MM-DD` calendar date.
///
/// # Errors
///
/// Returns [`TrackerError::InvalidDate`] if `raw` is not a valid date.
pub fn parse_date(raw: &str) -> Result<NaiveDate, TrackerError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| TrackerError::InvalidDate(format!("{raw}: {e}")))
}

fn finite(field: &'static str, value: f64) -> Result<(), TrackerError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(TrackerError::invalid(field, "must be a finite number"))
    }
}

fn positive(field: &'static str, value: f64) -> Result<f64, TrackerError> {
    finite(field, value)?;
    if value <= 0.0 {
        return Err(TrackerError::invalid(field, "must be greater than zero"));
    }
    Ok(value)
}
