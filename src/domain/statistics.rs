//! Statistics engine.
//!
//! [`Statistics::compute`] is a pure function of a [`VehicleRecord`]
//! snapshot. It keeps no state, reads no clock and never mutates the
//! record: every figure is replayed from the stored history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{Refuel, VehicleRecord};

/// Fixed month length used to turn elapsed days into months.
pub const DAYS_PER_MONTH: f64 = 30.0;

/// Read-only summary derived from a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Current odometer reading, carried over from the record.
    pub total_km: f64,
    /// Number of refuel entries.
    pub total_refuels: usize,
    /// Sum of liters over all refuels.
    pub total_liters: f64,
    /// Sum of amounts paid over all refuels.
    pub total_spent: f64,
    /// Liters per 100 km since the last full-tank refuel.
    pub average_consumption: f64,
    /// Estimated liters in the tank.
    pub current_fuel_level: f64,
    /// Distance left before the next scheduled oil change, never negative.
    pub km_to_next_oil_change: f64,
    /// Average distance ridden per 30-day month.
    pub km_per_month: f64,
    /// Date of the chronologically last refuel.
    pub last_refuel_date: Option<NaiveDate>,
    /// Latest oil-change date.
    pub last_oil_change_date: Option<NaiveDate>,
}

impl Statistics {
    /// Derives the summary for `record`.
    #[must_use]
    pub fn compute(record: &VehicleRecord) -> Self {
        let chronological = chronological_refuels(&record.refuels);

        Self {
            total_km: record.current_km,
            total_refuels: record.refuels.len(),
            total_liters: record.refuels.iter().map(|r| r.liters).sum(),
            total_spent: record.refuels.iter().map(|r| r.value).sum(),
            average_consumption: average_consumption(&chronological),
            current_fuel_level: fuel_level(&chronological),
            km_to_next_oil_change: km_to_next_oil_change(record),
            km_per_month: km_per_month(&chronological, record.current_km),
            last_refuel_date: chronological.last().map(|r| r.date),
            last_oil_change_date: record.oil_changes.iter().map(|o| o.date).max(),
        }
    }
}

/// Refuels sorted by date, oldest first. Same-day entries keep their
/// insertion order.
fn chronological_refuels(refuels: &[Refuel]) -> Vec<&Refuel> {
    let mut sorted: Vec<&Refuel> = refuels.iter().collect();
    sorted.sort_by_key(|r| r.date);
    sorted
}

/// Running total of liters, reset to the refuel's own liters at every
/// full tank.
fn fuel_level(chronological: &[&Refuel]) -> f64 {
    chronological.iter().fold(0.0, |level, refuel| {
        if refuel.is_full {
            refuel.liters
        } else {
            level + refuel.liters
        }
    })
}

/// L/100km over the entries after the last full tank. Zero when there is
/// no full tank, nothing after it, or no distance covered.
fn average_consumption(chronological: &[&Refuel]) -> f64 {
    let Some(last_full_idx) = chronological.iter().rposition(|r| r.is_full) else {
        return 0.0;
    };
    let (Some(last_full), Some(last)) = (chronological.get(last_full_idx), chronological.last())
    else {
        return 0.0;
    };
    let Some(after_full) = chronological.get(last_full_idx + 1..) else {
        return 0.0;
    };
    if after_full.is_empty() {
        return 0.0;
    }

    let km_since_full = last.km - last_full.km;
    let liters_since_full: f64 = after_full.iter().map(|r| r.liters).sum();

    if km_since_full > 0.0 {
        liters_since_full / km_since_full * 100.0
    } else {
        0.0
    }
}

/// `current_km` divided by the months between the first and last refuel.
fn km_per_month(chronological: &[&Refuel], current_km: f64) -> f64 {
    let (Some(first), Some(last)) = (chronological.first(), chronological.last()) else {
        return 0.0;
    };
    #[allow(clippy::cast_precision_loss)]
    let elapsed_months = (last.date - first.date).num_days() as f64 / DAYS_PER_MONTH;
    if elapsed_months > 0.0 {
        current_km / elapsed_months
    } else {
        0.0
    }
}

fn km_to_next_oil_change(record: &VehicleRecord) -> f64 {
    let ridden = record.current_km - record.last_oil_change_km;
    (record.oil_change_interval - ridden).max(0.0)
}
