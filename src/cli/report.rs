//! Plain-text rendering of statistics and history.
//!
//! Rounding follows the dashboard: liters and consumption to one decimal,
//! distances to whole km, money to two decimals.

use chrono::NaiveDate;

use crate::domain::{OilChange, Refuel, Statistics, VehicleRecord};

const EMPTY_HISTORY: &str = "No refuels or oil changes recorded yet.";

/// Renders the statistics summary.
#[must_use]
pub fn statistics(stats: &Statistics, record: &VehicleRecord) -> String {
    let mut lines = vec![
        row("Odometer", format!("{:.0} km", stats.total_km)),
        row("Fuel level", format!("{:.1} L", stats.current_fuel_level)),
        row(
            "Avg consumption",
            format!("{:.1} L/100km", stats.average_consumption),
        ),
        row(
            "Next oil change",
            format!("{:.0} km", stats.km_to_next_oil_change),
        ),
        row("Km per month", format!("{:.0}", stats.km_per_month.round())),
        row("Refuels", stats.total_refuels.to_string()),
        row("Total liters", format!("{:.1} L", stats.total_liters)),
        row("Total spent", format!("{:.2}", stats.total_spent)),
        row("Last refuel", date_or_dash(stats.last_refuel_date)),
        row("Last oil change", date_or_dash(stats.last_oil_change_date)),
    ];
    if record.is_empty() {
        lines.push(String::new());
        lines.push(EMPTY_HISTORY.to_string());
    }
    lines.join("\n")
}

/// Renders the refuel history, most recently added first.
#[must_use]
pub fn refuels(record: &VehicleRecord) -> String {
    if record.refuels.is_empty() {
        return "No refuels recorded.".to_string();
    }
    record
        .refuels_newest_first()
        .map(refuel_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders the oil-change history, most recently added first.
#[must_use]
pub fn oil_changes(record: &VehicleRecord) -> String {
    if record.oil_changes.is_empty() {
        return "No oil changes recorded.".to_string();
    }
    record
        .oil_changes_newest_first()
        .map(oil_change_line)
        .collect::<Vec<_>>()
        .join("\n")
}

/// One-line description of a refuel.
#[must_use]
pub fn refuel_line(refuel: &Refuel) -> String {
    let full = if refuel.is_full { "  full" } else { "" };
    format!(
        "{}  {}  {:.0} km  {:.1} L  {:.2}{full}",
        refuel.id, refuel.date, refuel.km, refuel.liters, refuel.value
    )
}

/// One-line description of an oil change.
#[must_use]
pub fn oil_change_line(oil_change: &OilChange) -> String {
    format!(
        "{}  {}  {:.0} km",
        oil_change.id, oil_change.date, oil_change.km
    )
}

fn row(label: &str, value: String) -> String {
    format!("{label:<18}{value}")
}

fn date_or_dash(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}
