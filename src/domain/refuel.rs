//! Refuel entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::EntryId;

/// One fueling event as stored in the record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Refuel {
    /// Entry identifier.
    pub id: EntryId,
    /// Calendar date of the refuel.
    pub date: NaiveDate,
    /// Odometer reading when refueling.
    pub km: f64,
    /// Volume added, in liters.
    pub liters: f64,
    /// Amount paid.
    pub value: f64,
    /// Whether this refuel filled the tank. Full-tank refuels reset the
    /// fuel-level and consumption accounting.
    pub is_full: bool,
}

/// A refuel that has not been assigned an identifier yet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRefuel {
    /// Calendar date of the refuel.
    pub date: NaiveDate,
    /// Odometer reading when refueling.
    pub km: f64,
    /// Volume added, in liters.
    pub liters: f64,
    /// Amount paid.
    pub value: f64,
    /// Whether this refuel filled the tank.
    pub is_full: bool,
}

impl NewRefuel {
    /// Attaches an identifier, producing the stored entry.
    #[must_use]
    pub fn with_id(self, id: EntryId) -> Refuel {
        Refuel {
            id,
            date: self.date,
            km: self.km,
            liters: self.liters,
            value: self.value,
            is_full: self.is_full,
        }
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn wire_format_uses_camel_case_and_iso_dates() {
        let Some(date) = NaiveDate::from_ymd_opt(2024, 1, 1) else {
            panic!("valid date");
        };
        let refuel = NewRefuel {
            date,
            km: 1000.0,
            liters: 10.0,
            value: 58.9,
            is_full: true,
        }
        .with_id(EntryId::from("r-1"));

        let Ok(value) = serde_json::to_value(&refuel) else {
            panic!("serialization failed");
        };
        assert_eq!(value["id"], "r-1");
        assert_eq!(value["date"], "2024-01-01");
        assert_eq!(value["isFull"], true);
    }

    #[test]
    fn accepts_integer_numbers() {
        let json = r#"{"id":"1","date":"2024-02-01","km":1200,"liters":8,"value":40,"isFull":false}"#;
        let Ok(refuel) = serde_json::from_str::<Refuel>(json) else {
            panic!("deserialization failed");
        };
        assert!((refuel.km - 1200.0).abs() < f64::EPSILON);
        assert!(!refuel.is_full);
    }
}
