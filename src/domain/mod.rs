//! Domain layer: history entries, the record aggregate, statistics and
//! the event system.
//!
//! Everything here is free of I/O. The [`VehicleRecord`] transitions and
//! [`Statistics::compute`] are pure; persistence and locking live in the
//! service layer.

pub mod entry_id;
pub mod event_bus;
pub mod oil_change;
pub mod record_event;
pub mod refuel;
pub mod statistics;
pub mod vehicle_record;

pub use entry_id::EntryId;
pub use event_bus::EventBus;
pub use oil_change::{NewOilChange, OilChange};
pub use record_event::RecordEvent;
pub use refuel::{NewRefuel, Refuel};
pub use statistics::Statistics;
pub use vehicle_record::{DEFAULT_OIL_CHANGE_INTERVAL, VehicleRecord};
