//! # moto-tracker
//!
//! Personal motorcycle maintenance tracker. Records refuels and oil
//! changes in a single local JSON document and derives running statistics
//! (fuel level, consumption, distance to the next oil change, totals).
//!
//! ## Architecture
//!
//! ```text
//! CLI (cli/)
//!     │
//!     ├── RecordStore (service/)     validate → persist → swap → emit
//!     │       │
//!     │       ├── VehicleRecord (domain/)   pure transitions
//!     │       ├── EventBus (domain/)
//!     │       └── RecordStorage (persistence/)
//!     │               ├── FileStorage
//!     │               └── InMemoryStorage
//!     │
//!     └── Statistics::compute (domain/)     pure read model
//! ```

pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod persistence;
pub mod service;
pub mod validation;

pub use domain::{
    EntryId, EventBus, NewOilChange, NewRefuel, OilChange, RecordEvent, Refuel, Statistics,
    VehicleRecord,
};
pub use error::TrackerError;
pub use service::RecordStore;
