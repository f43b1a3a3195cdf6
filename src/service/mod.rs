//! Service layer: the record store.
//!
//! [`RecordStore`] validates mutations, persists the aggregate through a
//! [`crate::persistence::RecordStorage`], and emits events through the
//! [`crate::domain::EventBus`]. It never computes statistics itself; it
//! hands its current snapshot to [`crate::domain::Statistics::compute`].

pub mod record_store;

pub use record_store::RecordStore;
