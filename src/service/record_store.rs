//! Record store: owns the aggregate, applies mutations, emits events.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::domain::{
    EntryId, EventBus, NewOilChange, NewRefuel, OilChange, RecordEvent, Refuel, Statistics,
    VehicleRecord,
};
use crate::error::TrackerError;
use crate::persistence::RecordStorage;
use crate::validation;

/// Owner of the single [`VehicleRecord`].
///
/// Loaded (or defaulted) once by [`RecordStore::open`]. Every mutation
/// follows the same pattern: validate → take the write lock → derive the
/// next aggregate from a copy → persist it → swap it in → emit an event.
/// If persisting fails the previous aggregate stays in place.
///
/// Mutations are serialized by the write lock and applied in call order.
#[derive(Debug)]
pub struct RecordStore {
    record: RwLock<VehicleRecord>,
    storage: Arc<dyn RecordStorage>,
    event_bus: EventBus,
    default_oil_change_interval: f64,
}

impl RecordStore {
    /// Loads the persisted record, falling back to an empty record with
    /// `default_oil_change_interval` when nothing usable is stored.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] if an existing document cannot be
    /// read at all. An unparsable document is not an error.
    pub async fn open(
        storage: Arc<dyn RecordStorage>,
        event_bus: EventBus,
        default_oil_change_interval: f64,
    ) -> Result<Self, TrackerError> {
        let record = storage
            .load()
            .await?
            .unwrap_or_else(|| VehicleRecord::with_interval(default_oil_change_interval));

        tracing::info!(
            key = storage.key(),
            revision = record.revision,
            refuels = record.refuels.len(),
            oil_changes = record.oil_changes.len(),
            "record loaded"
        );

        Ok(Self {
            record: RwLock::new(record),
            storage,
            event_bus,
            default_oil_change_interval,
        })
    }

    /// Returns a reference to the inner [`EventBus`].
    #[must_use]
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    /// Returns a copy of the current aggregate.
    pub async fn snapshot(&self) -> VehicleRecord {
        self.record.read().await.clone()
    }

    /// Derives statistics from the current aggregate.
    pub async fn statistics(&self) -> Statistics {
        Statistics::compute(&*self.record.read().await)
    }

    /// Replaces the odometer reading.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidInput`] for a negative or non-finite
    /// km, or a persistence error.
    pub async fn set_current_km(&self, km: f64) -> Result<(), TrackerError> {
        validation::odometer("currentKm", km)?;

        let (revision, ()) = self.apply(|record| (record.with_current_km(km), ())).await?;

        self.event_bus.publish(RecordEvent::CurrentKmUpdated {
            km,
            revision,
            timestamp: Utc::now(),
        });
        tracing::info!(km, revision, "current km updated");
        Ok(())
    }

    /// Appends a refuel under a fresh identifier and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidInput`] if a field is out of range,
    /// or a persistence error.
    pub async fn add_refuel(&self, entry: NewRefuel) -> Result<Refuel, TrackerError> {
        validation::refuel(&entry)?;

        let (revision, refuel) = self
            .apply(|record| {
                let id = fresh_id(|id| record.has_refuel(id));
                let refuel = entry.with_id(id);
                (record.with_refuel(refuel.clone()), refuel)
            })
            .await?;

        self.event_bus.publish(RecordEvent::RefuelAdded {
            refuel: refuel.clone(),
            revision,
            timestamp: Utc::now(),
        });
        tracing::info!(
            id = %refuel.id,
            km = refuel.km,
            liters = refuel.liters,
            is_full = refuel.is_full,
            revision,
            "refuel added"
        );
        Ok(refuel)
    }

    /// Appends an oil change under a fresh identifier, makes its km the
    /// last oil-change km, and returns it.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidInput`] for an invalid km, or a
    /// persistence error.
    pub async fn add_oil_change(&self, entry: NewOilChange) -> Result<OilChange, TrackerError> {
        validation::oil_change(&entry)?;

        let (revision, oil_change) = self
            .apply(|record| {
                let id = fresh_id(|id| record.has_oil_change(id));
                let oil_change = entry.with_id(id);
                (record.with_oil_change(oil_change.clone()), oil_change)
            })
            .await?;

        self.event_bus.publish(RecordEvent::OilChangeAdded {
            oil_change: oil_change.clone(),
            revision,
            timestamp: Utc::now(),
        });
        tracing::info!(id = %oil_change.id, km = oil_change.km, revision, "oil change added");
        Ok(oil_change)
    }

    /// Removes the refuel `id`. An unknown id is not an error; the return
    /// value tells whether an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the record cannot be saved.
    pub async fn delete_refuel(&self, id: &EntryId) -> Result<bool, TrackerError> {
        let (revision, removed) = self.apply(|record| record.without_refuel(id)).await?;

        self.event_bus.publish(RecordEvent::RefuelDeleted {
            id: id.clone(),
            removed,
            revision,
            timestamp: Utc::now(),
        });
        tracing::info!(%id, removed, revision, "refuel deleted");
        Ok(removed)
    }

    /// Removes the oil change `id`. An unknown id is not an error.
    ///
    /// The last oil-change km is NOT recomputed, even when the removed
    /// entry was its source.
    ///
    /// # Errors
    ///
    /// Returns a persistence error if the record cannot be saved.
    pub async fn delete_oil_change(&self, id: &EntryId) -> Result<bool, TrackerError> {
        let (revision, removed) = self.apply(|record| record.without_oil_change(id)).await?;

        self.event_bus.publish(RecordEvent::OilChangeDeleted {
            id: id.clone(),
            removed,
            revision,
            timestamp: Utc::now(),
        });
        tracing::info!(%id, removed, revision, "oil change deleted");
        Ok(removed)
    }

    /// Replaces the oil-change interval.
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::InvalidInput`] unless `interval` is finite
    /// and positive, or a persistence error.
    pub async fn set_oil_change_interval(&self, interval: f64) -> Result<(), TrackerError> {
        validation::oil_change_interval(interval)?;

        let (revision, ()) = self
            .apply(|record| (record.with_oil_change_interval(interval), ()))
            .await?;

        self.event_bus.publish(RecordEvent::OilChangeIntervalUpdated {
            interval,
            revision,
            timestamp: Utc::now(),
        });
        tracing::info!(interval, revision, "oil change interval updated");
        Ok(())
    }

    /// Re-reads the persisted document, replacing the in-memory aggregate.
    /// Used to recover from a [`TrackerError::RevisionConflict`].
    ///
    /// # Errors
    ///
    /// Returns [`TrackerError::Storage`] if the document cannot be read.
    pub async fn reload(&self) -> Result<(), TrackerError> {
        let mut current = self.record.write().await;
        let loaded = self
            .storage
            .load()
            .await?
            .unwrap_or_else(|| VehicleRecord::with_interval(self.default_oil_change_interval));
        let revision = loaded.revision;
        *current = loaded;
        drop(current);

        self.event_bus.publish(RecordEvent::RecordReloaded {
            revision,
            timestamp: Utc::now(),
        });
        tracing::info!(revision, "record reloaded");
        Ok(())
    }

    /// Derives the next aggregate from a copy of the current one, persists
    /// it, and only then makes it canonical. Returns the new revision and
    /// whatever `mutate` produced.
    async fn apply<T>(
        &self,
        mutate: impl FnOnce(VehicleRecord) -> (VehicleRecord, T),
    ) -> Result<(u64, T), TrackerError> {
        let mut current = self.record.write().await;
        let expected = current.revision;

        let (next, output) = mutate(current.clone());
        let next = next.next_revision();

        if let Err(e) = self.storage.save(&next, expected).await {
            tracing::warn!(error = %e, revision = expected, "record not saved, mutation dropped");
            return Err(e);
        }

        let revision = next.revision;
        *current = next;
        Ok((revision, output))
    }
}

/// Generates identifiers until one is not taken.
fn fresh_id(taken: impl Fn(&EntryId) -> bool) -> EntryId {
    let mut id = EntryId::new();
    while taken(&id) {
        id = EntryId::new();
    }
    id
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use chrono::NaiveDate;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::persistence::InMemoryStorage;

    fn date(s: &str) -> NaiveDate {
        let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") else {
            panic!("valid date: {s}");
        };
        date
    }

    fn new_refuel(day: &str, km: f64, liters: f64, is_full: bool) -> NewRefuel {
        NewRefuel {
            date: date(day),
            km,
            liters,
            value: liters * 6.0,
            is_full,
        }
    }

    fn new_oil(day: &str, km: f64) -> NewOilChange {
        NewOilChange {
            date: date(day),
            km,
        }
    }

    async fn open(storage: &InMemoryStorage) -> RecordStore {
        let Ok(store) =
            RecordStore::open(Arc::new(storage.clone()), EventBus::new(64), 5000.0).await
        else {
            panic!("store should open");
        };
        store
    }

    async fn make_store() -> RecordStore {
        open(&InMemoryStorage::new("moto-tracker-data")).await
    }

    #[tokio::test]
    async fn opens_with_defaults_when_nothing_is_stored() {
        let store = make_store().await;
        let record = store.snapshot().await;
        assert_eq!(record, VehicleRecord::default());
    }

    #[tokio::test]
    async fn opens_with_defaults_when_document_is_garbage() {
        let storage = InMemoryStorage::with_raw("k", "{\"currentKm\": tru");
        let store = open(&storage).await;
        assert_eq!(store.snapshot().await, VehicleRecord::default());
    }

    #[tokio::test]
    async fn malformed_document_with_a_revision_stays_writable() {
        let raw = r#"{"currentKm":900,"lastOilChangeKm":0,
            "refuels":[{"id":"r1","date":"2024/01/01","km":900,"liters":9,"value":50,"isFull":true}],
            "oilChanges":[],"oilChangeInterval":5000,"revision":3}"#;
        let storage = InMemoryStorage::with_raw("k", raw);
        let store = open(&storage).await;
        assert_eq!(store.snapshot().await.revision, 0);

        assert_ok!(store.set_current_km(10.0).await);
        assert_ok!(store.reload().await);
        assert_ok!(store.set_current_km(20.0).await);

        let record = open(&storage).await.snapshot().await;
        assert_eq!(record.current_km, 20.0);
        assert_eq!(record.revision, 2);
    }

    #[tokio::test]
    async fn default_interval_comes_from_the_caller() {
        let storage = InMemoryStorage::new("k");
        let Ok(store) = RecordStore::open(Arc::new(storage), EventBus::new(4), 3000.0).await else {
            panic!("store should open");
        };
        assert_eq!(store.snapshot().await.oil_change_interval, 3000.0);
    }

    #[tokio::test]
    async fn added_refuel_echoes_input_with_a_new_id() {
        let store = make_store().await;
        let input = new_refuel("2024-01-01", 1000.0, 10.0, true);

        let first = assert_ok!(store.add_refuel(input.clone()).await);
        let second = assert_ok!(store.add_refuel(input.clone()).await);

        assert_ne!(first.id, second.id);
        assert_eq!(first.date, input.date);
        assert_eq!(first.km, input.km);
        assert_eq!(first.liters, input.liters);
        assert_eq!(first.value, input.value);
        assert_eq!(first.is_full, input.is_full);
        assert_eq!(store.snapshot().await.refuels, vec![first, second]);
    }

    #[tokio::test]
    async fn refuel_does_not_touch_odometer_fields() {
        let store = make_store().await;
        assert_ok!(store.set_current_km(700.0).await);
        assert_ok!(store.add_refuel(new_refuel("2024-01-01", 900.0, 9.0, false)).await);

        let record = store.snapshot().await;
        assert_eq!(record.current_km, 700.0);
        assert_eq!(record.last_oil_change_km, 0.0);
    }

    #[tokio::test]
    async fn add_then_delete_restores_previous_state() {
        let store = make_store().await;
        assert_ok!(store.add_refuel(new_refuel("2024-01-01", 1000.0, 10.0, true)).await);
        let before = store.statistics().await;
        let len_before = store.snapshot().await.refuels.len();

        let added = assert_ok!(store.add_refuel(new_refuel("2024-02-01", 1200.0, 8.0, false)).await);
        assert!(assert_ok!(store.delete_refuel(&added.id).await));

        assert_eq!(store.snapshot().await.refuels.len(), len_before);
        assert_eq!(store.statistics().await, before);
    }

    #[tokio::test]
    async fn deleting_unknown_ids_is_silent() {
        let store = make_store().await;
        assert!(!assert_ok!(store.delete_refuel(&EntryId::from("nope")).await));
        assert!(!assert_ok!(store.delete_oil_change(&EntryId::from("nope")).await));
    }

    #[tokio::test]
    async fn oil_change_insertion_order_wins() {
        let store = make_store().await;
        let first = assert_ok!(store.add_oil_change(new_oil("2024-06-01", 9000.0)).await);
        let second = assert_ok!(store.add_oil_change(new_oil("2023-01-01", 2000.0)).await);

        assert_ne!(first.id, second.id);
        assert_eq!((first.date, first.km), (date("2024-06-01"), 9000.0));
        assert_eq!((second.date, second.km), (date("2023-01-01"), 2000.0));

        let record = store.snapshot().await;
        assert_eq!(record.last_oil_change_km, 2000.0);
        assert_eq!(
            store.statistics().await.last_oil_change_date,
            Some(date("2024-06-01"))
        );
    }

    #[tokio::test]
    async fn deleting_the_source_oil_change_leaves_last_km_stale() {
        let store = make_store().await;
        let added = assert_ok!(store.add_oil_change(new_oil("2024-06-01", 4000.0)).await);
        assert!(assert_ok!(store.delete_oil_change(&added.id).await));

        let record = store.snapshot().await;
        assert!(record.oil_changes.is_empty());
        assert_eq!(record.last_oil_change_km, 4000.0);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected_without_persisting() {
        let storage = InMemoryStorage::new("k");
        let store = open(&storage).await;
        let mut rx = store.event_bus().subscribe();

        assert_err!(store.set_current_km(-1.0).await);
        assert_err!(store.set_oil_change_interval(0.0).await);
        assert_err!(store.add_refuel(new_refuel("2024-01-01", 10.0, 0.0, false)).await);
        assert_err!(store.add_oil_change(new_oil("2024-01-01", f64::NAN)).await);

        assert!(storage.raw().await.is_none());
        assert_eq!(store.snapshot().await, VehicleRecord::default());
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn every_mutation_is_persisted_and_bumps_the_revision() {
        let storage = InMemoryStorage::new("k");
        let store = open(&storage).await;

        assert_ok!(store.set_current_km(4800.0).await);
        assert_ok!(store.set_oil_change_interval(6000.0).await);

        let reopened = open(&storage).await;
        let record = reopened.snapshot().await;
        assert_eq!(record.current_km, 4800.0);
        assert_eq!(record.oil_change_interval, 6000.0);
        assert_eq!(record.revision, 2);
        assert_eq!(reopened.statistics().await.km_to_next_oil_change, 1200.0);
    }

    #[tokio::test]
    async fn mutations_publish_events_in_order() {
        let store = make_store().await;
        let mut rx = store.event_bus().subscribe();

        assert_ok!(store.set_current_km(100.0).await);
        let refuel = assert_ok!(store.add_refuel(new_refuel("2024-01-01", 100.0, 5.0, true)).await);
        assert_ok!(store.delete_refuel(&refuel.id).await);

        let mut kinds = Vec::new();
        while let Ok(event) = rx.try_recv() {
            kinds.push((event.event_type_str(), event.revision()));
        }
        assert_eq!(
            kinds,
            vec![
                ("current_km_updated", 1),
                ("refuel_added", 2),
                ("refuel_deleted", 3),
            ]
        );
    }

    #[tokio::test]
    async fn concurrent_writer_causes_conflict_until_reload() {
        let storage = InMemoryStorage::new("k");
        let tab_a = open(&storage).await;
        let tab_b = open(&storage).await;

        assert_ok!(tab_a.set_current_km(1000.0).await);

        let err = assert_err!(tab_b.set_current_km(2000.0).await);
        assert!(matches!(err, TrackerError::RevisionConflict { .. }));
        assert_eq!(tab_b.snapshot().await.current_km, 0.0);

        assert_ok!(tab_b.reload().await);
        assert_eq!(tab_b.snapshot().await.current_km, 1000.0);
        assert_ok!(tab_b.set_current_km(2000.0).await);

        let reopened = open(&storage).await;
        assert_eq!(reopened.snapshot().await.current_km, 2000.0);
    }

    #[tokio::test]
    async fn scenario_statistics_through_the_store() {
        let store = make_store().await;
        assert_ok!(store.add_refuel(new_refuel("2024-01-01", 1000.0, 10.0, true)).await);
        assert_ok!(store.add_refuel(new_refuel("2024-02-01", 1200.0, 8.0, false)).await);
        assert_ok!(store.set_current_km(1200.0).await);

        let stats = store.statistics().await;
        assert!((stats.current_fuel_level - 18.0).abs() < 1e-9);
        assert!((stats.average_consumption - 4.0).abs() < 1e-9);
        assert_eq!(stats.total_refuels, 2);
        assert_eq!(stats, store.statistics().await);
    }

    #[test]
    fn fresh_id_skips_taken_ids() {
        let checks = std::cell::Cell::new(0);
        let id = fresh_id(|_| {
            checks.set(checks.get() + 1);
            checks.get() < 3
        });
        assert_eq!(checks.get(), 3);
        assert!(!id.as_str().is_empty());
    }
}
