//! Generic ordered record store.
//!
//! # Responsibility
//! - Create, list, delete-by-reference and clear records of one kind.
//! - Assign ids and resolve positional references.
//!
//! # Invariants
//! - Records stay in creation order.
//! - Every new id is greater than any id seen while the store is open.
//! - Each mutation saves the whole candidate collection first and only then
//!   swaps it in, so a failed save never changes the in-memory view.

use crate::interpret::reference::RecordRef;
use crate::model::{Record, RecordId};
use crate::repo::{RecordPersistence, StoreError, StoreResult};
use log::{error, info, warn};
use std::time::Instant;

/// Outcome of a successful create.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Created<T> {
    pub record: T,
    /// Collection size after the insert.
    pub total: usize,
}

/// Outcome of a successful delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Removed<T> {
    pub record: T,
    /// 1-based position the record had when it was removed.
    pub position: usize,
    /// Collection size after the removal.
    pub remaining: usize,
}

/// Ordered collection of records plus its persistence backend.
#[derive(Debug)]
pub struct RecordStore<T, P> {
    records: Vec<T>,
    next_id: RecordId,
    persistence: P,
}

impl<T: Record, P: RecordPersistence<T>> RecordStore<T, P> {
    /// Opens the store, loading the persisted collection.
    ///
    /// Records that fail validation, or whose id leaves no successor id, are
    /// skipped with a warning instead of failing the whole load.
    pub fn open(persistence: P) -> StoreResult<Self> {
        let started_at = Instant::now();
        let loaded = persistence.load().inspect_err(|err| {
            error!(
                "event=store_open module=repo status=error kind={} backend={} error={}",
                T::KIND,
                persistence.describe(),
                err
            );
        })?;

        let total = loaded.len();
        let records = loaded
            .into_iter()
            .filter(|record| record.validate().is_ok() && record.id().checked_add(1).is_some())
            .collect::<Vec<_>>();
        if records.len() != total {
            warn!(
                "event=store_open module=repo status=degraded kind={} skipped={}",
                T::KIND,
                total - records.len()
            );
        }

        let next_id = records.iter().map(Record::id).max().unwrap_or(0) + 1;
        info!(
            "event=store_open module=repo status=ok kind={} backend={} records={} duration_ms={}",
            T::KIND,
            persistence.describe(),
            records.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Self {
            records,
            next_id,
            persistence,
        })
    }

    /// Assigns the next id, appends and persists.
    pub fn create(&mut self, mut record: T) -> StoreResult<Created<T>> {
        let following = self
            .next_id
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted(T::KIND))?;
        record.assign_id(self.next_id);
        record.validate()?;

        let mut candidate = self.records.clone();
        candidate.push(record.clone());
        self.commit(candidate, "record_create")?;
        self.next_id = following;

        info!(
            "event=record_create module=repo status=ok kind={} id={} total={}",
            T::KIND,
            record.id(),
            self.records.len()
        );
        Ok(Created {
            record,
            total: self.records.len(),
        })
    }

    /// Records in creation order.
    pub fn list(&self) -> &[T] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Maps a reference onto a 0-based index of the current ordering.
    pub fn resolve(&self, reference: RecordRef) -> Option<usize> {
        match reference {
            RecordRef::Position(position) if (1..=self.records.len()).contains(&position) => {
                Some(position - 1)
            }
            RecordRef::Position(_) => None,
            RecordRef::Last => self.records.len().checked_sub(1),
            RecordRef::Id(id) => self.records.iter().position(|record| record.id() == id),
        }
    }

    /// Removes the record `reference` points at in the current ordering.
    pub fn delete_by_reference(&mut self, reference: RecordRef) -> StoreResult<Removed<T>> {
        let Some(index) = self.resolve(reference) else {
            info!(
                "event=record_delete module=repo status=not_found kind={} reference={} available={}",
                T::KIND,
                reference,
                self.records.len()
            );
            return Err(StoreError::NotFound {
                kind: T::KIND,
                reference,
                available: self.records.len(),
            });
        };

        let mut candidate = self.records.clone();
        let record = candidate.remove(index);
        self.commit(candidate, "record_delete")?;

        info!(
            "event=record_delete module=repo status=ok kind={} id={} position={} remaining={}",
            T::KIND,
            record.id(),
            index + 1,
            self.records.len()
        );
        Ok(Removed {
            record,
            position: index + 1,
            remaining: self.records.len(),
        })
    }

    /// Empties the collection and returns how many records were removed.
    pub fn clear(&mut self) -> StoreResult<usize> {
        let removed = self.records.len();
        if removed == 0 {
            return Ok(0);
        }
        self.commit(Vec::new(), "record_clear")?;
        info!(
            "event=record_clear module=repo status=ok kind={} removed={}",
            T::KIND,
            removed
        );
        Ok(removed)
    }

    /// Flushes the collection one last time and releases the backend.
    pub fn close(mut self) -> StoreResult<P> {
        let records = std::mem::take(&mut self.records);
        self.persistence.save(&records).inspect_err(|err| {
            error!(
                "event=store_close module=repo status=error kind={} error={}",
                T::KIND,
                err
            );
        })?;
        info!(
            "event=store_close module=repo status=ok kind={} records={}",
            T::KIND,
            records.len()
        );
        Ok(self.persistence)
    }

    /// Borrow of the backend, mainly for inspection in tests.
    pub fn persistence(&self) -> &P {
        &self.persistence
    }

    fn commit(&mut self, candidate: Vec<T>, event: &str) -> StoreResult<()> {
        let started_at = Instant::now();
        if let Err(err) = self.persistence.save(&candidate) {
            error!(
                "event={} module=repo status=error kind={} backend={} duration_ms={} error_code=persist_failed error={}",
                event,
                T::KIND,
                self.persistence.describe(),
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err);
        }
        self.records = candidate;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::RecordStore;
    use crate::interpret::reference::RecordRef;
    use crate::model::note::Note;
    use crate::repo::memory::MemoryStore;
    use crate::repo::StoreError;
    use chrono::{NaiveDate, NaiveDateTime};

    fn stamp() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 17)
            .and_then(|date| date.and_hms_opt(14, 30, 0))
            .expect("valid test instant")
    }

    fn store_with(contents: &[&str]) -> RecordStore<Note, MemoryStore<Note>> {
        let mut store = RecordStore::open(MemoryStore::new()).unwrap();
        for content in contents {
            store.create(Note::new(*content, stamp())).unwrap();
        }
        store
    }

    #[test]
    fn ids_start_at_one_and_count_up() {
        let store = store_with(&["a", "b"]);
        let ids = store.list().iter().map(|note| note.id).collect::<Vec<_>>();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn deleting_newest_does_not_recycle_its_id() {
        let mut store = store_with(&["a", "b", "c"]);
        store.delete_by_reference(RecordRef::Last).unwrap();
        let created = store.create(Note::new("d", stamp())).unwrap();
        assert_eq!(created.record.id, 4);
    }

    #[test]
    fn clear_keeps_id_high_water_mark() {
        let mut store = store_with(&["a", "b"]);
        assert_eq!(store.clear().unwrap(), 2);
        let created = store.create(Note::new("c", stamp())).unwrap();
        assert_eq!(created.record.id, 3);
        assert_eq!(created.total, 1);
    }

    #[test]
    fn explicit_id_reference_resolves_by_id() {
        let mut store = store_with(&["a", "b", "c"]);
        store.delete_by_reference(RecordRef::Position(1)).unwrap();
        assert_eq!(store.resolve(RecordRef::Id(3)), Some(1));
        assert_eq!(store.resolve(RecordRef::Id(1)), None);
    }

    #[test]
    fn out_of_range_reference_is_not_found() {
        let mut store = store_with(&["a"]);
        let err = store.delete_by_reference(RecordRef::Position(2)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { available: 1, .. }));
        let err = store.delete_by_reference(RecordRef::Position(0)).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn empty_content_is_rejected_before_persisting() {
        let mut store = store_with(&[]);
        let err = store.create(Note::new("   ", stamp())).unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert_eq!(store.persistence().saves(), 0);
    }

    #[test]
    fn open_skips_record_with_maximum_id() {
        let mut overflowing = Note::new("far away", stamp());
        overflowing.id = u64::MAX;
        let mut kept = Note::new("kept", stamp());
        kept.id = 2;
        let mut store =
            RecordStore::open(MemoryStore::with_records(vec![overflowing, kept])).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.create(Note::new("next", stamp())).unwrap().record.id, 3);
    }

    #[test]
    fn exhausted_ids_fail_create_without_changes() {
        let mut last = Note::new("last", stamp());
        last.id = u64::MAX - 1;
        let mut store = RecordStore::open(MemoryStore::with_records(vec![last])).unwrap();
        let err = store.create(Note::new("one more", stamp())).unwrap_err();
        assert!(matches!(err, StoreError::IdsExhausted(_)));
        assert_eq!(store.len(), 1);
        assert_eq!(store.persistence().saves(), 0);
    }

    #[test]
    fn open_skips_invalid_records_and_continues_ids() {
        let mut blank = Note::new("", stamp());
        blank.id = 9;
        let mut kept = Note::new("kept", stamp());
        kept.id = 5;
        let mut store = RecordStore::open(MemoryStore::with_records(vec![blank, kept])).unwrap();
        assert_eq!(store.len(), 1);
        let created = store.create(Note::new("next", stamp())).unwrap();
        assert_eq!(created.record.id, 6);
    }
}
