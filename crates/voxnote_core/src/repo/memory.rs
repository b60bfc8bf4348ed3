//! In-process persistence for tests and ephemeral hosts.

use crate::repo::{RecordPersistence, StoreResult};

/// Keeps the "durable" collection in memory and counts saves.
#[derive(Debug, Clone)]
pub struct MemoryStore<T> {
    records: Vec<T>,
    saves: usize,
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            saves: 0,
        }
    }
}

impl<T: Clone> MemoryStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from an already persisted collection.
    pub fn with_records(records: Vec<T>) -> Self {
        Self { records, saves: 0 }
    }

    /// Returns the last saved collection.
    pub fn snapshot(&self) -> Vec<T> {
        self.records.clone()
    }

    /// Number of completed saves.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl<T: Clone> RecordPersistence<T> for MemoryStore<T> {
    fn load(&self) -> StoreResult<Vec<T>> {
        Ok(self.records.clone())
    }

    fn save(&mut self, records: &[T]) -> StoreResult<()> {
        self.records = records.to_vec();
        self.saves += 1;
        Ok(())
    }

    fn describe(&self) -> &'static str {
        "memory"
    }
}
