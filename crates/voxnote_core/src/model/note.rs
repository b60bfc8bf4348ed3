//! Note record.
//!
//! # Invariants
//! - `timestamp` is fixed at creation and never rewritten.
//! - `content` is non-empty once the record reaches a store.

use crate::model::{Record, RecordId, RecordKind};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Free-form note captured from an utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: RecordId,
    pub content: String,
    #[serde(with = "crate::model::timestamp")]
    pub timestamp: NaiveDateTime,
}

impl Note {
    /// Creates an unassigned note; the store sets `id` on insert.
    pub fn new(content: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            id: 0,
            content: content.into(),
            timestamp,
        }
    }
}

impl Record for Note {
    const KIND: RecordKind = RecordKind::Note;

    fn id(&self) -> RecordId {
        self.id
    }

    fn assign_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn content(&self) -> &str {
        &self.content
    }
}
