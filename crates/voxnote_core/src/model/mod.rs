//! Record models owned by the note and reminder stores.
//!
//! # Responsibility
//! - Define the persisted shapes of notes and reminders.
//! - Expose the `Record` contract the generic store works against.
//!
//! # Invariants
//! - Every record is identified by a positive `RecordId` that is never reused
//!   while its store is open.
//! - Records are plain values; no record holds a reference to another store.

pub mod note;
pub mod reminder;
pub mod timestamp;

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Positive integer identity assigned by a record store.
pub type RecordId = u64;

/// Which of the two record collections a value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Note,
    Reminder,
}

impl RecordKind {
    /// Singular lowercase label used in log events and responses.
    pub fn label(self) -> &'static str {
        match self {
            Self::Note => "note",
            Self::Reminder => "reminder",
        }
    }

    /// Plural lowercase label.
    pub fn plural(self) -> &'static str {
        match self {
            Self::Note => "notes",
            Self::Reminder => "reminders",
        }
    }
}

impl Display for RecordKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation failure for a record about to be persisted or just loaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordValidationError {
    /// Content is empty or whitespace only.
    EmptyContent(RecordKind),
    /// Id `0` is reserved for "not yet assigned".
    UnassignedId(RecordKind),
}

impl Display for RecordValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent(kind) => write!(f, "{kind} content must not be empty"),
            Self::UnassignedId(kind) => write!(f, "{kind} id must be a positive integer"),
        }
    }
}

impl Error for RecordValidationError {}

/// Contract shared by every value a `RecordStore` can hold.
pub trait Record: Clone + Serialize + DeserializeOwned {
    /// Collection this record type lives in.
    const KIND: RecordKind;

    /// Store-assigned identity, `0` while unassigned.
    fn id(&self) -> RecordId;

    /// Called exactly once by the store when the record is created.
    fn assign_id(&mut self, id: RecordId);

    /// User-visible text of the record.
    fn content(&self) -> &str;

    /// Checks invariants that must hold for persisted records.
    fn validate(&self) -> Result<(), RecordValidationError> {
        if self.content().trim().is_empty() {
            return Err(RecordValidationError::EmptyContent(Self::KIND));
        }
        if self.id() == 0 {
            return Err(RecordValidationError::UnassignedId(Self::KIND));
        }
        Ok(())
    }
}
