//! Record stores and their persistence backends.
//!
//! # Responsibility
//! - Own the ordered note and reminder collections.
//! - Keep the in-memory view and the durable copy identical after every
//!   mutation, including failed ones.
//!
//! # Invariants
//! - Mutations persist the full candidate collection before it becomes the
//!   in-memory view; a failed save leaves the store unchanged.
//! - Missing or corrupt backing files load as empty collections.

pub mod json_file;
pub mod memory;
pub mod record_store;

use crate::interpret::reference::RecordRef;
use crate::model::{RecordKind, RecordValidationError};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

pub type StoreResult<T> = Result<T, StoreError>;

/// Store and persistence error.
#[derive(Debug)]
pub enum StoreError {
    /// Backing file could not be read or written.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Collection could not be encoded.
    Serialize(serde_json::Error),
    /// A record broke a model invariant.
    Validation(RecordValidationError),
    /// No id is left to assign in this store.
    IdsExhausted(RecordKind),
    /// A reference did not match any live record.
    NotFound {
        kind: RecordKind,
        reference: RecordRef,
        available: usize,
    },
}

impl StoreError {
    /// Whether the error came from the durable layer rather than the caller.
    pub fn is_persistence(&self) -> bool {
        matches!(self, Self::Io { .. } | Self::Serialize(_))
    }
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io { path, source } => write!(f, "store file `{}`: {source}", path.display()),
            Self::Serialize(err) => write!(f, "failed to encode records: {err}"),
            Self::Validation(err) => write!(f, "{err}"),
            Self::IdsExhausted(kind) => write!(f, "no {kind} ids left to assign"),
            Self::NotFound {
                kind,
                reference,
                available,
            } => write!(f, "{kind} {reference} not found among {available}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Io { source, .. } => Some(source),
            Self::Serialize(err) => Some(err),
            Self::Validation(err) => Some(err),
            Self::IdsExhausted(_) | Self::NotFound { .. } => None,
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

impl From<RecordValidationError> for StoreError {
    fn from(value: RecordValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Durable backing for one record collection.
pub trait RecordPersistence<T> {
    /// Loads the full collection in stored order.
    fn load(&self) -> StoreResult<Vec<T>>;
    /// Replaces the durable collection with `records`.
    fn save(&mut self, records: &[T]) -> StoreResult<()>;
    /// Short description for log events (`file`, `memory`).
    fn describe(&self) -> &'static str;
}
