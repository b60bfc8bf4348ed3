//! Core domain logic for the VoxNote voice assistant.
//! This crate turns transcribed utterances into note and reminder actions
//! and is the single source of truth for their invariants.

pub mod config;
pub mod interpret;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{AssistantConfig, ConfigError};
pub use interpret::intent::{classify, Classification, Intent};
pub use interpret::normalize::normalize;
pub use interpret::reference::RecordRef;
pub use interpret::slots::{ExtractOptions, SlotError, Slots};
pub use interpret::time::{ResolvedTime, TimeDescriptor};
pub use logging::{default_log_level, init_logging, logging_status, LogSettings, LoggingError};
pub use model::note::Note;
pub use model::reminder::Reminder;
pub use model::{Record, RecordId, RecordKind, RecordValidationError};
pub use repo::json_file::JsonFileStore;
pub use repo::memory::MemoryStore;
pub use repo::record_store::{Created, RecordStore, Removed};
pub use repo::{RecordPersistence, StoreError, StoreResult};
pub use service::assistant::{
    Action, Assistant, CommandError, CommandOutcome, DueReminder, FileAssistant, Interpretation,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
