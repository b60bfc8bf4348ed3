//! Assistant command service.
//!
//! # Responsibility
//! - Own the note and reminder stores for the lifetime of a host session.
//! - Turn one utterance into one store action and one response string.
//!
//! # Invariants
//! - Commands are processed one at a time; each call completes (including
//!   persistence) before returning.
//! - Every failure is reported through `CommandOutcome`; no command error
//!   escapes as a panic or aborts the session.
//! - Logged events never contain note or reminder text.

use crate::config::AssistantConfig;
use crate::interpret::intent::{classify, Classification, Intent};
use crate::interpret::normalize::{find_verbatim, normalize};
use crate::interpret::slots::{extract, ExtractOptions, SlotError, Slots};
use crate::interpret::time::{self, ResolvedTime};
use crate::model::note::Note;
use crate::model::reminder::Reminder;
use crate::model::timestamp;
use crate::model::{Record, RecordKind, RecordValidationError};
use crate::repo::json_file::JsonFileStore;
use crate::repo::record_store::{Created, RecordStore, Removed};
use crate::repo::{RecordPersistence, StoreError, StoreResult};
use crate::service::response;
use chrono::NaiveDateTime;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Command-level failure; always recoverable.
#[derive(Debug)]
pub enum CommandError {
    /// No intent rule matched.
    Unrecognized,
    /// A create intent matched but no usable content remained.
    EmptyContent(RecordKind),
    /// A delete command did not say which record.
    MissingReference(RecordKind),
    /// The delete reference did not match a live record.
    ReferenceNotFound {
        kind: RecordKind,
        /// Reference as spoken (`2`, `second`, `banana`).
        reference: String,
        /// Live records at the time of the command.
        available: usize,
    },
    /// The backing store could not be written; nothing changed.
    Persistence { kind: RecordKind, source: StoreError },
}

impl CommandError {
    /// Stable code for log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unrecognized => "unrecognized",
            Self::EmptyContent(_) => "empty_content",
            Self::MissingReference(_) => "missing_reference",
            Self::ReferenceNotFound { .. } => "reference_not_found",
            Self::Persistence { .. } => "persistence_failure",
        }
    }
}

impl Display for CommandError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unrecognized => f.write_str("utterance not recognized"),
            Self::EmptyContent(kind) => write!(f, "{kind} content is empty"),
            Self::MissingReference(kind) => write!(f, "no {kind} reference given"),
            Self::ReferenceNotFound {
                kind,
                reference,
                available,
            } => write!(f, "{kind} `{reference}` not found among {available}"),
            Self::Persistence { kind, source } => write!(f, "failed to persist {kind}s: {source}"),
        }
    }
}

impl Error for CommandError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Successful store action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    NoteCreated(Created<Note>),
    NotesListed(Vec<Note>),
    NoteDeleted(Removed<Note>),
    NotesCleared(usize),
    ReminderCreated {
        created: Created<Reminder>,
        resolved: ResolvedTime,
    },
    RemindersListed(Vec<Reminder>),
    ReminderDeleted(Removed<Reminder>),
    RemindersCleared(usize),
}

/// Pure interpretation of an utterance, before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interpretation {
    pub normalized: String,
    pub classification: Classification,
    pub slots: Result<Slots, SlotError>,
}

/// Everything a host needs after one command.
#[derive(Debug)]
pub struct CommandOutcome {
    pub intent: Intent,
    pub result: Result<Action, CommandError>,
    /// Text to show or speak.
    pub response: String,
}

impl CommandOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// A reminder whose trigger instant has been reached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DueReminder {
    /// 1-based position in the reminder list.
    pub position: usize,
    pub reminder: Reminder,
    pub trigger_at: NaiveDateTime,
}

/// Assistant backed by the JSON files named in `AssistantConfig`.
pub type FileAssistant = Assistant<JsonFileStore<Note>, JsonFileStore<Reminder>>;

/// Owns both stores and runs the interpretation pipeline.
#[derive(Debug)]
pub struct Assistant<N, R> {
    notes: RecordStore<Note, N>,
    reminders: RecordStore<Reminder, R>,
    wake_words: Vec<String>,
    options: ExtractOptions,
}

impl FileAssistant {
    /// Opens both record files under `config.data_dir`.
    pub fn open_files(config: &AssistantConfig) -> StoreResult<Self> {
        Self::open(
            JsonFileStore::new(config.notes_path()),
            JsonFileStore::new(config.reminders_path()),
            config,
        )
    }
}

impl<N, R> Assistant<N, R>
where
    N: RecordPersistence<Note>,
    R: RecordPersistence<Reminder>,
{
    /// Opens both stores; fails only when a backend cannot be read.
    pub fn open(notes: N, reminders: R, config: &AssistantConfig) -> StoreResult<Self> {
        Ok(Self {
            notes: RecordStore::open(notes)?,
            reminders: RecordStore::open(reminders)?,
            wake_words: config
                .wake_words()
                .into_iter()
                .map(str::to_string)
                .collect(),
            options: config.extract_options(),
        })
    }

    /// Handles one utterance using the local wall clock.
    pub fn handle(&mut self, utterance: &str) -> CommandOutcome {
        self.handle_at(utterance, timestamp::now())
    }

    /// Handles one utterance against an explicit reference instant.
    pub fn handle_at(&mut self, utterance: &str, now: NaiveDateTime) -> CommandOutcome {
        let started_at = Instant::now();
        let interpretation = self.interpret(utterance, now);
        let intent = interpretation.classification.intent;
        let result = self.apply(interpretation, now);
        let response = response::render(&result);

        match &result {
            Ok(_) => info!(
                "event=command_handle module=service status=ok intent={} duration_ms={}",
                intent,
                started_at.elapsed().as_millis()
            ),
            Err(err) => warn!(
                "event=command_handle module=service status=error intent={} error_code={} duration_ms={}",
                intent,
                err.code(),
                started_at.elapsed().as_millis()
            ),
        }

        CommandOutcome {
            intent,
            result,
            response,
        }
    }

    /// Runs normalization, classification and slot extraction only.
    pub fn interpret(&self, utterance: &str, now: NaiveDateTime) -> Interpretation {
        let wake_words = self.wake_words.iter().map(String::as_str).collect::<Vec<_>>();
        let normalized = normalize(utterance, &wake_words);
        let classification = classify(&normalized);
        // Reminders keep the time phrase as the speaker said it.
        let slots =
            extract(&normalized, &classification, now, &self.options).map(|slots| match slots {
                Slots::Reminder {
                    content,
                    when,
                    resolved,
                } => Slots::Reminder {
                    content,
                    when: find_verbatim(utterance, &when)
                        .map(str::to_string)
                        .unwrap_or(when),
                    resolved,
                },
                other => other,
            });
        Interpretation {
            normalized,
            classification,
            slots,
        }
    }

    pub fn notes(&self) -> &[Note] {
        self.notes.list()
    }

    pub fn reminders(&self) -> &[Reminder] {
        self.reminders.list()
    }

    /// Reminders whose spoken time, normalized and resolved from their
    /// creation instant, is at or before `now`.
    pub fn due_reminders(&self, now: NaiveDateTime) -> Vec<DueReminder> {
        self.reminders
            .list()
            .iter()
            .enumerate()
            .filter_map(|(index, reminder)| {
                let phrase = normalize(&reminder.when, &[]);
                let trigger_at = time::resolve(&phrase, reminder.created).at?;
                (trigger_at <= now).then(|| DueReminder {
                    position: index + 1,
                    reminder: reminder.clone(),
                    trigger_at,
                })
            })
            .collect()
    }

    /// Flushes and releases both backends.
    pub fn close(self) -> StoreResult<(N, R)> {
        let notes = self.notes.close()?;
        let reminders = self.reminders.close()?;
        info!("event=assistant_close module=service status=ok");
        Ok((notes, reminders))
    }

    fn apply(
        &mut self,
        interpretation: Interpretation,
        now: NaiveDateTime,
    ) -> Result<Action, CommandError> {
        let intent = interpretation.classification.intent;
        let slots = match interpretation.slots {
            Ok(slots) => slots,
            Err(SlotError::EmptyContent(kind)) => return Err(CommandError::EmptyContent(kind)),
            Err(SlotError::MissingReference(kind)) => {
                return Err(CommandError::MissingReference(kind));
            }
            Err(SlotError::UnknownReference { kind, token }) => {
                return Err(CommandError::ReferenceNotFound {
                    kind,
                    reference: token,
                    available: self.count(kind),
                });
            }
        };

        match (intent, slots) {
            (Intent::CreateNote, Slots::Note { content }) => self
                .notes
                .create(Note::new(content, now))
                .map(Action::NoteCreated)
                .map_err(|err| store_failure(Note::KIND, None, err)),
            (Intent::ShowNotes, _) => Ok(Action::NotesListed(self.notes.list().to_vec())),
            (Intent::DeleteNote, Slots::Reference { token, reference }) => self
                .notes
                .delete_by_reference(reference)
                .map(Action::NoteDeleted)
                .map_err(|err| store_failure(Note::KIND, Some(token), err)),
            (Intent::ClearNotes, _) => self
                .notes
                .clear()
                .map(Action::NotesCleared)
                .map_err(|err| store_failure(Note::KIND, None, err)),
            (
                Intent::CreateReminder,
                Slots::Reminder {
                    content,
                    when,
                    resolved,
                },
            ) => {
                let reminder = Reminder::new(content, when, resolved.label.clone(), now);
                self.reminders
                    .create(reminder)
                    .map(|created| Action::ReminderCreated { created, resolved })
                    .map_err(|err| store_failure(Reminder::KIND, None, err))
            }
            (Intent::ShowReminders, _) => {
                Ok(Action::RemindersListed(self.reminders.list().to_vec()))
            }
            (Intent::DeleteReminder, Slots::Reference { token, reference }) => self
                .reminders
                .delete_by_reference(reference)
                .map(Action::ReminderDeleted)
                .map_err(|err| store_failure(Reminder::KIND, Some(token), err)),
            (Intent::ClearReminders, _) => self
                .reminders
                .clear()
                .map(Action::RemindersCleared)
                .map_err(|err| store_failure(Reminder::KIND, None, err)),
            _ => Err(CommandError::Unrecognized),
        }
    }

    fn count(&self, kind: RecordKind) -> usize {
        match kind {
            RecordKind::Note => self.notes.len(),
            RecordKind::Reminder => self.reminders.len(),
        }
    }
}

fn store_failure(kind: RecordKind, token: Option<String>, err: StoreError) -> CommandError {
    match err {
        StoreError::NotFound {
            reference,
            available,
            ..
        } => CommandError::ReferenceNotFound {
            kind,
            reference: token.unwrap_or_else(|| reference.to_string()),
            available,
        },
        StoreError::Validation(RecordValidationError::EmptyContent(kind)) => {
            CommandError::EmptyContent(kind)
        }
        other => CommandError::Persistence {
            kind,
            source: other,
        },
    }
}
