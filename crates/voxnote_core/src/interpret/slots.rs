//! Slot extraction for classified utterances.
//!
//! # Responsibility
//! - Pull note content, reminder content and time phrase, or the delete
//!   reference out of a classified utterance.
//!
//! # Invariants
//! - Connective tokens are only removed from the head of the remaining text.
//! - A reminder without a recognizable time is still a valid reminder.
//! - Unknown references are reported, never mapped to some record.

use crate::interpret::intent::{Classification, Intent};
use crate::interpret::normalize::strip_word_prefix;
use crate::interpret::reference::{self, RecordRef};
use crate::interpret::time::{self, ResolvedTime};
use crate::model::RecordKind;
use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Lead-in words stripped after a note trigger, longest first.
pub const NOTE_CONNECTIVES: &[&str] = &["that says", "which says", "saying", "says", "that", "about"];

/// Lead-in words stripped after a reminder trigger, longest first.
pub const REMINDER_CONNECTIVES: &[&str] = &["for me", "to", "that", "about", "for", "me"];

/// Courtesy words dropped from the end of extracted content.
const COURTESY_SUFFIXES: &[&str] = &["thank you", "thanks", "please"];

/// Words a delete rule may capture in place of a reference.
const DETERMINERS: &[&str] = &["the", "a", "an", "my", "this", "that"];

/// Words that do not count towards the minimum content length.
const TRIVIAL_WORDS: &[&str] = &["a", "an", "the", "um", "uh", "please", "thanks"];

/// Free-form time tails accepted when no structured phrase is present. The
/// `by`/`before`/`after`/`around` forms only count when their object is
/// itself time-like, so "stop by the bank" keeps its full content.
static TIME_TAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?:^|\s)(?P<tail>(?:tonight|later(?:\s+today)?|soon|eventually|today|this\s+(?:morning|afternoon|evening|weekend)|next\s+(?:week|month|year)|(?:by|before|after|around|sometime)\s+(?:the\s+)?(?:end\s+of\s+(?:the\s+)?(?:day|week|month|year)|(?:this|next)\s+(?:morning|afternoon|evening|weekend|week|month|year)|tonight|today|tomorrow(?:\s+(?:morning|afternoon|evening|night))?|noon|midnight|lunch|dinner|monday|tuesday|wednesday|thursday|friday|saturday|sunday|\d{1,2}(?::\d{2})?(?:\s*(?:am|pm))?)))$",
    )
    .expect("valid time tail regex")
});

/// Tunables for extraction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    /// Minimum number of non-trivial words a created record must contain.
    pub min_content_words: usize,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            min_content_words: 1,
        }
    }
}

/// Extracted payload for one utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slots {
    Note {
        content: String,
    },
    Reminder {
        content: String,
        /// Time phrase as heard; empty when none was spoken.
        when: String,
        resolved: ResolvedTime,
    },
    Reference {
        token: String,
        reference: RecordRef,
    },
    /// Intent carries no payload (show, clear, unrecognized).
    Empty,
}

/// Extraction failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    /// Trigger matched but nothing usable remained.
    EmptyContent(RecordKind),
    /// Delete command named no record at all (`delete the note`).
    MissingReference(RecordKind),
    /// Delete reference outside the supported vocabulary.
    UnknownReference { kind: RecordKind, token: String },
}

impl Display for SlotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyContent(kind) => write!(f, "no {kind} content after trigger phrase"),
            Self::MissingReference(kind) => write!(f, "no {kind} reference given"),
            Self::UnknownReference { kind, token } => {
                write!(f, "unknown {kind} reference `{token}`")
            }
        }
    }
}

impl Error for SlotError {}

/// Extracts slots for `classification` from the normalized `text`.
pub fn extract(
    text: &str,
    classification: &Classification,
    now: NaiveDateTime,
    options: &ExtractOptions,
) -> Result<Slots, SlotError> {
    match classification.intent {
        Intent::CreateNote => extract_note(classification.remainder(text), options),
        Intent::CreateReminder => extract_reminder(classification.remainder(text), now, options),
        Intent::DeleteNote => extract_reference(text, classification, RecordKind::Note),
        Intent::DeleteReminder => extract_reference(text, classification, RecordKind::Reminder),
        Intent::ShowNotes
        | Intent::ClearNotes
        | Intent::ShowReminders
        | Intent::ClearReminders
        | Intent::Unrecognized => Ok(Slots::Empty),
    }
}

fn extract_note(remainder: &str, options: &ExtractOptions) -> Result<Slots, SlotError> {
    let content = clean_content(remainder, NOTE_CONNECTIVES);
    ensure_content(&content, RecordKind::Note, options)?;
    Ok(Slots::Note { content })
}

fn extract_reminder(
    remainder: &str,
    now: NaiveDateTime,
    options: &ExtractOptions,
) -> Result<Slots, SlotError> {
    let (body, when) = match time::locate(remainder) {
        Some(span) => {
            let when = remainder[span.clone()].trim().to_string();
            let body = format!("{} {}", &remainder[..span.start], &remainder[span.end..]);
            (body, when)
        }
        None => match TIME_TAIL_RE.captures(remainder).and_then(|caps| caps.name("tail")) {
            Some(tail) => (
                remainder[..tail.start()].to_string(),
                tail.as_str().trim().to_string(),
            ),
            None => (remainder.to_string(), String::new()),
        },
    };

    let content = clean_content(&body, REMINDER_CONNECTIVES);
    ensure_content(&content, RecordKind::Reminder, options)?;
    let resolved = time::resolve(&when, now);
    Ok(Slots::Reminder {
        content,
        when,
        resolved,
    })
}

fn extract_reference(
    text: &str,
    classification: &Classification,
    kind: RecordKind,
) -> Result<Slots, SlotError> {
    let token = classification
        .reference
        .clone()
        .and_then(|span| text.get(span))
        .unwrap_or("")
        .trim()
        .to_string();
    if token.is_empty() || DETERMINERS.contains(&token.as_str()) {
        return Err(SlotError::MissingReference(kind));
    }
    match reference::parse(&token) {
        Some(reference) => Ok(Slots::Reference { token, reference }),
        None => Err(SlotError::UnknownReference { kind, token }),
    }
}

/// Collapses whitespace, strips head connectives and courtesy tails.
fn clean_content(raw: &str, connectives: &[&str]) -> String {
    let collapsed = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    let mut rest = collapsed.as_str();

    loop {
        let before = rest.len();
        rest = trim_separators(rest);
        if let Some(stripped) = connectives
            .iter()
            .find_map(|connective| strip_word_prefix(rest, connective))
        {
            rest = stripped;
        }
        if let Some(stripped) = COURTESY_SUFFIXES
            .iter()
            .find_map(|suffix| strip_word_suffix(rest, suffix))
        {
            rest = stripped;
        }
        if rest.len() == before {
            break;
        }
    }

    rest.to_string()
}

fn strip_word_suffix<'a>(text: &'a str, suffix: &str) -> Option<&'a str> {
    let rest = text.strip_suffix(suffix)?;
    match rest.chars().last() {
        None => Some(rest),
        Some(prev) if prev.is_whitespace() || prev == ',' => Some(rest.trim_end()),
        Some(_) => None,
    }
}

fn trim_separators(text: &str) -> &str {
    text.trim_matches(|c: char| c.is_whitespace() || matches!(c, ',' | ':' | ';' | '-'))
}

fn ensure_content(
    content: &str,
    kind: RecordKind,
    options: &ExtractOptions,
) -> Result<(), SlotError> {
    let meaningful = content
        .split_whitespace()
        .filter(|word| word.chars().any(char::is_alphanumeric))
        .filter(|word| !TRIVIAL_WORDS.contains(word))
        .count();
    if meaningful < options.min_content_words.max(1) {
        return Err(SlotError::EmptyContent(kind));
    }
    Ok(())
}
