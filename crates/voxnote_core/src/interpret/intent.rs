//! Rule-based intent classifier.
//!
//! # Responsibility
//! - Map a normalized utterance to exactly one `Intent`.
//! - Report the trigger span so slot extraction can strip it.
//!
//! # Invariants
//! - Rules are one ordered table, evaluated top-to-bottom; the first rule
//!   that matches decides the intent.
//! - Tier order: destructive-all, delete-by-reference, show, create
//!   reminder, create note.
//! - Create rules only match when text remains after the trigger.

use crate::model::RecordKind;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};
use std::ops::Range;

const REFERENCE: &str = r"(?P<reference>id\s+#?\d+|\S+)";
const SHOW_VERBS: &str = r"(?:show|list|display|read|view|open|check|tell\s+me)";
const SHOW_FILLER: &str = r"(?:\s+(?:me|my|all|of|the|out|back|saved|current|up))*";
const DELETE_VERBS: &str = r"(?:delete|remove|erase|cancel|drop)";
const CLEAR_VERBS: &str = r"(?:clear|delete|remove|erase|wipe|cancel)";

/// Classified action category for an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    CreateNote,
    ShowNotes,
    DeleteNote,
    ClearNotes,
    CreateReminder,
    ShowReminders,
    DeleteReminder,
    ClearReminders,
    Unrecognized,
}

impl Intent {
    /// Record collection the intent acts on.
    pub fn kind(self) -> Option<RecordKind> {
        match self {
            Self::CreateNote | Self::ShowNotes | Self::DeleteNote | Self::ClearNotes => {
                Some(RecordKind::Note)
            }
            Self::CreateReminder
            | Self::ShowReminders
            | Self::DeleteReminder
            | Self::ClearReminders => Some(RecordKind::Reminder),
            Self::Unrecognized => None,
        }
    }

    /// Stable snake_case name for log events.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::CreateNote => "create_note",
            Self::ShowNotes => "show_notes",
            Self::DeleteNote => "delete_note",
            Self::ClearNotes => "clear_notes",
            Self::CreateReminder => "create_reminder",
            Self::ShowReminders => "show_reminders",
            Self::DeleteReminder => "delete_reminder",
            Self::ClearReminders => "clear_reminders",
            Self::Unrecognized => "unrecognized",
        }
    }

    fn requires_content(self) -> bool {
        matches!(self, Self::CreateNote | Self::CreateReminder)
    }
}

impl Display for Intent {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Precedence tier of a rule; lower tiers are evaluated first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Tier {
    DestructiveAll,
    DeleteByReference,
    Show,
    CreateReminder,
    CreateNote,
}

/// One row of the classification table.
#[derive(Debug)]
pub struct IntentRule {
    pub name: &'static str,
    pub tier: Tier,
    pub intent: Intent,
    pattern: Regex,
}

impl IntentRule {
    fn new(name: &'static str, tier: Tier, intent: Intent, pattern: &str) -> Self {
        Self {
            name,
            tier,
            intent,
            pattern: Regex::new(pattern).expect("valid intent rule regex"),
        }
    }

    /// Applies this rule alone, ignoring precedence.
    pub fn matches(&self, text: &str) -> Option<Classification> {
        let caps = self.pattern.captures(text)?;
        let trigger = caps.get(0)?.range();
        if self.intent.requires_content() && text[trigger.end..].trim().is_empty() {
            return None;
        }
        Some(Classification {
            intent: self.intent,
            rule: Some(self.name),
            trigger,
            reference: caps.name("reference").map(|m| m.range()),
        })
    }
}

/// Classifier verdict for one normalized utterance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub intent: Intent,
    /// Name of the winning rule, `None` when unrecognized.
    pub rule: Option<&'static str>,
    /// Byte span of the matched trigger phrase.
    pub trigger: Range<usize>,
    /// Byte span of the reference token for delete-by-reference rules.
    pub reference: Option<Range<usize>>,
}

impl Classification {
    fn unrecognized() -> Self {
        Self {
            intent: Intent::Unrecognized,
            rule: None,
            trigger: 0..0,
            reference: None,
        }
    }

    /// Text following the trigger phrase.
    pub fn remainder<'a>(&self, text: &'a str) -> &'a str {
        text.get(self.trigger.end..).unwrap_or("").trim()
    }
}

static RULES: Lazy<Vec<IntentRule>> = Lazy::new(|| {
    use Intent::*;
    use Tier::*;

    vec![
        IntentRule::new(
            "clear_all_reminders",
            DestructiveAll,
            ClearReminders,
            &format!(
                r"\b{CLEAR_VERBS}\s+(?:out\s+)?(?:all|every|everything)\b(?:\s+(?:of|in))?(?:\s+(?:my|the))?\s+reminders?\b"
            ),
        ),
        IntentRule::new(
            "clear_reminders",
            DestructiveAll,
            ClearReminders,
            r"\bclear\s+(?:out\s+)?(?:my\s+|the\s+)?reminders\b",
        ),
        IntentRule::new(
            "clear_all_notes",
            DestructiveAll,
            ClearNotes,
            &format!(
                r"\b{CLEAR_VERBS}\s+(?:out\s+)?(?:all|every|everything)\b(?:\s+(?:of|in))?(?:\s+(?:my|the))?\s+notes?\b"
            ),
        ),
        IntentRule::new(
            "clear_notes",
            DestructiveAll,
            ClearNotes,
            r"\bclear\s+(?:out\s+)?(?:my\s+|the\s+)?notes\b",
        ),
        IntentRule::new(
            "delete_reminder_number",
            DeleteByReference,
            DeleteReminder,
            &format!(r"\b{DELETE_VERBS}\s+(?:the\s+|my\s+)?reminders?\s+(?:number\s+)?{REFERENCE}"),
        ),
        IntentRule::new(
            "delete_ordinal_reminder",
            DeleteByReference,
            DeleteReminder,
            &format!(r"\b{DELETE_VERBS}\s+(?:the\s+|my\s+)?{REFERENCE}\s+reminder\b"),
        ),
        IntentRule::new(
            "delete_note_number",
            DeleteByReference,
            DeleteNote,
            &format!(r"\b{DELETE_VERBS}\s+(?:the\s+|my\s+)?notes?\s+(?:number\s+)?{REFERENCE}"),
        ),
        IntentRule::new(
            "delete_ordinal_note",
            DeleteByReference,
            DeleteNote,
            &format!(r"\b{DELETE_VERBS}\s+(?:the\s+|my\s+)?{REFERENCE}\s+note\b"),
        ),
        IntentRule::new(
            "show_reminders",
            Show,
            ShowReminders,
            &format!(r"^{SHOW_VERBS}{SHOW_FILLER}\s+reminders?\b"),
        ),
        IntentRule::new(
            "ask_reminders",
            Show,
            ShowReminders,
            r"^(?:what\s+(?:are|were)\s+(?:all\s+)?my\s+reminders|what\s+reminders\s+do\s+i\s+have|do\s+i\s+have\s+any\s+reminders)\b",
        ),
        IntentRule::new(
            "show_notes",
            Show,
            ShowNotes,
            &format!(r"^{SHOW_VERBS}{SHOW_FILLER}\s+notes?\b"),
        ),
        IntentRule::new(
            "ask_notes",
            Show,
            ShowNotes,
            r"^(?:what\s+(?:are|were)\s+(?:all\s+)?my\s+notes|what\s+notes\s+do\s+i\s+have|do\s+i\s+have\s+any\s+notes)\b",
        ),
        IntentRule::new(
            "remind_me",
            Tier::CreateReminder,
            Intent::CreateReminder,
            r"\bremind\s+me\b",
        ),
        IntentRule::new(
            "set_reminder",
            Tier::CreateReminder,
            Intent::CreateReminder,
            r"\b(?:set|add|create|make|schedule)\s+(?:me\s+)?(?:a\s+|an\s+|new\s+)?reminder\b",
        ),
        IntentRule::new(
            "reminder_to",
            Tier::CreateReminder,
            Intent::CreateReminder,
            r"\breminder\s+to\b",
        ),
        IntentRule::new(
            "reminder_lead",
            Tier::CreateReminder,
            Intent::CreateReminder,
            r"^reminder\b",
        ),
        IntentRule::new(
            "make_note",
            Tier::CreateNote,
            Intent::CreateNote,
            r"\b(?:create|make|write|take|add|save|jot)\s+(?:down\s+)?(?:a\s+|an\s+|new\s+|this\s+)?(?:quick\s+)?note\b",
        ),
        IntentRule::new(
            "new_note",
            Tier::CreateNote,
            Intent::CreateNote,
            r"\bnew\s+note\b",
        ),
        IntentRule::new(
            "note_down",
            Tier::CreateNote,
            Intent::CreateNote,
            r"\bnote\s+down\b",
        ),
        IntentRule::new(
            "write_down",
            Tier::CreateNote,
            Intent::CreateNote,
            r"\b(?:write|jot)\s+(?:this\s+|that\s+)?down\b",
        ),
        IntentRule::new(
            "remember_that",
            Tier::CreateNote,
            Intent::CreateNote,
            r"\bremember\s+that\b",
        ),
        IntentRule::new(
            "remember_lead",
            Tier::CreateNote,
            Intent::CreateNote,
            r"^remember\b",
        ),
        IntentRule::new("note_lead", Tier::CreateNote, Intent::CreateNote, r"^note\b"),
    ]
});

/// Returns the classification table in evaluation order.
pub fn rules() -> &'static [IntentRule] {
    RULES.as_slice()
}

/// Classifies a normalized utterance.
pub fn classify(text: &str) -> Classification {
    if text.trim().is_empty() {
        return Classification::unrecognized();
    }
    rules()
        .iter()
        .find_map(|rule| rule.matches(text))
        .unwrap_or_else(Classification::unrecognized)
}
