//! Fixed-template response text.
//!
//! Wording, counts and emoji markers are user-visible contract; hosts and
//! tests compare against these strings literally.

use crate::model::reminder::Reminder;
use crate::model::timestamp;
use crate::model::RecordKind;
use crate::service::assistant::{Action, CommandError, DueReminder};
use std::fmt::Write;

/// Renders the response for one command result.
pub fn render(result: &Result<Action, CommandError>) -> String {
    match result {
        Ok(action) => render_action(action),
        Err(err) => render_error(err),
    }
}

/// Renders reminders whose time has come, one block per reminder.
pub fn render_due(due: &[DueReminder]) -> String {
    if due.is_empty() {
        return "🔕 No reminders are due right now.".to_string();
    }
    due.iter()
        .map(|item| {
            format!(
                "🔔 REMINDER: {}\n   (Set for: {})",
                item.reminder.content,
                when_label(&item.reminder)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn render_action(action: &Action) -> String {
    match action {
        Action::NoteCreated(created) => format!(
            "✅ Note saved! You now have {} note(s).\n💭 '{}'",
            created.total, created.record.content
        ),
        Action::NotesListed(notes) if notes.is_empty() => {
            "📝 You don't have any notes yet! Say 'create a note' to make one.".to_string()
        }
        Action::NotesListed(notes) => {
            let mut text = format!("📝 Your Notes ({} total):", notes.len());
            for (index, note) in notes.iter().enumerate() {
                let _ = write!(
                    text,
                    "\n\n{}. {}\n   📅 {}",
                    index + 1,
                    note.content,
                    timestamp::display(&note.timestamp)
                );
            }
            text
        }
        Action::NoteDeleted(removed) => format!(
            "🗑️ Deleted note {}: '{}'. You have {} note(s) left.",
            removed.position, removed.record.content, removed.remaining
        ),
        Action::NotesCleared(0) => "📝 You don't have any notes to clear.".to_string(),
        Action::NotesCleared(count) => format!("🗑️ Cleared all {count} notes!"),
        Action::ReminderCreated { created, resolved } => {
            let reminder = &created.record;
            let mut text = format!(
                "⏰ Reminder set! You now have {} reminder(s).\n📌 '{}'",
                created.total, reminder.content
            );
            if !reminder.when.is_empty() {
                let _ = write!(text, " - {}", reminder.when);
            }
            if let Some(label) = resolved.label.as_deref() {
                let _ = write!(text, "\n🕐 That's {label}");
            }
            text
        }
        Action::RemindersListed(reminders) if reminders.is_empty() => {
            "⏰ You don't have any reminders yet! Say 'set a reminder' to create one.".to_string()
        }
        Action::RemindersListed(reminders) => {
            let mut text = format!("⏰ Your Reminders ({} total):", reminders.len());
            for (index, reminder) in reminders.iter().enumerate() {
                let _ = write!(
                    text,
                    "\n\n{}. {}\n   ⏰ Remind: {}\n   📅 Set: {}",
                    index + 1,
                    reminder.content,
                    when_label(reminder),
                    timestamp::display(&reminder.created)
                );
            }
            text
        }
        Action::ReminderDeleted(removed) => format!(
            "🗑️ Deleted reminder {}: '{}'. You have {} reminder(s) left.",
            removed.position, removed.record.content, removed.remaining
        ),
        Action::RemindersCleared(0) => "⏰ You don't have any reminders to clear.".to_string(),
        Action::RemindersCleared(count) => format!("🗑️ Cleared all {count} reminders!"),
    }
}

fn render_error(err: &CommandError) -> String {
    match err {
        CommandError::Unrecognized => {
            "🤔 Sorry, I didn't catch that. Try 'create a note ...' or 'remind me to ...'."
                .to_string()
        }
        CommandError::EmptyContent(RecordKind::Note) => "📝 What should the note say?".to_string(),
        CommandError::EmptyContent(RecordKind::Reminder) => {
            "⏰ What should I remind you about?".to_string()
        }
        CommandError::MissingReference(kind) => format!(
            "❓ Which {0} should I delete? Try 'delete {0} 2' or 'delete the last {0}'.",
            kind.label()
        ),
        CommandError::ReferenceNotFound {
            kind,
            reference,
            available,
        } => format!(
            "❌ {} {} doesn't exist. You have {} {}(s).",
            title(*kind),
            reference,
            available,
            kind.label()
        ),
        CommandError::Persistence { kind, .. } => {
            format!("⚠️ Sorry, I couldn't save your {} right now.", kind.plural())
        }
    }
}

fn title(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::Note => "Note",
        RecordKind::Reminder => "Reminder",
    }
}

fn when_label(reminder: &Reminder) -> &str {
    if reminder.when.is_empty() {
        "no time set"
    } else {
        &reminder.when
    }
}

#[cfg(test)]
mod tests {
    use super::render;
    use crate::model::note::Note;
    use crate::model::RecordKind;
    use crate::repo::record_store::{Created, Removed};
    use crate::service::assistant::{Action, CommandError};
    use chrono::NaiveDate;

    fn note(id: u64, content: &str) -> Note {
        let stamp = NaiveDate::from_ymd_opt(2024, 11, 17)
            .and_then(|date| date.and_hms_opt(14, 30, 0))
            .expect("valid test instant");
        let mut note = Note::new(content, stamp);
        note.id = id;
        note
    }

    #[test]
    fn created_note_template() {
        let text = render(&Ok(Action::NoteCreated(Created {
            record: note(1, "buy milk"),
            total: 1,
        })));
        assert_eq!(text, "✅ Note saved! You now have 1 note(s).\n💭 'buy milk'");
    }

    #[test]
    fn listed_notes_template_numbers_from_one() {
        let text = render(&Ok(Action::NotesListed(vec![note(4, "a"), note(7, "b")])));
        assert_eq!(
            text,
            "📝 Your Notes (2 total):\n\n1. a\n   📅 Nov 17, 02:30 PM\n\n2. b\n   📅 Nov 17, 02:30 PM"
        );
    }

    #[test]
    fn deleted_note_template_uses_position() {
        let text = render(&Ok(Action::NoteDeleted(Removed {
            record: note(5, "b"),
            position: 2,
            remaining: 2,
        })));
        assert_eq!(text, "🗑️ Deleted note 2: 'b'. You have 2 note(s) left.");
    }

    #[test]
    fn not_found_template_reports_available_count() {
        let text = render(&Err(CommandError::ReferenceNotFound {
            kind: RecordKind::Reminder,
            reference: "3".to_string(),
            available: 1,
        }));
        assert_eq!(text, "❌ Reminder 3 doesn't exist. You have 1 reminder(s).");
    }

    #[test]
    fn missing_reference_asks_which_record() {
        let text = render(&Err(CommandError::MissingReference(RecordKind::Note)));
        assert_eq!(
            text,
            "❓ Which note should I delete? Try 'delete note 2' or 'delete the last note'."
        );
    }

    #[test]
    fn empty_clear_has_its_own_wording() {
        assert_eq!(
            render(&Ok(Action::NotesCleared(0))),
            "📝 You don't have any notes to clear."
        );
        assert_eq!(
            render(&Ok(Action::RemindersCleared(3))),
            "🗑️ Cleared all 3 reminders!"
        );
    }
}
