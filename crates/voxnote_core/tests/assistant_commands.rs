use chrono::{NaiveDate, NaiveDateTime};
use voxnote_core::{
    Action, Assistant, AssistantConfig, CommandError, Intent, MemoryStore, Note, RecordKind,
    Reminder,
};

type MemoryAssistant = Assistant<MemoryStore<Note>, MemoryStore<Reminder>>;

fn now() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 11, 17)
        .and_then(|date| date.and_hms_opt(14, 30, 0))
        .unwrap()
}

fn assistant() -> MemoryAssistant {
    Assistant::open(
        MemoryStore::new(),
        MemoryStore::new(),
        &AssistantConfig::default(),
    )
    .unwrap()
}

fn note_contents(assistant: &MemoryAssistant) -> Vec<&str> {
    assistant
        .notes()
        .iter()
        .map(|note| note.content.as_str())
        .collect()
}

#[test]
fn create_note_keeps_content_verbatim() {
    let mut assistant = assistant();
    let outcome = assistant.handle_at("Create a note buy milk, eggs, and bread.", now());

    assert_eq!(outcome.intent, Intent::CreateNote);
    assert_eq!(note_contents(&assistant), vec!["buy milk, eggs, and bread"]);
    assert_eq!(assistant.notes()[0].id, 1);
    assert_eq!(assistant.notes()[0].timestamp, now());
    assert_eq!(
        outcome.response,
        "✅ Note saved! You now have 1 note(s).\n💭 'buy milk, eggs, and bread'"
    );
}

#[test]
fn wake_word_and_fillers_are_ignored() {
    let mut assistant = assistant();
    let outcome = assistant.handle_at("Hey Pipoo, could you make a note that says call the bank", now());

    assert!(outcome.is_ok());
    assert_eq!(note_contents(&assistant), vec!["call the bank"]);
}

#[test]
fn show_on_empty_store_reports_zero() {
    let mut assistant = assistant();
    let outcome = assistant.handle_at("show my notes", now());

    assert_eq!(outcome.intent, Intent::ShowNotes);
    assert!(matches!(outcome.result, Ok(Action::NotesListed(ref notes)) if notes.is_empty()));
    assert_eq!(
        outcome.response,
        "📝 You don't have any notes yet! Say 'create a note' to make one."
    );
}

#[test]
fn delete_by_position_keeps_order_and_never_reuses_ids() {
    let mut assistant = assistant();
    for text in ["note alpha", "note bravo", "note charlie"] {
        assert!(assistant.handle_at(text, now()).is_ok());
    }

    let outcome = assistant.handle_at("delete note 2", now());
    assert_eq!(outcome.intent, Intent::DeleteNote);
    assert_eq!(
        outcome.response,
        "🗑️ Deleted note 2: 'bravo'. You have 2 note(s) left."
    );
    assert_eq!(note_contents(&assistant), vec!["alpha", "charlie"]);

    assistant.handle_at("note delta", now());
    let ids = assistant.notes().iter().map(|note| note.id).collect::<Vec<_>>();
    assert_eq!(ids, vec![1, 3, 4]);
}

#[test]
fn ordinal_delete_uses_current_positions_not_ids() {
    let mut assistant = assistant();
    for text in ["note alpha", "note bravo", "note charlie"] {
        assistant.handle_at(text, now());
    }
    assistant.handle_at("delete the first note", now());
    assistant.handle_at("delete the second note", now());

    assert_eq!(note_contents(&assistant), vec!["bravo"]);
}

#[test]
fn destructive_all_wins_over_create() {
    let mut assistant = assistant();
    assistant.handle_at("note keep me", now());

    let outcome = assistant.handle_at("delete all notes", now());
    assert_eq!(outcome.intent, Intent::ClearNotes);
    assert_eq!(outcome.response, "🗑️ Cleared all 1 notes!");
    assert!(assistant.notes().is_empty());

    let outcome = assistant.handle_at("delete all notes", now());
    assert_eq!(outcome.response, "📝 You don't have any notes to clear.");
}

#[test]
fn unknown_or_missing_reference_leaves_store_unchanged() {
    let mut assistant = assistant();
    assistant.handle_at("note only one", now());

    let outcome = assistant.handle_at("delete note 5", now());
    assert!(matches!(
        outcome.result,
        Err(CommandError::ReferenceNotFound {
            kind: RecordKind::Note,
            available: 1,
            ..
        })
    ));
    assert_eq!(outcome.response, "❌ Note 5 doesn't exist. You have 1 note(s).");

    let outcome = assistant.handle_at("delete note banana", now());
    assert!(matches!(
        outcome.result,
        Err(CommandError::ReferenceNotFound { ref reference, .. }) if reference == "banana"
    ));
    assert_eq!(assistant.notes().len(), 1);
}

#[test]
fn delete_with_only_an_article_asks_which_record() {
    let mut assistant = assistant();
    assistant.handle_at("note only one", now());

    let outcome = assistant.handle_at("delete the note", now());
    assert_eq!(outcome.intent, Intent::DeleteNote);
    assert!(matches!(
        outcome.result,
        Err(CommandError::MissingReference(RecordKind::Note))
    ));
    assert_eq!(
        outcome.response,
        "❓ Which note should I delete? Try 'delete note 2' or 'delete the last note'."
    );
    assert_eq!(note_contents(&assistant), vec!["only one"]);
}

#[test]
fn trigger_without_content_is_rejected() {
    let mut assistant = assistant();

    let outcome = assistant.handle_at("make a note saying", now());
    assert!(matches!(
        outcome.result,
        Err(CommandError::EmptyContent(RecordKind::Note))
    ));
    assert_eq!(outcome.response, "📝 What should the note say?");

    let outcome = assistant.handle_at("remind me at 5 pm", now());
    assert!(matches!(
        outcome.result,
        Err(CommandError::EmptyContent(RecordKind::Reminder))
    ));
    assert_eq!(
        assistant.handle_at("create a note", now()).intent,
        Intent::Unrecognized
    );
    assert!(assistant.notes().is_empty());
    assert!(assistant.reminders().is_empty());
}

#[test]
fn unrecognized_utterance_has_no_side_effects() {
    let mut assistant = assistant();
    let outcome = assistant.handle_at("what's the weather like", now());

    assert_eq!(outcome.intent, Intent::Unrecognized);
    assert!(matches!(outcome.result, Err(CommandError::Unrecognized)));
    assert!(outcome.response.starts_with("🤔"));
    assert!(assistant.notes().is_empty());
    assert!(assistant.reminders().is_empty());
}

#[test]
fn reminder_with_relative_time_resolves_clock() {
    let mut assistant = assistant();
    let outcome = assistant.handle_at("remind me to call mom in 2 hours", now());

    assert_eq!(outcome.intent, Intent::CreateReminder);
    let reminder = &assistant.reminders()[0];
    assert_eq!(reminder.content, "call mom");
    assert_eq!(reminder.when, "in 2 hours");
    assert_eq!(reminder.reminder_time.as_deref(), Some("04:30 PM today"));
    assert_eq!(
        outcome.response,
        "⏰ Reminder set! You now have 1 reminder(s).\n📌 'call mom' - in 2 hours\n🕐 That's 04:30 PM today"
    );
}

#[test]
fn reminder_time_phrase_keeps_the_speakers_wording() {
    let mut assistant = assistant();
    let outcome = assistant.handle_at("Remind me to call mom At 8 P.M.", now());

    let reminder = &assistant.reminders()[0];
    assert_eq!(reminder.content, "call mom");
    assert_eq!(reminder.when, "At 8 P.M.");
    assert_eq!(reminder.reminder_time.as_deref(), Some("08:00 PM today"));
    assert_eq!(
        outcome.response,
        "⏰ Reminder set! You now have 1 reminder(s).\n📌 'call mom' - At 8 P.M.\n🕐 That's 08:00 PM today"
    );
}

#[test]
fn reminder_without_time_still_saves() {
    let mut assistant = assistant();
    let outcome = assistant.handle_at("remind me to pay rent", now());

    assert_eq!(
        outcome.response,
        "⏰ Reminder set! You now have 1 reminder(s).\n📌 'pay rent'"
    );
    let reminder = &assistant.reminders()[0];
    assert_eq!(reminder.when, "");
    assert!(reminder.reminder_time.is_none());

    let outcome = assistant.handle_at("show my reminders", now());
    assert_eq!(
        outcome.response,
        "⏰ Your Reminders (1 total):\n\n1. pay rent\n   ⏰ Remind: no time set\n   📅 Set: Nov 17, 02:30 PM"
    );
}

#[test]
fn reminder_commands_do_not_touch_notes() {
    let mut assistant = assistant();
    assistant.handle_at("note stays put", now());
    assistant.handle_at("remind me to stretch in 20 minutes", now());
    assistant.handle_at("set a reminder to water plants at 8 pm", now());

    let outcome = assistant.handle_at("delete reminder 1", now());
    assert_eq!(
        outcome.response,
        "🗑️ Deleted reminder 1: 'stretch'. You have 1 reminder(s) left."
    );

    let outcome = assistant.handle_at("clear all reminders", now());
    assert_eq!(outcome.response, "🗑️ Cleared all 1 reminders!");
    assert_eq!(note_contents(&assistant), vec!["stays put"]);
}

#[test]
fn interpret_is_pure() {
    let assistant = assistant();
    let interpretation = assistant.interpret("Pipoo, remind me to call mom at 8 P.M.", now());

    assert_eq!(interpretation.normalized, "remind me to call mom at 8 pm");
    assert_eq!(interpretation.classification.intent, Intent::CreateReminder);
    assert!(interpretation.slots.is_ok());
    assert!(assistant.reminders().is_empty());
}
