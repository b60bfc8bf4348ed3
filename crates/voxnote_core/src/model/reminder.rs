//! Reminder record.
//!
//! # Invariants
//! - `when` keeps the time phrase exactly as it was heard (after
//!   normalization); it is never rewritten by later resolution.
//! - `reminder_time` is present only when the phrase resolved to a concrete
//!   schedule, and is omitted from the persisted object otherwise.

use crate::model::{Record, RecordId, RecordKind};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: RecordId,
    /// Task description.
    pub content: String,
    /// Raw time phrase, possibly empty when none was spoken.
    pub when: String,
    /// Human-readable resolved schedule (`04:30 PM today`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder_time: Option<String>,
    #[serde(with = "crate::model::timestamp")]
    pub created: NaiveDateTime,
}

impl Reminder {
    pub fn new(
        content: impl Into<String>,
        when: impl Into<String>,
        reminder_time: Option<String>,
        created: NaiveDateTime,
    ) -> Self {
        Self {
            id: 0,
            content: content.into(),
            when: when.into(),
            reminder_time,
            created,
        }
    }
}

impl Record for Reminder {
    const KIND: RecordKind = RecordKind::Reminder;

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

#[cfg(test)]
mod tests {
    use super::Reminder;
    use chrono::NaiveDate;

    fn created() -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 11, 17)
            .and_then(|date| date.and_hms_opt(14, 30, 0))
            .expect("valid fixed instant")
    }

    #[test]
    fn unresolved_reminder_omits_reminder_time_field() {
        let mut reminder = Reminder::new("workout", "tomorrow", None, created());
        reminder.id = 3;
        let json = serde_json::to_value(&reminder).expect("serialize reminder");
        assert!(json.get("reminder_time").is_none());
        assert_eq!(json["created"], "2024-11-17 14:30:00");
        assert_eq!(json["when"], "tomorrow");
    }

    #[test]
    fn null_reminder_time_loads_as_absent() {
        let raw = r#"{"id":1,"content":"x","when":"soon","reminder_time":null,"created":"2024-11-17 14:30:00"}"#;
        let reminder: Reminder = serde_json::from_str(raw).expect("parse reminder");
        assert_eq!(reminder.reminder_time, None);
        assert_eq!(reminder.created, created());
    }
}
