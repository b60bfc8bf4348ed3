//! Utterance interpretation pipeline.
//!
//! # Responsibility
//! - Turn one transcribed utterance into an intent plus extracted slots.
//! - Resolve spoken time phrases and positional references.
//!
//! # Invariants
//! - Every stage is pure: no I/O, no clock reads (callers pass `now`).
//! - Rule tables are evaluated top-to-bottom; first match wins.
//!
//! Flow: `normalize` -> `intent::classify` -> `slots::extract`
//! (-> `time::resolve` for reminders, `reference::parse` for deletes).

pub mod intent;
pub mod normalize;
pub mod reference;
pub mod slots;
pub mod time;
