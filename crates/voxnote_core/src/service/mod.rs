//! Command services.
//!
//! # Responsibility
//! - Run one utterance through interpretation, the stores and the formatter.
//! - Keep hosts (CLI, voice layer) decoupled from store and parser details.

pub mod assistant;
pub mod response;
