//! Positional references spoken in delete commands.
//!
//! Positions are 1-based against the list as currently shown, so `note 2`
//! means the second live note regardless of its stored id.

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt::{Display, Formatter};

static NUMERIC_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#?(?P<n>\d+)(?:st|nd|rd|th)?$").expect("valid numeric reference regex")
});
static EXPLICIT_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^id\s+#?(?P<n>\d+)$").expect("valid id reference regex"));

const ORDINAL_WORDS: [&str; 10] = [
    "first", "second", "third", "fourth", "fifth", "sixth", "seventh", "eighth", "ninth", "tenth",
];
const CARDINAL_WORDS: [&str; 10] = [
    "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
];

/// A resolved-able pointer at one record of a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    /// 1-based position in creation order.
    Position(usize),
    /// The most recently created live record.
    Last,
    /// A stored id, as in `delete note id 7`.
    Id(u64),
}

impl Display for RecordRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Position(position) => write!(f, "{position}"),
            Self::Last => f.write_str("last"),
            Self::Id(id) => write!(f, "id {id}"),
        }
    }
}

/// Parses a spoken reference token.
///
/// Returns `None` for anything outside the bounded vocabulary; callers must
/// surface that as a not-found condition rather than guess.
pub fn parse(token: &str) -> Option<RecordRef> {
    let token = token.trim().trim_end_matches(['.', ',', '!', '?']);
    if token == "last" {
        return Some(RecordRef::Last);
    }
    if let Some(caps) = EXPLICIT_ID_RE.captures(token) {
        return caps["n"].parse().ok().map(RecordRef::Id);
    }
    if let Some(caps) = NUMERIC_RE.captures(token) {
        return caps["n"].parse().ok().map(RecordRef::Position);
    }
    ORDINAL_WORDS
        .iter()
        .position(|word| *word == token)
        .or_else(|| CARDINAL_WORDS.iter().position(|word| *word == token))
        .map(|index| RecordRef::Position(index + 1))
}

#[cfg(test)]
mod tests {
    use super::{parse, RecordRef};

    #[test]
    fn parses_digits_and_suffixed_ordinals() {
        assert_eq!(parse("2"), Some(RecordRef::Position(2)));
        assert_eq!(parse("3rd"), Some(RecordRef::Position(3)));
        assert_eq!(parse("#4"), Some(RecordRef::Position(4)));
    }

    #[test]
    fn parses_words_up_to_ten() {
        assert_eq!(parse("first"), Some(RecordRef::Position(1)));
        assert_eq!(parse("tenth"), Some(RecordRef::Position(10)));
        assert_eq!(parse("two"), Some(RecordRef::Position(2)));
        assert_eq!(parse("last"), Some(RecordRef::Last));
        assert_eq!(parse("eleventh"), None);
    }

    #[test]
    fn parses_explicit_ids() {
        assert_eq!(parse("id 7"), Some(RecordRef::Id(7)));
    }

    #[test]
    fn rejects_unknown_tokens() {
        assert_eq!(parse("banana"), None);
        assert_eq!(parse(""), None);
    }
}
