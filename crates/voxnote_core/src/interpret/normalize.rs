//! Utterance normalizer.
//!
//! # Invariants
//! - Output is lowercase with single spaces and no leading/trailing blanks.
//! - Wake words and filler lead-ins are only removed from the head.
//! - Never fails; empty input yields empty output.

use once_cell::sync::Lazy;
use regex::Regex;

/// Lead-ins stripped repeatedly from the head, longest first.
const FILLER_PREFIXES: &[&str] = &[
    "could you please",
    "can you please",
    "would you please",
    "could you",
    "can you",
    "would you",
    "will you",
    "i want you to",
    "i'd like you to",
    "please",
    "okay",
    "ok",
    "hey",
    "hi",
    "hello",
    "yo",
    "um",
    "uh",
];

static WHITESPACE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid ws regex"));
static MERIDIEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b([ap])\.\s?m\b\.?").expect("valid meridiem regex"));
static TRAILING_PUNCT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\s.!?]+$").expect("valid trailing punctuation regex"));

/// Normalizes a raw utterance for classification.
///
/// `wake_words` are additional head tokens (typically the assistant name)
/// that are stripped together with the fixed filler vocabulary.
pub fn normalize(raw: &str, wake_words: &[&str]) -> String {
    let lowered = raw.to_lowercase();
    let collapsed = WHITESPACE_RE.replace_all(lowered.trim(), " ");
    let meridiem = MERIDIEM_RE.replace_all(&collapsed, "${1}m");
    let trimmed = TRAILING_PUNCT_RE.replace(&meridiem, "");

    let wake_words = wake_words
        .iter()
        .map(|word| word.trim().to_lowercase())
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>();

    let mut rest = trimmed.trim();
    loop {
        let before = rest.len();
        rest = strip_head_punctuation(rest);
        for word in wake_words.iter().map(String::as_str).chain(FILLER_PREFIXES.iter().copied()) {
            if let Some(stripped) = strip_word_prefix(rest, word) {
                rest = stripped;
                break;
            }
        }
        if rest.len() == before {
            break;
        }
    }

    rest.to_string()
}

/// Finds the span of `raw` that normalized to `phrase`, keeping the speaker's
/// casing and dotted meridiems (`At 8 P.M.` for `at 8 pm`).
///
/// Returns `None` when the phrase cannot be traced back to the raw text.
pub fn find_verbatim<'a>(raw: &'a str, phrase: &str) -> Option<&'a str> {
    let words = phrase
        .split_whitespace()
        .map(|word| match word {
            "am" | "pm" => format!(r"{}\.?\s?m\.?", &word[..1]),
            other => regex::escape(other),
        })
        .collect::<Vec<_>>();
    if words.is_empty() {
        return None;
    }
    let pattern = format!(r"(?i)\b{}", words.join(r"[\s,]+"));
    let found = Regex::new(&pattern).ok()?.find(raw)?;
    Some(found.as_str())
}

/// Removes `prefix` from the head of `text` when it is a whole word.
pub(crate) fn strip_word_prefix<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    let rest = text.strip_prefix(prefix)?;
    match rest.chars().next() {
        None => Some(rest),
        Some(next) if next.is_whitespace() || next == ',' || next == '!' => Some(rest.trim_start()),
        Some(_) => None,
    }
}

fn strip_head_punctuation(text: &str) -> &str {
    text.trim_start_matches(|c: char| c.is_whitespace() || matches!(c, ',' | '!' | '.' | ':' | '-'))
}

#[cfg(test)]
mod tests {
    use super::{find_verbatim, normalize};

    #[test]
    fn lowercases_and_collapses_whitespace() {
        assert_eq!(normalize("  Show   MY\tNotes ", &[]), "show my notes");
    }

    #[test]
    fn strips_wake_word_and_fillers_from_head_only() {
        assert_eq!(
            normalize("Hey Pipoo, please create a note saying hey there", &["pipoo"]),
            "create a note saying hey there"
        );
    }

    #[test]
    fn keeps_inner_punctuation_and_drops_trailing_period() {
        assert_eq!(
            normalize("Create a note: buy milk, eggs, and bread.", &[]),
            "create a note: buy milk, eggs, and bread"
        );
    }

    #[test]
    fn folds_dotted_meridiem() {
        assert_eq!(
            normalize("Remind me to call mom at 8 P.M.", &[]),
            "remind me to call mom at 8 pm"
        );
    }

    #[test]
    fn wake_word_must_be_a_whole_word() {
        assert_eq!(normalize("hiking notes", &[]), "hiking notes");
    }

    #[test]
    fn empty_input_is_empty() {
        assert_eq!(normalize("   ", &["pipoo"]), "");
        assert_eq!(normalize("hey pipoo", &["pipoo"]), "");
    }

    #[test]
    fn verbatim_span_keeps_original_casing() {
        let raw = "Pipoo, remind me to call Mom At 8 P.M.";
        assert_eq!(find_verbatim(raw, "at 8 pm"), Some("At 8 P.M."));
        assert_eq!(find_verbatim("Remind me In 2 Hours", "in 2 hours"), Some("In 2 Hours"));
        assert_eq!(find_verbatim(raw, "tomorrow"), None);
        assert_eq!(find_verbatim(raw, ""), None);
    }
}
