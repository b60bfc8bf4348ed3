//! Time expression resolver.
//!
//! # Responsibility
//! - Locate a spoken time phrase inside a reminder utterance.
//! - Parse the phrase into a `TimeDescriptor` and resolve it against `now`.
//!
//! # Invariants
//! - Clock phrases without a day roll forward: a time that is not strictly
//!   after `now` resolves to the next day.
//! - Weekday phrases resolve strictly forward; naming today's weekday means
//!   the same weekday next week.
//! - Bare `tomorrow` stays `Vague`; no default hour is invented.
//! - Unparseable phrases degrade to `Vague`, never to an error.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::ops::Range;

const CLOCK_SPAN: &str = r"(?:\d{1,2}(?::\d{2})?(?:\s*(?:am|pm))?|noon|midnight)";
const CLOCK_CAPTURE: &str =
    r"(?:(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?(?:\s*(?P<meridiem>am|pm))?|(?P<named>noon|midnight))";
const WEEKDAYS: &str = r"(?:monday|tuesday|wednesday|thursday|friday|saturday|sunday)";

static RELATIVE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bin\s+(?P<amount>\d+|an?|one)\s+(?P<unit>minute|min|hour|hr|day)s?\b")
        .expect("valid relative regex")
});
static AT_CLOCK_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\bat\s+{CLOCK_CAPTURE}\b")).expect("valid clock regex")
});
static WEEKDAY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(r"\b(?P<day>{WEEKDAYS})\b")).expect("valid weekday regex")
});
static TOMORROW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\btomorrow\b").expect("valid tomorrow regex"));
static TODAY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(?P<day>today|tonight)\b").expect("valid today regex"));

/// Phrase locators in priority order. Compound forms precede their parts so
/// `on monday at 5 pm` is taken whole instead of as a bare `at 5 pm`. A
/// weekday only counts with an `on`/`next`/`this` lead-in, so a weekday word
/// inside the task text never claims the time slot.
static PHRASE_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    let weekday_lead = format!(r"(?:\bon\s+(?:(?:next|this)\s+)?|\b(?:next|this)\s+){WEEKDAYS}\b");
    [
        r"\bin\s+(?:\d+|an?|one)\s+(?:minute|min|hour|hr|day)s?\b".to_string(),
        format!(
            r"{weekday_lead}\s+at\s+{CLOCK_SPAN}\b|\bat\s+{CLOCK_SPAN}\s+{weekday_lead}"
        ),
        format!(r"\btomorrow\s+at\s+{CLOCK_SPAN}\b|\bat\s+{CLOCK_SPAN}\s+tomorrow\b"),
        format!(r"\btonight\s+at\s+{CLOCK_SPAN}\b|\bat\s+{CLOCK_SPAN}\b(?:\s+(?:today|tonight))?"),
        weekday_lead,
        r"\btomorrow\b".to_string(),
    ]
    .iter()
    .map(|pattern| Regex::new(pattern).expect("valid time phrase regex"))
    .collect()
});

/// Granularity of a relative offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Minutes,
    Hours,
    Days,
}

/// Day qualifier spoken alongside a clock time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayHint {
    Today,
    Tomorrow,
    None,
}

/// Wall-clock time of day, 24-hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockTime {
    pub hour: u32,
    pub minute: u32,
    pub day_hint: DayHint,
}

/// Structured reading of a time phrase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeDescriptor {
    Relative { unit: TimeUnit, amount: u32 },
    AbsoluteClock(ClockTime),
    NamedDay { weekday: Weekday, clock: Option<ClockTime> },
    Vague { phrase: String },
}

/// Result of resolving a phrase against a reference instant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTime {
    pub descriptor: TimeDescriptor,
    /// Concrete trigger instant, when one exists.
    pub at: Option<NaiveDateTime>,
    /// Human-readable schedule (`04:30 PM today`), when one exists.
    pub label: Option<String>,
}

impl ResolvedTime {
    fn vague(phrase: &str) -> Self {
        Self {
            descriptor: TimeDescriptor::Vague {
                phrase: phrase.to_string(),
            },
            at: None,
            label: None,
        }
    }
}

/// Finds the byte span of the highest-priority time phrase in `text`.
pub fn locate(text: &str) -> Option<Range<usize>> {
    PHRASE_PATTERNS
        .iter()
        .find_map(|pattern| pattern.find(text))
        .map(|found| found.range())
}

/// Parses the structure of a time phrase without reference to any instant.
pub fn parse(phrase: &str) -> TimeDescriptor {
    let phrase = phrase.trim();
    let vague = || TimeDescriptor::Vague {
        phrase: phrase.to_string(),
    };

    if let Some(caps) = RELATIVE_RE.captures(phrase) {
        return parse_relative(&caps).unwrap_or_else(vague);
    }

    let day_hint = if TOMORROW_RE.is_match(phrase) {
        DayHint::Tomorrow
    } else if TODAY_RE.is_match(phrase) {
        DayHint::Today
    } else {
        DayHint::None
    };
    let evening = TODAY_RE
        .captures(phrase)
        .and_then(|caps| caps.name("day"))
        .is_some_and(|day| day.as_str() == "tonight");

    let clock = match AT_CLOCK_RE.captures(phrase) {
        Some(caps) => match parse_clock(&caps, day_hint, evening) {
            Some(clock) => Some(clock),
            None => return vague(),
        },
        None => None,
    };

    if let Some(day) = WEEKDAY_RE.captures(phrase).and_then(|caps| caps.name("day")) {
        if let Some(weekday) = parse_weekday(day.as_str()) {
            let clock = clock.map(|clock| ClockTime {
                day_hint: DayHint::None,
                ..clock
            });
            return TimeDescriptor::NamedDay { weekday, clock };
        }
    }

    match clock {
        Some(clock) => TimeDescriptor::AbsoluteClock(clock),
        None => vague(),
    }
}

/// Resolves a time phrase against `now`.
pub fn resolve(phrase: &str, now: NaiveDateTime) -> ResolvedTime {
    let descriptor = parse(phrase);
    let at = match &descriptor {
        TimeDescriptor::Relative { unit, amount } => {
            let amount = i64::from(*amount);
            let offset = match unit {
                TimeUnit::Minutes => Duration::try_minutes(amount),
                TimeUnit::Hours => Duration::try_hours(amount),
                TimeUnit::Days => Duration::try_days(amount),
            };
            offset.and_then(|offset| now.checked_add_signed(offset))
        }
        TimeDescriptor::AbsoluteClock(clock) => {
            let today = now.date();
            let date = match clock.day_hint {
                DayHint::Today => Some(today),
                DayHint::Tomorrow => today.succ_opt(),
                DayHint::None => {
                    let candidate = today.and_time(clock_time(clock));
                    if candidate > now {
                        Some(today)
                    } else {
                        today.succ_opt()
                    }
                }
            };
            date.map(|date| date.and_time(clock_time(clock)))
        }
        TimeDescriptor::NamedDay { weekday, clock } => {
            let time = clock.as_ref().map(clock_time).unwrap_or_else(|| now.time());
            next_weekday(now.date(), *weekday).map(|date| date.and_time(time))
        }
        TimeDescriptor::Vague { .. } => None,
    };

    let Some(at) = at else {
        return ResolvedTime::vague(phrase.trim());
    };
    let label = describe(&descriptor, at, now);
    ResolvedTime {
        descriptor,
        at: Some(at),
        label: Some(label),
    }
}

fn describe(descriptor: &TimeDescriptor, at: NaiveDateTime, now: NaiveDateTime) -> String {
    match descriptor {
        TimeDescriptor::Relative {
            unit: TimeUnit::Days,
            ..
        } => at.format("%b %d at %I:%M %p").to_string(),
        TimeDescriptor::NamedDay { clock, .. } => match clock {
            Some(_) => at.format("%A, %b %d at %I:%M %p").to_string(),
            None => at.format("%A, %b %d").to_string(),
        },
        _ => match (at.date() - now.date()).num_days() {
            0 => at.format("%I:%M %p today").to_string(),
            1 => at.format("%I:%M %p tomorrow").to_string(),
            _ => at.format("%b %d at %I:%M %p").to_string(),
        },
    }
}

fn parse_relative(caps: &Captures<'_>) -> Option<TimeDescriptor> {
    let amount = match caps.name("amount")?.as_str() {
        "a" | "an" | "one" => 1,
        digits => digits.parse::<u32>().ok()?,
    };
    if amount == 0 {
        return None;
    }
    let unit = match caps.name("unit")?.as_str() {
        "minute" | "min" => TimeUnit::Minutes,
        "hour" | "hr" => TimeUnit::Hours,
        _ => TimeUnit::Days,
    };
    Some(TimeDescriptor::Relative { unit, amount })
}

fn parse_clock(caps: &Captures<'_>, day_hint: DayHint, evening: bool) -> Option<ClockTime> {
    if let Some(named) = caps.name("named") {
        let hour = if named.as_str() == "noon" { 12 } else { 0 };
        return Some(ClockTime {
            hour,
            minute: 0,
            day_hint,
        });
    }

    let mut hour = caps.name("hour")?.as_str().parse::<u32>().ok()?;
    let minute = match caps.name("minute") {
        Some(value) => value.as_str().parse::<u32>().ok()?,
        None => 0,
    };
    if minute > 59 {
        return None;
    }

    match caps.name("meridiem").map(|m| m.as_str()) {
        Some(meridiem) => {
            if !(1..=12).contains(&hour) {
                return None;
            }
            hour = match (meridiem, hour) {
                ("am", 12) => 0,
                ("pm", 12) => 12,
                ("pm", h) => h + 12,
                (_, h) => h,
            };
        }
        None if hour > 23 => return None,
        None if evening && (1..12).contains(&hour) => hour += 12,
        None => {}
    }

    Some(ClockTime {
        hour,
        minute,
        day_hint,
    })
}

fn parse_weekday(value: &str) -> Option<Weekday> {
    match value {
        "monday" => Some(Weekday::Mon),
        "tuesday" => Some(Weekday::Tue),
        "wednesday" => Some(Weekday::Wed),
        "thursday" => Some(Weekday::Thu),
        "friday" => Some(Weekday::Fri),
        "saturday" => Some(Weekday::Sat),
        "sunday" => Some(Weekday::Sun),
        _ => None,
    }
}

fn clock_time(clock: &ClockTime) -> NaiveTime {
    NaiveTime::from_hms_opt(clock.hour, clock.minute, 0).unwrap_or(NaiveTime::MIN)
}

fn next_weekday(today: NaiveDate, target: Weekday) -> Option<NaiveDate> {
    let current = today.weekday().num_days_from_monday();
    let wanted = target.num_days_from_monday();
    let mut ahead = (wanted + 7 - current) % 7;
    if ahead == 0 {
        ahead = 7;
    }
    today.checked_add_signed(Duration::days(i64::from(ahead)))
}
