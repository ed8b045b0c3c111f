//! Date and date-range canonicalization.
//!
//! Canonical forms: `YYYY-MM` for a point, `YYYY-MM → YYYY-MM` for a range.
//! Anything not recognized comes back verbatim.

use std::sync::LazyLock;

use chrono::{Datelike, NaiveDate};
use regex::Regex;

// ── Regex patterns ──────────────────────────────────────────────────────

static RE_ISO_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})[-/.](\d{1,2})$").unwrap());

static RE_SLASH_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[/.-](\d{4})$").unwrap());

static RE_NAMED_MONTH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\p{L}+)\.?\s+(\d{4})$").unwrap());

static RE_YEAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{4})$").unwrap());

/// Candidate separators between the two ends of a range. A bare `-` also
/// occurs inside `YYYY-MM`, so each candidate is only accepted when both
/// sides parse.
static RE_SEPARATOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:→|->|–|—|-|\bto\b|\bau\b|\bjusqu'?à\b|\bà\b)\s*").unwrap()
});

const PRESENT_WORDS: &[&str] = &[
    "present",
    "current",
    "now",
    "today",
    "ongoing",
    "actuel",
    "actuellement",
    "aujourd'hui",
    "aujourd’hui",
    "en cours",
    "ce jour",
];

/// One end of a range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatePoint {
    Month { year: i32, month: u32 },
    Year(i32),
    Present,
}

impl DatePoint {
    /// (year, month) with a bare year read as January and `Present` as `today`.
    pub fn resolve(self, today: NaiveDate) -> (i32, u32) {
        match self {
            DatePoint::Month { year, month } => (year, month),
            DatePoint::Year(year) => (year, 1),
            DatePoint::Present => (today.year(), today.month()),
        }
    }
}

pub fn month_from_name(name: &str) -> Option<u32> {
    let month = match name.to_lowercase().trim_end_matches('.') {
        "janvier" | "janv" | "january" | "jan" => 1,
        "février" | "fevrier" | "févr" | "fevr" | "february" | "feb" => 2,
        "mars" | "march" | "mar" => 3,
        "avril" | "avr" | "april" | "apr" => 4,
        "mai" | "may" => 5,
        "juin" | "june" | "jun" => 6,
        "juillet" | "juil" | "july" | "jul" => 7,
        "août" | "aout" | "august" | "aug" => 8,
        "septembre" | "september" | "sept" | "sep" => 9,
        "octobre" | "october" | "oct" => 10,
        "novembre" | "november" | "nov" => 11,
        "décembre" | "decembre" | "déc" | "december" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

fn valid_month(month: u32) -> Option<u32> {
    (1..=12).contains(&month).then_some(month)
}

pub fn parse_point(text: &str) -> Option<DatePoint> {
    let text = text.trim();
    let lower = text.to_lowercase();
    if PRESENT_WORDS.contains(&lower.as_str()) {
        return Some(DatePoint::Present);
    }

    if let Some(caps) = RE_ISO_MONTH.captures(text) {
        let year = caps[1].parse().ok()?;
        let month = valid_month(caps[2].parse().ok()?)?;
        return Some(DatePoint::Month { year, month });
    }
    if let Some(caps) = RE_SLASH_MONTH.captures(text) {
        let month = valid_month(caps[1].parse().ok()?)?;
        let year = caps[2].parse().ok()?;
        return Some(DatePoint::Month { year, month });
    }
    if let Some(caps) = RE_NAMED_MONTH.captures(text) {
        let month = month_from_name(&caps[1])?;
        let year = caps[2].parse().ok()?;
        return Some(DatePoint::Month { year, month });
    }
    if let Some(caps) = RE_YEAR.captures(text) {
        return Some(DatePoint::Year(caps[1].parse().ok()?));
    }
    None
}

/// Splits a range at the first separator whose both sides parse as dates.
pub fn split_range(text: &str) -> Option<(DatePoint, DatePoint)> {
    let text = text.trim();
    RE_SEPARATOR.find_iter(text).find_map(|sep| {
        let start = parse_point(&text[..sep.start()])?;
        let end = parse_point(&text[sep.end()..])?;
        Some((start, end))
    })
}

/// `"03/2022 - 02/2023"` → `"2022-03 → 2023-02"`. A range of bare years
/// spans January to December. "Present" ends keep their original wording.
pub fn normalize_date_range(text: &str) -> String {
    let Some((start, end)) = split_range(text) else {
        return text.to_string();
    };

    let start = match start {
        DatePoint::Month { year, month } => format!("{year}-{month:02}"),
        DatePoint::Year(year) => format!("{year}-01"),
        DatePoint::Present => return text.to_string(),
    };
    let end = match end {
        DatePoint::Month { year, month } => format!("{year}-{month:02}"),
        DatePoint::Year(year) => format!("{year}-12"),
        DatePoint::Present => end_word(text),
    };
    format!("{start} → {end}")
}

/// The trailing "present" word exactly as written.
fn end_word(text: &str) -> String {
    let text = text.trim();
    RE_SEPARATOR
        .find_iter(text)
        .map(|sep| text[sep.end()..].trim())
        .find(|rest| PRESENT_WORDS.contains(&rest.to_lowercase().as_str()))
        .unwrap_or(text)
        .to_string()
}

/// `"mars 2022"` → `"2022-03"`. Bare years and "present" words are already canonical.
pub fn normalize_date(text: &str) -> String {
    match parse_point(text) {
        Some(DatePoint::Month { year, month }) => format!("{year}-{month:02}"),
        Some(DatePoint::Year(year)) => year.to_string(),
        Some(DatePoint::Present) | None => text.to_string(),
    }
}
