//! Years-of-experience derivation from key-experience durations.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

use crate::models::dossier::KeyExperience;
use crate::normalizer::dates::split_range;

static RE_YEARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+(?:[.,]\d+)?)\s*(?:ans?|années?|annees?|years?|yrs?)\b").unwrap()
});

static RE_MONTHS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*(?:mois|months?|mos?)\b").unwrap());

static RE_LEADING_INT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(\d+)").unwrap());

/// A positive leading integer in the model's figure (`"10+ ans"` → 10).
pub fn provided_years(text: &str) -> Option<u32> {
    RE_LEADING_INT
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|years| *years > 0)
}

/// Best-effort months covered by one duration text: explicit "N years" /
/// "N months" figures first, then a start/end range. Zero when unparseable.
pub fn duration_months(text: &str, today: NaiveDate) -> f64 {
    let years = RE_YEARS
        .captures(text)
        .and_then(|caps| caps[1].replace(',', ".").parse::<f64>().ok())
        .unwrap_or(0.0);
    let months = RE_MONTHS
        .captures(text)
        .and_then(|caps| caps[1].parse::<f64>().ok())
        .unwrap_or(0.0);

    let explicit = years * 12.0 + months;
    if explicit > 0.0 {
        return explicit;
    }

    match split_range(text) {
        Some((start, end)) => {
            let (start_year, start_month) = start.resolve(today);
            let (end_year, end_month) = end.resolve(today);
            let span = (end_year - start_year) * 12 + end_month as i32 - start_month as i32;
            f64::from(span.max(0))
        }
        None => 0.0,
    }
}

/// Total of all durations, rounded to whole years and floored at zero.
pub fn derive_years(experiences: &[KeyExperience], today: NaiveDate) -> u32 {
    let total: f64 = experiences
        .iter()
        .map(|exp| duration_months(&exp.duration, today))
        .sum();
    (total / 12.0).round().max(0.0) as u32
}
