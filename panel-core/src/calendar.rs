//! Quarter calendar normalization.
//!
//! Formation dates are mapped onto fiscal quarters with the December
//! roll-forward rule:
//!
//! | Formation month | Fiscal quarter |
//! |---|---|
//! | December `Y` | `Y+1` Q1 |
//! | March `Y` | `Y` Q2 |
//! | June `Y` | `Y` Q3 |
//! | September `Y` | `Y` Q4 |
//!
//! Any other month falls back to its ordinary calendar quarter.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use panel::QuarterLabel;
use std::collections::BTreeSet;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d.%m.%Y"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Maps a formation date onto its fiscal quarter.
pub fn quarter_label(date: NaiveDate) -> QuarterLabel {
    let month = date.month();
    let (fiscal_year, fiscal_quarter) = match month {
        12 => (date.year() + 1, 1),
        3 => (date.year(), 2),
        6 => (date.year(), 3),
        9 => (date.year(), 4),
        m => (date.year(), ((m - 1) / 3 + 1) as u8),
    };
    // Both arms produce a quarter in 1..=4.
    QuarterLabel::new(fiscal_year, fiscal_quarter)
        .unwrap_or_else(|| unreachable!("quarter {} out of range", fiscal_quarter))
}

/// Parses a raw date cell.
///
/// Accepts plain dates, compact `YYYYMMDD`, naive datetimes and RFC 3339
/// timestamps. Returns `None` for anything else, including empty cells.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if raw.len() == 8 && raw.bytes().all(|b| b.is_ascii_digit()) {
        let year = raw[0..4].parse().ok()?;
        let month = raw[4..6].parse().ok()?;
        let day = raw[6..8].parse().ok()?;
        return NaiveDate::from_ymd_opt(year, month, day);
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Some(date);
        }
    }

    for format in DATETIME_FORMATS {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(datetime.date());
        }
    }

    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|datetime| datetime.date_naive())
}

/// Returns the distinct fiscal quarters of `dates`, sorted chronologically.
pub fn labels_for<I>(dates: I) -> Vec<QuarterLabel>
where
    I: IntoIterator<Item = NaiveDate>,
{
    dates
        .into_iter()
        .map(quarter_label)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
