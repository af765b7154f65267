//! Leading `M/D/Y` date tokens in tweet text.
//!
//! Older archive entries start their `alt` text with the posting date on a
//! line of its own, optionally behind a short label (`"posted 3/4/23\n..."`).
//! [`extract_leading_date`] recognises that line and splits it off.
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Years at or below this two-digit value are read as 20xx, above it as 19xx.
pub const TWO_DIGIT_YEAR_CUTOFF: u32 = 50;

// Anchored at the very start of the text (no multi-line `^`). The label may
// not contain digits or newlines; the date must end its line.
static LEADING_DATE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*[^0-9\n]*([0-1]?[0-9])/([0-3]?[0-9])/([0-9]{4}|[0-9]{2})\s*\n").unwrap()
});

/// A date split off the front of a piece of text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeadingDate {
    pub date: NaiveDate,
    /// Text after the date line, leading whitespace removed.
    pub rest: String,
}

impl LeadingDate {
    /// `YYYY-MM-DD`.
    pub fn iso(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

pub fn normalize_two_digit_year(y: u32) -> i32 {
    if y <= TWO_DIGIT_YEAR_CUTOFF {
        2000 + y as i32
    } else {
        1900 + y as i32
    }
}

/// Split a leading date line off `text`.
///
/// Returns `None` when the text does not start with a date line, or when the
/// numbers do not name a real calendar day.
///
/// ```
/// use roost_social::twitter::extract_leading_date;
///
/// let found = extract_leading_date("3/4/23\nhello").unwrap();
/// assert_eq!(found.iso(), "2023-03-04");
/// assert_eq!(found.rest, "hello");
///
/// let labelled = extract_leading_date("posted 3/4/23\nhello").unwrap();
/// assert_eq!(labelled.rest, "hello");
///
/// assert!(extract_leading_date("hello\n3/4/23\n").is_none());
/// ```
pub fn extract_leading_date(text: &str) -> Option<LeadingDate> {
    let caps = LEADING_DATE_RE.captures(text)?;
    let month: u32 = caps[1].parse().ok()?;
    let day: u32 = caps[2].parse().ok()?;
    let year_raw = &caps[3];
    let year = if year_raw.len() == 4 {
        year_raw.parse().ok()?
    } else {
        normalize_two_digit_year(year_raw.parse().ok()?)
    };

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let end = caps.get(0)?.end();
    Some(LeadingDate {
        date,
        rest: text[end..].trim_start().to_string(),
    })
}
