//! Spoken date and time parsing for reminder phrases.

use std::sync::OnceLock;

use chrono::{Datelike, NaiveDate, NaiveTime};
use regex::Regex;

/// Month names matched by spoken prefix, so "jan", "janu" and "january"
/// all resolve to month 1.
const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Parse a spoken or written date.
///
/// Accepts ISO (`2026-04-10`), US numeric (`4/10/2026`), and spoken month
/// forms (`april 10`, `april 10th`). Spoken forms without a year resolve to
/// `today`'s year.
pub fn parse_spoken_date(input: &str, today: NaiveDate) -> Option<NaiveDate> {
    let input = input.trim();

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(date) = NaiveDate::parse_from_str(input, "%m/%d/%Y") {
        return Some(date);
    }

    static SPOKEN_DATE: OnceLock<Regex> = OnceLock::new();
    let re = SPOKEN_DATE.get_or_init(|| {
        Regex::new(r"^(?P<month>[a-zA-Z]+)\s+(?P<day>\d{1,2})(?:st|nd|rd|th)?$")
            .expect("Invalid spoken date regex")
    });
    let caps = re.captures(input)?;
    let spoken = caps["month"].to_lowercase();
    let month = MONTH_NAMES
        .iter()
        .position(|name| name.starts_with(&spoken))?
        + 1;
    let day: u32 = caps["day"].parse().ok()?;
    NaiveDate::from_ymd_opt(today.year(), month as u32, day)
}

/// Parse a spoken or written time of day.
///
/// Accepts 12-hour forms with a meridiem (`3pm`, `3:30 p.m.`, `12 am`) and
/// 24-hour `HH:MM`. Returns a minute-granularity time.
pub fn parse_spoken_time(input: &str) -> Option<NaiveTime> {
    let input = input.trim().to_lowercase();

    static SPOKEN_TIME: OnceLock<Regex> = OnceLock::new();
    let re = SPOKEN_TIME.get_or_init(|| {
        Regex::new(r"^(?P<hour>\d{1,2})(?::(?P<minute>\d{2}))?\s*(?P<meridiem>a\.?m\.?|p\.?m\.?)$")
            .expect("Invalid spoken time regex")
    });
    if let Some(caps) = re.captures(&input) {
        let hour: u32 = caps["hour"].parse().ok()?;
        if !(1..=12).contains(&hour) {
            return None;
        }
        let minute: u32 = caps
            .name("minute")
            .map(|m| m.as_str().parse())
            .transpose()
            .ok()?
            .unwrap_or(0);
        let pm = caps["meridiem"].starts_with('p');
        let hour = match (hour, pm) {
            (12, false) => 0,
            (12, true) => 12,
            (h, false) => h,
            (h, true) => h + 12,
        };
        return NaiveTime::from_hms_opt(hour, minute, 0);
    }

    NaiveTime::parse_from_str(&input, "%H:%M").ok()
}

// =============================================================================
// Tests
// =============================================================================
