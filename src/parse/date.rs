use crate::model::CalendarFields;
use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, NaiveDateTime, Timelike, Utc};

/// Which clock the calendar fields of a record are read from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeBasis {
    /// The UTC offset recorded in the log, i.e. the author's wall clock.
    #[default]
    Author,
    Utc,
}

const OFFSET_FORMATS: &[&str] = &[
    // --date=iso
    "%Y-%m-%d %H:%M:%S %z",
    // git's default date format
    "%a %b %e %H:%M:%S %Y %z",
];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parses the text of a `Date:` header. Times without an offset are taken as UTC.
pub fn parse_commit_date(text: &str) -> Option<DateTime<FixedOffset>> {
    let text = text.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt);
    }

    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(text, fmt) {
            return Some(dt);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(text) {
        return Some(dt);
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, fmt) {
            return Some(naive.and_utc().fixed_offset());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().fixed_offset())
}

pub fn calendar_fields(date: &DateTime<FixedOffset>, basis: TimeBasis) -> CalendarFields {
    let local = match basis {
        TimeBasis::Author => date.naive_local(),
        TimeBasis::Utc => date.with_timezone(&Utc).naive_utc(),
    };

    CalendarFields {
        date: local.date(),
        weekday: local.format("%A").to_string(),
        day_of_month: local.day(),
        month: local.month(),
        year: local.year(),
        hour: local.hour(),
    }
}
