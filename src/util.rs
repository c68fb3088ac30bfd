use crate::error::{LogstatError, Result};
use crate::model::{ChangeRecord, DateRange};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::time::{Duration, SystemTime};

/// Which end of a range a date-only bound stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

pub fn resolve_range(since: Option<&str>, until: Option<&str>) -> Result<DateRange> {
    let mut range = DateRange::new();

    let since_dt = since.map(|s| parse_date_bound(s, Bound::Start)).transpose()?;
    let until_dt = until.map(|u| parse_date_bound(u, Bound::End)).transpose()?;

    if let (Some(s), Some(u)) = (since_dt, until_dt) {
        if s > u {
            return Err(LogstatError::InvalidDate(format!(
                "Invalid range: since ({}) is after until ({})",
                s, u
            )));
        }
    }

    if let Some(s) = since_dt {
        range = range.with_since(s);
    }
    if let Some(u) = until_dt {
        range = range.with_until(u);
    }

    Ok(range)
}

/// Accepts RFC 3339, `YYYY-MM-DD` (whole day) or "N days|weeks|months ago".
pub fn parse_date_bound(input: &str, bound: Bound) -> Result<DateTime<Utc>> {
    let input = input.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc));
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        let datetime = match bound {
            Bound::Start => date.and_hms_opt(0, 0, 0),
            Bound::End => date.and_hms_opt(23, 59, 59),
        };
        if let Some(datetime) = datetime {
            return Ok(Utc.from_utc_datetime(&datetime));
        }
    }

    if let Some(duration) = parse_natural_duration(input) {
        let target = SystemTime::now()
            .checked_sub(duration)
            .ok_or_else(|| LogstatError::InvalidDate(format!("Duration overflow for '{input}'")))?;
        return Ok(DateTime::<Utc>::from(target));
    }

    Err(LogstatError::InvalidDate(format!(
        "'{input}' is not RFC3339, YYYY-MM-DD or 'N days/weeks/months ago'"
    )))
}

fn parse_natural_duration(input: &str) -> Option<Duration> {
    let input = input.trim().to_lowercase();

    let units: [(&str, &str, u64); 3] = [
        (" days ago", " day ago", 86400),
        (" weeks ago", " week ago", 7 * 86400),
        (" months ago", " month ago", 30 * 86400),
    ];

    for (plural, singular, secs) in units {
        if let Some(n) = input.strip_suffix(plural).or_else(|| input.strip_suffix(singular)) {
            if let Ok(n) = n.trim().parse::<u64>() {
                return n.checked_mul(secs).map(Duration::from_secs);
            }
        }
    }

    None
}

#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    pub range: DateRange,
    pub author: Option<String>,
    pub author_email: Option<String>,
}

impl RecordFilter {
    pub fn matches(&self, record: &ChangeRecord) -> bool {
        if !self.range.contains(&record.commit_date) {
            return false;
        }
        if let Some(a) = &self.author {
            if !record.author_name.to_lowercase().contains(&a.to_lowercase()) {
                return false;
            }
        }
        if let Some(ae) = &self.author_email {
            if !record.author_email.to_lowercase().contains(&ae.to_lowercase()) {
                return false;
            }
        }
        true
    }
}

pub fn filter_records(records: Vec<ChangeRecord>, filter: &RecordFilter) -> Vec<ChangeRecord> {
    if filter.range.is_unbounded() && filter.author.is_none() && filter.author_email.is_none() {
        return records;
    }
    records.into_iter().filter(|r| filter.matches(r)).collect()
}
