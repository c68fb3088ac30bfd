use chrono::{DateTime, FixedOffset, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub const SCHEMA_VERSION: u32 = 1;

/// Calendar breakdown of a commit date, computed once when the record is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarFields {
    pub date: NaiveDate,
    pub weekday: String,
    pub day_of_month: u32,
    pub month: u32,
    pub year: i32,
    pub hour: u32,
}

/// One file touched by one commit, as reported by a numstat line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeRecord {
    pub commit_hash: String,
    pub author_name: String,
    pub author_email: String,
    pub path: String,
    pub commit_date: DateTime<FixedOffset>,
    pub insertions: u64,
    pub deletions: u64,
    #[serde(flatten)]
    pub calendar: CalendarFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    pub label: String,
    pub data: Vec<u64>,
    pub background_color: String,
}

/// Labels plus datasets aligned to them, ready for a bar chart.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Re-slices the series into one row per label.
    pub fn rows(&self) -> Vec<ChartRow> {
        self.labels
            .iter()
            .enumerate()
            .map(|(i, label)| ChartRow {
                label: label.clone(),
                // A dataset shorter than the labels simply has no value here
                values: self
                    .datasets
                    .iter()
                    .filter_map(|ds| ds.data.get(i).map(|&v| (ds.label.clone(), v)))
                    .collect(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartRow {
    pub label: String,
    #[serde(flatten)]
    pub values: BTreeMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub dimension: String,
    pub metric: String,
    pub since: Option<String>,
    pub until: Option<String>,
    pub records: usize,
    pub chart: ChartSeries,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportOutput {
    pub version: u32,
    pub generated_at: DateTime<Utc>,
    pub source: String,
    pub since: Option<String>,
    pub until: Option<String>,
    pub entries: Vec<ChangeRecord>,
}

#[derive(Debug, Clone)]
pub struct DateRange {
    pub since: Option<DateTime<Utc>>,
    pub until: Option<DateTime<Utc>>,
}

impl DateRange {
    pub fn new() -> Self {
        Self { since: None, until: None }
    }

    pub fn with_since(mut self, since: DateTime<Utc>) -> Self {
        self.since = Some(since);
        self
    }

    pub fn with_until(mut self, until: DateTime<Utc>) -> Self {
        self.until = Some(until);
        self
    }

    pub fn is_unbounded(&self) -> bool {
        self.since.is_none() && self.until.is_none()
    }

    pub fn contains(&self, timestamp: &DateTime<FixedOffset>) -> bool {
        let timestamp = timestamp.with_timezone(&Utc);
        if let Some(since) = self.since {
            if timestamp < since {
                return false;
            }
        }
        if let Some(until) = self.until {
            if timestamp > until {
                return false;
            }
        }
        true
    }
}

impl Default for DateRange {
    fn default() -> Self {
        Self::new()
    }
}
