use crate::model::{ChangeRecord, ChartSeries, Dataset};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;

pub const INSERTIONS_COLOR: &str = "rgba(75,192,192,0.4)";
pub const DELETIONS_COLOR: &str = "rgba(255,99,132,0.4)";
pub const COMMITS_COLOR: &str = "rgba(153,102,255,0.4)";

/// Field of a [`ChangeRecord`] that records are grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    #[value(alias = "authorName", alias = "author")]
    AuthorName,
    #[value(alias = "authorEmail", alias = "email")]
    AuthorEmail,
    Commit,
    #[value(alias = "weekDay")]
    #[serde(alias = "weekDay")]
    Weekday,
    #[value(alias = "dayOfMonth")]
    DayOfMonth,
    Month,
    Year,
    Hour,
    Date,
}

impl Dimension {
    pub const ALL: [Dimension; 9] = [
        Dimension::AuthorName,
        Dimension::AuthorEmail,
        Dimension::Commit,
        Dimension::Weekday,
        Dimension::DayOfMonth,
        Dimension::Month,
        Dimension::Year,
        Dimension::Hour,
        Dimension::Date,
    ];

    pub fn key(self, record: &ChangeRecord) -> String {
        match self {
            Dimension::AuthorName => record.author_name.clone(),
            Dimension::AuthorEmail => record.author_email.clone(),
            Dimension::Commit => record.commit_hash.clone(),
            Dimension::Weekday => record.calendar.weekday.clone(),
            Dimension::DayOfMonth => record.calendar.day_of_month.to_string(),
            Dimension::Month => record.calendar.month.to_string(),
            Dimension::Year => record.calendar.year.to_string(),
            Dimension::Hour => record.calendar.hour.to_string(),
            Dimension::Date => record.calendar.date.format("%Y-%m-%d").to_string(),
        }
    }

    /// Numeric dimensions order their labels as integers rather than strings.
    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            Dimension::Hour | Dimension::DayOfMonth | Dimension::Month | Dimension::Year
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Dimension::AuthorName => "author-name",
            Dimension::AuthorEmail => "author-email",
            Dimension::Commit => "commit",
            Dimension::Weekday => "weekday",
            Dimension::DayOfMonth => "day-of-month",
            Dimension::Month => "month",
            Dimension::Year => "year",
            Dimension::Hour => "hour",
            Dimension::Date => "date",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Dimension::AuthorName => "Author Name",
            Dimension::AuthorEmail => "Author Email",
            Dimension::Commit => "Commit",
            Dimension::Weekday => "Weekday",
            Dimension::DayOfMonth => "Day of Month",
            Dimension::Month => "Month",
            Dimension::Year => "Year",
            Dimension::Hour => "Hour",
            Dimension::Date => "Date",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metric {
    /// Inserted and deleted lines
    Changes,
    /// Distinct commits
    Commits,
}

impl Metric {
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::Changes => "changes",
            Metric::Commits => "commits",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Metric::Changes => "Insertions & Deletions",
            Metric::Commits => "Number of Commits",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Running totals for one value of the grouping dimension.
#[derive(Debug, Clone, Default)]
pub struct GroupBucket<'a> {
    pub insertions: u64,
    pub deletions: u64,
    pub commits: HashSet<&'a str>,
}

impl<'a> GroupBucket<'a> {
    fn add(&mut self, record: &'a ChangeRecord) {
        // Totals clamp at u64::MAX instead of wrapping
        self.insertions = self.insertions.saturating_add(record.insertions);
        self.deletions = self.deletions.saturating_add(record.deletions);
        self.commits.insert(record.commit_hash.as_str());
    }
}

pub fn group_records(
    records: &[ChangeRecord],
    dimension: Dimension,
) -> HashMap<String, GroupBucket<'_>> {
    let mut groups: HashMap<String, GroupBucket<'_>> = HashMap::new();
    for record in records {
        groups.entry(dimension.key(record)).or_default().add(record);
    }
    groups
}

pub fn sorted_labels<'k>(
    keys: impl IntoIterator<Item = &'k String>,
    dimension: Dimension,
) -> Vec<String> {
    let mut labels: Vec<String> = keys.into_iter().cloned().collect();
    if dimension.is_numeric() {
        labels.sort_by(|a, b| numeric_key(a).cmp(&numeric_key(b)).then_with(|| a.cmp(b)));
    } else {
        labels.sort();
    }
    labels
}

fn numeric_key(label: &str) -> Option<i64> {
    label.parse().ok()
}

/// Groups `records` by `dimension` and lays the totals out as aligned datasets.
pub fn aggregate(records: &[ChangeRecord], dimension: Dimension, metric: Metric) -> ChartSeries {
    let groups = group_records(records, dimension);
    let labels = sorted_labels(groups.keys(), dimension);

    let column = |f: fn(&GroupBucket<'_>) -> u64| -> Vec<u64> {
        labels.iter().map(|label| groups.get(label).map(f).unwrap_or(0)).collect()
    };

    let datasets = match metric {
        Metric::Changes => vec![
            Dataset {
                label: "Insertions".to_string(),
                data: column(|b| b.insertions),
                background_color: INSERTIONS_COLOR.to_string(),
            },
            Dataset {
                label: "Deletions".to_string(),
                data: column(|b| b.deletions),
                background_color: DELETIONS_COLOR.to_string(),
            },
        ],
        Metric::Commits => vec![Dataset {
            label: "Number of Commits".to_string(),
            data: column(|b| b.commits.len() as u64),
            background_color: COMMITS_COLOR.to_string(),
        }],
    };

    ChartSeries { labels, datasets }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::{calendar_fields, parse_commit_date, TimeBasis};
    use pretty_assertions::assert_eq;

    fn record(
        commit: &str,
        author: &str,
        path: &str,
        date: &str,
        ins: u64,
        del: u64,
    ) -> ChangeRecord {
        let commit_date = parse_commit_date(date).unwrap();
        ChangeRecord {
            commit_hash: commit.repeat(40),
            author_name: author.to_string(),
            author_email: format!("{}@x.com", author.to_lowercase()),
            path: path.to_string(),
            commit_date,
            insertions: ins,
            deletions: del,
            calendar: calendar_fields(&commit_date, TimeBasis::Author),
        }
    }

    fn sample() -> Vec<ChangeRecord> {
        vec![
            record("a", "Jane", "a.rs", "2024-03-05T02:00:00Z", 10, 2),
            record("a", "Jane", "b.rs", "2024-03-05T02:00:00Z", 5, 1),
            record("b", "Bob", "a.rs", "2024-03-09T10:00:00Z", 1, 7),
            record("c", "Jane", "c.rs", "2023-11-20T09:00:00Z", 0, 0),
        ]
    }

    #[test]
    fn changes_by_date() {
        let records = [record("a", "Jane", "file.txt", "2024-03-05T10:00:00", 10, 2)];
        let chart = aggregate(&records, Dimension::Date, Metric::Changes);

        assert_eq!(chart.labels, vec!["2024-03-05"]);
        assert_eq!(chart.datasets.len(), 2);
        assert_eq!(chart.datasets[0].label, "Insertions");
        assert_eq!(chart.datasets[0].data, vec![10]);
        assert_eq!(chart.datasets[0].background_color, INSERTIONS_COLOR);
        assert_eq!(chart.datasets[1].label, "Deletions");
        assert_eq!(chart.datasets[1].data, vec![2]);
        assert_eq!(chart.datasets[1].background_color, DELETIONS_COLOR);
    }

    #[test]
    fn commits_by_commit_are_always_one() {
        let chart = aggregate(&sample(), Dimension::Commit, Metric::Commits);

        assert_eq!(chart.labels.len(), 3);
        assert_eq!(chart.datasets.len(), 1);
        assert_eq!(chart.datasets[0].label, "Number of Commits");
        assert_eq!(chart.datasets[0].background_color, COMMITS_COLOR);
        assert!(chart.datasets[0].data.iter().all(|&n| n == 1));
    }

    #[test]
    fn commit_touching_many_files_counts_once() {
        let chart = aggregate(&sample(), Dimension::AuthorName, Metric::Commits);
        assert_eq!(chart.labels, vec!["Bob", "Jane"]);
        assert_eq!(chart.datasets[0].data, vec![1, 2]);

        let changes = aggregate(&sample(), Dimension::AuthorName, Metric::Changes);
        assert_eq!(changes.datasets[0].data, vec![1, 15]);
        assert_eq!(changes.datasets[1].data, vec![7, 3]);
    }

    #[test]
    fn numeric_dimensions_sort_as_numbers() {
        let keys = ["2".to_string(), "10".to_string(), "9".to_string()];
        let labels = sorted_labels(&keys, Dimension::Hour);
        assert_eq!(labels, vec!["2", "9", "10"]);

        let chart = aggregate(&sample(), Dimension::DayOfMonth, Metric::Changes);
        assert_eq!(chart.labels, vec!["5", "9", "20"]);
    }

    #[test]
    fn other_dimensions_sort_lexically() {
        let keys = ["2".to_string(), "10".to_string(), "9".to_string()];
        let labels = sorted_labels(&keys, Dimension::AuthorName);
        assert_eq!(labels, vec!["10", "2", "9"]);

        let chart = aggregate(&sample(), Dimension::Weekday, Metric::Commits);
        assert_eq!(chart.labels, vec!["Monday", "Saturday", "Tuesday"]);

        let chart = aggregate(&sample(), Dimension::Date, Metric::Commits);
        assert_eq!(chart.labels, vec!["2023-11-20", "2024-03-05", "2024-03-09"]);
    }

    #[test]
    fn labels_and_datasets_stay_aligned() {
        let records = sample();
        for dimension in Dimension::ALL {
            for metric in [Metric::Changes, Metric::Commits] {
                let chart = aggregate(&records, dimension, metric);
                let mut unique = chart.labels.clone();
                unique.dedup();
                assert_eq!(unique.len(), chart.labels.len(), "{dimension} labels repeat");
                for ds in &chart.datasets {
                    assert_eq!(ds.data.len(), chart.labels.len(), "{dimension}/{metric}");
                }
            }
        }
    }

    #[test]
    fn huge_stats_saturate_instead_of_overflowing() {
        let records = crate::parse::parse_log(
            "commit aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\n\
             Author: Jane <jane@x.com>\n\
             Date: 2024-03-05T10:00:00Z\n\
             18446744073709551615\t18446744073709551615\ta\n\
             1\t1\tb\n",
        )
        .unwrap();
        assert_eq!(records.len(), 2);

        let chart = aggregate(&records, Dimension::Year, Metric::Changes);
        assert_eq!(chart.labels, vec!["2024"]);
        assert_eq!(chart.datasets[0].data, vec![u64::MAX]);
        assert_eq!(chart.datasets[1].data, vec![u64::MAX]);
    }

    #[test]
    fn empty_input_gives_empty_chart() {
        let chart = aggregate(&[], Dimension::Year, Metric::Changes);
        assert!(chart.is_empty());
        assert!(chart.datasets.iter().all(|ds| ds.data.is_empty()));
    }

    #[test]
    fn camel_case_aliases_parse() {
        assert_eq!(Dimension::from_str("weekDay", false).unwrap(), Dimension::Weekday);
        assert_eq!(Dimension::from_str("authorEmail", false).unwrap(), Dimension::AuthorEmail);
        assert_eq!(Dimension::from_str("day-of-month", false).unwrap(), Dimension::DayOfMonth);
        assert_eq!(Metric::from_str("commits", false).unwrap(), Metric::Commits);
    }
}
