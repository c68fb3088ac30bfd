//! Rebuilds per-file change records from `git log --numstat` text.
//!
//! Headers (`commit`, `Author:`, `Date:`) are carried forward line by line until
//! a header of the same kind replaces them. A numstat line becomes a record only
//! once all of them are known.

pub mod date;
pub mod line;

pub use date::{calendar_fields, parse_commit_date, TimeBasis};
pub use line::{LinePatterns, LogLine};

use crate::error::Result;
use crate::model::ChangeRecord;
use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use std::collections::HashMap;
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Copy, Default)]
pub struct ParseOptions {
    pub time_basis: TimeBasis,
}

/// Counters collected during a parse, for diagnostics only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ParseStats {
    pub lines: usize,
    pub commits: usize,
    pub records: usize,
    pub orphan_numstat: usize,
    pub invalid_dates: usize,
    pub duplicates: usize,
}

#[derive(Debug, Clone, Default)]
struct HeaderContext {
    commit: String,
    author_name: String,
    author_email: String,
    date: Option<DateTime<FixedOffset>>,
}

impl HeaderContext {
    fn complete(&self) -> Option<DateTime<FixedOffset>> {
        if self.commit.is_empty() || self.author_name.is_empty() || self.author_email.is_empty() {
            return None;
        }
        self.date
    }
}

/// Records in first-seen order, indexed by `(commit, path)`.
#[derive(Debug, Default)]
struct RecordArena {
    records: Vec<ChangeRecord>,
    index: HashMap<(String, String), usize>,
}

impl RecordArena {
    /// Returns `true` when an existing record was overwritten.
    fn upsert(&mut self, record: ChangeRecord) -> bool {
        let key = (record.commit_hash.clone(), record.path.clone());
        match self.index.get(&key) {
            Some(&slot) => {
                self.records[slot] = record;
                true
            }
            None => {
                self.index.insert(key, self.records.len());
                self.records.push(record);
                false
            }
        }
    }

    fn into_records(self) -> Vec<ChangeRecord> {
        self.records
    }
}

pub struct LogParser {
    patterns: LinePatterns,
    options: ParseOptions,
}

impl LogParser {
    pub fn new() -> Result<Self> {
        Self::with_options(ParseOptions::default())
    }

    pub fn with_options(options: ParseOptions) -> Result<Self> {
        Ok(Self {
            patterns: LinePatterns::new()?,
            options,
        })
    }

    pub fn parse(&self, text: &str) -> Vec<ChangeRecord> {
        self.parse_with_stats(text).0
    }

    pub fn parse_with_stats(&self, text: &str) -> (Vec<ChangeRecord>, ParseStats) {
        let (_, arena, mut stats) = text.lines().fold(
            (HeaderContext::default(), RecordArena::default(), ParseStats::default()),
            |(ctx, mut arena, mut stats), line| {
                stats.lines += 1;
                let ctx = self.step(ctx, &mut arena, &mut stats, line);
                (ctx, arena, stats)
            },
        );

        let records = arena.into_records();
        stats.records = records.len();
        debug!(
            lines = stats.lines,
            commits = stats.commits,
            records = stats.records,
            orphan_numstat = stats.orphan_numstat,
            invalid_dates = stats.invalid_dates,
            duplicates = stats.duplicates,
            "parsed git log"
        );
        (records, stats)
    }

    fn step(
        &self,
        ctx: HeaderContext,
        arena: &mut RecordArena,
        stats: &mut ParseStats,
        line: &str,
    ) -> HeaderContext {
        match self.patterns.classify(line) {
            LogLine::Commit(hash) => {
                stats.commits += 1;
                HeaderContext {
                    commit: hash.to_string(),
                    ..ctx
                }
            }
            LogLine::Author { name, email } => HeaderContext {
                author_name: name.to_string(),
                author_email: email.to_string(),
                ..ctx
            },
            LogLine::Date(text) => {
                let date = parse_commit_date(text);
                if date.is_none() {
                    stats.invalid_dates += 1;
                    warn!(
                        commit = %ctx.commit,
                        date = text,
                        "unparseable commit date, dropping file stats until the next Date header"
                    );
                }
                HeaderContext { date, ..ctx }
            }
            LogLine::Numstat {
                insertions,
                deletions,
                path,
            } => {
                match ctx.complete() {
                    Some(commit_date) => {
                        let record = ChangeRecord {
                            commit_hash: ctx.commit.clone(),
                            author_name: ctx.author_name.clone(),
                            author_email: ctx.author_email.clone(),
                            path: path.to_string(),
                            commit_date,
                            insertions,
                            deletions,
                            calendar: calendar_fields(&commit_date, self.options.time_basis),
                        };
                        if arena.upsert(record) {
                            stats.duplicates += 1;
                        }
                    }
                    None => {
                        stats.orphan_numstat += 1;
                        trace!(path, "numstat line before a complete commit header");
                    }
                }
                ctx
            }
            LogLine::Other => ctx,
        }
    }
}

/// Parses with default options.
pub fn parse_log(text: &str) -> Result<Vec<ChangeRecord>> {
    Ok(LogParser::new()?.parse(text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const HASH_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const HASH_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    fn parser() -> LogParser {
        LogParser::new().unwrap()
    }

    #[test]
    fn empty_and_noise_yield_nothing() {
        let p = parser();
        assert!(p.parse("").is_empty());
        assert!(p.parse("\n\n    just a message\nMerge: 1 2\n").is_empty());
    }

    #[test]
    fn single_commit_block() {
        let log = format!(
            "commit {HASH_A}\n\
             Author: Jane <jane@x.com>\n\
             Date:   2024-03-05T10:00:00\n\n    Add file\n\n\
             10\t2\tfile.txt\n"
        );
        let records = parser().parse(&log);

        assert_eq!(records.len(), 1);
        let r = &records[0];
        assert_eq!(r.commit_hash, HASH_A);
        assert_eq!(r.author_name, "Jane");
        assert_eq!(r.author_email, "jane@x.com");
        assert_eq!(r.path, "file.txt");
        assert_eq!((r.insertions, r.deletions), (10, 2));
        assert_eq!(r.calendar.date.to_string(), "2024-03-05");
        assert_eq!(r.calendar.weekday, "Tuesday");
        assert_eq!(r.calendar.hour, 10);
    }

    #[test]
    fn numstat_before_complete_header_is_dropped() {
        let log = format!(
            "5\t5\tearly.txt\n\
             commit {HASH_A}\n\
             1\t1\tno-author.txt\n\
             Author: Jane <jane@x.com>\n\
             2\t2\tno-date.txt\n\
             Date: 2024-03-05T10:00:00Z\n\
             3\t3\tok.txt\n"
        );
        let (records, stats) = parser().parse_with_stats(&log);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "ok.txt");
        assert_eq!(stats.orphan_numstat, 3);
    }

    #[test]
    fn duplicate_file_in_same_commit_collapses_last_wins() {
        let log = format!(
            "commit {HASH_A}\n\
             Author: Jane <jane@x.com>\n\
             Date: 2024-03-05T10:00:00Z\n\
             1\t1\tsame.txt\n\
             7\t3\tsame.txt\n"
        );
        let (records, stats) = parser().parse_with_stats(&log);

        assert_eq!(records.len(), 1);
        assert_eq!((records[0].insertions, records[0].deletions), (7, 3));
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn context_carries_over_between_commits() {
        // The second block has no Author/Date of its own and inherits them.
        let log = format!(
            "commit {HASH_A}\n\
             Author: Jane <jane@x.com>\n\
             Date: 2024-03-05T10:00:00Z\n\
             1\t0\ta.txt\n\
             commit {HASH_B}\n\
             0\t4\ta.txt\n"
        );
        let records = parser().parse(&log);

        assert_eq!(records.len(), 2);
        assert_eq!(records[1].commit_hash, HASH_B);
        assert_eq!(records[1].author_name, "Jane");
        assert_eq!(records[1].deletions, 4);
    }

    #[test]
    fn invalid_date_clears_context_until_next_date() {
        let log = format!(
            "commit {HASH_A}\n\
             Author: Jane <jane@x.com>\n\
             Date: 2024-03-05T10:00:00Z\n\
             1\t1\tkept.txt\n\
             commit {HASH_B}\n\
             Date: not a date\n\
             2\t2\tdropped.txt\n\
             Date: 2024-03-06T10:00:00Z\n\
             3\t3\trecovered.txt\n"
        );
        let (records, stats) = parser().parse_with_stats(&log);

        let paths: Vec<&str> = records.iter().map(|r| r.path.as_str()).collect();
        assert_eq!(paths, vec!["kept.txt", "recovered.txt"]);
        assert_eq!(stats.invalid_dates, 1);
        assert_eq!(stats.orphan_numstat, 1);
    }

    #[test]
    fn space_separated_numstat_line() {
        let log = format!(
            "commit {HASH_A}\n\
             Author: Jane <jane@x.com>\n\
             Date:   2024-03-05T10:00:00\n\
             10 2 file.txt\n"
        );
        let records = parser().parse(&log);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "file.txt");
        assert_eq!((records[0].insertions, records[0].deletions), (10, 2));
    }

    #[test]
    fn binary_files_count_as_zero() {
        let log = format!(
            "commit {HASH_A}\n\
             Author: Jane <jane@x.com>\n\
             Date: 2024-03-05T10:00:00Z\n\
             -\t-\timg.png\n"
        );
        let records = parser().parse(&log);
        assert_eq!((records[0].insertions, records[0].deletions), (0, 0));
    }

    #[test]
    fn crlf_input_is_accepted() {
        let log = format!(
            "commit {HASH_A}\r\n\
             Author: Jane <jane@x.com>\r\n\
             Date: 2024-03-05T10:00:00Z\r\n\
             4\t1\twin.txt\r\n"
        );
        let records = parser().parse(&log);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "win.txt");
    }

    #[test]
    fn utc_basis_shifts_calendar_fields() {
        let log = format!(
            "commit {HASH_A}\n\
             Author: Jane <jane@x.com>\n\
             Date: 2024-03-05T23:00:00-02:00\n\
             1\t1\tlate.txt\n"
        );
        let author = parser().parse(&log);
        let utc = LogParser::with_options(ParseOptions { time_basis: TimeBasis::Utc })
            .unwrap()
            .parse(&log);

        assert_eq!(author[0].calendar.hour, 23);
        assert_eq!(utc[0].calendar.hour, 1);
        assert_eq!(utc[0].calendar.date.to_string(), "2024-03-06");
        assert_eq!(author[0].commit_date, utc[0].commit_date);
    }

    #[test]
    fn parsing_is_idempotent() {
        let log = format!(
            "commit {HASH_A}\n\
             Author: Jane <jane@x.com>\n\
             Date: 2024-03-05T10:00:00Z\n\
             1\t1\ta\n\
             2\t2\tb\n"
        );
        let p = parser();
        assert_eq!(p.parse(&log), p.parse(&log));
        assert_eq!(parse_log(&log).unwrap(), p.parse(&log));
    }
}
