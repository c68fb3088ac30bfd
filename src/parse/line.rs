use crate::error::Result;
use regex::Regex;

/// What a single line of `git log --numstat` output turned out to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogLine<'a> {
    Commit(&'a str),
    Author { name: &'a str, email: &'a str },
    Date(&'a str),
    Numstat {
        insertions: u64,
        deletions: u64,
        path: &'a str,
    },
    Other,
}

pub struct LinePatterns {
    commit: Regex,
    author: Regex,
    date: Regex,
    numstat: Regex,
}

impl LinePatterns {
    pub fn new() -> Result<Self> {
        Ok(Self {
            commit: Regex::new(r"^commit\s([a-f0-9]{40})$")?,
            author: Regex::new(r"^Author:\s+(.*)\s<(.+)>$")?,
            date: Regex::new(r"^Date:\s+(.*)$")?,
            // The first two fields are the stats, everything after is the path.
            numstat: Regex::new(r"^(\d+|-)\s+(\d+|-)\s+(.+)$")?,
        })
    }

    /// Patterns are tried in a fixed order and the first match wins.
    pub fn classify<'a>(&self, line: &'a str) -> LogLine<'a> {
        if let Some(caps) = self.commit.captures(line) {
            if let Some(hash) = caps.get(1) {
                return LogLine::Commit(hash.as_str());
            }
        }

        if let Some(caps) = self.author.captures(line) {
            if let (Some(name), Some(email)) = (caps.get(1), caps.get(2)) {
                return LogLine::Author {
                    name: name.as_str(),
                    email: email.as_str(),
                };
            }
        }

        if let Some(caps) = self.date.captures(line) {
            if let Some(text) = caps.get(1) {
                return LogLine::Date(text.as_str());
            }
        }

        if let Some(caps) = self.numstat.captures(line) {
            if let (Some(ins), Some(del), Some(path)) = (caps.get(1), caps.get(2), caps.get(3)) {
                // A count that does not fit in u64 leaves the line unrecognized.
                if let (Some(insertions), Some(deletions)) =
                    (stat_field(ins.as_str()), stat_field(del.as_str()))
                {
                    return LogLine::Numstat {
                        insertions,
                        deletions,
                        path: path.as_str(),
                    };
                }
            }
        }

        LogLine::Other
    }
}

/// Binary files report `-` instead of a count.
fn stat_field(field: &str) -> Option<u64> {
    if field == "-" {
        Some(0)
    } else {
        field.parse().ok()
    }
}
