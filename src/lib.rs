//! Aggregates `git log --numstat` output into chart-ready series.
//!
//! ```
//! use logstat::{aggregate, parse_log, Dimension, Metric};
//!
//! let log = "commit aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa\n\
//!            Author: Jane <jane@x.com>\n\
//!            Date:   2024-03-05T10:00:00\n\
//!            10\t2\tfile.txt\n";
//! let records = parse_log(log).unwrap();
//! let chart = aggregate(&records, Dimension::Date, Metric::Changes);
//! assert_eq!(chart.labels, vec!["2024-03-05"]);
//! assert_eq!(chart.datasets[0].data, vec![10]);
//! assert_eq!(chart.datasets[1].data, vec![2]);
//! ```

pub mod chart;
pub mod cli;
pub mod error;
pub mod export;
pub mod git;
pub mod model;
pub mod parse;
pub mod util;

pub use chart::{aggregate, Dimension, Metric};
pub use error::{LogstatError, Result};
pub use model::{ChangeRecord, ChartSeries, Dataset};
pub use parse::{parse_log, LogParser, ParseOptions, ParseStats, TimeBasis};
