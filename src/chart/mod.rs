pub mod aggregate;
pub mod exec;
pub mod fetch;
pub mod output;

pub use aggregate::{aggregate, group_records, sorted_labels, Dimension, GroupBucket, Metric};
pub use exec::exec;
pub use fetch::fetch_records;
pub use output::{output_bars, output_json, output_ndjson};
