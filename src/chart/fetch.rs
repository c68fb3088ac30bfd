use crate::cli::CommonArgs;
use crate::error::LogstatError;
use crate::git::LogSource;
use crate::model::ChangeRecord;
use crate::parse::{LogParser, ParseOptions, TimeBasis};
use crate::util::{filter_records, resolve_range, RecordFilter};
use anyhow::Context;
use tracing::info;

/// Reads the log named by `common`, parses it and applies the record filters.
///
/// Fails with [`LogstatError::NoInput`] for blank input and
/// [`LogstatError::NoValidEntries`] when nothing survives parsing and filtering.
pub fn fetch_records(
    common: &CommonArgs,
    show_progress: bool,
) -> anyhow::Result<(LogSource, Vec<ChangeRecord>)> {
    let source = LogSource::from_args(common.input.as_deref(), common.repo.as_deref());
    let text = source
        .read(show_progress)
        .with_context(|| format!("Failed to read git log from {}", source.describe()))?;

    if text.trim().is_empty() {
        return Err(LogstatError::NoInput.into());
    }

    let range = resolve_range(common.since.as_deref(), common.until.as_deref())
        .context("Failed to resolve date range")?;

    let options = ParseOptions {
        time_basis: if common.utc { TimeBasis::Utc } else { TimeBasis::Author },
    };
    let parser = LogParser::with_options(options).context("Failed to build log parser")?;
    let (records, stats) = parser.parse_with_stats(&text);

    let filter = RecordFilter {
        range,
        author: common.author.clone(),
        author_email: common.author_email.clone(),
    };
    let records = filter_records(records, &filter);
    info!(
        parsed = stats.records,
        kept = records.len(),
        source = %source.describe(),
        "loaded change records"
    );

    if records.is_empty() {
        return Err(LogstatError::NoValidEntries.into());
    }

    Ok((source, records))
}
