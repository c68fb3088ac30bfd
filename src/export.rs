use crate::chart::fetch_records;
use crate::cli::CommonArgs;
use crate::model::{ChangeRecord, ExportOutput, SCHEMA_VERSION};
use chrono::Utc;
use console::style;
use std::collections::HashSet;

pub fn exec(common: CommonArgs, json: bool, ndjson: bool) -> anyhow::Result<()> {
    let (source, mut records) = fetch_records(&common, !(json || ndjson))?;
    records.sort_by(|a, b| a.commit_date.cmp(&b.commit_date).then_with(|| a.path.cmp(&b.path)));

    if json {
        output_json(&records, &source.describe(), &common)?;
    } else if ndjson {
        output_ndjson(&records)?;
    } else {
        output_summary(&records)?;
    }

    Ok(())
}

fn output_json(records: &[ChangeRecord], source: &str, common: &CommonArgs) -> anyhow::Result<()> {
    let output = ExportOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        source: source.to_string(),
        since: common.since.clone(),
        until: common.until.clone(),
        entries: records.to_vec(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn output_ndjson(records: &[ChangeRecord]) -> anyhow::Result<()> {
    for record in records {
        println!("{}", serde_json::to_string(record)?);
    }
    Ok(())
}

/// Totals shown by `export` when no machine-readable format is requested.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    records: usize,
    commits: usize,
    authors: usize,
    insertions: u64,
    deletions: u64,
}

fn summarize(records: &[ChangeRecord]) -> Summary {
    let commits: HashSet<_> = records.iter().map(|r| &r.commit_hash).collect();
    let authors: HashSet<_> = records.iter().map(|r| &r.author_email).collect();
    Summary {
        records: records.len(),
        commits: commits.len(),
        authors: authors.len(),
        insertions: records.iter().map(|r| r.insertions).fold(0, u64::saturating_add),
        deletions: records.iter().map(|r| r.deletions).fold(0, u64::saturating_add),
    }
}

fn output_summary(records: &[ChangeRecord]) -> anyhow::Result<()> {
    let summary = summarize(records);

    println!("{}", style("Export Summary").bold());
    println!("{}", "─".repeat(50));
    println!("File changes: {}", style(summary.records).cyan());
    println!("Commits: {}", style(summary.commits).cyan());
    println!("Lines inserted: {}", style(summary.insertions).green());
    println!("Lines deleted: {}", style(summary.deletions).red());
    println!("Unique authors: {}", style(summary.authors).yellow());

    if let (Some(first), Some(last)) = (records.first(), records.last()) {
        println!(
            "Date range: {} to {}",
            style(first.commit_date.format("%Y-%m-%d")).dim(),
            style(last.commit_date.format("%Y-%m-%d")).dim()
        );
    }

    println!("\nUse --json or --ndjson flags to export the raw data.");
    Ok(())
}
