use super::{Dimension, Metric};
use crate::cli::CommonArgs;
use crate::model::{ChartOutput, ChartSeries, SCHEMA_VERSION};
use anyhow::Result;
use chrono::Utc;
use console::style;

const BAR_WIDTH: usize = 40;

pub fn output_json(
    chart: &ChartSeries,
    source: &str,
    common: &CommonArgs,
    dimension: Dimension,
    metric: Metric,
    records: usize,
) -> Result<()> {
    let output = ChartOutput {
        version: SCHEMA_VERSION,
        generated_at: Utc::now(),
        source: source.to_string(),
        dimension: dimension.to_string(),
        metric: metric.to_string(),
        since: common.since.clone(),
        until: common.until.clone(),
        records,
        chart: chart.clone(),
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

pub fn output_ndjson(chart: &ChartSeries) -> Result<()> {
    for row in chart.rows() {
        println!("{}", serde_json::to_string(&row)?);
    }
    Ok(())
}

pub fn output_bars(
    chart: &ChartSeries,
    common: &CommonArgs,
    dimension: Dimension,
    metric: Metric,
) -> Result<()> {
    if chart.is_empty() {
        println!("No data to display");
        return Ok(());
    }

    if let (Some(since), Some(until)) = (&common.since, &common.until) {
        println!("Filtering commits from {} to {}", since, until);
    } else if let Some(since) = &common.since {
        println!("Filtering commits since {}", since);
    } else if let Some(until) = &common.until {
        println!("Filtering commits until {}", until);
    }

    let max = chart
        .datasets
        .iter()
        .flat_map(|ds| ds.data.iter().copied())
        .max()
        .unwrap_or(0)
        .max(1);
    let label_width = chart.labels.iter().map(|l| l.chars().count()).max().unwrap_or(0);

    println!("{}", style(format!("{} by {}", metric.title(), dimension.title())).bold());
    println!("{}", "─".repeat(label_width + BAR_WIDTH + 10));

    for (i, label) in chart.labels.iter().enumerate() {
        for (n, ds) in chart.datasets.iter().enumerate() {
            let Some(&value) = ds.data.get(i) else {
                continue;
            };
            let bar = "█".repeat(bar_len(value, max));
            let bar = match ds.label.as_str() {
                "Insertions" => style(bar).green(),
                "Deletions" => style(bar).red(),
                _ => style(bar).magenta(),
            };
            let shown = if n == 0 { label.as_str() } else { "" };
            println!("{:<width$} {} {}", shown, bar, value, width = label_width);
        }
    }

    println!("\n{}", style("Legend").bold());
    for ds in &chart.datasets {
        let swatch = match ds.label.as_str() {
            "Insertions" => style("█").green(),
            "Deletions" => style("█").red(),
            _ => style("█").magenta(),
        };
        println!("  {} {}", swatch, ds.label);
    }

    Ok(())
}

fn bar_len(value: u64, max: u64) -> usize {
    if value == 0 {
        return 0;
    }
    (((value as f64 / max as f64) * BAR_WIDTH as f64).round() as usize).max(1)
}
