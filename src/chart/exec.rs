use super::{aggregate, fetch_records, output_bars, output_json, output_ndjson, Dimension, Metric};
use crate::cli::CommonArgs;

pub fn exec(
    common: CommonArgs,
    by: Dimension,
    metric: Metric,
    json: bool,
    ndjson: bool,
) -> anyhow::Result<()> {
    // Keep stdout clean for machine-readable output
    let (source, records) = fetch_records(&common, !(json || ndjson))?;

    let chart = aggregate(&records, by, metric);

    if json {
        output_json(&chart, &source.describe(), &common, by, metric, records.len())?;
    } else if ndjson {
        output_ndjson(&chart)?;
    } else {
        output_bars(&chart, &common, by, metric)?;
    }

    Ok(())
}
