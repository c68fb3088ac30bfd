use crate::chart::{Dimension, Metric};
use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "logstat")]
#[command(about = "Chart insertions, deletions and commit counts from git log --numstat output")]
#[command(version)]
pub struct Cli {
    #[clap(flatten)]
    pub common: CommonArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Clone, Debug, Default)]
pub struct CommonArgs {
    #[arg(
        long,
        short,
        global = true,
        help = "File holding `git log --numstat --date=iso-strict` output ('-' for stdin)"
    )]
    pub input: Option<PathBuf>,

    #[arg(long, global = true, help = "Run git log in this repository instead of reading a file")]
    pub repo: Option<PathBuf>,

    #[arg(
        long,
        global = true,
        env = "LOGSTAT_SINCE",
        help = "Only count commits at or after this date (RFC3339, YYYY-MM-DD, or 'N days ago')"
    )]
    pub since: Option<String>,

    #[arg(
        long,
        global = true,
        env = "LOGSTAT_UNTIL",
        help = "Only count commits at or before this date (RFC3339, YYYY-MM-DD, or 'N days ago')"
    )]
    pub until: Option<String>,

    #[arg(long, global = true, help = "Only count authors whose name contains this text")]
    pub author: Option<String>,

    #[arg(long, global = true, help = "Only count authors whose email contains this text")]
    pub author_email: Option<String>,

    #[arg(
        long,
        global = true,
        env = "LOGSTAT_UTC",
        help = "Bucket dates and hours in UTC instead of each commit's own offset"
    )]
    pub utc: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Group change records and print a chart
    Chart {
        #[arg(
            long,
            short,
            value_enum,
            default_value_t = Dimension::Date,
            help = "Dimension to group by"
        )]
        by: Dimension,

        #[arg(
            long,
            short,
            value_enum,
            default_value_t = Metric::Changes,
            help = "Quantity to chart"
        )]
        metric: Metric,

        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON", conflicts_with = "json")]
        ndjson: bool,
    },
    /// Dump the parsed change records
    Export {
        #[arg(long, help = "Output as JSON")]
        json: bool,

        #[arg(long, help = "Output as NDJSON", conflicts_with = "json")]
        ndjson: bool,
    },
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    pub fn execute(self) -> Result<()> {
        match self.command {
            Commands::Chart { by, metric, json, ndjson } => {
                crate::chart::exec(self.common, by, metric, json, ndjson)
            }
            Commands::Export { json, ndjson } => crate::export::exec(self.common, json, ndjson),
        }
    }
}
