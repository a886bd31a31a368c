use crate::output::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "siterate")]
#[command(
    about = "Resolves the URLs a website answers on and rates how it is run",
    long_about = None
)]
#[command(version)]
pub struct Cli {
    /// Increase verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count, global = true)]
    pub verbosity: u8,

    /// Configuration file (defaults to the nearest .siterate.toml)
    #[arg(short, long, global = true, env = "SITERATE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Emit pipeline and check spans through tracing
    #[arg(long, global = true)]
    pub trace: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check and rate a single URL
    Dryrun {
        /// URL of the site to evaluate
        url: String,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run one job given as JSON and print its report as JSON
    Spider {
        /// Job payload, e.g. '{"url": "https://example.com/", "meta": {...}}'
        #[arg(long)]
        job: String,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Run every job of a JSON Lines file, one report file per site
    Batch {
        /// File with one job per line
        jobs_file: PathBuf,

        /// Directory receiving the reports
        #[arg(short, long)]
        output: PathBuf,

        /// Number of sites evaluated in parallel (0 = one per CPU)
        #[arg(short = 'j', long = "jobs", default_value = "0")]
        jobs: usize,
    },

    /// Initialize configuration file
    Init {
        /// Force overwrite existing config
        #[arg(short, long)]
        force: bool,
    },
}
