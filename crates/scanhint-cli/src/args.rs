//! Command line arguments

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use scanhint_analyzer::MalformedRowPolicy;
use std::path::PathBuf;

/// scanhint - flag full table scans in MySQL EXPLAIN output and suggest indexes
#[derive(Debug, Parser)]
#[command(name = "scanhint", version, about)]
pub struct Cli {
    /// Configuration file (defaults to <config dir>/scanhint/config.toml)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    /// Log filter directive, e.g. "debug" or "scanhint_analyzer=trace"
    #[arg(long, global = true, value_name = "FILTER")]
    pub log_filter: Option<String>,

    #[command(flatten)]
    pub connection: ConnectionArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Connection overrides; each one wins over the configuration file
#[derive(Debug, Default, Clone, Args)]
pub struct ConnectionArgs {
    /// MySQL host
    #[arg(long, global = true, env = "SCANHINT_HOST")]
    pub host: Option<String>,

    /// MySQL port
    #[arg(long, global = true, env = "SCANHINT_PORT")]
    pub port: Option<u16>,

    /// MySQL user
    #[arg(long, global = true, env = "SCANHINT_USER")]
    pub user: Option<String>,

    /// MySQL password
    #[arg(long, global = true, env = "SCANHINT_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Database to use
    #[arg(long, global = true, env = "SCANHINT_DATABASE")]
    pub database: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print a query's plan and index suggestions, then time it
    Analyze(AnalyzeArgs),
    /// Analyze EXPLAIN output saved from the mysql client, without a server
    ExplainFile(ExplainFileArgs),
    /// Run the maintenance task on a schedule until Ctrl+C
    Maintain(MaintainArgs),
    /// Analyze a query, then run the maintenance schedule
    Run(RunArgs),
}

/// What to do with EXPLAIN rows that cannot be read
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum MalformedRows {
    /// Warn and leave the row out
    #[default]
    Skip,
    /// Abort the analysis
    Fail,
}

impl From<MalformedRows> for MalformedRowPolicy {
    fn from(value: MalformedRows) -> Self {
        match value {
            MalformedRows::Skip => MalformedRowPolicy::Skip,
            MalformedRows::Fail => MalformedRowPolicy::Fail,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct AnalyzeArgs {
    /// Query to analyze
    #[arg(long, short = 'q')]
    pub query: String,

    /// Rewritten query to compare against the original
    #[arg(long)]
    pub optimized: Option<String>,

    /// Handling of unreadable EXPLAIN rows
    #[arg(long, value_enum, default_value_t = MalformedRows::Skip)]
    pub malformed_rows: MalformedRows,
}

#[derive(Debug, Clone, Args)]
pub struct ExplainFileArgs {
    /// File holding tab-separated or boxed EXPLAIN output
    #[arg(value_hint = ValueHint::FilePath)]
    pub path: PathBuf,

    /// Query the EXPLAIN output belongs to
    #[arg(long, short = 'q')]
    pub query: String,

    /// Handling of unreadable EXPLAIN rows
    #[arg(long, value_enum, default_value_t = MalformedRows::Skip)]
    pub malformed_rows: MalformedRows,
}

#[derive(Debug, Default, Clone, Args)]
pub struct MaintainArgs {
    /// Seconds between maintenance runs
    #[arg(long)]
    pub interval_secs: Option<u64>,

    /// Table to count on each run
    #[arg(long)]
    pub table: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub analyze: AnalyzeArgs,

    #[command(flatten)]
    pub maintain: MaintainArgs,
}
