//! Command line arguments for `hapi-convert`.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "hapi-convert",
    version,
    about = "Convert HAPI responses into self-describing datasets",
    long_about = "Convert HAPI time-series responses (CSV or JSON plus info metadata)\n\
                  into self-describing datasets with ISTP-style attributes.\n\
                  Writes JSON-headed ASCII or a flattened CSV frame."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Convert a response into a dataset and write it out.
    Convert(ConvertArgs),

    /// Show the variables a response would produce without writing anything.
    Inspect(SourceArgs),
}

/// Where the response comes from.
#[derive(Args, Clone)]
pub struct SourceArgs {
    /// HAPI data file (`.json` responses, anything else is read as CSV).
    #[arg(value_name = "DATA")]
    pub data: PathBuf,

    /// Standalone info document (required for CSV without an embedded header).
    #[arg(long = "info", value_name = "INFO")]
    pub info: Option<PathBuf>,

    /// Comma-separated parameters to keep besides time.
    #[arg(long = "parameters", value_delimiter = ',', value_name = "NAMES")]
    pub parameters: Vec<String>,
}

#[derive(Args)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Output format.
    #[arg(long = "to", value_enum, default_value = "ascii")]
    pub to: OutputFormatArg,

    /// Output file (default: next to DATA with a format-specific suffix).
    #[arg(long = "output", short = 'o', value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Value of the dataset `Author` attribute.
    #[arg(long = "author")]
    pub author: Option<String>,

    /// Fixed `CreateDate` (RFC 3339) instead of the current time.
    #[arg(long = "created-at", value_name = "TIMESTAMP")]
    pub created_at: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormatArg {
    /// JSON-headed ASCII.
    Ascii,
    /// Flattened frame as CSV.
    Csv,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
