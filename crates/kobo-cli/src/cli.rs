//! CLI argument definitions for the form mapper.

use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "kobo-mapper",
    version,
    about = "Reconcile country KoboToolbox forms against a standard template",
    long_about = "Compare the survey and choices sheets of every country form against a\n\
                  standard XLSForm template and report each divergence, annotated with\n\
                  the closest country alternative found by fuzzy matching."
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
    /// Compare every country form against the standard and write reports.
    Compare(CompareArgs),

    /// Print the effective comparison configuration as TOML.
    Config(ConfigArgs),
}

#[derive(Parser)]
pub struct CompareArgs {
    /// Directory holding one sub-directory per country form.
    #[arg(value_name = "KOBO_DIR")]
    pub kobo_dir: PathBuf,

    /// Directory holding the standard form's survey.csv and choices.csv.
    #[arg(value_name = "STANDARD_DIR")]
    pub standard_dir: PathBuf,

    /// Directory receiving the discrepancy reports.
    #[arg(value_name = "OUTPUT_DIR")]
    pub output_dir: PathBuf,

    /// Similarity threshold (0-100) for every match stage.
    #[arg(long = "threshold", value_name = "N")]
    pub threshold: Option<u8>,

    /// TOML file with comparison options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Report matched fields as well as mismatches.
    #[arg(long = "include-matched", conflicts_with = "only_mismatches")]
    pub include_matched: bool,

    /// Report only mismatched fields and missing rows.
    #[arg(long = "only-mismatches")]
    pub only_mismatches: bool,

    /// Also write master_discrepancy_report.json.
    #[arg(long = "json")]
    pub json: bool,

    /// Compare and summarize without writing reports.
    #[arg(long = "dry-run")]
    pub dry_run: bool,
}

impl CompareArgs {
    /// `Some` when a flag overrides the configured `include_matched`.
    pub fn include_matched_override(&self) -> Option<bool> {
        if self.only_mismatches {
            Some(false)
        } else if self.include_matched {
            Some(true)
        } else {
            None
        }
    }
}

#[derive(Parser)]
pub struct ConfigArgs {
    /// TOML file with comparison options.
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,
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
