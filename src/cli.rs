use clap::{Parser, Subcommand};
use operator_audit::output::OutputFormat;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "operator-audit",
    version,
    about = "Audit an operator catalog against the platform-version support policy"
)]
pub struct Cli {
    /// Verbose diagnostics on stderr (RUST_LOG overrides)
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Analyze every package in a catalog directory
    Audit {
        /// Path to the catalog directory (one subdirectory per package)
        path: PathBuf,

        /// Output format
        #[arg(long, short, default_value = "json", value_enum)]
        format: OutputFormat,

        /// Write output to file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Only audit packages whose name matches this regex
        #[arg(long)]
        filter: Option<String>,

        /// Custom config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Render an HTML report from a saved JSON analysis
    Report {
        /// JSON file written by `audit --format json`
        analysis: PathBuf,

        /// Output file (default: <analysis>_report.html)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Show how a single version specifier is classified and expanded
    Parse {
        /// Specifier, e.g. "v4.8,v4.10-v4.12,=v4.15"
        specifier: String,

        /// Custom config file path (for the policy ceiling)
        #[arg(long)]
        config: Option<PathBuf>,
    },
}
