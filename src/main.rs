mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use colored::Colorize;
use operator_audit::record::AuditReport;
use operator_audit::{audit, config, discovery, history, output, specifier};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// How many package errors are echoed after an audit.
const ERRORS_SHOWN: usize = 5;

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Audit {
            path,
            format,
            output: output_path,
            filter,
            config: config_path,
        } => {
            if !path.exists() {
                eprintln!("Error: directory does not exist: {}", path.display());
                std::process::exit(2);
            }

            let config = load_config(config_path.as_deref());

            let filter = filter.map(|pattern| {
                discovery::compile_filter(&pattern).unwrap_or_else(|e| {
                    eprintln!("Error: {e}");
                    std::process::exit(2);
                })
            });

            let source = history::source_for(config.history.source);
            let report = audit::run_audit(
                &path,
                &config,
                filter.as_ref(),
                source.as_ref(),
                chrono::Utc::now(),
            )
            .unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });

            let formatted = output::format_report(&report, format).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });
            emit(&formatted, output_path.as_deref());
            print_footer(&report);
        }

        Commands::Report {
            analysis,
            output: output_path,
        } => {
            let report = output::json::read(&analysis).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });
            let html = output::html::format(&report).unwrap_or_else(|e| {
                eprintln!("Error: {e}");
                std::process::exit(2);
            });
            let out_path = output_path.unwrap_or_else(|| default_report_path(&analysis));
            emit(&html, Some(&out_path));
        }

        Commands::Parse {
            specifier: raw,
            config: config_path,
        } => {
            let config = load_config(config_path.as_deref());
            let shape = specifier::classify(raw.as_str());
            let versions = specifier::parse_with_ceiling(raw.as_str(), config.policy.ceiling);

            println!("{}", raw.bold());
            println!();
            println!("  Shape:     {shape}");
            println!("  Ceiling:   {}", config.policy.ceiling);
            println!("  Versions:  {}", versions.len());
            for version in &versions {
                println!("    {version}");
            }
        }
    }
}

/// Installs a stderr subscriber. `RUST_LOG` wins over `--verbose`.
fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn load_config(path: Option<&Path>) -> config::Config {
    config::Config::load(path).unwrap_or_else(|e| {
        eprintln!("Error: {e}");
        std::process::exit(2);
    })
}

/// Writes to `path`, or to stdout when no path is given.
fn emit(content: &str, path: Option<&Path>) {
    match path {
        Some(out_path) => {
            std::fs::write(out_path, content).unwrap_or_else(|e| {
                eprintln!("Error writing output: {e}");
                std::process::exit(2);
            });
            eprintln!("Output written to {}", out_path.display());
        }
        None => print!("{content}"),
    }
}

/// `analysis.json` -> `analysis_report.html`, next to the input.
fn default_report_path(analysis: &Path) -> PathBuf {
    let stem = analysis
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| "analysis".to_string());
    analysis.with_file_name(format!("{stem}_report.html"))
}

/// One-line summary plus the first few package errors, on stderr.
fn print_footer(report: &AuditReport) {
    let summary = &report.summary;
    eprintln!(
        "\nSummary: {} packages, {} releases, {} at risk",
        summary.total_packages, summary.total_releases, summary.packages_at_risk
    );
    if summary.errors > 0 {
        eprintln!("{}", format!("Errors encountered: {}", summary.errors).red());
        for package in report.errored().take(ERRORS_SHOWN) {
            eprintln!(
                "  {}: {}",
                package.name,
                package.error.as_deref().unwrap_or_default()
            );
        }
    }
}
