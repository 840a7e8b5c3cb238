//! phpcompat CLI - PHP cross-version compatibility checker
//!
//! Scans PHP files for functions, constants, keywords, type declarations
//! and settings that do not work across the targeted PHP versions.
//!
//! Exit codes: 0 no issues, 1 errors (or a fatal problem), 2 warnings only.

mod config;
mod output;
mod process;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use phpcompat_core::logging;
use phpcompat_sniffs::SniffRegistry;
use rayon::prelude::*;
use std::path::PathBuf;
use std::process::ExitCode;

use config::Config;
use output::{OutputFormat, Reporter};
use process::{collect_files, ScanResult, Scanner};

#[derive(Parser)]
#[command(name = "phpcompat")]
#[command(version)]
#[command(about = "Check PHP code for compatibility across PHP versions")]
struct Cli {
    /// Files or directories to scan
    #[arg(required_unless_present = "list_sniffs")]
    paths: Vec<PathBuf>,

    /// PHP versions to check against, e.g. "5.6", "7.0-", "-7.4" or "5.6-8.1".
    /// Overrides config file.
    #[arg(long, short = 't', value_name = "VERSION")]
    test_version: Option<String>,

    /// Sniffs to run (can be specified multiple times). Overrides config file.
    #[arg(long, short = 's', value_name = "SNIFF")]
    sniff: Vec<String>,

    /// Output format: text, json, raw, github
    #[arg(long, value_name = "FORMAT")]
    format: Option<String>,

    /// Shorthand for --format json
    #[arg(long, conflicts_with = "format")]
    json: bool,

    /// Show verbose output
    #[arg(long, short = 'v')]
    verbose: bool,

    /// Path to config file (default: auto-detect .phpcompat.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ignore config files
    #[arg(long)]
    no_config: bool,

    /// Write a log of the run to this file
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// List available sniffs and exit
    #[arg(long)]
    list_sniffs: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red(), e);
            ExitCode::from(1)
        }
    }
}

fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let registry = SniffRegistry::new();

    if cli.list_sniffs {
        println!("{}", "Available sniffs:".bold());
        for (name, description) in registry.list_sniffs() {
            println!("  {} - {}", name.green(), description);
        }
        return Ok(ExitCode::SUCCESS);
    }

    if let Some(log_path) = &cli.log_file {
        logging::init_logger(Some(log_path))
            .with_context(|| format!("Failed to open log file {}", log_path.display()))?;
    }

    let config = if cli.no_config {
        Config::default()
    } else if let Some(config_path) = &cli.config {
        Config::load_path(config_path)?
    } else {
        match Config::load()? {
            Some((cfg, path)) => {
                if cli.verbose {
                    eprintln!("{}: {}", "Using config".bold(), path.display());
                }
                cfg
            }
            None => Config::default(),
        }
    };

    let output_format = if cli.json {
        OutputFormat::Json
    } else {
        let format = cli
            .format
            .as_deref()
            .or(config.output.format.as_deref())
            .unwrap_or("text");
        OutputFormat::from_str(format).ok_or_else(|| {
            anyhow::anyhow!(
                "Invalid output format '{}'. Valid options: text, json, raw, github",
                format
            )
        })?
    };

    // An invalid test version stops the run before anything is scanned
    let options = config.sniff_options(cli.test_version.as_deref())?;

    let all_sniffs = registry.all_names();
    let enabled = config.effective_sniffs(&all_sniffs, &cli.sniff);
    registry
        .validate_names(&enabled)
        .context("Use --list-sniffs to see available sniffs")?;
    if enabled.is_empty() {
        anyhow::bail!("No sniffs enabled");
    }

    let mut enabled_names: Vec<&str> = enabled.iter().map(String::as_str).collect();
    enabled_names.sort_unstable();
    logging::log_sniffs(&enabled_names);

    let test_version = if options.test_version.is_unbounded() {
        "all versions".to_string()
    } else {
        options.test_version.to_string()
    };

    if cli.verbose && output_format == OutputFormat::Text {
        println!("{}: {}", "Test version".bold(), test_version);
        println!("{}: {}", "Sniffs".bold(), enabled_names.join(", "));
        println!();
    }

    let (file_paths, missing_paths) = collect_files(&cli.paths, &config);
    logging::log_scan_start(file_paths.len());

    let scanner = Scanner {
        registry: &registry,
        options: &options,
        enabled: &enabled,
    };

    // Scan in parallel; collect keeps input order, which is sorted by path
    let results: Vec<Result<ScanResult>> = file_paths
        .par_iter()
        .map(|path| scanner.scan_file(path))
        .collect();

    let mut reporter = Reporter::new(output_format, cli.verbose, test_version);

    for path in &missing_paths {
        eprintln!("{}: Path does not exist: {}", "Warning".yellow(), path.display());
    }

    for (path, result) in file_paths.iter().zip(results) {
        match result {
            Ok(scan) => reporter.report_file(path, scan.diagnostics),
            Err(e) => {
                let message = format!("{:#}", e);
                logging::log_file_error(path, &message);
                reporter.report_error(path, &message);
            }
        }
    }

    let summary = reporter.summary();
    logging::log_scan_complete(summary.files_processed, summary.errors, summary.warnings);

    let exit_code = if summary.errors > 0 || summary.failures > 0 {
        ExitCode::from(1)
    } else if summary.warnings > 0 {
        ExitCode::from(2)
    } else {
        ExitCode::SUCCESS
    };

    reporter.finish();

    Ok(exit_code)
}
