//! Output formatting for phpcompat
//!
//! Supports text (colored terminal), JSON, raw one-line-per-issue and GitHub
//! Actions annotation output.

use colored::*;
use phpcompat_core::{Diagnostic, Severity};
use serde::Serialize;
use std::path::Path;

/// Output format selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    /// file:line:severity:message
    Raw,
    /// GitHub Actions annotations
    Github,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<OutputFormat> {
        match s.to_lowercase().as_str() {
            "text" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            "raw" => Some(OutputFormat::Raw),
            "github" => Some(OutputFormat::Github),
            _ => None,
        }
    }
}

/// Result of scanning a single file
#[derive(Debug, Clone, Serialize)]
pub struct FileResult {
    pub path: String,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FileResult {
    pub fn success(path: &Path, diagnostics: Vec<Diagnostic>) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics,
            error: None,
        }
    }

    pub fn error(path: &Path, error: String) -> Self {
        Self {
            path: path.display().to_string(),
            diagnostics: Vec::new(),
            error: Some(error),
        }
    }
}

/// Summary statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct Summary {
    pub files_processed: usize,
    pub files_with_issues: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Files that could not be read
    pub failures: usize,
}

/// Full JSON output structure
#[derive(Debug, Serialize)]
pub struct JsonOutput {
    pub version: String,
    pub test_version: String,
    pub summary: Summary,
    pub files: Vec<FileResult>,
}

/// Reporter for accumulating and outputting results
pub struct Reporter {
    format: OutputFormat,
    verbose: bool,
    test_version: String,
    results: Vec<FileResult>,
    summary: Summary,
}

impl Reporter {
    pub fn new(format: OutputFormat, verbose: bool, test_version: String) -> Self {
        Self {
            format,
            verbose,
            test_version,
            results: Vec::new(),
            summary: Summary::default(),
        }
    }

    /// Report the diagnostics of one scanned file
    pub fn report_file(&mut self, path: &Path, diagnostics: Vec<Diagnostic>) {
        self.summary.files_processed += 1;

        if diagnostics.is_empty() {
            if self.verbose && self.format == OutputFormat::Text {
                println!("{}: No issues", path.display());
            }
            self.results.push(FileResult::success(path, diagnostics));
            return;
        }

        self.summary.files_with_issues += 1;
        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        self.summary.errors += errors;
        self.summary.warnings += diagnostics.len() - errors;

        match self.format {
            OutputFormat::Text => print!("{}", render_text(path, &diagnostics)),
            OutputFormat::Raw => {
                for diagnostic in &diagnostics {
                    println!("{}", render_raw(path, diagnostic));
                }
            }
            OutputFormat::Github => {
                for diagnostic in &diagnostics {
                    println!("{}", render_github(path, diagnostic));
                }
            }
            OutputFormat::Json => {
                // JSON output is handled in finish()
            }
        }

        self.results.push(FileResult::success(path, diagnostics));
    }

    /// Report a file that could not be scanned
    pub fn report_error(&mut self, path: &Path, error: &str) {
        self.summary.files_processed += 1;
        self.summary.failures += 1;

        if self.format == OutputFormat::Text {
            eprintln!("{}: {} - {}", "Warning".yellow(), path.display(), error);
        }

        self.results.push(FileResult::error(path, error.to_string()));
    }

    /// Print final summary/output
    pub fn finish(self) {
        match self.format {
            OutputFormat::Text => {
                println!();
                println!("{}", "Summary".bold().underline());
                println!("  Test version: {}", self.test_version);
                println!("  Files processed: {}", self.summary.files_processed);
                println!("  Files with issues: {}", self.summary.files_with_issues);
                println!("  Errors: {}", self.summary.errors);
                println!("  Warnings: {}", self.summary.warnings);
                if self.summary.failures > 0 {
                    println!("  Unreadable files: {}", self.summary.failures);
                }
            }
            OutputFormat::Json => {
                let output = JsonOutput {
                    version: env!("CARGO_PKG_VERSION").to_string(),
                    test_version: self.test_version,
                    summary: self.summary,
                    files: self.results,
                };
                match serde_json::to_string_pretty(&output) {
                    Ok(json) => println!("{}", json),
                    Err(e) => eprintln!("{}: {}", "Error".red(), e),
                }
            }
            OutputFormat::Raw | OutputFormat::Github => {
                // One line per issue, already printed
            }
        }
    }

    /// Get summary for exit code determination
    pub fn summary(&self) -> &Summary {
        &self.summary
    }
}

/// Colored block for one file: its path, then one line per diagnostic
fn render_text(path: &Path, diagnostics: &[Diagnostic]) -> String {
    let mut out = format!("{}\n", path.display().to_string().bold());
    for diagnostic in diagnostics {
        let label = match diagnostic.severity {
            Severity::Error => "ERROR".red().bold(),
            Severity::Warning => "WARNING".yellow().bold(),
        };
        out.push_str(&format!(
            "  {:>4}:{:<3} {} {} {}\n",
            diagnostic.position.line,
            diagnostic.position.column,
            label,
            diagnostic.message,
            format!("({})", diagnostic.code).dimmed()
        ));
    }
    out.push('\n');
    out
}

/// `file:line:severity:message`
fn render_raw(path: &Path, diagnostic: &Diagnostic) -> String {
    format!(
        "{}:{}:{}:{}",
        path.display(),
        diagnostic.position.line,
        diagnostic.severity,
        diagnostic.message
    )
}

/// `::error file={name},line={line},col={col}::{message}`
fn render_github(path: &Path, diagnostic: &Diagnostic) -> String {
    format!(
        "::{} file={},line={},col={}::{}",
        diagnostic.severity,
        path.display(),
        diagnostic.position.line,
        diagnostic.position.column,
        escape_message(&diagnostic.message)
    )
}

/// Escape special characters for GitHub Actions annotations
fn escape_message(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}
