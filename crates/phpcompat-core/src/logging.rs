//! Logging module for phpcompat
//!
//! Optional file log of configuration, the effective version range and
//! per-file scan results. Every function is a no-op until [`init_logger`]
//! has been called.

use crate::range::VersionRange;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<ScanLogger>> = Mutex::new(None);

/// Logger for scan runs
pub struct ScanLogger {
    file: File,
    path: PathBuf,
}

impl ScanLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self {
            file,
            path: log_path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger
///
/// Without a path the log goes to a timestamped file in the temp directory.
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        std::env::temp_dir().join(format!("phpcompat-{}.log", timestamp))
    });

    let logger = ScanLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

/// Log a message to the global logger
pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

/// Log a section header
pub fn section(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.section(title);
        }
    }
}

/// Check if logging is enabled
pub fn is_enabled() -> bool {
    if let Ok(guard) = LOGGER.lock() {
        guard.is_some()
    } else {
        false
    }
}

/// Log configuration loading
pub fn log_config_load(path: &Path) {
    section("CONFIGURATION LOADING");
    log(&format!("Loading config from: {}", path.display()));
}

/// Log the effective target range
pub fn log_test_version(range: &VersionRange, source: &str) {
    if range.is_unbounded() {
        log(&format!("[{}] testVersion: not set, checking all versions", source));
    } else {
        log(&format!("[{}] testVersion: {}", source, range));
    }
}

/// Log the sniffs that will run
pub fn log_sniffs(names: &[&str]) {
    log(&format!("Enabled sniffs ({}): {}", names.len(), names.join(", ")));
}

/// Log a configured name list
pub fn log_name_list(option: &str, count: usize) {
    log(&format!("[options] {}: {} names", option, count));
}

/// Log an occurrence skipped because of a name list
pub fn log_suppressed(name: &str, option: &str) {
    log(&format!("SUPPRESSED: {} (listed in {})", name, option));
}

/// Log scan start
pub fn log_scan_start(files_count: usize) {
    section("SCAN START");
    log(&format!("Scanning {} files", files_count));
}

/// Log one scanned file
pub fn log_file_scanned(path: &Path, tokens: usize, diagnostics: usize) {
    log(&format!(
        "{}: {} tokens, {} diagnostics",
        path.display(),
        tokens,
        diagnostics
    ));
}

/// Log a file that could not be read
pub fn log_file_error(path: &Path, error: &str) {
    log(&format!("FAILED to read: {} ({})", path.display(), error));
}

/// Log scan complete
pub fn log_scan_complete(files: usize, errors: usize, warnings: usize) {
    section("SCAN COMPLETE");
    log(&format!("Files scanned: {}", files));
    log(&format!("Errors: {}", errors));
    log(&format!("Warnings: {}", warnings));
}
