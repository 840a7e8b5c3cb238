//! File discovery and scanning for phpcompat

use anyhow::{Context, Result};
use phpcompat_core::{logging, tokenize, Diagnostic};
use phpcompat_sniffs::{SniffOptions, SniffRegistry};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::config::Config;

/// File extensions treated as PHP source
const PHP_EXTENSIONS: &[&str] = &["php", "inc", "phtml"];

/// Result of scanning a single file
pub struct ScanResult {
    /// Number of tokens in the file
    pub tokens: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Everything a scan needs, shared read-only across worker threads
pub struct Scanner<'a> {
    pub registry: &'a SniffRegistry,
    pub options: &'a SniffOptions,
    pub enabled: &'a HashSet<String>,
}

impl Scanner<'_> {
    /// Scan PHP source text
    pub fn scan_source(&self, source: &str) -> ScanResult {
        let stream = tokenize(source);
        let diagnostics = self.registry.check_all(&stream, self.options, self.enabled);
        ScanResult {
            tokens: stream.len(),
            diagnostics,
        }
    }

    /// Read and scan a single PHP file
    pub fn scan_file(&self, path: &Path) -> Result<ScanResult> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        let source = String::from_utf8_lossy(&bytes);

        let result = self.scan_source(&source);
        logging::log_file_scanned(path, result.tokens, result.diagnostics.len());
        Ok(result)
    }
}

fn is_php_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| PHP_EXTENSIONS.iter().any(|e| ext.eq_ignore_ascii_case(e)))
}

/// Expand the given paths into PHP files, sorted
///
/// Returns the files and the paths that do not exist. Files named explicitly
/// are always scanned; files found by walking a directory are subject to the
/// configured excludes.
pub fn collect_files(paths: &[PathBuf], config: &Config) -> (Vec<PathBuf>, Vec<PathBuf>) {
    let mut files = Vec::new();
    let mut missing = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            for entry in walkdir::WalkDir::new(path)
                .into_iter()
                .filter_map(|e| e.ok())
                .filter(|e| e.file_type().is_file() && is_php_file(e.path()))
            {
                let file_path = entry.path();
                // Excludes are relative to the directory being walked
                let relative = file_path.strip_prefix(path).unwrap_or(file_path);
                if !config.should_exclude(relative) {
                    files.push(file_path.to_path_buf());
                }
            }
        } else {
            missing.push(path.clone());
        }
    }

    files.sort();
    files.dedup();
    (files, missing)
}
