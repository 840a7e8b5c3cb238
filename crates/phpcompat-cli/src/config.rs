//! Configuration file support for phpcompat
//!
//! Loads `.phpcompat.toml` from current directory or parent directories.

use anyhow::{Context, Result};
use phpcompat_core::logging;
use phpcompat_sniffs::{OptionSettings, SniffOptions};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = ".phpcompat.toml";

/// Directories holding third-party packages, skipped unless
/// `paths.include_dependencies` is set
pub const DEPENDENCY_DIRS: &[&str] = &["vendor", "node_modules"];

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub php: PhpConfig,
    pub sniffs: SniffsConfig,
    pub paths: PathsConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PhpConfig {
    /// Target PHP versions, e.g. "5.6-" or "7.0-7.4"
    pub test_version: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct SniffsConfig {
    /// If set, only these sniffs will run
    pub enabled: Option<Vec<String>>,
    /// Sniffs to exclude (applied after enabled)
    pub disabled: Vec<String>,
    /// Options handed to every sniff
    pub options: OptionSettings,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Glob patterns to exclude from processing; a trailing `/` matches
    /// directories, by name anywhere or as a leading path
    pub exclude: Vec<String>,
    /// Also scan Composer and npm dependency directories
    pub include_dependencies: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format: "text", "json", "raw" or "github"
    pub format: Option<String>,
}

impl Config {
    /// Load config from `.phpcompat.toml` searching from current directory upward
    pub fn load() -> Result<Option<(Config, PathBuf)>> {
        Self::load_from(std::env::current_dir()?)
    }

    /// Load config searching from the given directory upward
    pub fn load_from(start_dir: PathBuf) -> Result<Option<(Config, PathBuf)>> {
        let mut current = Some(start_dir.as_path());

        while let Some(dir) = current {
            let config_path = dir.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                let config = Self::load_path(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    /// Load config from a specific path
    pub fn load_path(path: &Path) -> Result<Config> {
        logging::log_config_load(path);
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(config)
    }

    /// Compute the effective set of enabled sniffs
    pub fn effective_sniffs(&self, all_sniffs: &[&str], cli_sniffs: &[String]) -> HashSet<String> {
        // CLI sniffs override config completely
        if !cli_sniffs.is_empty() {
            return cli_sniffs.iter().cloned().collect();
        }

        let mut sniffs: HashSet<String> = match &self.sniffs.enabled {
            Some(enabled) => enabled.iter().cloned().collect(),
            None => all_sniffs.iter().map(|s| s.to_string()).collect(),
        };

        for disabled in &self.sniffs.disabled {
            sniffs.remove(disabled);
        }

        sniffs
    }

    /// Build the sniff options; a test version given on the command line wins
    pub fn sniff_options(&self, cli_test_version: Option<&str>) -> Result<SniffOptions> {
        let (test_version, source) = match (cli_test_version, self.php.test_version.as_deref()) {
            (Some(version), _) => (Some(version), "cli"),
            (None, Some(version)) => (Some(version), "config"),
            (None, None) => (None, "default"),
        };

        let options = SniffOptions::from_settings(test_version, &self.sniffs.options)
            .with_context(|| format!("Invalid test version (from {})", source))?;
        logging::log_test_version(&options.test_version, source);
        Ok(options)
    }

    /// Check if a path should be excluded from scanning
    pub fn should_exclude(&self, path: &Path) -> bool {
        let dirs: Vec<String> = match path.parent() {
            Some(parent) => parent
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect(),
            None => Vec::new(),
        };

        if !self.paths.include_dependencies && dirs.iter().any(|d| DEPENDENCY_DIRS.contains(&d.as_str())) {
            return true;
        }

        let path_str = path.to_string_lossy();
        let file_name = path.file_name().map(|n| n.to_string_lossy());

        self.paths.exclude.iter().any(|pattern| {
            if let Some(dir_pattern) = pattern.strip_suffix('/') {
                let Ok(dir_glob) = glob::Pattern::new(dir_pattern) else {
                    return false;
                };
                // A bare name matches any directory, `a/b*` matches a leading run of them
                return (0..dirs.len())
                    .any(|i| dir_glob.matches(&dirs[i]) || dir_glob.matches(&dirs[..=i].join("/")));
            }
            let Ok(glob_pattern) = glob::Pattern::new(pattern) else {
                return false;
            };
            glob_pattern.matches(&path_str) || file_name.as_ref().is_some_and(|n| glob_pattern.matches(n))
        })
    }
}
