//! Per-run sniff configuration

use phpcompat_core::{logging, ConfigError, NameList, VersionRange};
use serde::Deserialize;

/// Options shared by every sniff during one run
#[derive(Debug, Clone, Default)]
pub struct SniffOptions {
    /// Target PHP versions; unbounded when not configured
    pub test_version: VersionRange,
    /// Functions exempt from the removed-extensions check
    pub function_whitelist: NameList,
}

impl SniffOptions {
    pub fn new(test_version: VersionRange) -> Self {
        Self {
            test_version,
            function_whitelist: NameList::new(),
        }
    }

    pub fn with_function_whitelist(mut self, list: NameList) -> Self {
        self.function_whitelist = list;
        self
    }

    /// Build options from a raw `testVersion` value and option settings
    ///
    /// An invalid version string is the only failure.
    pub fn from_settings(test_version: Option<&str>, settings: &OptionSettings) -> Result<Self, ConfigError> {
        let range = match test_version {
            Some(spec) => VersionRange::parse(spec)?,
            None => VersionRange::unbounded(),
        };

        let whitelist = settings
            .function_whitelist
            .as_ref()
            .map(NameListSetting::to_name_list)
            .unwrap_or_default();
        if !whitelist.is_empty() {
            logging::log_name_list("function_whitelist", whitelist.len());
        }

        Ok(Self::new(range).with_function_whitelist(whitelist))
    }
}

/// Sniff options as they appear in a configuration file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OptionSettings {
    #[serde(default)]
    pub function_whitelist: Option<NameListSetting>,
}

/// A name list given either as `"a, b"` or as `["a", "b"]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum NameListSetting {
    CommaSeparated(String),
    Items(Vec<String>),
}

impl NameListSetting {
    pub fn to_name_list(&self) -> NameList {
        match self {
            NameListSetting::CommaSeparated(list) => NameList::parse(list),
            NameListSetting::Items(items) => items.iter().collect(),
        }
    }
}
