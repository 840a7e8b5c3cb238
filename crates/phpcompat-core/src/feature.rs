//! Feature tables: what changed about a PHP feature, and when
//!
//! A [`FeatureTable`] holds the version facts for one named feature (a
//! function, constant, interface, keyword, directive...) plus metadata used
//! only for messages. Tables are compiled-in data built once at start-up;
//! a malformed table is a bug in that data, so [`FeatureTableBuilder::build`]
//! panics instead of returning an error.

use crate::validate::Validator;
use crate::version::Version;
use std::collections::{BTreeMap, HashMap};
use thiserror::Error;

/// Errors in a feature table definition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DataError {
    #[error("Feature '{feature}': invalid version key '{key}'")]
    BadVersion { feature: String, key: String },

    #[error("Feature '{feature}': version {version} listed more than once")]
    DuplicateVersion { feature: String, version: String },

    #[error("Feature '{feature}': present again in {version} after being removed")]
    NonMonotonic { feature: String, version: String },

    #[error("Feature '{feature}': metadata key '{key}' is not declared")]
    UndeclaredMetadata { feature: String, key: String },

    #[error("Feature '{0}' has no version facts")]
    Empty(String),
}

/// Availability of a feature in a given PHP version
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Not yet available
    Absent,
    /// Available
    Present,
    /// Available, but deprecated
    Deprecated,
    /// No longer available
    Removed,
    /// Available only when PHP was built with the given option
    Conditional(&'static str),
}

/// One `version → status` entry of a table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFact {
    pub version: Version,
    pub status: Status,
}

/// Metadata keys every table may carry without declaring them
pub const BUILTIN_METADATA_KEYS: &[&str] = &["alternative", "description"];

/// Version facts and message metadata for a single feature
#[derive(Debug, Clone)]
pub struct FeatureTable {
    name: String,
    facts: Vec<FeatureFact>,
    alternative: Option<String>,
    description: Option<String>,
    metadata: BTreeMap<String, String>,
    validator: Option<Validator>,
}

impl FeatureTable {
    /// Start building a table for `name`
    pub fn builder(name: impl Into<String>) -> FeatureTableBuilder {
        FeatureTableBuilder {
            name: name.into(),
            facts: Vec::new(),
            errors: Vec::new(),
            alternative: None,
            description: None,
            metadata: BTreeMap::new(),
            declared_keys: Vec::new(),
            validator: None,
        }
    }

    /// Feature name as written in the table (original casing)
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Facts in ascending version order
    pub fn facts(&self) -> &[FeatureFact] {
        &self.facts
    }

    pub fn alternative(&self) -> Option<&str> {
        self.alternative.as_deref()
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Look up a declared metadata entry
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get(key).map(String::as_str)
    }

    pub fn validator(&self) -> Option<Validator> {
        self.validator
    }

    /// The version in which the feature first became available, if the table
    /// records one
    pub fn introduced_in(&self) -> Option<Version> {
        let mut seen_absent = false;
        for fact in &self.facts {
            match fact.status {
                Status::Absent => seen_absent = true,
                Status::Present | Status::Conditional(_) if seen_absent => {
                    return Some(fact.version)
                }
                _ => {}
            }
        }
        None
    }
}

/// Builder for [`FeatureTable`]
#[derive(Debug)]
pub struct FeatureTableBuilder {
    name: String,
    facts: Vec<FeatureFact>,
    errors: Vec<DataError>,
    alternative: Option<String>,
    description: Option<String>,
    metadata: BTreeMap<String, String>,
    declared_keys: Vec<String>,
    validator: Option<Validator>,
}

impl FeatureTableBuilder {
    /// Record a fact; the version string is parsed here
    pub fn fact(mut self, version: &str, status: Status) -> Self {
        match Version::parse(version) {
            Ok(version) => self.facts.push(FeatureFact { version, status }),
            Err(_) => self.errors.push(DataError::BadVersion {
                feature: self.name.clone(),
                key: version.to_string(),
            }),
        }
        self
    }

    pub fn absent(self, version: &str) -> Self {
        self.fact(version, Status::Absent)
    }

    pub fn present(self, version: &str) -> Self {
        self.fact(version, Status::Present)
    }

    pub fn deprecated(self, version: &str) -> Self {
        self.fact(version, Status::Deprecated)
    }

    pub fn removed(self, version: &str) -> Self {
        self.fact(version, Status::Removed)
    }

    pub fn conditional(self, version: &str, condition: &'static str) -> Self {
        self.fact(version, Status::Conditional(condition))
    }

    pub fn alternative(mut self, alternative: impl Into<String>) -> Self {
        self.alternative = Some(alternative.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Declare extra metadata keys this table may carry
    pub fn declare_keys(mut self, keys: &[&str]) -> Self {
        self.declared_keys.extend(keys.iter().map(|k| k.to_string()));
        self
    }

    /// Attach a metadata entry; the key must be built in or declared
    pub fn meta(mut self, key: &str, value: impl Into<String>) -> Self {
        match key {
            "alternative" => return self.alternative(value),
            "description" => return self.description(value),
            _ => {}
        }
        if self.declared_keys.iter().any(|k| k == key) {
            self.metadata.insert(key.to_string(), value.into());
        } else {
            self.errors.push(DataError::UndeclaredMetadata {
                feature: self.name.clone(),
                key: key.to_string(),
            });
        }
        self
    }

    pub fn validator(mut self, validator: Validator) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Validate and build the table
    pub fn try_build(mut self) -> Result<FeatureTable, DataError> {
        if let Some(error) = self.errors.into_iter().next() {
            return Err(error);
        }
        if self.facts.is_empty() {
            return Err(DataError::Empty(self.name));
        }

        self.facts.sort_by(|a, b| a.version.cmp(&b.version));

        for pair in self.facts.windows(2) {
            if pair[0].version == pair[1].version {
                return Err(DataError::DuplicateVersion {
                    feature: self.name,
                    version: pair[1].version.to_string(),
                });
            }
        }

        let mut removed = false;
        for fact in &self.facts {
            match fact.status {
                Status::Removed => removed = true,
                Status::Present | Status::Conditional(_) if removed => {
                    return Err(DataError::NonMonotonic {
                        feature: self.name,
                        version: fact.version.to_string(),
                    });
                }
                _ => {}
            }
        }

        Ok(FeatureTable {
            name: self.name,
            facts: self.facts,
            alternative: self.alternative,
            description: self.description,
            metadata: self.metadata,
            validator: self.validator,
        })
    }

    /// Build a compiled-in table, panicking on malformed data
    pub fn build(self) -> FeatureTable {
        match self.try_build() {
            Ok(table) => table,
            Err(error) => panic!("malformed feature table: {}", error),
        }
    }
}

/// Case-insensitive lookup over a set of feature tables
///
/// Keys are lower-cased once when the index is built.
#[derive(Debug, Clone, Default)]
pub struct FeatureIndex {
    tables: Vec<FeatureTable>,
    by_name: HashMap<String, usize>,
}

impl FeatureIndex {
    pub fn new(tables: Vec<FeatureTable>) -> Self {
        let by_name = tables
            .iter()
            .enumerate()
            .map(|(i, table)| (table.name().to_ascii_lowercase(), i))
            .collect();
        Self { tables, by_name }
    }

    /// Exact (case-insensitive) lookup
    pub fn get(&self, name: &str) -> Option<&FeatureTable> {
        let key = name.trim_start_matches('\\').to_ascii_lowercase();
        self.by_name.get(&key).map(|&i| &self.tables[i])
    }

    /// Longest table name that is a prefix of `name` (case-insensitive)
    pub fn find_prefix(&self, name: &str) -> Option<&FeatureTable> {
        let key = name.trim_start_matches('\\').to_ascii_lowercase();
        self.by_name
            .iter()
            .filter(|(prefix, _)| key.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, &i)| &self.tables[i])
    }

    pub fn tables(&self) -> &[FeatureTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sorts_facts() {
        let table = FeatureTable::builder("each")
            .removed("8.0")
            .deprecated("7.2")
            .build();

        let versions: Vec<String> = table.facts().iter().map(|f| f.version.to_string()).collect();
        assert_eq!(versions, vec!["7.2", "8.0"]);
    }

    #[test]
    fn test_bad_version_key() {
        let err = FeatureTable::builder("foo").absent("five").try_build().unwrap_err();
        assert_eq!(
            err,
            DataError::BadVersion {
                feature: "foo".to_string(),
                key: "five".to_string()
            }
        );
    }

    #[test]
    fn test_duplicate_version() {
        let err = FeatureTable::builder("foo")
            .absent("5.4")
            .present("5.4")
            .try_build()
            .unwrap_err();
        assert!(matches!(err, DataError::DuplicateVersion { .. }));
    }

    #[test]
    fn test_present_after_removed_rejected() {
        let err = FeatureTable::builder("foo")
            .removed("7.0")
            .present("7.1")
            .try_build()
            .unwrap_err();
        assert!(matches!(err, DataError::NonMonotonic { .. }));
    }

    #[test]
    #[should_panic(expected = "malformed feature table")]
    fn test_build_panics_on_bad_data() {
        FeatureTable::builder("foo").build();
    }

    #[test]
    fn test_metadata_must_be_declared() {
        let err = FeatureTable::builder("mysql_")
            .removed("7.0")
            .meta("extension", "mysql")
            .try_build()
            .unwrap_err();
        assert!(matches!(err, DataError::UndeclaredMetadata { .. }));

        let table = FeatureTable::builder("mysql_")
            .removed("7.0")
            .declare_keys(&["extension"])
            .meta("extension", "mysql")
            .meta("alternative", "mysqli")
            .build();
        assert_eq!(table.metadata("extension"), Some("mysql"));
        assert_eq!(table.alternative(), Some("mysqli"));
        // Metadata never shows up as a fact
        assert_eq!(table.facts().len(), 1);
    }

    #[test]
    fn test_introduced_in() {
        let table = FeatureTable::builder("array_column")
            .absent("5.4")
            .present("5.5")
            .build();
        assert_eq!(table.introduced_in(), Some(Version::new(5, 5)));

        let removed_only = FeatureTable::builder("ereg").removed("7.0").build();
        assert_eq!(removed_only.introduced_in(), None);
    }

    #[test]
    fn test_index_is_case_insensitive() {
        let index = FeatureIndex::new(vec![
            FeatureTable::builder("array_column").absent("5.4").present("5.5").build(),
            FeatureTable::builder("JsonSerializable").absent("5.3").present("5.4").build(),
        ]);

        assert!(index.get("ARRAY_COLUMN").is_some());
        assert!(index.get("\\array_column").is_some());
        assert_eq!(index.get("jsonserializable").unwrap().name(), "JsonSerializable");
        assert!(index.get("array_col").is_none());
    }

    #[test]
    fn test_index_longest_prefix() {
        let index = FeatureIndex::new(vec![
            FeatureTable::builder("mysql_").removed("7.0").build(),
            FeatureTable::builder("mysqli_embedded_").removed("7.4").build(),
        ]);

        assert_eq!(index.find_prefix("mysql_query").unwrap().name(), "mysql_");
        assert_eq!(
            index.find_prefix("MYSQLI_EMBEDDED_SERVER_START").unwrap().name(),
            "mysqli_embedded_"
        );
        assert!(index.find_prefix("mysqli_query").is_none());
    }
}
