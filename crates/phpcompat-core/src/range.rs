//! Target PHP version range (the `testVersion` setting)
//!
//! Accepted shapes:
//! - `"7.2"`: exactly one version
//! - `"5.3-7.0"`: closed range
//! - `"-7.0"`: everything up to and including 7.0
//! - `"5.3-"`: 5.3 and everything after it

use crate::version::Version;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors in the configured target version range
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid testVersion setting: '{0}'")]
    Malformed(String),

    #[error("Invalid range in testVersion setting: '{0}'")]
    InvertedRange(String),
}

/// An inclusive range of PHP versions; an absent bound is unconstrained
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VersionRange {
    low: Option<Version>,
    high: Option<Version>,
}

impl VersionRange {
    /// A range that constrains nothing
    pub const fn unbounded() -> Self {
        Self {
            low: None,
            high: None,
        }
    }

    /// Build a range from explicit bounds
    pub fn new(low: Option<Version>, high: Option<Version>) -> Result<Self, ConfigError> {
        if let (Some(l), Some(h)) = (low, high) {
            if l.cmp_loose(&h) == Ordering::Greater {
                return Err(ConfigError::InvertedRange(format!("{}-{}", l, h)));
            }
        }
        Ok(Self { low, high })
    }

    /// Parse a `testVersion` string
    pub fn parse(spec: &str) -> Result<Self, ConfigError> {
        let trimmed = spec.trim();
        let malformed = || ConfigError::Malformed(spec.to_string());

        if trimmed.is_empty() {
            return Err(malformed());
        }

        let Some((left, right)) = trimmed.split_once('-') else {
            let version = Version::parse(trimmed).map_err(|_| malformed())?;
            return Ok(Self {
                low: Some(version),
                high: Some(version),
            });
        };

        let (left, right) = (left.trim(), right.trim());
        if left.is_empty() && right.is_empty() {
            return Err(malformed());
        }

        let bound = |s: &str| -> Result<Option<Version>, ConfigError> {
            if s.is_empty() {
                Ok(None)
            } else {
                Version::parse(s).map(Some).map_err(|_| malformed())
            }
        };
        Self::new(bound(left)?, bound(right)?)
    }

    pub fn low(&self) -> Option<Version> {
        self.low
    }

    pub fn high(&self) -> Option<Version> {
        self.high
    }

    pub fn is_unbounded(&self) -> bool {
        self.low.is_none() && self.high.is_none()
    }

    /// Does the range include any version at or before `version`?
    ///
    /// Used for features that were introduced later: if so, code in range may
    /// run on a PHP that lacks the feature.
    pub fn supports_below(&self, version: Version) -> bool {
        match self.low {
            None => true,
            Some(low) => low.cmp_loose(&version) != Ordering::Greater,
        }
    }

    /// Does the range include any version at or after `version`?
    ///
    /// Used for features that were deprecated or removed.
    pub fn supports_above(&self, version: Version) -> bool {
        match self.high {
            None => true,
            Some(high) => high.cmp_loose(&version) != Ordering::Less,
        }
    }

    /// Is `version` itself inside the range?
    pub fn contains(&self, version: Version) -> bool {
        let above_low = self
            .low
            .map_or(true, |low| low.cmp_loose(&version) != Ordering::Greater);
        let below_high = self
            .high
            .map_or(true, |high| high.cmp_loose(&version) != Ordering::Less);
        above_low && below_high
    }
}

impl fmt::Display for VersionRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.low, self.high) {
            (Some(l), Some(h)) if l == h && l.patch() == h.patch() => write!(f, "{}", l),
            (Some(l), Some(h)) => write!(f, "{}-{}", l, h),
            (Some(l), None) => write!(f, "{}-", l),
            (None, Some(h)) => write!(f, "-{}", h),
            (None, None) => write!(f, "-"),
        }
    }
}

impl FromStr for VersionRange {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
