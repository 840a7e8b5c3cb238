//! PHP version numbers
//!
//! A version is `major.minor` with an optional patch component. A version
//! without a patch orders like `x.y.0`, but when it is compared against a
//! version that does carry a patch it matches every patch of that minor
//! release. `7.0` as a range boundary therefore covers `7.0.0` through `7.0.33`.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;
use thiserror::Error;

/// Errors produced while parsing a version string
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("Invalid PHP version '{0}'")]
    Invalid(String),
}

/// A PHP version (`major.minor[.patch]`)
#[derive(Debug, Clone, Copy)]
pub struct Version {
    major: u16,
    minor: u16,
    patch: Option<u16>,
}

impl Version {
    /// Create a bare `major.minor` version
    pub const fn new(major: u16, minor: u16) -> Self {
        Self {
            major,
            minor,
            patch: None,
        }
    }

    /// Create a fully qualified `major.minor.patch` version
    pub const fn with_patch(major: u16, minor: u16, patch: u16) -> Self {
        Self {
            major,
            minor,
            patch: Some(patch),
        }
    }

    /// Parse `"7.4"` or `"7.4.3"`
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let trimmed = input.trim();
        let invalid = || VersionError::Invalid(input.to_string());

        let mut parts = trimmed.split('.');
        let major = parse_component(parts.next()).ok_or_else(invalid)?;
        let minor = parse_component(parts.next()).ok_or_else(invalid)?;
        let patch = match parts.next() {
            Some(p) => Some(parse_component(Some(p)).ok_or_else(invalid)?),
            None => None,
        };

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self {
            major,
            minor,
            patch,
        })
    }

    pub fn major(&self) -> u16 {
        self.major
    }

    pub fn minor(&self) -> u16 {
        self.minor
    }

    pub fn patch(&self) -> Option<u16> {
        self.patch
    }

    /// Compare two versions on the components both of them specify.
    ///
    /// `7.0` vs `7.0.5` is `Equal`; `7.0.2` vs `7.0.5` is `Less`.
    pub fn cmp_loose(&self, other: &Version) -> Ordering {
        let base = (self.major, self.minor).cmp(&(other.major, other.minor));
        if base != Ordering::Equal {
            return base;
        }
        match (self.patch, other.patch) {
            (Some(a), Some(b)) => a.cmp(&b),
            _ => Ordering::Equal,
        }
    }

    fn key(&self) -> (u16, u16, u16) {
        (self.major, self.minor, self.patch.unwrap_or(0))
    }
}

fn parse_component(part: Option<&str>) -> Option<u16> {
    let part = part?;
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for Version {}

impl Hash for Version {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bare_and_patch() {
        assert_eq!(Version::parse("7.4").unwrap(), Version::new(7, 4));
        let v = Version::parse("5.3.29").unwrap();
        assert_eq!(v.major(), 5);
        assert_eq!(v.minor(), 3);
        assert_eq!(v.patch(), Some(29));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for input in ["", "7", "7.", ".4", "7.x", "7.4.1.2", "v7.4", "7.-1"] {
            assert!(Version::parse(input).is_err(), "accepted {:?}", input);
        }
    }

    #[test]
    fn test_ordering_treats_bare_as_zero_patch() {
        assert!(Version::new(5, 3) < Version::new(5, 4));
        assert!(Version::new(5, 10) > Version::new(5, 9));
        assert_eq!(Version::new(7, 0), Version::with_patch(7, 0, 0));
        assert!(Version::new(7, 0) < Version::with_patch(7, 0, 1));
    }

    #[test]
    fn test_loose_comparison_matches_any_patch() {
        let bare = Version::new(7, 0);
        assert_eq!(bare.cmp_loose(&Version::with_patch(7, 0, 33)), Ordering::Equal);
        assert_eq!(Version::with_patch(7, 0, 2).cmp_loose(&bare), Ordering::Equal);
        assert_eq!(
            Version::with_patch(7, 0, 2).cmp_loose(&Version::with_patch(7, 0, 5)),
            Ordering::Less
        );
        assert_eq!(bare.cmp_loose(&Version::new(7, 1)), Ordering::Less);
    }

    #[test]
    fn test_display() {
        assert_eq!(Version::new(8, 1).to_string(), "8.1");
        assert_eq!(Version::with_patch(8, 1, 2).to_string(), "8.1.2");
    }
}
