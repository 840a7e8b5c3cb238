//! Support evaluation: a feature table intersected with the target range
//!
//! [`evaluate`] walks a table's facts once and records which transition
//! points the configured range reaches:
//!
//! - `Absent` facts are checked with [`VersionRange::supports_below`]; the
//!   latest one in reach becomes `not_in_version`.
//! - `Deprecated` / `Removed` facts are checked with
//!   [`VersionRange::supports_above`]; the earliest one of each kind in reach
//!   is kept.
//! - `Conditional` facts are checked like `Absent` ones but only ever warn.
//!
//! The result is pure data; turning it into messages is the job of
//! [`crate::diagnostic`].

use crate::diagnostic::Severity;
use crate::feature::{FeatureTable, Status};
use crate::range::VersionRange;
use crate::version::Version;

/// Which transition points of a feature the configured range reaches
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Diagnosis {
    /// Latest version lacking the feature that the range still covers
    pub not_in_version: Option<Version>,
    /// Version in which the feature needs a build option, with that option
    pub conditional: Option<(Version, &'static str)>,
    /// First deprecation point the range reaches
    pub deprecated: Option<Version>,
    /// First removal point the range reaches
    pub removed: Option<Version>,
}

impl Diagnosis {
    /// Is anything reportable?
    pub fn is_empty(&self) -> bool {
        self.not_in_version.is_none()
            && self.conditional.is_none()
            && self.deprecated.is_none()
            && self.removed.is_none()
    }

    /// Does the diagnosis concern a feature introduced later than the range?
    pub fn is_introduction(&self) -> bool {
        self.not_in_version.is_some()
    }

    /// Does the diagnosis concern a deprecated or removed feature?
    pub fn is_withdrawal(&self) -> bool {
        self.deprecated.is_some() || self.removed.is_some()
    }

    /// Severity of the introduction part, if any
    pub fn introduction_severity(&self) -> Option<Severity> {
        if self.not_in_version.is_some() {
            Some(Severity::Error)
        } else if self.conditional.is_some() {
            Some(Severity::Warning)
        } else {
            None
        }
    }

    /// Severity of the deprecation/removal part, if any
    pub fn withdrawal_severity(&self) -> Option<Severity> {
        if self.removed.is_some() {
            Some(Severity::Error)
        } else if self.deprecated.is_some() {
            Some(Severity::Warning)
        } else {
            None
        }
    }

    /// The worst severity across all parts
    pub fn severity(&self) -> Option<Severity> {
        match (self.introduction_severity(), self.withdrawal_severity()) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

/// Evaluate a feature table against the target range
///
/// Returns `None` when the feature is fully supported across the range.
pub fn evaluate(table: &FeatureTable, range: &VersionRange) -> Option<Diagnosis> {
    let mut diagnosis = Diagnosis::default();

    for fact in table.facts() {
        match fact.status {
            Status::Absent => {
                if range.supports_below(fact.version) {
                    diagnosis.not_in_version = Some(fact.version);
                }
            }
            Status::Conditional(condition) => {
                if range.supports_below(fact.version) {
                    diagnosis.conditional = Some((fact.version, condition));
                }
            }
            Status::Deprecated => {
                if diagnosis.deprecated.is_none() && range.supports_above(fact.version) {
                    diagnosis.deprecated = Some(fact.version);
                }
            }
            Status::Removed => {
                if diagnosis.removed.is_none() && range.supports_above(fact.version) {
                    diagnosis.removed = Some(fact.version);
                }
            }
            Status::Present => {}
        }
    }

    // An outright "not present" error already covers the build-option caveat
    if diagnosis.not_in_version.is_some() {
        diagnosis.conditional = None;
    }

    if diagnosis.is_empty() {
        None
    } else {
        Some(diagnosis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(spec: &str) -> VersionRange {
        VersionRange::parse(spec).unwrap()
    }

    fn deprecated_then_removed() -> FeatureTable {
        FeatureTable::builder("mysql_connect")
            .deprecated("5.5")
            .removed("7.0")
            .build()
    }

    fn array_column() -> FeatureTable {
        FeatureTable::builder("array_column")
            .absent("5.4")
            .present("5.5")
            .build()
    }

    #[test]
    fn test_boundary_inclusivity() {
        let table = deprecated_then_removed();

        let d = evaluate(&table, &range("5.5")).unwrap();
        assert_eq!(d.deprecated, Some(Version::new(5, 5)));
        assert_eq!(d.removed, None);
        assert_eq!(d.severity(), Some(Severity::Warning));

        let d = evaluate(&table, &range("7.0")).unwrap();
        assert_eq!(d.deprecated, Some(Version::new(5, 5)));
        assert_eq!(d.removed, Some(Version::new(7, 0)));
        assert_eq!(d.severity(), Some(Severity::Error));

        assert_eq!(evaluate(&table, &range("5.4")), None);
    }

    #[test]
    fn test_removal_only_monotonicity() {
        let table = FeatureTable::builder("ereg").removed("7.0").build();

        for spec in ["7.0-", "7.1-8.3", "8.0"] {
            let d = evaluate(&table, &range(spec)).unwrap();
            assert_eq!(d.removed, Some(Version::new(7, 0)), "{}", spec);
        }
        for spec in ["5.6", "-5.6", "5.3-5.6"] {
            assert_eq!(evaluate(&table, &range(spec)), None, "{}", spec);
        }
    }

    #[test]
    fn test_range_above_removal_with_earlier_deprecation() {
        let table = deprecated_then_removed();
        // Fully below the removal point but reaching the deprecation
        let d = evaluate(&table, &range("5.3-5.6")).unwrap();
        assert_eq!(d.deprecated, Some(Version::new(5, 5)));
        assert!(d.removed.is_none());
    }

    #[test]
    fn test_introduction_scenario() {
        let table = array_column();

        let d = evaluate(&table, &range("5.3-5.4")).unwrap();
        assert_eq!(d.not_in_version, Some(Version::new(5, 4)));
        assert_eq!(d.severity(), Some(Severity::Error));

        assert_eq!(evaluate(&table, &range("5.5-")), None);

        let d = evaluate(&table, &range("5.4-5.6")).unwrap();
        assert_eq!(d.not_in_version, Some(Version::new(5, 4)));
    }

    #[test]
    fn test_latest_absent_version_wins() {
        let table = FeatureTable::builder("ldap_exop")
            .absent("7.1")
            .absent("7.2")
            .present("7.3")
            .build();
        let d = evaluate(&table, &range("7.0-")).unwrap();
        assert_eq!(d.not_in_version, Some(Version::new(7, 2)));
    }

    #[test]
    fn test_introduction_and_removal_both_reported() {
        let table = FeatureTable::builder("short_lived")
            .absent("5.2")
            .present("5.3")
            .deprecated("7.4")
            .removed("8.0")
            .build();

        let d = evaluate(&table, &range("5.2-8.0")).unwrap();
        assert!(d.is_introduction());
        assert!(d.is_withdrawal());
        assert_eq!(d.introduction_severity(), Some(Severity::Error));
        assert_eq!(d.withdrawal_severity(), Some(Severity::Error));
    }

    #[test]
    fn test_conditional_is_a_warning() {
        let table = FeatureTable::builder("encoding")
            .absent("5.2")
            .conditional("5.3", "--enable-zend-multibyte")
            .present("5.4")
            .build();

        let d = evaluate(&table, &range("5.3")).unwrap();
        assert_eq!(d.conditional, Some((Version::new(5, 3), "--enable-zend-multibyte")));
        assert_eq!(d.severity(), Some(Severity::Warning));

        // The absence error takes over when the range reaches further back
        let d = evaluate(&table, &range("5.1-5.4")).unwrap();
        assert_eq!(d.conditional, None);
        assert_eq!(d.severity(), Some(Severity::Error));

        assert_eq!(evaluate(&table, &range("5.4-")), None);
    }

    #[test]
    fn test_out_of_order_input_is_tolerated() {
        let table = FeatureTable::builder("each")
            .removed("8.0")
            .deprecated("7.2")
            .build();
        let d = evaluate(&table, &range("8.0-")).unwrap();
        assert_eq!(d.deprecated, Some(Version::new(7, 2)));
        assert_eq!(d.removed, Some(Version::new(8, 0)));
    }

    #[test]
    fn test_evaluate_is_pure() {
        let table = deprecated_then_removed();
        let r = range("5.6-7.4");
        assert_eq!(evaluate(&table, &r), evaluate(&table, &r));
    }

    #[test]
    fn test_unbounded_range_reaches_every_transition() {
        let d = evaluate(&array_column(), &VersionRange::unbounded()).unwrap();
        assert!(d.is_introduction());
        let d = evaluate(&deprecated_then_removed(), &VersionRange::unbounded()).unwrap();
        assert_eq!(d.removed, Some(Version::new(7, 0)));
    }
}
