//! Sniff: built-in interfaces implemented in code targeting older PHP

use crate::check::{introduced_tables, FeatureCheck, Introduction};
use crate::options::SniffOptions;
use crate::registry::Sniff;
use phpcompat_core::dispatch::implemented_interfaces;
use phpcompat_core::{Diagnostic, MessageTemplate, TokenKind, TokenStream};
use std::sync::OnceLock;

const NEW_INTERFACES: &[Introduction] = &[
    ("Countable", "5.0", "5.1"),
    ("OuterIterator", "5.0", "5.1"),
    ("RecursiveIterator", "5.0", "5.1"),
    ("SeekableIterator", "5.0", "5.1"),
    ("Serializable", "5.0", "5.1"),
    ("SplObserver", "5.0", "5.1"),
    ("SplSubject", "5.0", "5.1"),
    ("JsonSerializable", "5.3", "5.4"),
    ("SessionHandlerInterface", "5.3", "5.4"),
    ("DateTimeInterface", "5.4", "5.5"),
    ("SessionIdInterface", "5.5", "5.6"),
    ("Throwable", "5.6", "7.0"),
    ("SessionUpdateTimestampHandlerInterface", "5.6", "7.0"),
    ("Stringable", "7.4", "8.0"),
    ("UnitEnum", "8.0", "8.1"),
    ("BackedEnum", "8.0", "8.1"),
];

/// Named or anonymous classes and enums can implement interfaces
fn is_implementing_declaration(stream: &TokenStream, pos: usize) -> bool {
    matches!(stream.kind_at(pos), Some(TokenKind::Class) | Some(TokenKind::Enum))
}

fn check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| {
        FeatureCheck::new(
            introduced_tables(NEW_INTERFACES),
            MessageTemplate::new("The built-in interface %s"),
            is_implementing_declaration,
        )
    })
}

/// Check `implements` clauses for interfaces newer than the target range
pub fn check_new_interfaces(stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
    let check = check();
    let mut diagnostics = Vec::new();

    for pos in stream.positions_of(&[TokenKind::Class, TokenKind::Enum]) {
        if !(check.filter)(stream, pos) {
            continue;
        }
        for interface in implemented_interfaces(stream, pos) {
            // `Foo\Countable` is a userland interface
            if interface.name.trim_start_matches('\\').contains('\\') {
                continue;
            }
            if let Some(table) = check.index.get(interface.short_name()) {
                diagnostics.extend(check.report(stream, interface.position, table, &options.test_version));
            }
        }
    }

    diagnostics
}

pub struct NewInterfacesSniff;

impl Sniff for NewInterfacesSniff {
    fn name(&self) -> &'static str {
        "new_interfaces"
    }

    fn description(&self) -> &'static str {
        "Detect built-in interfaces not available in the oldest targeted PHP version"
    }

    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
        check_new_interfaces(stream, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::{tokenize, VersionRange};

    fn check_php(source: &str, test_version: &str) -> Vec<Diagnostic> {
        let stream = tokenize(source);
        let options = SniffOptions::new(VersionRange::parse(test_version).unwrap());
        check_new_interfaces(&stream, &options)
    }

    #[test]
    fn test_new_interface() {
        let diagnostics = check_php("<?php class Name implements Stringable { }", "7.4");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "The built-in interface Stringable is not present in PHP version 7.4 or earlier"
        );
        assert_eq!(diagnostics[0].code, "stringableFound");
    }

    #[test]
    fn test_multiple_and_global_names() {
        let source = "<?php class Item extends Base implements \\JsonSerializable, Countable, \\Throwable {}";
        let diagnostics = check_php(source, "5.3");
        // JsonSerializable and Throwable; Countable exists since 5.1
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics[0].message.contains("JsonSerializable"));
        assert!(diagnostics[1].message.contains("Throwable"));
    }

    #[test]
    fn test_anonymous_class_and_enum() {
        let source = "<?php $o = new class implements Stringable {}; enum Suit: string implements UnitEnum {}";
        let diagnostics = check_php(source, "7.0");
        assert_eq!(diagnostics.len(), 2);
    }

    #[test]
    fn test_skip_namespaced_interface() {
        assert!(check_php("<?php class A implements My\\Stringable {}", "7.0").is_empty());
    }

    #[test]
    fn test_skip_supported_range() {
        assert!(check_php("<?php class A implements JsonSerializable {}", "5.4-").is_empty());
    }
}
