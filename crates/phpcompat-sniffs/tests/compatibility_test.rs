//! Integration tests running the full sniff registry over PHP snippets

use phpcompat_core::{tokenize, Diagnostic, Severity, VersionRange};
use phpcompat_sniffs::{OptionSettings, SniffOptions, SniffRegistry};
use std::collections::HashSet;

fn all_sniffs(registry: &SniffRegistry) -> HashSet<String> {
    registry.all_names().into_iter().map(String::from).collect()
}

fn scan(source: &str, test_version: &str) -> Vec<Diagnostic> {
    let registry = SniffRegistry::new();
    let stream = tokenize(source);
    let options = SniffOptions::new(VersionRange::parse(test_version).unwrap());
    registry.check_all(&stream, &options, &all_sniffs(&registry))
}

const MODERN_FILE: &str = r#"<?php
declare(strict_types=1);

namespace App;

final class Formatter implements \Stringable
{
    public function __construct(private string $value) {}

    public function format(int|string $input): string
    {
        return match (true) {
            str_contains($this->value, '%') => sprintf($this->value, $input),
            default => $this->value,
        };
    }

    public function __toString(): string
    {
        return $this->format(0);
    }
}
"#;

#[test]
fn test_new_function_across_ranges() {
    let source = "<?php\n$ids = array_column($rows, 'id');\n";

    let diagnostics = scan(source, "5.3-5.4");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(diagnostics[0].position.line, 2);

    assert!(scan(source, "5.5-").is_empty());
    assert_eq!(scan(source, "5.4-5.6").len(), 1);
}

#[test]
fn test_deprecated_and_removed_in_one_message() {
    let diagnostics = scan("<?php $f = create_function('$a', 'return $a;');", "7.0-");
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].severity, Severity::Error);
    assert_eq!(
        diagnostics[0].message,
        "Function create_function() is deprecated since PHP 7.2 and removed since PHP 8.0; Use an anonymous function instead"
    );
}

#[test]
fn test_function_whitelist_from_settings() {
    let settings: OptionSettings = toml::from_str(r#"function_whitelist = "mysql_to_rfc3339""#).unwrap();
    let options = SniffOptions::from_settings(Some("5.5-"), &settings).unwrap();
    let registry = SniffRegistry::new();
    let enabled: HashSet<String> = ["removed_extensions".to_string()].into_iter().collect();

    let stream = tokenize("<?php\n$d = mysql_to_rfc3339($t);\n$r = mysql_query($q);\n");
    let diagnostics = registry.check_all(&stream, &options, &enabled);

    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].position.line, 3);
    assert_eq!(
        diagnostics[0].message,
        "Extension 'mysql' is deprecated since PHP 5.5 and removed since PHP 7.0; Use mysqli instead"
    );
}

#[test]
fn test_modern_file_is_clean_for_modern_range() {
    assert!(scan(MODERN_FILE, "8.0-").is_empty());
}

#[test]
fn test_modern_file_against_old_range() {
    let diagnostics = scan(MODERN_FILE, "7.0");
    let codes: Vec<&str> = diagnostics.iter().map(|d| d.code.as_str()).collect();
    assert!(codes.contains(&"matchFound"));
    assert!(codes.contains(&"str_containsFound"));
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Error));

    let mut sorted = diagnostics.clone();
    sorted.sort_by(|a, b| a.position.cmp(&b.position));
    assert_eq!(sorted, diagnostics);
}

#[test]
fn test_unset_test_version_checks_every_version() {
    let registry = SniffRegistry::new();
    let stream = tokenize("<?php\narray_column($r, 'id');\neach($arr);\n");
    let diagnostics = registry.check_all(&stream, &SniffOptions::default(), &all_sniffs(&registry));

    let lines: Vec<usize> = diagnostics.iter().map(|d| d.position.line).collect();
    assert_eq!(lines, vec![2, 3]);
    assert!(diagnostics.iter().all(|d| d.severity == Severity::Error));
}

#[test]
fn test_malformed_sources_fail_open() {
    let sources = [
        "<?php class { function ( array_column(",
        "<?php declare(strict_types=",
        "<?php function f(int $a): ",
        "<?php ini_set(",
        "<?php $x = <<<EOT\nunterminated",
        "<?php } } ) ] enum",
        "",
    ];
    for source in sources {
        for range in ["5.3", "7.0-", "8.1-"] {
            let stream = tokenize(source);
            let diagnostics = scan(source, range);
            assert!(diagnostics.iter().all(|d| d.position.token < stream.len().max(1)));
        }
    }
}
