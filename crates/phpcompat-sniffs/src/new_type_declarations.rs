//! Sniff: parameter and return type declarations newer than the targeted
//! PHP versions

use crate::check::{introduced_tables, FeatureCheck, Introduction};
use crate::options::SniffOptions;
use crate::registry::Sniff;
use phpcompat_core::dispatch::{enclosing_scope_of, function_parameters, return_type, ScopeKind, TypeHint};
use phpcompat_core::{Diagnostic, MessageTemplate, TokenKind, TokenStream, VersionRange};
use std::sync::OnceLock;

const PARAMETER_TYPES: &[Introduction] = &[
    ("array", "5.0", "5.1"),
    ("self", "5.1", "5.2"),
    ("callable", "5.3", "5.4"),
    ("bool", "5.6", "7.0"),
    ("int", "5.6", "7.0"),
    ("float", "5.6", "7.0"),
    ("string", "5.6", "7.0"),
    ("iterable", "7.0", "7.1"),
    ("object", "7.1", "7.2"),
    ("mixed", "7.4", "8.0"),
    ("false", "7.4", "8.0"),
    ("null", "7.4", "8.0"),
    ("true", "8.1", "8.2"),
];

const RETURN_TYPES: &[Introduction] = &[
    ("array", "5.6", "7.0"),
    ("callable", "5.6", "7.0"),
    ("bool", "5.6", "7.0"),
    ("int", "5.6", "7.0"),
    ("float", "5.6", "7.0"),
    ("string", "5.6", "7.0"),
    ("self", "5.6", "7.0"),
    ("parent", "5.6", "7.0"),
    ("void", "7.0", "7.1"),
    ("iterable", "7.0", "7.1"),
    ("object", "7.1", "7.2"),
    ("static", "7.4", "8.0"),
    ("mixed", "7.4", "8.0"),
    ("false", "7.4", "8.0"),
    ("null", "7.4", "8.0"),
    ("never", "8.0", "8.1"),
    ("true", "8.1", "8.2"),
];

fn is_function_keyword(stream: &TokenStream, pos: usize) -> bool {
    matches!(stream.kind_at(pos), Some(TokenKind::Function) | Some(TokenKind::Fn))
}

fn parameter_check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| {
        FeatureCheck::new(
            introduced_tables(PARAMETER_TYPES),
            MessageTemplate::new("'%s' type declaration"),
            is_function_keyword,
        )
    })
}

fn return_check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| {
        FeatureCheck::new(
            introduced_tables(RETURN_TYPES),
            MessageTemplate::new("%s return type"),
            is_function_keyword,
        )
    })
}

fn report_hint(
    check: &FeatureCheck,
    stream: &TokenStream,
    hint: &TypeHint,
    range: &VersionRange,
    in_class: bool,
    diagnostics: &mut Vec<Diagnostic>,
) {
    for name in hint.names() {
        // `self` and `parent` outside a class do not compile on any version
        if !in_class && matches!(name.as_str(), "self" | "parent") {
            continue;
        }
        if let Some(table) = check.index.get(&name) {
            diagnostics.extend(check.report(stream, hint.start, table, range));
        }
    }
}

/// Check function signatures for type declarations newer than the target range
pub fn check_new_type_declarations(stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
    let params = parameter_check();
    let returns = return_check();
    let range = &options.test_version;
    let mut diagnostics = Vec::new();

    for pos in stream.positions_of(&[TokenKind::Function, TokenKind::Fn]) {
        if !(params.filter)(stream, pos) {
            continue;
        }
        let in_class = enclosing_scope_of(stream, pos, ScopeKind::OO).is_some();

        for param in function_parameters(stream, pos).unwrap_or_default() {
            if let Some(hint) = &param.type_hint {
                report_hint(params, stream, hint, range, in_class, &mut diagnostics);
            }
        }

        if let Some(hint) = return_type(stream, pos) {
            report_hint(returns, stream, &hint, range, in_class, &mut diagnostics);
        }
    }

    diagnostics
}

pub struct NewTypeDeclarationsSniff;

impl Sniff for NewTypeDeclarationsSniff {
    fn name(&self) -> &'static str {
        "new_type_declarations"
    }

    fn description(&self) -> &'static str {
        "Detect parameter and return types not available in the oldest targeted PHP version"
    }

    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
        check_new_type_declarations(stream, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::tokenize;

    fn check_php(source: &str, test_version: &str) -> Vec<Diagnostic> {
        let stream = tokenize(source);
        let options = SniffOptions::new(VersionRange::parse(test_version).unwrap());
        check_new_type_declarations(&stream, &options)
    }

    // ==================== Parameters ====================

    #[test]
    fn test_scalar_parameter_type() {
        let diagnostics = check_php("<?php function f(int $a, $b) {}", "5.6");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "'int' type declaration is not present in PHP version 5.6 or earlier"
        );
    }

    #[test]
    fn test_union_reports_each_member() {
        let diagnostics = check_php("<?php function f(string|false $a) {}", "5.6");
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(messages.len(), 2);
        assert!(messages[0].starts_with("'string'"));
        assert!(messages[1].starts_with("'false'"));
    }

    #[test]
    fn test_self_outside_class_is_ignored() {
        assert!(check_php("<?php function f(self $a): parent {}", "5.1").is_empty());

        let source = "<?php class A { function f(self $a): parent {} }";
        let codes: Vec<String> = check_php(source, "5.1").into_iter().map(|d| d.code).collect();
        assert_eq!(codes, vec!["selfFound", "parentFound"]);
    }

    #[test]
    fn test_intersection_type_members_are_checked() {
        let diagnostics = check_php("<?php function f(Countable&iterable $a) {}", "7.0");
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].message.starts_with("'iterable'"));
    }

    #[test]
    fn test_class_types_are_ignored() {
        assert!(check_php("<?php function f(Foo $a, \\Bar\\Baz $b) {}", "5.2").is_empty());
    }

    // ==================== Return types ====================

    #[test]
    fn test_return_types() {
        let source = "<?php class A { public function a(): void {} public function b(): ?static {} }";
        let diagnostics = check_php(source, "7.0-");
        let messages: Vec<&str> = diagnostics.iter().map(|d| d.message.as_str()).collect();
        assert_eq!(
            messages,
            vec![
                "void return type is not present in PHP version 7.0 or earlier",
                "static return type is not present in PHP version 7.4 or earlier",
            ]
        );
    }

    #[test]
    fn test_closure_and_arrow_function() {
        let source = "<?php $a = function (iterable $x): iterable { return $x; }; $b = fn(object $o): object => $o;";
        let diagnostics = check_php(source, "7.0");
        // iterable param + return, object param + return
        assert_eq!(diagnostics.len(), 4);
    }

    #[test]
    fn test_supported_range_is_clean() {
        assert!(check_php("<?php function f(int $a): string {}", "7.0-").is_empty());
    }

    #[test]
    fn test_unfinished_signature_is_skipped() {
        assert!(check_php("<?php function f(int $a", "5.6").is_empty());
    }
}
