//! Sniff: functions called in code targeting PHP versions that predate them

use crate::check::{dispatch, introduced_tables, FeatureCheck, Introduction};
use crate::options::SniffOptions;
use crate::registry::Sniff;
use phpcompat_core::dispatch::is_global_function_call;
use phpcompat_core::{Diagnostic, MessageTemplate, TokenKind, TokenStream};
use std::sync::OnceLock;

const NEW_FUNCTIONS: &[Introduction] = &[
    ("array_replace", "5.2", "5.3"),
    ("array_replace_recursive", "5.2", "5.3"),
    ("lcfirst", "5.2", "5.3"),
    ("gc_enable", "5.2", "5.3"),
    ("get_called_class", "5.2", "5.3"),
    ("hex2bin", "5.3", "5.4"),
    ("http_response_code", "5.3", "5.4"),
    ("session_status", "5.3", "5.4"),
    ("class_uses", "5.3", "5.4"),
    ("array_column", "5.4", "5.5"),
    ("boolval", "5.4", "5.5"),
    ("json_last_error_msg", "5.4", "5.5"),
    ("password_hash", "5.4", "5.5"),
    ("password_verify", "5.4", "5.5"),
    ("password_needs_rehash", "5.4", "5.5"),
    ("hash_pbkdf2", "5.4", "5.5"),
    ("hash_equals", "5.5", "5.6"),
    ("gmp_root", "5.5", "5.6"),
    ("random_bytes", "5.6", "7.0"),
    ("random_int", "5.6", "7.0"),
    ("intdiv", "5.6", "7.0"),
    ("error_clear_last", "5.6", "7.0"),
    ("preg_replace_callback_array", "5.6", "7.0"),
    ("is_iterable", "7.0", "7.1"),
    ("curl_multi_errno", "7.0", "7.1"),
    ("spl_object_id", "7.1", "7.2"),
    ("mb_scrub", "7.1", "7.2"),
    ("stream_isatty", "7.1", "7.2"),
    ("array_key_first", "7.2", "7.3"),
    ("array_key_last", "7.2", "7.3"),
    ("is_countable", "7.2", "7.3"),
    ("hrtime", "7.2", "7.3"),
    ("mb_str_split", "7.3", "7.4"),
    ("get_mangled_object_vars", "7.3", "7.4"),
    ("password_algos", "7.3", "7.4"),
    ("str_contains", "7.4", "8.0"),
    ("str_starts_with", "7.4", "8.0"),
    ("str_ends_with", "7.4", "8.0"),
    ("fdiv", "7.4", "8.0"),
    ("get_debug_type", "7.4", "8.0"),
    ("get_resource_id", "7.4", "8.0"),
    ("array_is_list", "8.0", "8.1"),
    ("enum_exists", "8.0", "8.1"),
    ("fsync", "8.0", "8.1"),
    ("ini_parse_quantity", "8.1", "8.2"),
    ("json_validate", "8.2", "8.3"),
    ("mb_str_pad", "8.2", "8.3"),
    ("array_find", "8.3", "8.4"),
    ("array_any", "8.3", "8.4"),
    ("array_all", "8.3", "8.4"),
];

fn check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| {
        FeatureCheck::new(
            introduced_tables(NEW_FUNCTIONS),
            MessageTemplate::new("The function %s()"),
            is_global_function_call,
        )
    })
}

/// Check a token stream for calls to functions newer than the target range
pub fn check_new_functions(stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
    dispatch(check(), stream, &options.test_version, &[TokenKind::String])
}

pub struct NewFunctionsSniff;

impl Sniff for NewFunctionsSniff {
    fn name(&self) -> &'static str {
        "new_functions"
    }

    fn description(&self) -> &'static str {
        "Detect calls to functions not available in the oldest targeted PHP version"
    }

    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
        check_new_functions(stream, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::{tokenize, Severity, VersionRange};

    fn check_php(source: &str, test_version: &str) -> Vec<Diagnostic> {
        let stream = tokenize(source);
        let options = SniffOptions::new(VersionRange::parse(test_version).unwrap());
        check_new_functions(&stream, &options)
    }

    // ==================== Detection ====================

    #[test]
    fn test_array_column_before_introduction() {
        let diagnostics = check_php("<?php $ids = array_column($rows, 'id');", "5.3-5.4");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(diagnostics[0].code, "array_columnFound");
        assert_eq!(
            diagnostics[0].message,
            "The function array_column() is not present in PHP version 5.4 or earlier"
        );
    }

    #[test]
    fn test_range_still_including_old_version() {
        assert_eq!(check_php("<?php array_column($rows, 'id');", "5.4-5.6").len(), 1);
    }

    #[test]
    fn test_case_insensitive_and_fully_qualified() {
        assert_eq!(check_php("<?php \\Str_Contains($a, 'b');", "7.4").len(), 1);
    }

    #[test]
    fn test_call_inside_method() {
        let source = r#"<?php
class Foo {
    public function bar($x) {
        return intdiv($x, 2);
    }
}
"#;
        let diagnostics = check_php(source, "5.6");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].position.line, 4);
    }

    // ==================== Skip Cases ====================

    #[test]
    fn test_supported_range() {
        assert!(check_php("<?php array_column($rows, 'id');", "5.5-").is_empty());
    }

    #[test]
    fn test_skip_declarations_methods_and_namespaced_calls() {
        let source = r#"<?php
function str_contains($h, $n) {}
$obj->str_contains('a');
Str::str_contains('a');
Polyfill\str_contains('a', 'b');
"#;
        assert!(check_php(source, "7.0").is_empty());
    }

    #[test]
    fn test_skip_unknown_function() {
        assert!(check_php("<?php my_array_column($rows);", "5.3").is_empty());
    }

    #[test]
    fn test_unfinished_call_is_skipped() {
        assert!(check_php("<?php array_column($rows,", "5.3").is_empty());
    }
}
