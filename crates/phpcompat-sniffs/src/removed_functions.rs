//! Sniff: calls to deprecated or removed functions

use crate::check::{dispatch, withdrawn_tables, FeatureCheck, Withdrawal};
use crate::options::SniffOptions;
use crate::registry::Sniff;
use phpcompat_core::dispatch::is_global_function_call;
use phpcompat_core::{Diagnostic, MessageTemplate, TokenKind, TokenStream};
use std::sync::OnceLock;

const REMOVED_FUNCTIONS: &[Withdrawal] = &[
    ("call_user_method", Some("4.1"), Some("7.0"), Some("call_user_func()")),
    ("call_user_method_array", Some("4.1"), Some("7.0"), Some("call_user_func_array()")),
    ("define_syslog_variables", Some("5.3"), Some("5.4"), None),
    ("session_register", Some("5.3"), Some("5.4"), Some("$_SESSION")),
    ("session_unregister", Some("5.3"), Some("5.4"), Some("$_SESSION")),
    ("session_is_registered", Some("5.3"), Some("5.4"), Some("$_SESSION")),
    ("ereg", Some("5.3"), Some("7.0"), Some("preg_match()")),
    ("eregi", Some("5.3"), Some("7.0"), Some("preg_match()")),
    ("ereg_replace", Some("5.3"), Some("7.0"), Some("preg_replace()")),
    ("eregi_replace", Some("5.3"), Some("7.0"), Some("preg_replace()")),
    ("split", Some("5.3"), Some("7.0"), Some("preg_split()")),
    ("spliti", Some("5.3"), Some("7.0"), Some("preg_split()")),
    ("sql_regcase", Some("5.3"), Some("7.0"), None),
    ("set_magic_quotes_runtime", Some("5.3"), Some("7.0"), None),
    ("magic_quotes_runtime", Some("5.3"), Some("7.0"), None),
    ("set_socket_blocking", Some("5.4"), Some("7.0"), Some("stream_set_blocking()")),
    ("mcrypt_generic_end", Some("5.4"), Some("7.0"), Some("mcrypt_generic_deinit()")),
    ("create_function", Some("7.2"), Some("8.0"), Some("an anonymous function")),
    ("each", Some("7.2"), Some("8.0"), Some("a foreach loop or ArrayIterator")),
    ("read_exif_data", Some("7.2"), Some("8.0"), Some("exif_read_data()")),
    ("gmp_random", Some("7.2"), Some("8.0"), Some("gmp_random_bits() or gmp_random_range()")),
    ("png2wbmp", Some("7.2"), Some("8.0"), Some("imagecreatefrompng() and imagewbmp()")),
    ("jpeg2wbmp", Some("7.2"), Some("8.0"), Some("imagecreatefromjpeg() and imagewbmp()")),
    ("fgetss", Some("7.3"), Some("8.0"), None),
    ("image2wbmp", Some("7.3"), Some("8.0"), Some("imagewbmp()")),
    ("money_format", Some("7.4"), Some("8.0"), Some("NumberFormatter::formatCurrency()")),
    ("ezmlm_hash", Some("7.4"), Some("8.0"), None),
    ("restore_include_path", Some("7.4"), Some("8.0"), Some("ini_restore('include_path')")),
    ("get_magic_quotes_gpc", Some("7.4"), Some("8.0"), None),
    ("get_magic_quotes_runtime", Some("7.4"), Some("8.0"), None),
    ("hebrevc", Some("7.4"), Some("8.0"), None),
    ("convert_cyr_string", Some("7.4"), Some("8.0"), Some("mb_convert_encoding(), iconv() or UConverter")),
    ("strftime", Some("8.1"), None, Some("date() or IntlDateFormatter::format()")),
    ("gmstrftime", Some("8.1"), None, Some("date() or IntlDateFormatter::format()")),
    ("date_sunrise", Some("8.1"), None, Some("date_sun_info()")),
    ("date_sunset", Some("8.1"), None, Some("date_sun_info()")),
    ("mhash", Some("8.1"), None, Some("the hash_*() functions")),
    ("odbc_result_all", Some("8.1"), None, None),
    ("utf8_encode", Some("8.2"), None, Some("mb_convert_encoding()")),
    ("utf8_decode", Some("8.2"), None, Some("mb_convert_encoding()")),
];

fn check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| {
        FeatureCheck::new(
            withdrawn_tables(REMOVED_FUNCTIONS),
            MessageTemplate::new("Function %s()"),
            is_global_function_call,
        )
    })
}

/// Check a token stream for calls to deprecated or removed functions
pub fn check_removed_functions(stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
    dispatch(check(), stream, &options.test_version, &[TokenKind::String])
}

pub struct RemovedFunctionsSniff;

impl Sniff for RemovedFunctionsSniff {
    fn name(&self) -> &'static str {
        "removed_functions"
    }

    fn description(&self) -> &'static str {
        "Detect calls to functions deprecated or removed in the targeted PHP versions"
    }

    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
        check_removed_functions(stream, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::{tokenize, Severity, VersionRange};

    fn check_php(source: &str, test_version: &str) -> Vec<Diagnostic> {
        let stream = tokenize(source);
        let options = SniffOptions::new(VersionRange::parse(test_version).unwrap());
        check_removed_functions(&stream, &options)
    }

    #[test]
    fn test_deprecated_only_is_warning() {
        let diagnostics = check_php("<?php each($arr);", "7.2");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(
            diagnostics[0].message,
            "Function each() is deprecated since PHP 7.2; Use a foreach loop or ArrayIterator instead"
        );
        assert_eq!(diagnostics[0].code, "eachDeprecated");
    }

    #[test]
    fn test_deprecated_and_removed_chain() {
        let diagnostics = check_php("<?php $r = ereg('^a', $s);", "5.6-7.1");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(
            diagnostics[0].message,
            "Function ereg() is deprecated since PHP 5.3 and removed since PHP 7.0; Use preg_match() instead"
        );
        assert_eq!(diagnostics[0].code, "eregDeprecatedRemoved");
    }

    #[test]
    fn test_without_alternative() {
        let diagnostics = check_php("<?php fgetss($fp);", "8.0");
        assert_eq!(
            diagnostics[0].message,
            "Function fgetss() is deprecated since PHP 7.3 and removed since PHP 8.0"
        );
    }

    #[test]
    fn test_range_before_deprecation() {
        assert!(check_php("<?php create_function('$a', 'return $a;');", "5.3-7.1").is_empty());
    }

    #[test]
    fn test_skip_method_named_like_removed_function() {
        assert!(check_php("<?php $list->each(function ($x) {}); Collection::each($x);", "8.0").is_empty());
    }

    #[test]
    fn test_skip_user_declaration() {
        assert!(check_php("<?php if (!function_exists('each')) { function each(&$a) {} }", "8.0").is_empty());
    }
}
