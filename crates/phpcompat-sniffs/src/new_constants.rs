//! Sniff: global constants newer than the targeted PHP versions

use crate::check::{dispatch, introduced_tables, FeatureCheck, Introduction};
use crate::options::SniffOptions;
use crate::registry::Sniff;
use phpcompat_core::dispatch::is_global_constant_use;
use phpcompat_core::{Diagnostic, MessageTemplate, TokenKind, TokenStream};
use std::sync::OnceLock;

const NEW_CONSTANTS: &[Introduction] = &[
    ("PHP_VERSION_ID", "5.2.6", "5.2.7"),
    ("PHP_MAJOR_VERSION", "5.2.6", "5.2.7"),
    ("PHP_MINOR_VERSION", "5.2.6", "5.2.7"),
    ("PHP_RELEASE_VERSION", "5.2.6", "5.2.7"),
    ("PHP_EXTRA_VERSION", "5.2.6", "5.2.7"),
    ("E_DEPRECATED", "5.2", "5.3"),
    ("E_USER_DEPRECATED", "5.2", "5.3"),
    ("PHP_MAXPATHLEN", "5.3.0", "5.3.1"),
    ("ENT_HTML5", "5.3", "5.4"),
    ("ENT_SUBSTITUTE", "5.3", "5.4"),
    ("JSON_PRETTY_PRINT", "5.3", "5.4"),
    ("JSON_UNESCAPED_SLASHES", "5.3", "5.4"),
    ("JSON_UNESCAPED_UNICODE", "5.3", "5.4"),
    ("PASSWORD_BCRYPT", "5.4", "5.5"),
    ("PASSWORD_DEFAULT", "5.4", "5.5"),
    ("JSON_PRESERVE_ZERO_FRACTION", "5.6.5", "5.6.6"),
    ("PHP_INT_MIN", "5.6", "7.0"),
    ("PREG_JIT_STACKLIMIT_ERROR", "5.6", "7.0"),
    ("PHP_FD_SETSIZE", "7.0", "7.1"),
    ("PHP_OS_FAMILY", "7.1", "7.2"),
    ("PHP_FLOAT_EPSILON", "7.1", "7.2"),
    ("PHP_FLOAT_MAX", "7.1", "7.2"),
    ("PHP_FLOAT_MIN", "7.1", "7.2"),
    ("PHP_FLOAT_DIG", "7.1", "7.2"),
    ("PASSWORD_ARGON2I", "7.1", "7.2"),
    ("JSON_INVALID_UTF8_IGNORE", "7.1", "7.2"),
    ("JSON_INVALID_UTF8_SUBSTITUTE", "7.1", "7.2"),
    ("JSON_THROW_ON_ERROR", "7.2", "7.3"),
    ("PASSWORD_ARGON2ID", "7.2", "7.3"),
    ("MB_CASE_FOLD", "7.2", "7.3"),
    ("PHP_WINDOWS_EVENT_CTRL_C", "7.3", "7.4"),
    ("MB_ONIGURUMA_VERSION", "7.3", "7.4"),
    ("FILTER_FLAG_GLOBAL_RANGE", "8.1", "8.2"),
];

fn check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| {
        FeatureCheck::new(
            introduced_tables(NEW_CONSTANTS),
            MessageTemplate::new("The constant \"%s\""),
            is_global_constant_use,
        )
    })
}

/// Check a token stream for constants newer than the target range
pub fn check_new_constants(stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
    dispatch(check(), stream, &options.test_version, &[TokenKind::String])
}

pub struct NewConstantsSniff;

impl Sniff for NewConstantsSniff {
    fn name(&self) -> &'static str {
        "new_constants"
    }

    fn description(&self) -> &'static str {
        "Detect global constants not available in the oldest targeted PHP version"
    }

    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
        check_new_constants(stream, options)
    }
}
