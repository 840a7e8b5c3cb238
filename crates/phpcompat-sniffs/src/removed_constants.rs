//! Sniff: global constants deprecated or removed in the targeted PHP versions

use crate::check::{dispatch, withdrawn_tables, FeatureCheck, Withdrawal};
use crate::options::SniffOptions;
use crate::registry::Sniff;
use phpcompat_core::dispatch::is_global_constant_use;
use phpcompat_core::{Diagnostic, MessageTemplate, TokenKind, TokenStream};
use std::sync::OnceLock;

const REMOVED_CONSTANTS: &[Withdrawal] = &[
    ("CURLOPT_CLOSEPOLICY", None, Some("5.6"), None),
    ("CURLCLOSEPOLICY_LEAST_RECENTLY_USED", None, Some("5.6"), None),
    ("CURLCLOSEPOLICY_OLDEST", None, Some("5.6"), None),
    ("T_CHARACTER", None, Some("7.0"), None),
    ("MB_OVERLOAD_MAIL", Some("7.2"), Some("8.0"), None),
    ("MB_OVERLOAD_STRING", Some("7.2"), Some("8.0"), None),
    ("MB_OVERLOAD_REGEX", Some("7.2"), Some("8.0"), None),
    ("INTL_IDNA_VARIANT_2003", Some("7.2"), Some("8.0"), Some("INTL_IDNA_VARIANT_UTS46")),
    ("FILTER_FLAG_SCHEME_REQUIRED", Some("7.3"), Some("8.0"), None),
    ("FILTER_FLAG_HOST_REQUIRED", Some("7.3"), Some("8.0"), None),
    ("CURLPIPE_HTTP1", Some("7.4"), None, None),
    ("ENCHANT_MYSPELL", Some("8.0"), None, None),
    ("ENCHANT_ISPELL", Some("8.0"), None, None),
    ("FILTER_SANITIZE_STRING", Some("8.1"), None, Some("htmlspecialchars()")),
    ("FILTER_SANITIZE_STRIPPED", Some("8.1"), None, Some("htmlspecialchars()")),
    ("FILE_BINARY", Some("8.1"), None, None),
    ("FILE_TEXT", Some("8.1"), None, None),
    ("MYSQLI_REFRESH_SLAVE", Some("8.1"), None, Some("MYSQLI_REFRESH_REPLICA")),
];

fn check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| {
        FeatureCheck::new(
            withdrawn_tables(REMOVED_CONSTANTS),
            MessageTemplate::new("The constant \"%s\""),
            is_global_constant_use,
        )
    })
}

/// Check a token stream for deprecated or removed constants
pub fn check_removed_constants(stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
    dispatch(check(), stream, &options.test_version, &[TokenKind::String])
}

pub struct RemovedConstantsSniff;

impl Sniff for RemovedConstantsSniff {
    fn name(&self) -> &'static str {
        "removed_constants"
    }

    fn description(&self) -> &'static str {
        "Detect global constants deprecated or removed in the targeted PHP versions"
    }

    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
        check_removed_constants(stream, options)
    }
}
