//! Sniff: INI directives passed to `ini_set()`/`ini_get()` that are
//! deprecated or removed within the targeted PHP versions

use crate::check::{withdrawn_tables, FeatureCheck, Withdrawal};
use crate::options::SniffOptions;
use crate::registry::Sniff;
use phpcompat_core::dispatch::{call_argument, is_global_function_call};
use phpcompat_core::validate::strip_quotes;
use phpcompat_core::{Diagnostic, MessageTemplate, Severity, TokenKind, TokenStream};
use std::sync::OnceLock;

const REMOVED_INI_DIRECTIVES: &[Withdrawal] = &[
    ("define_syslog_variables", Some("5.3"), Some("5.4"), None),
    ("register_globals", Some("5.3"), Some("5.4"), None),
    ("register_long_arrays", Some("5.3"), Some("5.4"), None),
    ("magic_quotes_gpc", Some("5.3"), Some("5.4"), None),
    ("magic_quotes_runtime", Some("5.3"), Some("5.4"), None),
    ("magic_quotes_sybase", Some("5.3"), Some("5.4"), None),
    ("allow_call_time_pass_reference", Some("5.3"), Some("5.4"), None),
    ("highlight.bg", Some("5.3"), Some("5.4"), None),
    ("session.bug_compat_42", Some("5.3"), Some("5.4"), None),
    ("session.bug_compat_warn", Some("5.3"), Some("5.4"), None),
    ("y2k_compliance", Some("5.3"), Some("5.4"), None),
    ("zend.ze1_compatibility_mode", None, Some("5.3"), None),
    ("safe_mode", Some("5.3"), Some("5.4"), None),
    ("safe_mode_gid", Some("5.3"), Some("5.4"), None),
    ("safe_mode_include_dir", Some("5.3"), Some("5.4"), None),
    ("safe_mode_exec_dir", Some("5.3"), Some("5.4"), None),
    ("safe_mode_allowed_env_vars", Some("5.3"), Some("5.4"), None),
    ("safe_mode_protected_env_vars", Some("5.3"), Some("5.4"), None),
    ("iconv.input_encoding", Some("5.6"), None, Some("default_charset")),
    ("iconv.output_encoding", Some("5.6"), None, Some("default_charset")),
    ("iconv.internal_encoding", Some("5.6"), None, Some("default_charset")),
    ("mbstring.http_input", Some("5.6"), None, Some("default_charset")),
    ("mbstring.http_output", Some("5.6"), None, Some("default_charset")),
    ("mbstring.internal_encoding", Some("5.6"), None, Some("default_charset")),
    ("always_populate_raw_post_data", Some("5.6"), Some("7.0"), None),
    ("asp_tags", None, Some("7.0"), None),
    ("xsl.security_prefs", None, Some("7.0"), None),
    ("session.entropy_file", None, Some("7.1"), None),
    ("session.entropy_length", None, Some("7.1"), None),
    ("session.hash_function", None, Some("7.1"), None),
    ("session.hash_bits_per_character", None, Some("7.1"), None),
    ("mbstring.func_overload", Some("7.2"), Some("8.0"), None),
    ("track_errors", Some("7.2"), Some("8.0"), None),
    ("pdo_odbc.db2_instance_name", Some("7.3"), Some("8.0"), None),
    ("allow_url_include", Some("7.4"), None, None),
    ("assert.quiet_eval", None, Some("8.0"), None),
    ("date.sunrise_zenith", Some("8.1"), None, None),
    ("date.sunset_zenith", Some("8.1"), None, None),
    ("filter.default", Some("8.1"), None, None),
    ("filter.default_flags", Some("8.1"), None, None),
    ("oci8.old_oci_close_semantics", Some("8.1"), None, None),
    ("mysqlnd.fetch_data_copy", None, Some("8.1"), None),
    ("session.sid_length", Some("8.4"), None, None),
    ("session.sid_bits_per_character", Some("8.4"), None, None),
];

/// Functions whose first argument names an INI directive
const INI_FUNCTIONS: &[&str] = &["ini_set", "ini_get"];

fn is_ini_call(stream: &TokenStream, pos: usize) -> bool {
    stream
        .token_at(pos)
        .is_some_and(|t| INI_FUNCTIONS.iter().any(|f| t.content_eq(f)))
        && is_global_function_call(stream, pos)
}

fn check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| {
        FeatureCheck::new(
            withdrawn_tables(REMOVED_INI_DIRECTIVES),
            MessageTemplate::new("INI directive '%s'"),
            is_ini_call,
        )
    })
}

/// Position and unquoted text of an argument made of one plain string literal
pub(crate) fn literal_argument(stream: &TokenStream, call_pos: usize, nth: usize) -> Option<(usize, String)> {
    let argument = call_argument(stream, call_pos, nth)?;
    let first = stream.find_next(argument.start, Some(argument.end), |t| !t.kind.is_empty())?;
    if stream.kind_at(first)? != TokenKind::ConstantEncapsedString {
        return None;
    }
    if stream
        .find_next(first + 1, Some(argument.end), |t| !t.kind.is_empty())
        .is_some()
    {
        return None;
    }
    let raw = &stream.token_at(first)?.content;
    Some((first, strip_quotes(raw).to_string()))
}

/// Check a token stream for deprecated or removed INI directives
pub fn check_removed_ini_directives(stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
    let check = check();
    let mut diagnostics = Vec::new();

    for pos in stream.positions_of(&[TokenKind::String]) {
        if !(check.filter)(stream, pos) {
            continue;
        }
        let Some((arg_pos, directive)) = literal_argument(stream, pos, 0) else {
            continue;
        };
        let Some(table) = check.index.get(&directive) else {
            continue;
        };

        let reading = stream.token_at(pos).is_some_and(|t| t.content_eq("ini_get"));
        for mut diagnostic in check.report(stream, arg_pos, table, &options.test_version) {
            // Reading a removed setting returns false instead of failing
            if reading {
                diagnostic.severity = Severity::Warning;
            }
            diagnostics.push(diagnostic);
        }
    }

    diagnostics
}

pub struct RemovedIniDirectivesSniff;

impl Sniff for RemovedIniDirectivesSniff {
    fn name(&self) -> &'static str {
        "removed_ini_directives"
    }

    fn description(&self) -> &'static str {
        "Detect INI directives set or read at runtime that are deprecated or removed"
    }

    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
        check_removed_ini_directives(stream, options)
    }
}
