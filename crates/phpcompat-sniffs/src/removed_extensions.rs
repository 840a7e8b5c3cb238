//! Sniff: functions belonging to deprecated or removed extensions
//!
//! Functions are matched to an extension by name prefix (`mysql_query` →
//! `mysql`). Userland functions that happen to share a prefix can be listed
//! in the `function_whitelist` option.

use crate::check::{position_at, FeatureCheck};
use crate::options::SniffOptions;
use crate::registry::Sniff;
use phpcompat_core::dispatch::is_global_function_call;
use phpcompat_core::{
    evaluate, logging, Diagnostic, FeatureTable, MessageTemplate, TokenKind, TokenStream,
};
use std::sync::OnceLock;

/// (function prefix, extension, deprecated since, removed since, alternative)
type Extension = (
    &'static str,
    &'static str,
    Option<&'static str>,
    Option<&'static str>,
    Option<&'static str>,
);

const REMOVED_EXTENSIONS: &[Extension] = &[
    ("dbase_", "dbase", None, Some("5.3"), None),
    ("fam_", "fam", None, Some("5.1"), None),
    ("fbsql_", "fbsql", None, Some("5.3"), None),
    ("fdf_", "fdf", None, Some("5.3"), None),
    ("ibase_", "ibase", None, Some("7.4"), Some("pecl/ibase")),
    ("ingres_", "ingres", None, Some("5.1"), Some("pecl/ingres")),
    ("mcrypt_", "mcrypt", Some("7.1"), Some("7.2"), Some("openssl (preferred) or pecl/mcrypt")),
    ("ming_", "ming", None, Some("5.3"), Some("pecl/ming")),
    ("msql_", "msql", None, Some("5.3"), None),
    ("mssql_", "mssql", None, Some("7.0"), None),
    ("mysql_", "mysql", Some("5.5"), Some("7.0"), Some("mysqli")),
    ("ncurses_", "ncurses", None, Some("5.3"), Some("pecl/ncurses")),
    ("recode_", "recode", None, Some("7.4"), Some("the iconv or mbstring extension")),
    ("sybase_", "sybase", None, Some("7.0"), Some("pdo_dblib")),
    ("wddx_", "wddx", None, Some("7.4"), Some("pecl/wddx")),
    ("xmlrpc_", "xmlrpc", None, Some("8.0"), Some("pecl/xmlrpc")),
];

fn check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| {
        let tables = REMOVED_EXTENSIONS
            .iter()
            .map(|&(prefix, extension, deprecated, removed, alternative)| {
                let mut builder = FeatureTable::builder(prefix)
                    .declare_keys(&["extension"])
                    .meta("extension", extension);
                if let Some(version) = deprecated {
                    builder = builder.deprecated(version);
                }
                if let Some(version) = removed {
                    builder = builder.removed(version);
                }
                if let Some(alternative) = alternative {
                    builder = builder.alternative(alternative);
                }
                builder.build()
            })
            .collect();
        FeatureCheck::new(tables, MessageTemplate::new("Extension '%s'"), is_global_function_call)
    })
}

/// Check a token stream for calls into removed extensions
pub fn check_removed_extensions(stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
    let check = check();
    let mut diagnostics = Vec::new();

    for pos in stream.positions_of(&[TokenKind::String]) {
        if !(check.filter)(stream, pos) {
            continue;
        }
        let Some(token) = stream.token_at(pos) else {
            continue;
        };
        let Some(table) = check.index.find_prefix(&token.content) else {
            continue;
        };
        if options.function_whitelist.contains(&token.content) {
            logging::log_suppressed(&token.content, "function_whitelist");
            continue;
        }
        let Some(diagnosis) = evaluate(table, &options.test_version) else {
            continue;
        };

        let extension = table.metadata("extension").unwrap_or(table.name());
        diagnostics.extend(check.template.report(
            position_at(stream, pos),
            extension,
            table.alternative(),
            &diagnosis,
        ));
    }

    diagnostics
}

pub struct RemovedExtensionsSniff;

impl Sniff for RemovedExtensionsSniff {
    fn name(&self) -> &'static str {
        "removed_extensions"
    }

    fn description(&self) -> &'static str {
        "Detect use of PHP extensions deprecated or removed in the targeted versions"
    }

    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
        check_removed_extensions(stream, options)
    }
}
