//! Sniff: the `e` (eval) modifier in mbstring regex option strings

use crate::check::{position_at, FeatureCheck};
use crate::options::SniffOptions;
use crate::registry::Sniff;
use crate::removed_ini_directives::literal_argument;
use phpcompat_core::dispatch::is_global_function_call;
use phpcompat_core::validate::valid_mbstring_options;
use phpcompat_core::{evaluate, Diagnostic, FeatureTable, MessageTemplate, TokenKind, TokenStream};
use std::sync::OnceLock;

/// mbstring functions and the (zero-based) position of their options argument
const OPTION_ARGUMENTS: &[(&str, usize)] = &[
    ("mb_ereg_replace", 3),
    ("mb_eregi_replace", 3),
    ("mb_regex_set_options", 0),
    ("mb_ereg_search_init", 2),
    ("mb_ereg_search", 1),
    ("mb_ereg_search_pos", 1),
    ("mb_ereg_search_regs", 1),
];

fn options_argument_of(stream: &TokenStream, pos: usize) -> Option<usize> {
    let token = stream.token_at(pos)?;
    OPTION_ARGUMENTS
        .iter()
        .find(|(name, _)| token.content_eq(name))
        .map(|&(_, nth)| nth)
}

fn is_mbstring_regex_call(stream: &TokenStream, pos: usize) -> bool {
    options_argument_of(stream, pos).is_some() && is_global_function_call(stream, pos)
}

fn check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| {
        let modifier = FeatureTable::builder("e")
            .deprecated("7.1")
            .removed("8.0")
            .alternative("mb_ereg_replace_callback()")
            .validator(valid_mbstring_options)
            .build();
        FeatureCheck::new(
            vec![modifier],
            MessageTemplate::new("The Mbstring regex \"%s\" modifier"),
            is_mbstring_regex_call,
        )
    })
}

/// Check mbstring regex calls for the `e` modifier
pub fn check_removed_mbstring_modifiers(stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
    let check = check();
    let mut diagnostics = Vec::new();
    let Some(table) = check.index.get("e") else {
        return diagnostics;
    };

    for pos in stream.positions_of(&[TokenKind::String]) {
        if !(check.filter)(stream, pos) {
            continue;
        }
        let Some(nth) = options_argument_of(stream, pos) else {
            continue;
        };
        let Some((arg_pos, value)) = literal_argument(stream, pos, nth) else {
            continue;
        };
        // Validators take the quoted source text
        let quoted = format!("'{}'", value);
        if table.validator().map_or(true, |valid| valid(&quoted)) {
            continue;
        }
        if let Some(diagnosis) = evaluate(table, &options.test_version) {
            diagnostics.extend(check.template.report(
                position_at(stream, arg_pos),
                table.name(),
                table.alternative(),
                &diagnosis,
            ));
        }
    }

    diagnostics
}

pub struct RemovedMbstringModifiersSniff;

impl Sniff for RemovedMbstringModifiersSniff {
    fn name(&self) -> &'static str {
        "removed_mbstring_modifiers"
    }

    fn description(&self) -> &'static str {
        "Detect the deprecated and removed e modifier in mbstring regex functions"
    }

    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
        check_removed_mbstring_modifiers(stream, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::{tokenize, Severity, VersionRange};

    fn check_php(source: &str, test_version: &str) -> Vec<Diagnostic> {
        let stream = tokenize(source);
        let options = SniffOptions::new(VersionRange::parse(test_version).unwrap());
        check_removed_mbstring_modifiers(&stream, &options)
    }

    #[test]
    fn test_eval_modifier_in_replace() {
        let diagnostics = check_php("<?php mb_ereg_replace($p, $r, $s, 'msre');", "7.1-");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Error);
        assert_eq!(
            diagnostics[0].message,
            "The Mbstring regex \"e\" modifier is deprecated since PHP 7.1 and removed since PHP 8.0; Use mb_ereg_replace_callback() instead"
        );
        assert_eq!(diagnostics[0].code, "eDeprecatedRemoved");
    }

    #[test]
    fn test_deprecated_only_before_8() {
        let diagnostics = check_php("<?php mb_regex_set_options('e');", "7.1-7.4");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, Severity::Warning);
        assert_eq!(diagnostics[0].code, "eDeprecated");
    }

    #[test]
    fn test_argument_position_per_function() {
        let source = "<?php\nmb_ereg_search_init($s, $p, 'e');\nmb_ereg_search($p, 'e');\nmb_ereg_search_init($s, 'e');\n";
        let lines: Vec<usize> = check_php(source, "7.1-")
            .iter()
            .map(|d| d.position.line)
            .collect();
        assert_eq!(lines, vec![2, 3]);
    }

    #[test]
    fn test_clean_or_dynamic_options() {
        let source = "<?php mb_ereg_replace($p, $r, $s, 'msr'); mb_ereg_replace($p, $r, $s, $opts); mb_ereg_replace($p, $r, $s);";
        assert!(check_php(source, "7.1-").is_empty());
    }

    #[test]
    fn test_before_deprecation() {
        assert!(check_php("<?php mb_ereg_replace($p, $r, $s, 'e');", "5.6-7.0").is_empty());
    }
}
