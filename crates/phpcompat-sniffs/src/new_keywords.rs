//! Sniff: keywords and language constructs newer than the targeted PHP
//! versions

use crate::check::{position_at, FeatureCheck};
use crate::options::SniffOptions;
use crate::registry::Sniff;
use phpcompat_core::dispatch::next_significant;
use phpcompat_core::{evaluate, Diagnostic, FeatureTable, MessageTemplate, TokenKind, TokenStream};
use std::sync::OnceLock;

/// (lookup key, last version without it, first version with it, description)
const NEW_KEYWORDS: &[(&str, &str, &str, &str)] = &[
    ("__halt_compiler", "5.0", "5.1", "\"__halt_compiler\" keyword"),
    ("goto", "5.2", "5.3", "\"goto\" keyword"),
    ("namespace", "5.2", "5.3", "\"namespace\" keyword"),
    ("use", "5.2", "5.3", "\"use\" keyword (for traits/namespaces/anonymous functions)"),
    ("__dir__", "5.2", "5.3", "__DIR__ magic constant"),
    ("__namespace__", "5.2", "5.3", "__NAMESPACE__ magic constant"),
    ("nowdoc", "5.2", "5.3", "Nowdoc functionality"),
    ("trait", "5.3", "5.4", "\"trait\" keyword"),
    ("insteadof", "5.3", "5.4", "\"insteadof\" keyword (for traits)"),
    ("__trait__", "5.3", "5.4", "__TRAIT__ magic constant"),
    ("yield", "5.4", "5.5", "\"yield\" keyword (for generators)"),
    ("finally", "5.4", "5.5", "\"finally\" keyword (in exception handling)"),
    ("yield from", "5.6", "7.0", "\"yield from\" keyword (for generators)"),
    ("fn", "7.3", "7.4", "The \"fn\" keyword for arrow functions"),
    ("match", "7.4", "8.0", "The \"match\" keyword"),
    ("enum", "8.0", "8.1", "The \"enum\" keyword"),
    ("readonly", "8.0", "8.1", "The \"readonly\" keyword"),
];

const KEYWORD_KINDS: &[TokenKind] = &[
    TokenKind::HaltCompiler,
    TokenKind::Goto,
    TokenKind::Namespace,
    TokenKind::Use,
    TokenKind::MagicConstant,
    TokenKind::Nowdoc,
    TokenKind::Trait,
    TokenKind::Insteadof,
    TokenKind::Yield,
    TokenKind::Finally,
    TokenKind::Fn,
    TokenKind::Match,
    TokenKind::Enum,
    TokenKind::Readonly,
];

/// Keywords used as names were re-tagged by the tokenizer; anything still
/// carrying a keyword kind is the keyword itself
fn is_keyword(stream: &TokenStream, pos: usize) -> bool {
    stream.kind_at(pos).is_some_and(|k| KEYWORD_KINDS.contains(&k))
}

fn check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| {
        let tables = NEW_KEYWORDS
            .iter()
            .map(|&(key, absent, present, description)| {
                FeatureTable::builder(key)
                    .absent(absent)
                    .present(present)
                    .description(description)
                    .build()
            })
            .collect();
        FeatureCheck::new(tables, MessageTemplate::new("%s"), is_keyword)
    })
}

/// Table key for the keyword at `pos`
fn keyword_key(stream: &TokenStream, pos: usize) -> Option<String> {
    let token = stream.token_at(pos)?;
    let key = match token.kind {
        TokenKind::Nowdoc => "nowdoc".to_string(),
        TokenKind::Yield => {
            let from = next_significant(stream, pos)
                .and_then(|n| stream.token_at(n))
                .is_some_and(|t| t.kind == TokenKind::String && t.content_eq("from"));
            if from {
                "yield from".to_string()
            } else {
                "yield".to_string()
            }
        }
        _ => token.content.to_ascii_lowercase(),
    };
    Some(key)
}

/// Check a token stream for keywords newer than the target range
pub fn check_new_keywords(stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
    let check = check();
    let mut diagnostics = Vec::new();

    for pos in stream.positions_of(KEYWORD_KINDS) {
        if !(check.filter)(stream, pos) {
            continue;
        }
        let Some(key) = keyword_key(stream, pos) else {
            continue;
        };
        let Some(table) = check.index.get(&key) else {
            continue;
        };
        let Some(diagnosis) = evaluate(table, &options.test_version) else {
            continue;
        };
        diagnostics.extend(check.template.report_described(
            position_at(stream, pos),
            table.name(),
            table.description().unwrap_or(table.name()),
            table.alternative(),
            &diagnosis,
        ));
    }

    diagnostics
}

pub struct NewKeywordsSniff;

impl Sniff for NewKeywordsSniff {
    fn name(&self) -> &'static str {
        "new_keywords"
    }

    fn description(&self) -> &'static str {
        "Detect keywords and constructs not available in the oldest targeted PHP version"
    }

    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
        check_new_keywords(stream, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use phpcompat_core::VersionRange;
    use phpcompat_core::tokenize;

    fn check_php(source: &str, test_version: &str) -> Vec<Diagnostic> {
        let stream = tokenize(source);
        let options = SniffOptions::new(VersionRange::parse(test_version).unwrap());
        check_new_keywords(&stream, &options)
    }

    #[test]
    fn test_goto() {
        let diagnostics = check_php("<?php goto end; end: echo 1;", "5.2");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(
            diagnostics[0].message,
            "\"goto\" keyword is not present in PHP version 5.2 or earlier"
        );
        assert_eq!(diagnostics[0].code, "gotoFound");
    }

    #[test]
    fn test_yield_from_is_distinct_from_yield() {
        let source = "<?php function g() { yield 1; yield from other(); }";
        let diagnostics = check_php(source, "5.5");
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code, "yield_fromFound");

        assert_eq!(check_php(source, "5.4").len(), 2);
    }

    #[test]
    fn test_match_and_arrow_function() {
        let source = "<?php $f = fn($x) => match($x) { 1 => 'a', default => 'b' };";
        let diagnostics = check_php(source, "7.3");
        let codes: Vec<&str> = diagnostics.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["fnFound", "matchFound"]);
    }

    #[test]
    fn test_magic_constant_and_nowdoc() {
        let source = "<?php\n$d = __DIR__;\n$s = <<<'TXT'\nraw\nTXT;\n";
        let diagnostics = check_php(source, "5.2");
        let codes: Vec<&str> = diagnostics.iter().map(|d| d.code.as_str()).collect();
        assert_eq!(codes, vec!["__dir__Found", "nowdocFound"]);
    }

    #[test]
    fn test_keywords_used_as_names_are_skipped() {
        let source = "<?php $obj->match(); Foo::enum(); $q->readonly; function fn_helper() {}";
        assert!(check_php(source, "7.0").is_empty());
    }

    #[test]
    fn test_supported_range() {
        assert!(check_php("<?php enum Suit { case Hearts; }", "8.1-").is_empty());
        assert_eq!(check_php("<?php enum Suit { case Hearts; }", "8.0-").len(), 1);
    }
}
