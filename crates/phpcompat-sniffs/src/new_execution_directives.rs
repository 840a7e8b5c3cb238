//! Sniff: `declare()` directives newer than the targeted PHP versions, and
//! directives with invalid values

use crate::check::{position_at, FeatureCheck};
use crate::options::SniffOptions;
use crate::registry::Sniff;
use phpcompat_core::diagnostic::string_to_error_code;
use phpcompat_core::dispatch::declare_directives;
use phpcompat_core::validate::{valid_encoding, valid_strict_types, valid_ticks};
use phpcompat_core::{
    Diagnostic, FeatureTable, MessageTemplate, Severity, TokenKind, TokenStream,
};
use std::sync::OnceLock;

fn directive_tables() -> Vec<FeatureTable> {
    vec![
        FeatureTable::builder("ticks")
            .absent("3.1")
            .present("4.0")
            .validator(valid_ticks)
            .build(),
        FeatureTable::builder("encoding")
            .absent("5.2")
            .conditional("5.3", "--enable-zend-multibyte")
            .present("5.4")
            .validator(valid_encoding)
            .build(),
        FeatureTable::builder("strict_types")
            .absent("5.6")
            .present("7.0")
            .validator(valid_strict_types)
            .build(),
    ]
}

fn is_declare(stream: &TokenStream, pos: usize) -> bool {
    stream.kind_at(pos) == Some(TokenKind::Declare)
}

fn check() -> &'static FeatureCheck {
    static CHECK: OnceLock<FeatureCheck> = OnceLock::new();
    CHECK.get_or_init(|| FeatureCheck::new(directive_tables(), MessageTemplate::new("Directive %s"), is_declare))
}

/// Check `declare()` statements
pub fn check_new_execution_directives(stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
    let check = check();
    let mut diagnostics = Vec::new();

    for pos in stream.positions_of(&[TokenKind::Declare]) {
        if !(check.filter)(stream, pos) {
            continue;
        }
        let Some(directives) = declare_directives(stream, pos) else {
            continue;
        };

        for directive in directives {
            let position = position_at(stream, directive.name_position);
            let Some(table) = check.index.get(&directive.name) else {
                let known: Vec<&str> = check.index.tables().iter().map(|t| t.name()).collect();
                diagnostics.push(Diagnostic::from_template(
                    position,
                    Severity::Error,
                    "Declare can only be used with the directives %s. Found: %s",
                    vec![known.join(", "), directive.name.clone()],
                    "InvalidDirectiveFound",
                ));
                continue;
            };

            diagnostics.extend(check.report(stream, directive.name_position, table, &options.test_version));

            if let Some(validator) = table.validator() {
                if !directive.value.is_empty() && !validator(&directive.value) {
                    let value_position = directive
                        .value_position
                        .map(|p| position_at(stream, p))
                        .unwrap_or(position);
                    diagnostics.push(Diagnostic::from_template(
                        value_position,
                        Severity::Warning,
                        "The execution directive %s does not seem to have a valid value. Please review. Found: %s",
                        vec![table.name().to_string(), directive.value.clone()],
                        format!("Invalid{}Found", string_to_error_code(table.name())),
                    ));
                }
            }
        }
    }

    diagnostics
}

pub struct NewExecutionDirectivesSniff;

impl Sniff for NewExecutionDirectivesSniff {
    fn name(&self) -> &'static str {
        "new_execution_directives"
    }

    fn description(&self) -> &'static str {
        "Detect declare() directives that are unknown, invalid or newer than the targeted PHP versions"
    }

    fn check(&self, stream: &TokenStream, options: &SniffOptions) -> Vec<Diagnostic> {
        check_new_execution_directives(stream, options)
    }
}
