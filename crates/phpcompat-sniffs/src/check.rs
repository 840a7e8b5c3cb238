//! Shared plumbing: a feature index, a message template and an occurrence
//! filter, driven over the token stream by [`dispatch`]

use phpcompat_core::{
    evaluate, Diagnostic, FeatureIndex, FeatureTable, MessageTemplate, Position, TokenKind,
    TokenStream, VersionRange,
};

/// Decides whether the token at a position is a genuine use
pub type Filter = fn(&TokenStream, usize) -> bool;

/// (name, last version without the feature, first version with it)
pub type Introduction = (&'static str, &'static str, &'static str);

/// (name, deprecated since, removed since, alternative)
pub type Withdrawal = (
    &'static str,
    Option<&'static str>,
    Option<&'static str>,
    Option<&'static str>,
);

pub struct FeatureCheck {
    pub index: FeatureIndex,
    pub template: MessageTemplate,
    pub filter: Filter,
}

impl FeatureCheck {
    pub fn new(tables: Vec<FeatureTable>, template: MessageTemplate, filter: Filter) -> Self {
        Self {
            index: FeatureIndex::new(tables),
            template,
            filter,
        }
    }

    /// Evaluate `table` against `range` and render the result at `pos`
    pub fn report(
        &self,
        stream: &TokenStream,
        pos: usize,
        table: &FeatureTable,
        range: &VersionRange,
    ) -> Vec<Diagnostic> {
        match evaluate(table, range) {
            Some(diagnosis) => self.template.report(
                position_at(stream, pos),
                table.name(),
                table.alternative(),
                &diagnosis,
            ),
            None => Vec::new(),
        }
    }
}

/// Run `check` over every token of the given kinds
///
/// Tokens are looked up by their content; the filter runs first so lookups
/// only happen for genuine uses.
pub fn dispatch(
    check: &FeatureCheck,
    stream: &TokenStream,
    range: &VersionRange,
    kinds: &[TokenKind],
) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();
    for pos in stream.positions_of(kinds) {
        if !(check.filter)(stream, pos) {
            continue;
        }
        let Some(token) = stream.token_at(pos) else {
            continue;
        };
        if let Some(table) = check.index.get(&token.content) {
            diagnostics.extend(check.report(stream, pos, table, range));
        }
    }
    diagnostics
}

/// Diagnostic position of a token
pub fn position_at(stream: &TokenStream, pos: usize) -> Position {
    let (line, column) = stream
        .token_at(pos)
        .map(|t| (t.line, t.column))
        .unwrap_or((0, 0));
    Position {
        token: pos,
        line,
        column,
    }
}

/// Tables for features that appeared in a given version
pub fn introduced_tables(rows: &[Introduction]) -> Vec<FeatureTable> {
    rows.iter()
        .map(|&(name, absent, present)| {
            FeatureTable::builder(name)
                .absent(absent)
                .present(present)
                .build()
        })
        .collect()
}

/// Tables for features that were deprecated and/or removed
pub fn withdrawn_tables(rows: &[Withdrawal]) -> Vec<FeatureTable> {
    rows.iter()
        .map(|&(name, deprecated, removed, alternative)| {
            let mut builder = FeatureTable::builder(name);
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
        .collect()
}
