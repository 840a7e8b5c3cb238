//! Occurrence classification over a [`TokenStream`]
//!
//! Two primitives carry everything else:
//! - [`previous_significant`] - what precedes a token, ignoring whitespace
//!   and comments
//! - [`enclosing_scope_of`] - the nearest enclosing construct of given kinds
//!
//! The helpers built on top ([`classify`], [`call_arguments`],
//! [`function_parameters`], ...) never error. When the stream is malformed
//! (unbalanced parentheses, a file cut off mid-statement) they return `None`
//! and the occurrence is skipped.

use crate::token::{TokenKind, TokenStream};

/// Index of the nearest non-whitespace, non-comment token before `pos`
pub fn previous_significant(stream: &TokenStream, pos: usize) -> Option<usize> {
    stream.find_previous(pos, |t| !t.kind.is_empty())
}

/// Index of the nearest non-whitespace, non-comment token after `pos`
pub fn next_significant(stream: &TokenStream, pos: usize) -> Option<usize> {
    stream.find_next(pos + 1, None, |t| !t.kind.is_empty())
}

fn kind_of(stream: &TokenStream, pos: Option<usize>) -> Option<TokenKind> {
    pos.and_then(|p| stream.kind_at(p))
}

/// Kind of construct a scope belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Class,
    AnonymousClass,
    Interface,
    Trait,
    Enum,
    Function,
    Closure,
    Namespace,
    /// Control structures: `if`, loops, `switch`, `try`, ...
    Block,
}

impl ScopeKind {
    /// Named and anonymous classes, interfaces, traits and enums
    pub const OO: &'static [ScopeKind] = &[
        ScopeKind::Class,
        ScopeKind::AnonymousClass,
        ScopeKind::Interface,
        ScopeKind::Trait,
        ScopeKind::Enum,
    ];

    /// Classify the scope owned by the token at `owner`
    pub fn of(stream: &TokenStream, owner: usize) -> Option<ScopeKind> {
        let kind = match stream.kind_at(owner)? {
            TokenKind::Class => {
                if kind_of(stream, previous_significant(stream, owner)) == Some(TokenKind::New) {
                    ScopeKind::AnonymousClass
                } else {
                    ScopeKind::Class
                }
            }
            TokenKind::Interface => ScopeKind::Interface,
            TokenKind::Trait => ScopeKind::Trait,
            TokenKind::Enum => ScopeKind::Enum,
            TokenKind::Function => {
                let mut next = next_significant(stream, owner);
                if kind_of(stream, next) == Some(TokenKind::Ampersand) {
                    next = next.and_then(|n| next_significant(stream, n));
                }
                if kind_of(stream, next) == Some(TokenKind::String) {
                    ScopeKind::Function
                } else {
                    ScopeKind::Closure
                }
            }
            TokenKind::Fn => ScopeKind::Closure,
            TokenKind::Namespace => ScopeKind::Namespace,
            k if k.is_scope_owner() => ScopeKind::Block,
            _ => return None,
        };
        Some(kind)
    }
}

/// An enclosing construct located by [`enclosing_scope_of`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeHandle {
    pub kind: ScopeKind,
    /// The owning keyword
    pub owner: usize,
    pub opener: usize,
    pub closer: usize,
}

/// Innermost scope around `pos` whose kind is one of `kinds`
pub fn enclosing_scope_of(stream: &TokenStream, pos: usize, kinds: &[ScopeKind]) -> Option<ScopeHandle> {
    let token = stream.token_at(pos)?;
    token.conditions.iter().rev().find_map(|&owner| {
        let kind = ScopeKind::of(stream, owner)?;
        if !kinds.contains(&kind) {
            return None;
        }
        let scope = stream.token_at(owner)?.scope?;
        Some(ScopeHandle {
            kind,
            owner,
            opener: scope.opener,
            closer: scope.closer,
        })
    })
}

/// Facts about the surroundings of a name token
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ContextFlags {
    /// Name being declared (`function foo`, `const FOO`, `use Foo`, ...)
    pub is_declaration: bool,
    /// Preceded by `->`, `?->` or `::`
    pub is_member_access: bool,
    /// Qualified with a namespace other than the global one (`Foo\bar`)
    pub is_namespaced: bool,
    /// Explicitly global (`\bar`)
    pub is_fully_qualified: bool,
    /// Preceded by `new`
    pub is_instantiation: bool,
    /// Followed by `(`
    pub is_call: bool,
}

/// A located candidate use of a feature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub position: usize,
    pub name: String,
    pub context: ContextFlags,
}

/// Gather context for the name token at `pos`
///
/// Returns `None` for anything that is not a `String` token, and for calls
/// whose argument list is never closed.
pub fn classify(stream: &TokenStream, pos: usize) -> Option<Occurrence> {
    let token = stream.token_at(pos)?;
    if token.kind != TokenKind::String {
        return None;
    }

    let mut context = ContextFlags::default();

    // Step over a namespace qualifier to the token that precedes the full name
    let mut prev = previous_significant(stream, pos);
    if kind_of(stream, prev) == Some(TokenKind::NsSeparator) {
        let before = prev.and_then(|p| previous_significant(stream, p));
        match kind_of(stream, before) {
            Some(TokenKind::String) | Some(TokenKind::Namespace) => {
                context.is_namespaced = true;
                let mut cursor = before;
                while matches!(
                    kind_of(stream, cursor),
                    Some(TokenKind::String) | Some(TokenKind::Namespace) | Some(TokenKind::NsSeparator)
                ) {
                    cursor = cursor.and_then(|c| previous_significant(stream, c));
                }
                prev = cursor;
            }
            _ => {
                context.is_fully_qualified = true;
                prev = before;
            }
        }
    }

    let prev_kind = kind_of(stream, prev);
    context.is_member_access = matches!(
        prev_kind,
        Some(TokenKind::ObjectOperator) | Some(TokenKind::NullsafeObjectOperator) | Some(TokenKind::DoubleColon)
    );
    context.is_instantiation = prev_kind == Some(TokenKind::New);
    context.is_declaration = match prev_kind {
        Some(
            TokenKind::Function
            | TokenKind::Class
            | TokenKind::Const
            | TokenKind::Interface
            | TokenKind::Trait
            | TokenKind::Enum
            | TokenKind::Use
            | TokenKind::Namespace
            | TokenKind::Goto
            | TokenKind::As
            | TokenKind::Insteadof,
        ) => true,
        Some(TokenKind::Ampersand) => {
            kind_of(stream, prev.and_then(|p| previous_significant(stream, p))) == Some(TokenKind::Function)
        }
        _ => false,
    };

    let next = next_significant(stream, pos);
    if kind_of(stream, next) == Some(TokenKind::OpenParenthesis) {
        let open = next?;
        // Live coding: an argument list that never closes
        stream.token_at(open)?.matching?;
        context.is_call = true;
    }

    Some(Occurrence {
        position: pos,
        name: token.content.clone(),
        context,
    })
}

/// A call to a global function: not declared, not a method, not namespaced
pub fn is_global_function_call(stream: &TokenStream, pos: usize) -> bool {
    let Some(occurrence) = classify(stream, pos) else {
        return false;
    };
    let c = occurrence.context;
    c.is_call && !c.is_declaration && !c.is_member_access && !c.is_namespaced && !c.is_instantiation
}

/// A use of a global constant
///
/// Rules out calls, declarations, class names (`new Foo`, `Foo::`, `extends
/// Foo`, type declarations), goto labels and named arguments.
pub fn is_global_constant_use(stream: &TokenStream, pos: usize) -> bool {
    let Some(occurrence) = classify(stream, pos) else {
        return false;
    };
    let c = occurrence.context;
    if c.is_call || c.is_declaration || c.is_member_access || c.is_namespaced || c.is_instantiation {
        return false;
    }

    let next = next_significant(stream, pos);
    let next_kind = kind_of(stream, next);
    if matches!(
        next_kind,
        Some(TokenKind::DoubleColon)
            | Some(TokenKind::NsSeparator)
            | Some(TokenKind::Variable)
            | Some(TokenKind::Ellipsis)
            | Some(TokenKind::OpenCurlyBracket)
    ) {
        return false;
    }

    // Walk back over a leading `\` to the token before the name
    let mut prev = previous_significant(stream, pos);
    if c.is_fully_qualified {
        prev = prev.and_then(|p| previous_significant(stream, p));
    }
    let prev_kind = kind_of(stream, prev);

    if matches!(
        prev_kind,
        Some(TokenKind::Extends)
            | Some(TokenKind::Implements)
            | Some(TokenKind::Instanceof)
            | Some(TokenKind::Catch)
    ) {
        return false;
    }

    // Part of an `implements A, B` or `catch (A | B $e)` list
    if matches!(prev_kind, Some(TokenKind::Comma) | Some(TokenKind::BitwiseOr))
        && in_type_or_heritage_list(stream, pos)
    {
        return false;
    }

    if next_kind == Some(TokenKind::Colon) {
        // `label:` and `name: $value` named arguments
        if matches!(
            prev_kind,
            None | Some(TokenKind::Semicolon)
                | Some(TokenKind::OpenCurlyBracket)
                | Some(TokenKind::CloseCurlyBracket)
                | Some(TokenKind::OpenTag)
                | Some(TokenKind::OpenParenthesis)
                | Some(TokenKind::Comma)
        ) {
            return false;
        }
    }

    // Return type: `): TYPE`
    if prev_kind == Some(TokenKind::Colon) || prev_kind == Some(TokenKind::QuestionMark) {
        let colon = if prev_kind == Some(TokenKind::QuestionMark) {
            prev.and_then(|p| previous_significant(stream, p))
        } else {
            prev
        };
        if kind_of(stream, colon) == Some(TokenKind::Colon) {
            let before = colon.and_then(|p| previous_significant(stream, p));
            if kind_of(stream, before) == Some(TokenKind::CloseParenthesis) {
                let owner = before.and_then(|b| stream.token_at(b)).and_then(|t| t.paren_owner);
                if is_function_like(stream, owner) {
                    return false;
                }
            }
        }
    }

    true
}

fn in_type_or_heritage_list(stream: &TokenStream, pos: usize) -> bool {
    let mut cursor = previous_significant(stream, pos);
    while let Some(kind) = kind_of(stream, cursor) {
        match kind {
            TokenKind::Implements | TokenKind::Extends | TokenKind::Catch => return true,
            TokenKind::String | TokenKind::NsSeparator | TokenKind::Comma | TokenKind::BitwiseOr => {}
            TokenKind::OpenParenthesis => {
                let owner = cursor.and_then(|c| stream.token_at(c)).and_then(|t| t.paren_owner);
                return kind_of(stream, owner) == Some(TokenKind::Catch);
            }
            _ => return false,
        }
        cursor = cursor.and_then(|c| previous_significant(stream, c));
    }
    false
}

fn is_function_like(stream: &TokenStream, pos: Option<usize>) -> bool {
    match kind_of(stream, pos) {
        Some(TokenKind::Function) | Some(TokenKind::Fn) => true,
        // `function name(`: the parenthesis belongs to the name
        Some(TokenKind::String) => {
            kind_of(stream, pos.and_then(|p| previous_significant(stream, p))) == Some(TokenKind::Function)
                || kind_of(stream, pos.and_then(|p| previous_significant(stream, p))) == Some(TokenKind::Ampersand)
        }
        Some(TokenKind::Use) => true,
        _ => false,
    }
}

/// One comma-separated item inside a parenthesised list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Argument {
    /// First token of the item (inclusive)
    pub start: usize,
    /// End of the item (exclusive)
    pub end: usize,
    /// Source text, trimmed
    pub raw: String,
}

/// Split the contents of the parenthesis at `open` on top-level commas
fn split_list(stream: &TokenStream, open: usize) -> Option<Vec<Argument>> {
    let close = stream.token_at(open)?.matching?;
    let mut items = Vec::new();
    let mut start = open + 1;
    let mut i = open + 1;

    while i < close {
        let token = stream.token_at(i)?;
        match token.kind {
            TokenKind::OpenParenthesis | TokenKind::OpenSquareBracket | TokenKind::OpenCurlyBracket => {
                i = token.matching?;
            }
            TokenKind::Comma => {
                items.push(make_argument(stream, start, i));
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }
    items.push(make_argument(stream, start, close));

    // `foo()` and a trailing comma both leave an empty item behind
    if items.last().is_some_and(|a| a.raw.is_empty()) {
        items.pop();
    }
    Some(items)
}

fn make_argument(stream: &TokenStream, start: usize, end: usize) -> Argument {
    Argument {
        start,
        end,
        raw: stream.content_of(start..end).trim().to_string(),
    }
}

/// Arguments of the call whose name is at `name_pos`
pub fn call_arguments(stream: &TokenStream, name_pos: usize) -> Option<Vec<Argument>> {
    let open = next_significant(stream, name_pos)?;
    if stream.kind_at(open)? != TokenKind::OpenParenthesis {
        return None;
    }
    split_list(stream, open)
}

/// The `nth` (0-based) argument of a call
pub fn call_argument(stream: &TokenStream, name_pos: usize, nth: usize) -> Option<Argument> {
    call_arguments(stream, name_pos)?.into_iter().nth(nth)
}

/// A type declaration: the tokens between its first and last type token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHint {
    pub start: usize,
    pub end: usize,
    /// Source text without whitespace or comments, e.g. `?int` or `A|B`
    pub text: String,
}

impl TypeHint {
    /// The individual type names, lower-cased, without `?`, `|`, `&`, parentheses
    /// or a leading `\`
    pub fn names(&self) -> Vec<String> {
        self.text
            .split(['|', '&', '?', '(', ')'])
            .map(|s| s.trim().trim_start_matches('\\').to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

fn is_type_token(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::String
            | TokenKind::NsSeparator
            | TokenKind::QuestionMark
            | TokenKind::BitwiseOr
            | TokenKind::Array
            | TokenKind::Callable
            | TokenKind::Static
            | TokenKind::OpenParenthesis
            | TokenKind::CloseParenthesis
    )
}

fn type_hint(stream: &TokenStream, start: usize, end: usize) -> Option<TypeHint> {
    let first = stream.find_next(start, Some(end), |t| !t.kind.is_empty())?;
    let last = (first..end).rev().find(|&i| stream.kind_at(i).is_some_and(|k| !k.is_empty()))?;
    Some(TypeHint {
        start: first,
        end: last + 1,
        text: stream.significant_content_of(first..last + 1),
    })
}

/// One parameter of a function declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Variable name, including the `$`
    pub name: String,
    pub name_position: usize,
    pub type_hint: Option<TypeHint>,
    pub by_reference: bool,
}

/// Opening parenthesis of the parameter list of the function at `fn_pos`
fn parameter_list_opener(stream: &TokenStream, fn_pos: usize) -> Option<usize> {
    if !matches!(stream.kind_at(fn_pos)?, TokenKind::Function | TokenKind::Fn) {
        return None;
    }
    let mut cursor = next_significant(stream, fn_pos)?;
    loop {
        match stream.kind_at(cursor)? {
            TokenKind::Ampersand | TokenKind::String => cursor = next_significant(stream, cursor)?,
            TokenKind::OpenParenthesis => return Some(cursor),
            _ => return None,
        }
    }
}

/// Parameters of the function, method, closure or arrow function at `fn_pos`
pub fn function_parameters(stream: &TokenStream, fn_pos: usize) -> Option<Vec<Parameter>> {
    let open = parameter_list_opener(stream, fn_pos)?;
    let items = split_list(stream, open)?;

    let mut params = Vec::with_capacity(items.len());
    for item in items {
        let Some(var) = stream.find_next(item.start, Some(item.end), |t| t.is(TokenKind::Variable)) else {
            // Incomplete parameter
            continue;
        };
        let token = stream.token_at(var)?;

        let mut by_reference = false;
        let mut type_start = None;
        let mut type_end = item.start;
        let mut i = item.start;
        while i < var {
            let t = stream.token_at(i)?;
            match t.kind {
                TokenKind::AttributeStart => {
                    // Skip `#[...]` up to its closing bracket
                    let close = stream.find_next(i, Some(var), |t| t.is(TokenKind::CloseSquareBracket))?;
                    i = close;
                }
                // `A&B $x` is an intersection type, `A &$x` a reference
                TokenKind::Ampersand => {
                    let next = next_significant(stream, i).and_then(|n| stream.kind_at(n));
                    if matches!(next, Some(TokenKind::Variable) | Some(TokenKind::Ellipsis)) {
                        by_reference = true;
                    } else {
                        type_start.get_or_insert(i);
                        type_end = i + 1;
                    }
                }
                TokenKind::Public | TokenKind::Protected | TokenKind::Private | TokenKind::Readonly => {}
                k if is_type_token(k) => {
                    type_start.get_or_insert(i);
                    type_end = i + 1;
                }
                _ => {}
            }
            i += 1;
        }

        let type_hint = type_start.and_then(|start| type_hint(stream, start, type_end));

        params.push(Parameter {
            name: token.content.clone(),
            name_position: var,
            type_hint,
            by_reference,
        });
    }
    Some(params)
}

/// Return type of the function at `fn_pos`, if declared
pub fn return_type(stream: &TokenStream, fn_pos: usize) -> Option<TypeHint> {
    let open = parameter_list_opener(stream, fn_pos)?;
    let close = stream.token_at(open)?.matching?;

    let mut cursor = next_significant(stream, close)?;
    // Closure `use (...)` clause
    if stream.kind_at(cursor)? == TokenKind::Use {
        let use_open = next_significant(stream, cursor)?;
        let use_close = stream.token_at(use_open)?.matching?;
        cursor = next_significant(stream, use_close)?;
    }
    if stream.kind_at(cursor)? != TokenKind::Colon {
        return None;
    }

    let end = stream.find_next(cursor + 1, None, |t| {
        matches!(
            t.kind,
            TokenKind::OpenCurlyBracket | TokenKind::Semicolon | TokenKind::DoubleArrow
        )
    })?;
    type_hint(stream, cursor + 1, end)
}

/// A name in an `implements` or `extends` list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedReference {
    /// Position of the last name segment
    pub position: usize,
    /// Full name as written, e.g. `\Countable` or `Foo\Bar`
    pub name: String,
}

impl NamedReference {
    /// The unqualified name
    pub fn short_name(&self) -> &str {
        self.name.rsplit('\\').next().unwrap_or(&self.name)
    }
}

/// Interfaces listed after `implements` for the class or enum at `class_pos`
pub fn implemented_interfaces(stream: &TokenStream, class_pos: usize) -> Vec<NamedReference> {
    let Some(kind) = stream.kind_at(class_pos) else {
        return Vec::new();
    };
    if !matches!(kind, TokenKind::Class | TokenKind::Enum) {
        return Vec::new();
    }

    let Some(opener) = stream
        .token_at(class_pos)
        .and_then(|t| t.scope)
        .map(|s| s.opener)
    else {
        return Vec::new();
    };

    let Some(implements) = stream.find_next(class_pos + 1, Some(opener), |t| t.is(TokenKind::Implements)) else {
        return Vec::new();
    };

    let mut refs = Vec::new();
    let mut name = String::new();
    let mut last = None;
    for i in implements + 1..opener {
        let Some(token) = stream.token_at(i) else {
            break;
        };
        match token.kind {
            TokenKind::String | TokenKind::NsSeparator | TokenKind::Namespace => {
                name.push_str(&token.content);
                if token.kind == TokenKind::String {
                    last = Some(i);
                }
            }
            TokenKind::Comma => {
                if let Some(position) = last.take() {
                    refs.push(NamedReference {
                        position,
                        name: std::mem::take(&mut name),
                    });
                }
                name.clear();
            }
            _ => {}
        }
    }
    if let Some(position) = last {
        refs.push(NamedReference { position, name });
    }
    refs
}

/// One `name=value` pair of a `declare(...)` statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directive {
    pub name: String,
    pub name_position: usize,
    /// Raw value text, quotes included
    pub value: String,
    pub value_position: Option<usize>,
}

/// Directives of the `declare` keyword at `declare_pos`
pub fn declare_directives(stream: &TokenStream, declare_pos: usize) -> Option<Vec<Directive>> {
    if stream.kind_at(declare_pos)? != TokenKind::Declare {
        return None;
    }
    let open = next_significant(stream, declare_pos)?;
    if stream.kind_at(open)? != TokenKind::OpenParenthesis {
        return None;
    }

    let mut directives = Vec::new();
    for item in split_list(stream, open)? {
        let Some(name_position) = stream.find_next(item.start, Some(item.end), |t| !t.kind.is_empty()) else {
            continue;
        };
        let Some(eq) = stream.find_next(name_position, Some(item.end), |t| t.is(TokenKind::Equal)) else {
            continue;
        };
        let value_position = stream.find_next(eq + 1, Some(item.end), |t| !t.kind.is_empty());
        directives.push(Directive {
            name: stream.significant_content_of(name_position..eq),
            name_position,
            value: stream.content_of(eq + 1..item.end).trim().to_string(),
            value_position,
        });
    }
    Some(directives)
}
