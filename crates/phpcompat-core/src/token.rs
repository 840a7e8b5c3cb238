//! Token model consumed by the sniffs
//!
//! The token kinds form a closed set. Structural metadata (matching
//! brackets, scope owners, enclosing conditions) is filled in by the
//! tokenizer's structure pass and may be missing for truncated input.
//! Interpolated strings and heredocs are single tokens.

use std::ops::Range;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Layout
    InlineHtml,
    OpenTag,
    OpenTagWithEcho,
    CloseTag,
    Whitespace,
    Comment,
    DocComment,

    // Names and literals
    /// A bare identifier: function, constant or class name
    String,
    Variable,
    LNumber,
    DNumber,
    /// Single-quoted or interpolation-free double-quoted string
    ConstantEncapsedString,
    /// Double-quoted string containing interpolation
    DoubleQuotedString,
    Heredoc,
    Nowdoc,
    Backtick,
    /// `__DIR__`, `__CLASS__` and friends
    MagicConstant,

    // Keywords
    Abstract,
    Array,
    As,
    Break,
    Callable,
    Case,
    Catch,
    Class,
    Clone,
    Const,
    Continue,
    Declare,
    Default,
    Do,
    Echo,
    Else,
    ElseIf,
    Empty,
    EndDeclare,
    EndFor,
    EndForeach,
    EndIf,
    EndSwitch,
    EndWhile,
    Enum,
    Eval,
    Exit,
    Extends,
    Final,
    Finally,
    Fn,
    For,
    Foreach,
    Function,
    Global,
    Goto,
    HaltCompiler,
    If,
    Implements,
    Include,
    IncludeOnce,
    Instanceof,
    Insteadof,
    Interface,
    Isset,
    List,
    LogicalOperator,
    Match,
    Namespace,
    New,
    Print,
    Private,
    Protected,
    Public,
    Readonly,
    Require,
    RequireOnce,
    Return,
    Static,
    Switch,
    Throw,
    Trait,
    Try,
    Unset,
    Use,
    Var,
    While,
    Yield,

    // Punctuation
    OpenParenthesis,
    CloseParenthesis,
    OpenCurlyBracket,
    CloseCurlyBracket,
    OpenSquareBracket,
    CloseSquareBracket,
    Semicolon,
    Comma,
    Colon,
    DoubleColon,
    ObjectOperator,
    NullsafeObjectOperator,
    DoubleArrow,
    NsSeparator,
    Equal,
    QuestionMark,
    Ampersand,
    BitwiseOr,
    Ellipsis,
    AttributeStart,
    Dollar,
    /// Any other operator (`+`, `===`, `??=`, ...)
    Operator,
}

impl TokenKind {
    /// Tokens with no syntactic meaning
    pub fn is_empty(self) -> bool {
        matches!(
            self,
            TokenKind::Whitespace | TokenKind::Comment | TokenKind::DocComment
        )
    }

    /// Tokens that may own a curly-brace scope
    pub fn is_scope_owner(self) -> bool {
        matches!(
            self,
            TokenKind::Class
                | TokenKind::Interface
                | TokenKind::Trait
                | TokenKind::Enum
                | TokenKind::Function
                | TokenKind::Fn
                | TokenKind::Namespace
                | TokenKind::If
                | TokenKind::Else
                | TokenKind::ElseIf
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::For
                | TokenKind::Foreach
                | TokenKind::Switch
                | TokenKind::Match
                | TokenKind::Try
                | TokenKind::Catch
                | TokenKind::Finally
                | TokenKind::Declare
        )
    }

    /// Keywords that become plain identifiers after `->`, `?->`, `::` or in
    /// function/constant declarations
    pub fn is_reserved_word(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Abstract
                | Array
                | As
                | Break
                | Callable
                | Case
                | Catch
                | Class
                | Clone
                | Const
                | Continue
                | Declare
                | Default
                | Do
                | Echo
                | Else
                | ElseIf
                | Empty
                | EndDeclare
                | EndFor
                | EndForeach
                | EndIf
                | EndSwitch
                | EndWhile
                | Enum
                | Eval
                | Exit
                | Extends
                | Final
                | Finally
                | Fn
                | For
                | Foreach
                | Function
                | Global
                | Goto
                | If
                | Implements
                | Include
                | IncludeOnce
                | Instanceof
                | Insteadof
                | Interface
                | Isset
                | List
                | LogicalOperator
                | Match
                | Namespace
                | New
                | Print
                | Private
                | Protected
                | Public
                | Readonly
                | Require
                | RequireOnce
                | Return
                | Static
                | Switch
                | Throw
                | Trait
                | Try
                | Unset
                | Use
                | Var
                | While
                | Yield
        )
    }

    /// String-ish literals
    pub fn is_text_string(self) -> bool {
        matches!(
            self,
            TokenKind::ConstantEncapsedString
                | TokenKind::DoubleQuotedString
                | TokenKind::Heredoc
                | TokenKind::Nowdoc
        )
    }
}

/// A curly-brace scope and the token that owns it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scope {
    pub owner: usize,
    pub opener: usize,
    pub closer: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub content: String,
    pub line: usize,
    pub column: usize,
    /// For brackets and parentheses: index of the matching token
    pub matching: Option<usize>,
    /// For parentheses: the keyword or name the parentheses belong to
    pub paren_owner: Option<usize>,
    /// For scope owners and their braces: the scope
    pub scope: Option<Scope>,
    /// Owners of every scope enclosing this token, outermost first
    pub conditions: Vec<usize>,
}

impl Token {
    pub fn new(kind: TokenKind, content: impl Into<String>, line: usize, column: usize) -> Self {
        Self {
            kind,
            content: content.into(),
            line,
            column,
            matching: None,
            paren_owner: None,
            scope: None,
            conditions: Vec::new(),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    /// Content compared case-insensitively
    pub fn content_eq(&self, other: &str) -> bool {
        self.content.eq_ignore_ascii_case(other)
    }
}

/// The token array of one file
#[derive(Debug, Clone, Default)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self { tokens }
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn token_at(&self, pos: usize) -> Option<&Token> {
        self.tokens.get(pos)
    }

    pub fn kind_at(&self, pos: usize) -> Option<TokenKind> {
        self.tokens.get(pos).map(|t| t.kind)
    }

    /// Search backwards, starting just before `from`
    pub fn find_previous<F>(&self, from: usize, predicate: F) -> Option<usize>
    where
        F: Fn(&Token) -> bool,
    {
        let end = from.min(self.tokens.len());
        (0..end).rev().find(|&i| predicate(&self.tokens[i]))
    }

    /// Search forwards from `from` (inclusive) up to `to` (exclusive)
    pub fn find_next<F>(&self, from: usize, to: Option<usize>, predicate: F) -> Option<usize>
    where
        F: Fn(&Token) -> bool,
    {
        let end = to.unwrap_or(self.tokens.len()).min(self.tokens.len());
        (from..end).find(|&i| predicate(&self.tokens[i]))
    }

    /// Concatenated content of a token range
    pub fn content_of(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.tokens.len());
        let start = range.start.min(end);
        self.tokens[start..end]
            .iter()
            .map(|t| t.content.as_str())
            .collect()
    }

    /// Concatenated content of a token range, skipping whitespace and comments
    pub fn significant_content_of(&self, range: Range<usize>) -> String {
        let end = range.end.min(self.tokens.len());
        let start = range.start.min(end);
        self.tokens[start..end]
            .iter()
            .filter(|t| !t.kind.is_empty())
            .map(|t| t.content.as_str())
            .collect()
    }

    /// Indices of all tokens of the given kinds
    pub fn positions_of<'a>(&'a self, kinds: &'a [TokenKind]) -> impl Iterator<Item = usize> + 'a {
        self.tokens
            .iter()
            .enumerate()
            .filter(move |(_, t)| kinds.contains(&t.kind))
            .map(|(i, _)| i)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stream() -> TokenStream {
        TokenStream::new(vec![
            Token::new(TokenKind::OpenTag, "<?php ", 1, 1),
            Token::new(TokenKind::String, "foo", 1, 7),
            Token::new(TokenKind::OpenParenthesis, "(", 1, 10),
            Token::new(TokenKind::Whitespace, " ", 1, 11),
            Token::new(TokenKind::CloseParenthesis, ")", 1, 12),
            Token::new(TokenKind::Semicolon, ";", 1, 13),
        ])
    }

    #[test]
    fn test_find_previous_and_next() {
        let s = stream();
        assert_eq!(s.find_previous(4, |t| t.is(TokenKind::String)), Some(1));
        assert_eq!(s.find_previous(1, |t| t.is(TokenKind::String)), None);
        assert_eq!(s.find_next(2, None, |t| t.is(TokenKind::Semicolon)), Some(5));
        assert_eq!(s.find_next(2, Some(5), |t| t.is(TokenKind::Semicolon)), None);
        assert_eq!(s.find_next(2, Some(100), |t| t.is(TokenKind::Semicolon)), Some(5));
    }

    #[test]
    fn test_content_helpers() {
        let s = stream();
        assert_eq!(s.content_of(1..5), "foo( )");
        assert_eq!(s.significant_content_of(1..5), "foo()");
        assert_eq!(s.content_of(4..100), ");");
    }

    #[test]
    fn test_kind_predicates() {
        assert!(TokenKind::Comment.is_empty());
        assert!(!TokenKind::String.is_empty());
        assert!(TokenKind::Function.is_scope_owner());
        assert!(TokenKind::List.is_reserved_word());
        assert!(!TokenKind::Variable.is_reserved_word());
    }

    #[test]
    fn test_positions_of() {
        let s = stream();
        let parens: Vec<usize> = s
            .positions_of(&[TokenKind::OpenParenthesis, TokenKind::CloseParenthesis])
            .collect();
        assert_eq!(parens, vec![2, 4]);
    }
}
