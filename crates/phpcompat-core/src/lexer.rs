//! PHP tokenizer - turns source text into a [`TokenStream`]
//!
//! Raw tokens come from the `mago-syntax` lexer and are mapped onto the
//! closed [`TokenKind`] set:
//! - qualified names are split into name and separator tokens
//! - interpolated strings, heredocs and shell commands are merged back into
//!   single tokens
//! - lexer errors are skipped, so malformed input still produces a stream
//!
//! Two passes then run over the token array:
//! - re-tagging keywords used as plain names (`$obj->list`, `Foo::print`,
//!   `function exit()`, `Foo::class`)
//! - structure: bracket matching, parenthesis owners, scope owners and the
//!   conditions enclosing every token

use mago_database::file::FileId;
use mago_syntax::lexer::Lexer;
use mago_syntax::settings::LexerSettings;
use mago_syntax::token::{DocumentKind, Token as RawToken, TokenKind as RawKind};
use mago_syntax_core::input::Input;

use crate::token::{Scope, Token, TokenKind, TokenStream};

/// Tokenize PHP source, including the structure passes
pub fn tokenize(source: &str) -> TokenStream {
    let raw = lex(source);
    let mut tokens = map_tokens(source, &raw);
    retag_names(&mut tokens);
    match_brackets(&mut tokens);
    assign_scopes(&mut tokens);
    assign_conditions(&mut tokens);
    TokenStream::new(tokens)
}

fn lex(source: &str) -> Vec<RawToken<'_>> {
    let input = Input::new(FileId::zero(), source.as_bytes());
    let mut lexer = Lexer::new(input, LexerSettings::default());
    let mut raw = Vec::new();
    while let Some(result) = lexer.advance() {
        // The lexer consumes the offending bytes before reporting an error
        if let Ok(token) = result {
            raw.push(token);
        }
    }
    raw
}

/// Byte offsets of line starts, for turning offsets into line and column
struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { source, starts }
    }

    /// 1-based line and character column of a byte offset
    fn locate(&self, offset: usize) -> (usize, usize) {
        let line = self.starts.partition_point(|&start| start <= offset).max(1);
        let line_start = self.starts[line - 1];
        let column = self
            .source
            .get(line_start..offset)
            .map_or(offset.saturating_sub(line_start), |text| text.chars().count());
        (line, column + 1)
    }

    fn text(&self, range: std::ops::Range<usize>) -> String {
        self.source
            .as_bytes()
            .get(range)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
            .unwrap_or_default()
    }
}

fn raw_offset(token: &RawToken<'_>) -> usize {
    token.start.offset as usize
}

fn raw_end(token: &RawToken<'_>) -> usize {
    raw_offset(token) + token.value.len()
}

fn map_tokens(source: &str, raw: &[RawToken<'_>]) -> Vec<Token> {
    let index = LineIndex::new(source);
    let mut tokens = Vec::with_capacity(raw.len());
    let push = |tokens: &mut Vec<Token>, kind: TokenKind, start: usize, end: usize| {
        let (line, column) = index.locate(start);
        tokens.push(Token::new(kind, index.text(start..end), line, column));
    };

    let mut i = 0;
    while i < raw.len() {
        let token = &raw[i];
        let start = raw_offset(token);

        let merged = match token.kind {
            RawKind::DoubleQuote => Some((TokenKind::DoubleQuotedString, closing(raw, i, RawKind::DoubleQuote))),
            RawKind::Backtick => Some((TokenKind::Backtick, closing(raw, i, RawKind::Backtick))),
            RawKind::DocumentStart(document) => {
                let kind = match document {
                    DocumentKind::Heredoc => TokenKind::Heredoc,
                    DocumentKind::Nowdoc => TokenKind::Nowdoc,
                };
                Some((kind, closing(raw, i, RawKind::DocumentEnd)))
            }
            _ => None,
        };
        if let Some((kind, last)) = merged {
            push(&mut tokens, kind, start, raw_end(&raw[last]));
            i = last + 1;
            continue;
        }

        match token.kind {
            RawKind::QualifiedIdentifier | RawKind::FullyQualifiedIdentifier => {
                split_name(token, &mut |kind, from, to| push(&mut tokens, kind, from, to));
            }
            kind => push(&mut tokens, map_kind(kind), start, raw_end(token)),
        }
        i += 1;
    }
    tokens
}

/// Index of the token closing the construct opened at `open`, or the last
/// token when it is never closed
fn closing(raw: &[RawToken<'_>], open: usize, closer: RawKind) -> usize {
    (open + 1..raw.len())
        .find(|&j| raw[j].kind == closer)
        .unwrap_or(raw.len() - 1)
}

/// Split `Foo\Bar` and `\Foo\Bar` into name and separator tokens
fn split_name(token: &RawToken<'_>, emit: &mut dyn FnMut(TokenKind, usize, usize)) {
    let base = raw_offset(token);
    let mut piece_start = 0;
    for (i, &byte) in token.value.iter().enumerate() {
        if byte != b'\\' {
            continue;
        }
        if i > piece_start {
            emit(name_kind(&token.value[piece_start..i]), base + piece_start, base + i);
        }
        emit(TokenKind::NsSeparator, base + i, base + i + 1);
        piece_start = i + 1;
    }
    if piece_start < token.value.len() {
        emit(name_kind(&token.value[piece_start..]), base + piece_start, base + token.value.len());
    }
}

fn name_kind(piece: &[u8]) -> TokenKind {
    if piece.eq_ignore_ascii_case(b"namespace") {
        TokenKind::Namespace
    } else {
        TokenKind::String
    }
}

fn map_kind(kind: RawKind) -> TokenKind {
    match kind {
        RawKind::InlineText | RawKind::InlineShebang => TokenKind::InlineHtml,
        RawKind::OpenTag | RawKind::ShortOpenTag => TokenKind::OpenTag,
        RawKind::EchoTag => TokenKind::OpenTagWithEcho,
        RawKind::CloseTag => TokenKind::CloseTag,
        RawKind::Whitespace => TokenKind::Whitespace,
        RawKind::SingleLineComment | RawKind::HashComment | RawKind::MultiLineComment => TokenKind::Comment,
        RawKind::DocBlockComment => TokenKind::DocComment,

        RawKind::Identifier
        | RawKind::Self_
        | RawKind::Parent
        | RawKind::True
        | RawKind::False
        | RawKind::Null
        | RawKind::From
        | RawKind::OffsetString
        | RawKind::StringVariableName => TokenKind::String,
        RawKind::Variable => TokenKind::Variable,
        RawKind::LiteralInteger | RawKind::OffsetNumber => TokenKind::LNumber,
        RawKind::LiteralFloat => TokenKind::DNumber,
        RawKind::LiteralString | RawKind::PartialLiteralString | RawKind::StringPart => {
            TokenKind::ConstantEncapsedString
        }
        RawKind::ClassConstant
        | RawKind::TraitConstant
        | RawKind::FunctionConstant
        | RawKind::MethodConstant
        | RawKind::LineConstant
        | RawKind::FileConstant
        | RawKind::DirConstant
        | RawKind::NamespaceConstant
        | RawKind::PropertyConstant => TokenKind::MagicConstant,

        RawKind::Abstract => TokenKind::Abstract,
        RawKind::Array => TokenKind::Array,
        RawKind::As => TokenKind::As,
        RawKind::Break => TokenKind::Break,
        RawKind::Callable => TokenKind::Callable,
        RawKind::Case => TokenKind::Case,
        RawKind::Catch => TokenKind::Catch,
        RawKind::Class => TokenKind::Class,
        RawKind::Clone => TokenKind::Clone,
        RawKind::Const => TokenKind::Const,
        RawKind::Continue => TokenKind::Continue,
        RawKind::Declare => TokenKind::Declare,
        RawKind::Default => TokenKind::Default,
        RawKind::Do => TokenKind::Do,
        RawKind::Echo => TokenKind::Echo,
        RawKind::Else => TokenKind::Else,
        RawKind::ElseIf => TokenKind::ElseIf,
        RawKind::Empty => TokenKind::Empty,
        RawKind::EndDeclare => TokenKind::EndDeclare,
        RawKind::EndFor => TokenKind::EndFor,
        RawKind::EndForeach => TokenKind::EndForeach,
        RawKind::EndIf => TokenKind::EndIf,
        RawKind::EndSwitch => TokenKind::EndSwitch,
        RawKind::EndWhile => TokenKind::EndWhile,
        RawKind::Enum => TokenKind::Enum,
        RawKind::Eval => TokenKind::Eval,
        RawKind::Exit | RawKind::Die => TokenKind::Exit,
        RawKind::Extends => TokenKind::Extends,
        RawKind::Final => TokenKind::Final,
        RawKind::Finally => TokenKind::Finally,
        RawKind::Fn => TokenKind::Fn,
        RawKind::For => TokenKind::For,
        RawKind::Foreach => TokenKind::Foreach,
        RawKind::Function => TokenKind::Function,
        RawKind::Global => TokenKind::Global,
        RawKind::Goto => TokenKind::Goto,
        RawKind::HaltCompiler => TokenKind::HaltCompiler,
        RawKind::If => TokenKind::If,
        RawKind::Implements => TokenKind::Implements,
        RawKind::Include => TokenKind::Include,
        RawKind::IncludeOnce => TokenKind::IncludeOnce,
        RawKind::Instanceof => TokenKind::Instanceof,
        RawKind::Insteadof => TokenKind::Insteadof,
        RawKind::Interface => TokenKind::Interface,
        RawKind::Isset => TokenKind::Isset,
        RawKind::List => TokenKind::List,
        RawKind::And | RawKind::Or | RawKind::Xor => TokenKind::LogicalOperator,
        RawKind::Match => TokenKind::Match,
        RawKind::Namespace => TokenKind::Namespace,
        RawKind::New => TokenKind::New,
        RawKind::Print => TokenKind::Print,
        RawKind::Private | RawKind::PrivateSet => TokenKind::Private,
        RawKind::Protected | RawKind::ProtectedSet => TokenKind::Protected,
        RawKind::Public | RawKind::PublicSet => TokenKind::Public,
        RawKind::Readonly => TokenKind::Readonly,
        RawKind::Require => TokenKind::Require,
        RawKind::RequireOnce => TokenKind::RequireOnce,
        RawKind::Return => TokenKind::Return,
        RawKind::Static => TokenKind::Static,
        RawKind::Switch => TokenKind::Switch,
        RawKind::Throw => TokenKind::Throw,
        RawKind::Trait => TokenKind::Trait,
        RawKind::Try => TokenKind::Try,
        RawKind::Unset => TokenKind::Unset,
        RawKind::Use => TokenKind::Use,
        RawKind::Var => TokenKind::Var,
        RawKind::While => TokenKind::While,
        RawKind::Yield => TokenKind::Yield,

        RawKind::LeftParenthesis => TokenKind::OpenParenthesis,
        RawKind::RightParenthesis => TokenKind::CloseParenthesis,
        RawKind::LeftBrace => TokenKind::OpenCurlyBracket,
        RawKind::RightBrace => TokenKind::CloseCurlyBracket,
        RawKind::LeftBracket => TokenKind::OpenSquareBracket,
        RawKind::RightBracket => TokenKind::CloseSquareBracket,
        RawKind::Semicolon => TokenKind::Semicolon,
        RawKind::Comma => TokenKind::Comma,
        RawKind::Colon => TokenKind::Colon,
        RawKind::ColonColon => TokenKind::DoubleColon,
        RawKind::MinusGreaterThan => TokenKind::ObjectOperator,
        RawKind::QuestionMinusGreaterThan => TokenKind::NullsafeObjectOperator,
        RawKind::EqualGreaterThan => TokenKind::DoubleArrow,
        RawKind::NamespaceSeparator => TokenKind::NsSeparator,
        RawKind::Equal => TokenKind::Equal,
        RawKind::Question => TokenKind::QuestionMark,
        RawKind::Ampersand => TokenKind::Ampersand,
        RawKind::Pipe => TokenKind::BitwiseOr,
        RawKind::DotDotDot => TokenKind::Ellipsis,
        RawKind::HashLeftBracket => TokenKind::AttributeStart,
        RawKind::Dollar | RawKind::DollarLeftBrace => TokenKind::Dollar,

        // Casts, arithmetic, comparison and assignment operators
        _ => TokenKind::Operator,
    }
}

fn prev_significant(tokens: &[Token], pos: usize) -> Option<usize> {
    (0..pos).rev().find(|&i| !tokens[i].kind.is_empty())
}

fn next_significant(tokens: &[Token], pos: usize) -> Option<usize> {
    (pos + 1..tokens.len()).find(|&i| !tokens[i].kind.is_empty())
}

/// Keywords used as names become `String` tokens
fn retag_names(tokens: &mut [Token]) {
    for i in 0..tokens.len() {
        let kind = tokens[i].kind;

        if kind == TokenKind::Enum {
            // `enum` is only a keyword when a name follows it
            let named = next_significant(tokens, i)
                .is_some_and(|n| tokens[n].kind == TokenKind::String);
            let member = prev_significant(tokens, i).is_some_and(|p| {
                matches!(
                    tokens[p].kind,
                    TokenKind::ObjectOperator | TokenKind::NullsafeObjectOperator | TokenKind::DoubleColon
                )
            });
            if !named || member {
                tokens[i].kind = TokenKind::String;
            }
            continue;
        }

        if !kind.is_reserved_word() && kind != TokenKind::MagicConstant {
            continue;
        }

        let Some(prev) = prev_significant(tokens, i) else {
            continue;
        };

        let member = matches!(
            tokens[prev].kind,
            TokenKind::ObjectOperator | TokenKind::NullsafeObjectOperator | TokenKind::DoubleColon
        );

        let declared_name = kind != TokenKind::MagicConstant
            && match tokens[prev].kind {
                TokenKind::Function | TokenKind::Const => true,
                TokenKind::Ampersand => prev_significant(tokens, prev)
                    .is_some_and(|pp| tokens[pp].kind == TokenKind::Function),
                _ => false,
            };

        if member || declared_name {
            tokens[i].kind = TokenKind::String;
        }
    }
}

/// Match parentheses, square brackets and curly braces, and record
/// parenthesis owners
fn match_brackets(tokens: &mut [Token]) {
    let mut parens: Vec<usize> = Vec::new();
    let mut squares: Vec<usize> = Vec::new();
    let mut curlies: Vec<usize> = Vec::new();

    for i in 0..tokens.len() {
        let (stack, is_open) = match tokens[i].kind {
            TokenKind::OpenParenthesis => (&mut parens, true),
            TokenKind::CloseParenthesis => (&mut parens, false),
            TokenKind::OpenSquareBracket => (&mut squares, true),
            TokenKind::CloseSquareBracket => (&mut squares, false),
            TokenKind::OpenCurlyBracket => (&mut curlies, true),
            TokenKind::CloseCurlyBracket => (&mut curlies, false),
            _ => continue,
        };

        if is_open {
            stack.push(i);
        } else if let Some(open) = stack.pop() {
            tokens[open].matching = Some(i);
            tokens[i].matching = Some(open);
        }
    }

    for i in 0..tokens.len() {
        if tokens[i].kind != TokenKind::OpenParenthesis {
            continue;
        }
        let Some(prev) = prev_significant(tokens, i) else {
            continue;
        };
        let owns = matches!(
            tokens[prev].kind,
            TokenKind::String
                | TokenKind::Variable
                | TokenKind::Function
                | TokenKind::Fn
                | TokenKind::Array
                | TokenKind::List
                | TokenKind::Isset
                | TokenKind::Unset
                | TokenKind::Empty
                | TokenKind::Eval
                | TokenKind::Exit
                | TokenKind::If
                | TokenKind::ElseIf
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Foreach
                | TokenKind::Switch
                | TokenKind::Match
                | TokenKind::Catch
                | TokenKind::Declare
                | TokenKind::Use
                | TokenKind::Class
                | TokenKind::Static
                | TokenKind::HaltCompiler
        );
        if owns {
            tokens[i].paren_owner = Some(prev);
            if let Some(close) = tokens[i].matching {
                tokens[close].paren_owner = Some(prev);
            }
        }
    }
}

/// Find the owner of every curly-brace scope
fn assign_scopes(tokens: &mut [Token]) {
    for open in 0..tokens.len() {
        if tokens[open].kind != TokenKind::OpenCurlyBracket {
            continue;
        }
        let Some(close) = tokens[open].matching else {
            continue;
        };
        let Some(owner) = find_scope_owner(tokens, open) else {
            continue;
        };

        let scope = Scope {
            owner,
            opener: open,
            closer: close,
        };
        tokens[owner].scope = Some(scope);
        tokens[open].scope = Some(scope);
        tokens[close].scope = Some(scope);
    }
}

fn find_scope_owner(tokens: &[Token], open: usize) -> Option<usize> {
    let mut i = open;
    while i > 0 {
        i -= 1;
        let kind = tokens[i].kind;
        match kind {
            TokenKind::Semicolon
            | TokenKind::OpenCurlyBracket
            | TokenKind::CloseCurlyBracket
            | TokenKind::OpenParenthesis
            | TokenKind::OpenSquareBracket
            | TokenKind::OpenTag
            | TokenKind::OpenTagWithEcho
            | TokenKind::CloseTag => return None,
            TokenKind::CloseParenthesis => {
                i = tokens[i].matching?;
            }
            // A scope owner already bound to an earlier brace (`else` after
            // an `if` block) cannot own this one
            k if k.is_scope_owner() && tokens[i].scope.is_none() => return Some(i),
            _ => {}
        }
    }
    None
}

/// Record, for every token, the owners of the scopes around it
fn assign_conditions(tokens: &mut [Token]) {
    let mut scopes: Vec<(usize, usize)> = Vec::new();

    for i in 0..tokens.len() {
        while scopes.last().is_some_and(|&(_, closer)| closer <= i) {
            scopes.pop();
        }

        tokens[i].conditions = scopes.iter().map(|&(owner, _)| owner).collect();

        if let Some(scope) = tokens[i].scope {
            if tokens[i].kind == TokenKind::OpenCurlyBracket && scope.opener == i {
                scopes.push((scope.owner, scope.closer));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .tokens()
            .iter()
            .filter(|t| !t.kind.is_empty())
            .map(|t| t.kind)
            .collect()
    }

    fn find(stream: &TokenStream, content: &str) -> usize {
        stream
            .tokens()
            .iter()
            .position(|t| t.content == content)
            .unwrap_or_else(|| panic!("token {:?} not found", content))
    }

    #[test]
    fn test_inline_html_and_tags() {
        let stream = tokenize("<html><?php echo 1; ?>\n</html>");
        let tokens = stream.tokens();
        assert_eq!(tokens[0].kind, TokenKind::InlineHtml);
        assert_eq!(tokens[0].content, "<html>");
        assert_eq!(tokens[1].kind, TokenKind::OpenTag);
        assert!(tokens.iter().any(|t| t.kind == TokenKind::CloseTag && t.content == "?>"));
        let last = tokens.last().unwrap();
        assert_eq!(last.kind, TokenKind::InlineHtml);
        assert_eq!(last.content, "\n</html>");
    }

    #[test]
    fn test_basic_statement() {
        assert_eq!(
            kinds("<?php $x = array_column($rows, 'id');"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Variable,
                TokenKind::Equal,
                TokenKind::String,
                TokenKind::OpenParenthesis,
                TokenKind::Variable,
                TokenKind::Comma,
                TokenKind::ConstantEncapsedString,
                TokenKind::CloseParenthesis,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_line_and_column() {
        let stream = tokenize("<?php\n  foo();");
        let idx = find(&stream, "foo");
        assert_eq!(stream.tokens()[idx].line, 2);
        assert_eq!(stream.tokens()[idx].column, 3);
    }

    #[test]
    fn test_comments() {
        let stream = tokenize("<?php // one\n# two\n/* three */ /** four */ #[Attr]");
        let k: Vec<TokenKind> = stream.tokens().iter().map(|t| t.kind).collect();
        assert_eq!(k.iter().filter(|&&k| k == TokenKind::Comment).count(), 3);
        assert!(k.contains(&TokenKind::DocComment));
        assert!(k.contains(&TokenKind::AttributeStart));
    }

    #[test]
    fn test_strings() {
        let stream = tokenize(r#"<?php 'a\'b'; "plain"; "hi $name"; `ls`;"#);
        let strings: Vec<(TokenKind, &str)> = stream
            .tokens()
            .iter()
            .filter(|t| t.kind.is_text_string() || t.kind == TokenKind::Backtick)
            .map(|t| (t.kind, t.content.as_str()))
            .collect();
        assert_eq!(
            strings,
            vec![
                (TokenKind::ConstantEncapsedString, r"'a\'b'"),
                (TokenKind::ConstantEncapsedString, "\"plain\""),
                (TokenKind::DoubleQuotedString, "\"hi $name\""),
                (TokenKind::Backtick, "`ls`"),
            ]
        );
    }

    #[test]
    fn test_heredoc_and_nowdoc() {
        let source = "<?php\n$a = <<<EOT\nHello $x\n  EOT;\n$b = <<<'RAW'\nraw\nRAW;\nfoo();";
        let stream = tokenize(source);
        let heredoc = stream.tokens().iter().find(|t| t.kind == TokenKind::Heredoc).unwrap();
        assert!(heredoc.content.ends_with("EOT"));
        let nowdoc = stream.tokens().iter().find(|t| t.kind == TokenKind::Nowdoc).unwrap();
        assert_eq!(nowdoc.content, "<<<'RAW'\nraw\nRAW");
        let foo = find(&stream, "foo");
        assert_eq!(stream.tokens()[foo].kind, TokenKind::String);
        assert_eq!(stream.tokens()[foo].line, 8);
    }

    #[test]
    fn test_numbers() {
        let stream = tokenize("<?php 1; 0x1F; 0b101; 1_000; 1.5; .5; 1e10; 2;");
        let nums: Vec<TokenKind> = stream
            .tokens()
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::LNumber | TokenKind::DNumber))
            .map(|t| t.kind)
            .collect();
        assert_eq!(
            nums,
            vec![
                TokenKind::LNumber,
                TokenKind::LNumber,
                TokenKind::LNumber,
                TokenKind::LNumber,
                TokenKind::DNumber,
                TokenKind::DNumber,
                TokenKind::DNumber,
                TokenKind::LNumber,
            ]
        );
    }

    #[test]
    fn test_operators() {
        assert_eq!(
            kinds("<?php $a?->b::c->d => ...$e;"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Variable,
                TokenKind::NullsafeObjectOperator,
                TokenKind::String,
                TokenKind::DoubleColon,
                TokenKind::String,
                TokenKind::ObjectOperator,
                TokenKind::String,
                TokenKind::DoubleArrow,
                TokenKind::Ellipsis,
                TokenKind::Variable,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        assert_eq!(
            kinds("<?php FUNCTION Foo() {} Die;"),
            vec![
                TokenKind::OpenTag,
                TokenKind::Function,
                TokenKind::String,
                TokenKind::OpenParenthesis,
                TokenKind::CloseParenthesis,
                TokenKind::OpenCurlyBracket,
                TokenKind::CloseCurlyBracket,
                TokenKind::Exit,
                TokenKind::Semicolon,
            ]
        );
    }

    #[test]
    fn test_keywords_as_member_names_are_retagged() {
        let stream = tokenize("<?php $obj->list(); Foo::print(); Foo::class; function exit() {} const FINALLY = 1;");
        for name in ["list", "print", "class", "exit", "FINALLY"] {
            let idx = find(&stream, name);
            assert_eq!(stream.tokens()[idx].kind, TokenKind::String, "{}", name);
        }
    }

    #[test]
    fn test_enum_is_contextual() {
        let stream = tokenize("<?php enum Suit {} $enum = enum_exists('x'); Foo::enum;");
        assert_eq!(stream.tokens()[find(&stream, "enum")].kind, TokenKind::Enum);
        assert_eq!(stream.tokens()[find(&stream, "enum_exists")].kind, TokenKind::String);
        let last_enum = stream
            .tokens()
            .iter()
            .rposition(|t| t.content == "enum")
            .unwrap();
        assert_eq!(stream.tokens()[last_enum].kind, TokenKind::String);
    }

    #[test]
    fn test_bracket_matching_and_paren_owner() {
        let stream = tokenize("<?php foo([1, 2], bar());");
        let tokens = stream.tokens();
        let foo = find(&stream, "foo");
        let open = foo + 1;
        assert_eq!(tokens[open].kind, TokenKind::OpenParenthesis);
        assert_eq!(tokens[open].paren_owner, Some(foo));
        let close = tokens[open].matching.unwrap();
        assert_eq!(tokens[close].kind, TokenKind::CloseParenthesis);
        assert_eq!(tokens[close].matching, Some(open));
        let bar = find(&stream, "bar");
        assert_eq!(tokens[bar + 1].paren_owner, Some(bar));
    }

    #[test]
    fn test_scopes_and_conditions() {
        let source = "<?php\nclass A {\n  function b() {\n    if ($x) { foo(); } else { bar(); }\n  }\n}";
        let stream = tokenize(source);
        let tokens = stream.tokens();

        let class = find(&stream, "class");
        let function = find(&stream, "function");
        let if_kw = find(&stream, "if");
        let else_kw = find(&stream, "else");

        assert!(tokens[class].scope.is_some());
        assert!(tokens[function].scope.is_some());
        assert!(tokens[else_kw].scope.is_some());

        let foo = find(&stream, "foo");
        assert_eq!(tokens[foo].conditions, vec![class, function, if_kw]);
        let bar = find(&stream, "bar");
        assert_eq!(tokens[bar].conditions, vec![class, function, else_kw]);

        // The function name is outside the function's own scope
        let b = find(&stream, "b");
        assert_eq!(tokens[b].conditions, vec![class]);
    }

    #[test]
    fn test_closure_scope_owner() {
        let stream = tokenize("<?php $f = function ($a) use ($b): int { return 1; };");
        let function = find(&stream, "function");
        let ret = find(&stream, "return");
        assert_eq!(stream.tokens()[ret].conditions, vec![function]);
    }

    #[test]
    fn test_unbalanced_input_is_tolerated() {
        let stream = tokenize("<?php function foo( { if (");
        let tokens = stream.tokens();
        let open = tokens
            .iter()
            .position(|t| t.kind == TokenKind::OpenParenthesis)
            .unwrap();
        assert_eq!(tokens[open].matching, None);
        assert!(tokens.iter().all(|t| t.scope.is_none()));
    }

    #[test]
    fn test_group_use_braces_have_no_owner() {
        let stream = tokenize("<?php use Foo\\{A, B};");
        let open = find(&stream, "{");
        assert!(stream.tokens()[open].matching.is_some());
        assert!(stream.tokens()[open].scope.is_none());
    }

    #[test]
    fn test_qualified_names_are_split() {
        let stream = tokenize("<?php \\Foo\\Bar::baz(); namespace\\qux();");
        let pieces: Vec<(TokenKind, &str)> = stream
            .tokens()
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::String | TokenKind::NsSeparator | TokenKind::Namespace))
            .map(|t| (t.kind, t.content.as_str()))
            .collect();
        assert_eq!(
            pieces,
            vec![
                (TokenKind::NsSeparator, "\\"),
                (TokenKind::String, "Foo"),
                (TokenKind::NsSeparator, "\\"),
                (TokenKind::String, "Bar"),
                (TokenKind::String, "baz"),
                (TokenKind::Namespace, "namespace"),
                (TokenKind::NsSeparator, "\\"),
                (TokenKind::String, "qux"),
            ]
        );
        let bar = find(&stream, "Bar");
        assert_eq!(stream.tokens()[bar].column, 12);
    }

    #[test]
    fn test_casts_are_single_operators() {
        let stream = tokenize("<?php $a = (int) $b;");
        let cast = find(&stream, "(int)");
        assert_eq!(stream.tokens()[cast].kind, TokenKind::Operator);
        assert!(stream.tokens().iter().all(|t| t.kind != TokenKind::OpenParenthesis));
    }

    #[test]
    fn test_lexer_errors_are_skipped() {
        let stream = tokenize("<?php foo(); \u{1} bar();");
        assert_eq!(stream.tokens()[find(&stream, "foo")].kind, TokenKind::String);
        let bar = find(&stream, "bar");
        assert_eq!(stream.tokens()[bar].kind, TokenKind::String);
        assert_eq!(stream.tokens()[bar].column, 16);
    }
}
