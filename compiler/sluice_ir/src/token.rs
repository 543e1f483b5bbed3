//! Token types produced by the lexer.
//!
//! Layout is explicit in the stream: `Newline` ends a logical line, `Indent`
//! opens a deeper block and `Dedent` closes one. The parser never looks at
//! whitespace directly.

use crate::{Name, Span};
use std::fmt;

/// A token with its source location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    #[inline]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }
}

/// Token kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Literals
    Int(i64),
    Str(Name),
    Ident(Name),

    // Keywords
    If,
    Else,
    Match,
    Handle,
    Ok,
    Err,
    True,
    False,
    None,

    // Pipe operators
    /// `|>`
    PipeArrow,
    /// `|.`
    PipeDot,
    /// `|!`
    PipeBang,
    /// `|[`
    PipeBracket,
    /// `|?`
    PipeQuestion,
    /// `|$`
    PipeDollar,
    /// `|` (only valid before `match` / `handle`)
    Pipe,
    /// `!?` conditional-unwrap suffix
    BangQuestion,

    // Punctuation
    LParen,
    RParen,
    LBracket,
    RBracket,
    Comma,
    Colon,

    // Layout
    Newline,
    Indent,
    Dedent,

    /// Placeholder for a span the lexer could not tokenize.
    Error,
    Eof,
}

impl TokenKind {
    /// True for tokens that start a pipe stage.
    pub fn is_pipe_op(self) -> bool {
        matches!(
            self,
            TokenKind::PipeArrow
                | TokenKind::PipeDot
                | TokenKind::PipeBang
                | TokenKind::PipeBracket
                | TokenKind::PipeQuestion
                | TokenKind::PipeDollar
                | TokenKind::Pipe
        )
    }

    /// Human-readable description used in diagnostics.
    pub fn display_name(self) -> &'static str {
        match self {
            TokenKind::Int(_) => "integer",
            TokenKind::Str(_) => "string",
            TokenKind::Ident(_) => "identifier",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::Match => "`match`",
            TokenKind::Handle => "`handle`",
            TokenKind::Ok => "`Ok`",
            TokenKind::Err => "`Err`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::None => "`none`",
            TokenKind::PipeArrow => "`|>`",
            TokenKind::PipeDot => "`|.`",
            TokenKind::PipeBang => "`|!`",
            TokenKind::PipeBracket => "`|[`",
            TokenKind::PipeQuestion => "`|?`",
            TokenKind::PipeDollar => "`|$`",
            TokenKind::Pipe => "`|`",
            TokenKind::BangQuestion => "`!?`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Colon => "`:`",
            TokenKind::Newline => "end of line",
            TokenKind::Indent => "indentation",
            TokenKind::Dedent => "end of block",
            TokenKind::Error => "invalid token",
            TokenKind::Eof => "end of input",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Lexer output: tokens terminated by `Eof`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TokenList {
    tokens: Vec<Token>,
}

impl TokenList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }

    /// Get the token at `index`, if any.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    /// The last token pushed.
    #[inline]
    pub fn last(&self) -> Option<&Token> {
        self.tokens.last()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Token> {
        self.tokens.iter()
    }

    /// Token kinds only, handy in tests.
    pub fn kinds(&self) -> Vec<TokenKind> {
        self.tokens.iter().map(|t| t.kind).collect()
    }
}

impl<'a> IntoIterator for &'a TokenList {
    type Item = &'a Token;
    type IntoIter = std::slice::Iter<'a, Token>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
