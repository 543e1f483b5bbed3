//! Raw logos tokens, before interning and layout.

use logos::Logos;
use sluice_ir::{StringInterner, TokenKind};

use crate::escape::unescape_string;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r]+")] // Skip horizontal whitespace
pub(crate) enum RawToken {
    #[regex(r"//[^\n]*")]
    LineComment,

    #[token("\n")]
    Newline,

    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("match")]
    Match,
    #[token("handle")]
    Handle,
    #[token("Ok")]
    Ok,
    #[token("Err")]
    Err,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("none")]
    None,

    #[token("|>")]
    PipeArrow,
    #[token("|.")]
    PipeDot,
    #[token("|!")]
    PipeBang,
    #[token("|[")]
    PipeBracket,
    #[token("|?")]
    PipeQuestion,
    #[token("|$")]
    PipeDollar,
    #[token("|")]
    Pipe,
    #[token("!?")]
    BangQuestion,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,

    // Range is checked when converting so overflow gets its own error.
    #[regex(r"[0-9][0-9_]*")]
    Int,

    // String literal (no unescaped newlines allowed)
    #[regex(r#""([^"\\\n\r]|\\.)*""#)]
    String,

    // Opening quote with no closing quote on the same line
    #[regex(r#""([^"\\\n\r]|\\.)*"#)]
    UnterminatedString,

    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*")]
    Ident,
}

/// Convert a raw token to a `TokenKind`, interning names and string contents.
///
/// Returns `None` for an integer literal that does not fit in `i64`.
pub(crate) fn convert_token(
    raw: RawToken,
    slice: &str,
    interner: &StringInterner,
) -> Option<TokenKind> {
    let kind = match raw {
        RawToken::Int => TokenKind::Int(slice.replace('_', "").parse::<i64>().ok()?),
        RawToken::String => {
            let content = &slice[1..slice.len() - 1];
            TokenKind::Str(interner.intern(&unescape_string(content)))
        }
        RawToken::Ident => TokenKind::Ident(interner.intern(slice)),

        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::Match => TokenKind::Match,
        RawToken::Handle => TokenKind::Handle,
        RawToken::Ok => TokenKind::Ok,
        RawToken::Err => TokenKind::Err,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::None => TokenKind::None,

        RawToken::PipeArrow => TokenKind::PipeArrow,
        RawToken::PipeDot => TokenKind::PipeDot,
        RawToken::PipeBang => TokenKind::PipeBang,
        RawToken::PipeBracket => TokenKind::PipeBracket,
        RawToken::PipeQuestion => TokenKind::PipeQuestion,
        RawToken::PipeDollar => TokenKind::PipeDollar,
        RawToken::Pipe => TokenKind::Pipe,
        RawToken::BangQuestion => TokenKind::BangQuestion,

        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Colon => TokenKind::Colon,

        // Handled by the caller
        RawToken::LineComment | RawToken::Newline | RawToken::UnterminatedString => {
            TokenKind::Error
        }
    };
    Some(kind)
}
