//! Lexer for Sluice pipe chains using logos with string interning.
//!
//! Produces a [`TokenList`] whose layout tokens (`Newline`, `Indent`,
//! `Dedent`) already encode the block structure. Lex errors are collected
//! alongside the tokens; each bad span also yields a `TokenKind::Error`
//! placeholder so the token stream stays aligned with the source.

mod escape;
mod layout;
mod lex_error;
mod raw_token;

use logos::Logos;
use sluice_ir::{Span, StringInterner, Token, TokenKind, TokenList};

use layout::Layout;
use raw_token::{convert_token, RawToken};

pub use lex_error::{LexError, LexErrorKind};

/// Tokens plus any errors found while producing them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LexOutput {
    pub tokens: TokenList,
    pub errors: Vec<LexError>,
}

impl LexOutput {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Lex one chain's source text.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn lex(source: &str, interner: &StringInterner) -> LexOutput {
    let mut layout = Layout::new(source);
    let mut errors = Vec::new();
    let mut logos = RawToken::lexer(source);

    while let Some(token_result) = logos.next() {
        let span = Span::from_range(logos.span());
        let slice = logos.slice();

        let kind = match token_result {
            Ok(RawToken::LineComment) => continue,
            Ok(RawToken::Newline) => {
                layout.newline(span);
                continue;
            }
            Ok(RawToken::UnterminatedString) => {
                errors.push(LexError::new(LexErrorKind::UnterminatedString, span));
                TokenKind::Error
            }
            Ok(raw) => convert_token(raw, slice, interner).unwrap_or_else(|| {
                errors.push(LexError::new(LexErrorKind::IntOverflow, span));
                TokenKind::Error
            }),
            Err(()) => {
                let bad = slice.chars().next().unwrap_or('\0');
                errors.push(LexError::new(LexErrorKind::InvalidChar(bad), span));
                TokenKind::Error
            }
        };
        layout.token(Token::new(kind, span), &mut errors);
    }

    let eof_pos = u32::try_from(source.len())
        .unwrap_or_else(|_| panic!("chain source exceeds {} bytes", u32::MAX));
    let tokens = layout.finish(Span::point(eof_pos));

    if !errors.is_empty() {
        tracing::debug!(count = errors.len(), "lex errors");
    }
    LexOutput { tokens, errors }
}

#[cfg(test)]
mod tests;
