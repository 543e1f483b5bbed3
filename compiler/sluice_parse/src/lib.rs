//! Stage parser: tokens to a [`ParsedChain`].
//!
//! Indentation has already been turned into `Indent`/`Dedent` tokens by the
//! lexer; the parser folds every block into the stage that opens it, so the
//! output is a fully nested tree of chains.

mod cursor;
mod error;
mod grammar;

use sluice_ir::{ParsedChain, StringInterner, TokenList};

pub use cursor::Cursor;
pub use error::{ErrorContext, ParseError, ParseErrorKind};

/// Parse a lexed chain.
#[tracing::instrument(level = "debug", skip_all, fields(tokens = tokens.len()))]
pub fn parse(tokens: &TokenList, interner: &StringInterner) -> Result<ParsedChain, ParseError> {
    let result = grammar::Parser::new(Cursor::new(tokens, interner)).parse_source_chain();
    if let Err(err) = &result {
        tracing::debug!(code = %err.code(), span = %err.span, "parse failed");
    }
    result
}

/// Lex and parse chain source text.
///
/// Lex errors are all reported; otherwise the first parse error is.
pub fn parse_source(
    source: &str,
    interner: &StringInterner,
) -> Result<ParsedChain, Vec<ParseError>> {
    let lexed = sluice_lexer::lex(source, interner);
    if lexed.has_errors() {
        return Err(lexed.errors.into_iter().map(ParseError::from).collect());
    }
    parse(&lexed.tokens, interner).map_err(|e| vec![e])
}

#[cfg(test)]
mod tests;
