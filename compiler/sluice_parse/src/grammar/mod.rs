//! Recursive-descent grammar for pipe chains.
//!
//! ```text
//! chain    := expr stage*
//! stage    := '|>' target | '|.' target | '|$' target
//!           | '|!' handler?
//!           | '|[' NAME ']' (':' body)?
//!           | '|' 'match' ':' arms
//!           | '|' 'handle' '[' NAME ']' ':' body
//!           | '|?'
//! handler  := '[' NAME ']' ':' body
//!           | NEWLINE INDENT '[' NAME ']' ':' body DEDENT
//! body     := expr | NEWLINE INDENT chain DEDENT
//! ```
//!
//! A chain continues onto the next line when that line starts with a pipe
//! operator at the same column, or one level deeper (a continuation level,
//! closed again when the chain ends).

mod expr;
mod stage;

use sluice_ir::{Body, ParsedChain, Span, Stage, TokenKind};
use sluice_stack::ensure_sufficient_stack;

use crate::{Cursor, ErrorContext, ParseError, ParseErrorKind};

pub(crate) struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    pub(crate) fn new(cursor: Cursor<'a>) -> Self {
        Parser { cursor }
    }

    /// Parse a whole token stream as one chain.
    pub(crate) fn parse_source_chain(&mut self) -> Result<ParsedChain, ParseError> {
        let chain = self.parse_chain()?;
        self.cursor.eat(TokenKind::Newline);
        if self.cursor.is_at_end() {
            Ok(chain)
        } else {
            Err(self
                .cursor
                .unexpected("a pipe operator or end of input")
                .in_context(ErrorContext::Chain))
        }
    }

    fn parse_chain(&mut self) -> Result<ParsedChain, ParseError> {
        ensure_sufficient_stack(|| self.parse_chain_inner())
    }

    fn parse_chain_inner(&mut self) -> Result<ParsedChain, ParseError> {
        let seed = self.parse_expr()?;
        let mut stages = Vec::new();
        let mut open_levels = 0;

        loop {
            if self.cursor.current_kind().is_pipe_op() {
                stages.push(self.parse_stage()?);
                continue;
            }
            match self.continue_on_next_line(open_levels) {
                Some(levels) => open_levels = levels,
                None => break,
            }
        }

        for _ in 0..open_levels {
            self.close_block()?;
        }

        let end = stages.last().map_or(seed.span, |s: &Stage| s.span);
        let span = seed.span.merge(end);
        Ok(ParsedChain { seed, stages, span })
    }

    /// If the chain continues past a line break, consume the layout tokens in
    /// between and return the new number of open continuation levels.
    fn continue_on_next_line(&mut self, open_levels: usize) -> Option<usize> {
        let newline = self.cursor.check(TokenKind::Newline);
        let mut ahead = usize::from(newline);

        let mut closed = 0;
        while closed < open_levels && self.cursor.peek_kind(ahead) == TokenKind::Dedent {
            ahead += 1;
            closed += 1;
        }
        let mut opened = 0;
        if newline && closed == 0 && self.cursor.peek_kind(ahead) == TokenKind::Indent {
            ahead += 1;
            opened = 1;
        }

        if ahead == 0 || !self.cursor.peek_kind(ahead).is_pipe_op() {
            return None;
        }
        for _ in 0..ahead {
            self.cursor.advance();
        }
        Some(open_levels - closed + opened)
    }

    /// Parse the body after a `:` block opener, inline or indented.
    fn parse_body(&mut self, opener: &'static str) -> Result<Body, ParseError> {
        if self.cursor.check(TokenKind::Newline) {
            self.open_block(opener)?;
            let chain = self.parse_chain()?;
            self.close_block()?;
            Ok(Body {
                chain,
                inline: false,
            })
        } else {
            let expr = self.parse_expr()?;
            Ok(Body {
                chain: ParsedChain::from_expr(expr),
                inline: true,
            })
        }
    }

    /// Consume `NEWLINE INDENT`, reporting a missing or empty block.
    fn open_block(&mut self, opener: &'static str) -> Result<(), ParseError> {
        if !self.cursor.check(TokenKind::Newline) {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedIndentedBlock { opener },
                self.cursor.current_span(),
            ));
        }

        let mut ahead = 1;
        while self.cursor.peek_kind(ahead) == TokenKind::Dedent {
            ahead += 1;
        }
        if self.cursor.peek_kind(ahead) == TokenKind::Eof {
            return Err(ParseError::new(
                ParseErrorKind::EmptyBlock { opener },
                self.cursor.previous_span(),
            ));
        }
        if self.cursor.peek_kind(1) != TokenKind::Indent {
            return Err(ParseError::new(
                ParseErrorKind::ExpectedIndentedBlock { opener },
                self.cursor.peek_token(ahead).span,
            ));
        }

        self.cursor.advance();
        self.cursor.advance();
        Ok(())
    }

    fn close_block(&mut self) -> Result<Span, ParseError> {
        self.cursor.eat(TokenKind::Newline);
        self.cursor.expect(TokenKind::Dedent)
    }
}
