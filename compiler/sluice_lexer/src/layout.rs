//! Indentation layout.
//!
//! Turns physical lines into `Newline`, `Indent` and `Dedent` tokens so the
//! parser sees block structure directly:
//!
//! - the column of the first token of the chain is the base level;
//! - a line starting deeper than the current level opens one `Indent`;
//! - a shallower line closes one `Dedent` per level it leaves, and must land
//!   exactly on an enclosing level;
//! - blank and comment-only lines are invisible;
//! - line breaks inside parentheses are ignored.
//!
//! Columns are byte offsets from the start of the line, so a tab counts as one.

use sluice_ir::{Span, Token, TokenKind, TokenList};

use crate::{LexError, LexErrorKind};

pub(crate) struct Layout<'src> {
    source: &'src str,
    out: TokenList,
    /// Open indentation columns. Empty until the first token is seen.
    levels: Vec<u32>,
    paren_depth: u32,
    at_line_start: bool,
}

impl<'src> Layout<'src> {
    pub(crate) fn new(source: &'src str) -> Self {
        Layout {
            source,
            out: TokenList::new(),
            levels: Vec::new(),
            paren_depth: 0,
            at_line_start: true,
        }
    }

    /// Feed a physical line break.
    pub(crate) fn newline(&mut self, span: Span) {
        if self.paren_depth > 0 || self.at_line_start {
            return;
        }
        self.out.push(Token::new(TokenKind::Newline, span));
        self.at_line_start = true;
    }

    /// Feed a significant token, emitting layout tokens before it as needed.
    pub(crate) fn token(&mut self, token: Token, errors: &mut Vec<LexError>) {
        if self.at_line_start && self.paren_depth == 0 {
            self.open_line(token.span, errors);
        }
        self.at_line_start = false;

        match token.kind {
            TokenKind::LParen => self.paren_depth += 1,
            TokenKind::RParen => self.paren_depth = self.paren_depth.saturating_sub(1),
            _ => {}
        }
        self.out.push(token);
    }

    fn open_line(&mut self, span: Span, errors: &mut Vec<LexError>) {
        let column = self.column_of(span.start);
        let Some(&current) = self.levels.last() else {
            self.levels.push(column);
            return;
        };

        if column > current {
            self.levels.push(column);
            self.out.push(Token::new(TokenKind::Indent, Span::point(span.start)));
            return;
        }

        while self.levels.len() > 1 && self.levels.last().is_some_and(|&top| column < top) {
            self.levels.pop();
            self.out.push(Token::new(TokenKind::Dedent, Span::point(span.start)));
        }
        if self.levels.last().is_some_and(|&top| column != top) {
            errors.push(LexError::new(
                LexErrorKind::InconsistentDedent,
                Span::new(span.start - column, span.end),
            ));
        }
    }

    fn column_of(&self, offset: u32) -> u32 {
        let offset = offset as usize;
        let line_start = self.source[..offset].rfind('\n').map_or(0, |i| i + 1);
        // Both offsets come from a span, so the difference fits in u32.
        u32::try_from(offset - line_start).unwrap_or(u32::MAX)
    }

    /// Close the last line and every open block, then append `Eof`.
    pub(crate) fn finish(mut self, eof: Span) -> TokenList {
        if !self.at_line_start {
            self.out.push(Token::new(TokenKind::Newline, eof));
        }
        for _ in 1..self.levels.len() {
            self.out.push(Token::new(TokenKind::Dedent, eof));
        }
        self.out.push(Token::new(TokenKind::Eof, eof));
        self.out
    }
}
