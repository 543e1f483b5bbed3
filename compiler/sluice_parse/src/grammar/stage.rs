//! Pipe stage parsing.

use sluice_ir::{CallTarget, Handler, MatchArm, ResultTag, Stage, StageKind, TokenKind};

use super::Parser;
use crate::{ErrorContext, ParseError, ParseErrorKind};

impl Parser<'_> {
    pub(super) fn parse_stage(&mut self) -> Result<Stage, ParseError> {
        let op = *self.cursor.advance();

        let kind = match op.kind {
            TokenKind::PipeArrow => StageKind::Transform(self.parse_call_target()?),
            TokenKind::PipeDot => StageKind::MethodCall(self.parse_call_target()?),
            TokenKind::PipeDollar => StageKind::Tap(self.parse_call_target()?),
            TokenKind::PipeBang => StageKind::Bang {
                handler: self.parse_bang_handler()?,
            },
            TokenKind::PipeBracket => self
                .parse_capture()
                .map_err(|e| e.in_context(ErrorContext::CaptureBlock))?,
            TokenKind::PipeQuestion => StageKind::Resume,
            TokenKind::Pipe => self.parse_keyword_stage()?,
            found => {
                return Err(ParseError::new(
                    ParseErrorKind::UnexpectedToken {
                        expected: "a pipe operator",
                        found,
                    },
                    op.span,
                ))
            }
        };

        Ok(Stage {
            kind,
            span: op.span.merge(self.cursor.previous_span()),
        })
    }

    /// `name` or `name(args)` after `|>`, `|.` or `|$`.
    fn parse_call_target(&mut self) -> Result<CallTarget, ParseError> {
        let start = self.cursor.current_span();
        let name = self.cursor.expect_ident()?;
        let args = if self.cursor.check(TokenKind::LParen) {
            self.parse_args()?
        } else {
            Vec::new()
        };
        Ok(CallTarget {
            name,
            args,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    /// Optional handler after `|!`, on the same line or indented below it.
    fn parse_bang_handler(&mut self) -> Result<Option<Handler>, ParseError> {
        let handler = match self.cursor.current_kind() {
            TokenKind::LBracket => Some(self.parse_handler()?),
            TokenKind::Newline
                if self.cursor.peek_kind(1) == TokenKind::Indent
                    && self.cursor.peek_kind(2) == TokenKind::LBracket =>
            {
                self.cursor.advance();
                self.cursor.advance();
                let handler = self.parse_handler()?;
                self.close_block()?;
                Some(handler)
            }
            TokenKind::Newline if self.cursor.peek_kind(1) == TokenKind::LBracket => {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedIndentedBlock { opener: "`|!`" },
                    self.cursor.peek_token(1).span,
                )
                .in_context(ErrorContext::Handler));
            }
            _ => None,
        };
        Ok(handler)
    }

    fn parse_handler(&mut self) -> Result<Handler, ParseError> {
        self.parse_handler_inner()
            .map_err(|e| e.in_context(ErrorContext::Handler))
    }

    /// `[name]: body`
    fn parse_handler_inner(&mut self) -> Result<Handler, ParseError> {
        let start = self.cursor.expect(TokenKind::LBracket)?;
        let name = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::RBracket)?;
        self.cursor.expect(TokenKind::Colon)?;
        let body = self.parse_body("`|! [name]:`")?;
        Ok(Handler {
            name,
            body,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    /// `name]` or `name]: body` after `|[`.
    fn parse_capture(&mut self) -> Result<StageKind, ParseError> {
        let name = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::RBracket)?;
        let block = if self.cursor.eat(TokenKind::Colon) {
            Some(self.parse_body("`|[name]:`")?)
        } else {
            None
        };
        Ok(StageKind::Capture { name, block })
    }

    /// `match:` or `handle [name]:` after a bare `|`.
    fn parse_keyword_stage(&mut self) -> Result<StageKind, ParseError> {
        match self.cursor.current_kind() {
            TokenKind::Match => {
                self.cursor.advance();
                self.parse_match_block()
                    .map_err(|e| e.in_context(ErrorContext::MatchBlock))
            }
            TokenKind::Handle => {
                self.cursor.advance();
                self.parse_handle_block()
                    .map_err(|e| e.in_context(ErrorContext::HandleBlock))
            }
            found => Err(ParseError::new(
                ParseErrorKind::UnknownOperator { found },
                self.cursor.current_span(),
            )),
        }
    }

    fn parse_match_block(&mut self) -> Result<StageKind, ParseError> {
        self.cursor.expect(TokenKind::Colon)?;
        self.open_block("`| match:`")?;

        let mut arms = Vec::new();
        while !self.cursor.check(TokenKind::Dedent) {
            if self.cursor.is_at_end() {
                return Err(self.cursor.unexpected("end of block"));
            }
            arms.push(
                self.parse_match_arm()
                    .map_err(|e| e.in_context(ErrorContext::MatchArm))?,
            );
            self.cursor.eat(TokenKind::Newline);
        }
        self.cursor.advance();

        Ok(StageKind::Match { arms })
    }

    /// `Ok(name): body` or `Err(name): body`.
    fn parse_match_arm(&mut self) -> Result<MatchArm, ParseError> {
        let start = self.cursor.current_span();
        let tag = match self.cursor.current_kind() {
            TokenKind::Ok => ResultTag::Ok,
            TokenKind::Err => ResultTag::Err,
            _ => return Err(self.cursor.unexpected("`Ok` or `Err`")),
        };
        self.cursor.advance();
        self.cursor.expect(TokenKind::LParen)?;
        let binding = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::RParen)?;
        self.cursor.expect(TokenKind::Colon)?;
        let body = self.parse_body("a match arm")?;
        if body.inline && self.cursor.current_kind().is_pipe_op() {
            return Err(ParseError::new(
                ParseErrorKind::PipeAfterInlineArm {
                    found: self.cursor.current_kind(),
                },
                self.cursor.current_span(),
            ));
        }

        Ok(MatchArm {
            tag,
            binding,
            body,
            span: start.merge(self.cursor.previous_span()),
        })
    }

    fn parse_handle_block(&mut self) -> Result<StageKind, ParseError> {
        self.cursor.expect(TokenKind::LBracket)?;
        let name = self.cursor.expect_ident()?;
        self.cursor.expect(TokenKind::RBracket)?;
        self.cursor.expect(TokenKind::Colon)?;
        let body = self.parse_body("`| handle [name]:`")?;
        Ok(StageKind::Handle { name, body })
    }
}
