//! Expression forms that seed chains and fill bodies.

use sluice_ir::{Condition, Expr, ExprKind, TokenKind};
use sluice_stack::ensure_sufficient_stack;

use super::Parser;
use crate::{ErrorContext, ParseError, ParseErrorKind};

impl Parser<'_> {
    /// Expression outside a conditional guard, where `!?` is rejected.
    pub(super) fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        let expr = self.parse_primary()?;
        if self.cursor.check(TokenKind::BangQuestion) {
            return Err(ParseError::new(
                ParseErrorKind::UnwrapOutsideCondition,
                self.cursor.current_span(),
            ));
        }
        Ok(expr)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        ensure_sufficient_stack(|| self.parse_primary_inner())
    }

    fn parse_primary_inner(&mut self) -> Result<Expr, ParseError> {
        let token = *self.cursor.current();
        let kind = match token.kind {
            TokenKind::Int(n) => ExprKind::Int(n),
            TokenKind::Str(s) => ExprKind::Str(s),
            TokenKind::True => ExprKind::Bool(true),
            TokenKind::False => ExprKind::Bool(false),
            TokenKind::None => ExprKind::None,
            TokenKind::Ident(name) => {
                self.cursor.advance();
                let kind = if self.cursor.check(TokenKind::LParen) {
                    ExprKind::Call {
                        func: name,
                        args: self.parse_args()?,
                    }
                } else {
                    ExprKind::Ident(name)
                };
                return Ok(Expr::new(kind, token.span.merge(self.cursor.previous_span())));
            }
            TokenKind::Ok | TokenKind::Err => {
                self.cursor.advance();
                self.cursor.expect(TokenKind::LParen)?;
                let inner = Box::new(self.parse_expr()?);
                let end = self.cursor.expect(TokenKind::RParen)?;
                let kind = if token.kind == TokenKind::Ok {
                    ExprKind::Ok(inner)
                } else {
                    ExprKind::Err(inner)
                };
                return Ok(Expr::new(kind, token.span.merge(end)));
            }
            TokenKind::LParen => {
                self.cursor.advance();
                let inner = self.parse_expr()?;
                let end = self.cursor.expect(TokenKind::RParen)?;
                return Ok(Expr::new(inner.kind, token.span.merge(end)));
            }
            TokenKind::If => {
                return self
                    .parse_if()
                    .map_err(|e| e.in_context(ErrorContext::Conditional));
            }
            found => {
                return Err(ParseError::new(
                    ParseErrorKind::ExpectedExpression { found },
                    token.span,
                ))
            }
        };
        self.cursor.advance();
        Ok(Expr::new(kind, token.span))
    }

    /// `(a, b, ...)`, trailing comma allowed.
    pub(super) fn parse_args(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.parse_args_inner()
            .map_err(|e| e.in_context(ErrorContext::CallArguments))
    }

    fn parse_args_inner(&mut self) -> Result<Vec<Expr>, ParseError> {
        self.cursor.expect(TokenKind::LParen)?;
        let mut args = Vec::new();
        while !self.cursor.check(TokenKind::RParen) {
            args.push(self.parse_expr()?);
            if !self.cursor.eat(TokenKind::Comma) {
                break;
            }
        }
        self.cursor.expect(TokenKind::RParen)?;
        Ok(args)
    }

    /// `if guard: body [else: body]`
    fn parse_if(&mut self) -> Result<Expr, ParseError> {
        let start = self.cursor.expect(TokenKind::If)?;
        let cond = self.parse_condition()?;
        self.cursor.expect(TokenKind::Colon)?;
        let then_branch = self.parse_body("`if`")?;

        let else_on_next_line = self.cursor.check(TokenKind::Newline)
            && self.cursor.peek_kind(1) == TokenKind::Else;
        let else_branch = if self.cursor.check(TokenKind::Else) || else_on_next_line {
            self.cursor.eat(TokenKind::Newline);
            self.cursor.advance();
            self.cursor.expect(TokenKind::Colon)?;
            Some(Box::new(self.parse_body("`else`")?))
        } else {
            None
        };

        let span = start.merge(self.cursor.previous_span());
        Ok(Expr::new(
            ExprKind::If {
                cond: Box::new(cond),
                then_branch: Box::new(then_branch),
                else_branch,
            },
            span,
        ))
    }

    /// A boolean guard, or `subject!?` with an optional `[name]` binding.
    fn parse_condition(&mut self) -> Result<Condition, ParseError> {
        let subject = self.parse_primary()?;
        if !self.cursor.check(TokenKind::BangQuestion) {
            return Ok(Condition::Bool(subject));
        }
        let bang = self.cursor.advance().span;

        let binding = if self.cursor.eat(TokenKind::LBracket) {
            let name = self.cursor.expect_ident()?;
            self.cursor.expect(TokenKind::RBracket)?;
            name
        } else if let ExprKind::Ident(name) = subject.kind {
            name
        } else {
            return Err(ParseError::new(
                ParseErrorKind::MissingUnwrapBinding,
                subject.span.merge(bang),
            ));
        };

        let span = subject.span.merge(self.cursor.previous_span());
        Ok(Condition::Unwrap {
            subject,
            binding,
            span,
        })
    }
}
