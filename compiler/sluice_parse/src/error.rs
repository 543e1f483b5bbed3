//! Parse error types.
//!
//! Every syntax error carries the offending token's span, an `E0xxx`/`E1xxx`
//! code and, where known, an [`ErrorContext`] naming the construct being
//! parsed for "while parsing X" notes.

use sluice_diagnostic::{Diagnostic, ErrorCode};
use sluice_ir::{Span, TokenKind};
use sluice_lexer::{LexError, LexErrorKind};

/// What was being parsed when an error occurred.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorContext {
    Chain,
    Handler,
    CaptureBlock,
    MatchBlock,
    MatchArm,
    HandleBlock,
    Conditional,
    CallArguments,
}

impl ErrorContext {
    /// Phrase suitable for "while parsing {description}".
    pub fn description(self) -> &'static str {
        match self {
            Self::Chain => "a pipe chain",
            Self::Handler => "an error handler",
            Self::CaptureBlock => "a capture block",
            Self::MatchBlock => "a match block",
            Self::MatchArm => "a match arm",
            Self::HandleBlock => "a handle block",
            Self::Conditional => "a conditional",
            Self::CallArguments => "call arguments",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
pub enum ParseErrorKind {
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: &'static str,
        found: TokenKind,
    },

    #[error("expected an expression, found {found}")]
    ExpectedExpression { found: TokenKind },

    /// `|` followed by something other than `match` or `handle`.
    #[error("unknown pipe operator: `|` followed by {found}")]
    UnknownOperator { found: TokenKind },

    #[error("expected an indented block after {opener}")]
    ExpectedIndentedBlock { opener: &'static str },

    #[error("{opener} opens a block but nothing follows it")]
    EmptyBlock { opener: &'static str },

    #[error("`!?` is only allowed in an `if` condition")]
    UnwrapOutsideCondition,

    #[error("conditional unwrap of an expression needs a binding name")]
    MissingUnwrapBinding,

    /// `Ok(v): v |> f`: an arm has no outer chain for the stage to join.
    #[error("{found} cannot follow an inline match arm body")]
    PipeAfterInlineArm { found: TokenKind },

    #[error("{0}")]
    Lex(LexErrorKind),
}

impl ParseErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnexpectedToken { .. } => ErrorCode::E1001,
            Self::ExpectedExpression { .. } => ErrorCode::E1002,
            Self::UnknownOperator { .. } => ErrorCode::E1003,
            Self::ExpectedIndentedBlock { .. } => ErrorCode::E1004,
            Self::EmptyBlock { .. } => ErrorCode::E1005,
            Self::UnwrapOutsideCondition => ErrorCode::E1006,
            Self::MissingUnwrapBinding => ErrorCode::E1007,
            Self::PipeAfterInlineArm { .. } => ErrorCode::E1008,
            Self::Lex(LexErrorKind::UnterminatedString) => ErrorCode::E0001,
            Self::Lex(LexErrorKind::InvalidChar(_)) => ErrorCode::E0002,
            Self::Lex(LexErrorKind::IntOverflow) => ErrorCode::E0003,
            Self::Lex(LexErrorKind::InconsistentDedent) => ErrorCode::E0004,
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownOperator { .. } => Some("`|` must be followed by `match` or `handle`"),
            Self::ExpectedIndentedBlock { .. } => {
                Some("indent the block body deeper than the line that opens it")
            }
            Self::UnwrapOutsideCondition => {
                Some("use `|!` to stop on errors, or move the unwrap into `if x!?:`")
            }
            Self::MissingUnwrapBinding => Some("name the unwrapped value: `if f(x)!? [v]:`"),
            Self::PipeAfterInlineArm { .. } => Some(
                "inline arm bodies are a single expression; use an indented block for a chain",
            ),
            _ => None,
        }
    }
}

/// A syntax error.
#[derive(Clone, Debug, PartialEq, Eq, Hash, thiserror::Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
    pub context: Option<ErrorContext>,
}

impl ParseError {
    #[cold]
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        ParseError {
            kind,
            span,
            context: None,
        }
    }

    /// Record the enclosing construct. The innermost context is kept.
    #[must_use]
    pub fn in_context(mut self, context: ErrorContext) -> Self {
        self.context.get_or_insert(context);
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code())
            .with_message(self.kind.to_string())
            .with_label(self.span, "here");
        if let Some(context) = self.context {
            diag = diag.with_note(format!("while parsing {}", context.description()));
        }
        if let Some(hint) = self.kind.hint() {
            diag = diag.with_suggestion(hint);
        }
        diag
    }
}

impl From<LexError> for ParseError {
    fn from(err: LexError) -> Self {
        ParseError::new(ParseErrorKind::Lex(err.kind), err.span)
    }
}
