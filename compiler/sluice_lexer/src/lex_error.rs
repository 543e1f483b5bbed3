use sluice_diagnostic::{Diagnostic, ErrorCode};
use sluice_ir::Span;

/// What went wrong while tokenizing.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, thiserror::Error)]
pub enum LexErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("invalid character `{0}`")]
    InvalidChar(char),
    #[error("integer literal does not fit in 64 bits")]
    IntOverflow,
    /// Dedent to a column that matches no enclosing block.
    #[error("unindent does not match any outer indentation level")]
    InconsistentDedent,
}

/// A lexer error with its location.
#[derive(Clone, Debug, Eq, PartialEq, Hash, thiserror::Error)]
#[error("{kind}")]
pub struct LexError {
    pub span: Span,
    pub kind: LexErrorKind,
}

impl LexError {
    pub fn new(kind: LexErrorKind, span: Span) -> Self {
        LexError { span, kind }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            LexErrorKind::UnterminatedString => ErrorCode::E0001,
            LexErrorKind::InvalidChar(_) => ErrorCode::E0002,
            LexErrorKind::IntOverflow => ErrorCode::E0003,
            LexErrorKind::InconsistentDedent => ErrorCode::E0004,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code()).with_message(self.kind.to_string());
        match self.kind {
            LexErrorKind::UnterminatedString => diag
                .with_label(self.span, "string starts here")
                .with_suggestion("add a closing `\"` before the end of the line"),
            LexErrorKind::InconsistentDedent => diag
                .with_label(self.span, "this line")
                .with_note("dedent back to the column of an enclosing block"),
            LexErrorKind::InvalidChar(_) | LexErrorKind::IntOverflow => {
                diag.with_label(self.span, "here")
            }
        }
    }
}
