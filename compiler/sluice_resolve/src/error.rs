//! Resolution errors.

use sluice_diagnostic::{Diagnostic, ErrorCode};
use sluice_ir::{ResultTag, Span};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ResolutionErrorKind {
    #[error("unknown function `{name}`")]
    UnknownFunction { name: String },

    #[error("unknown method `{name}`")]
    UnknownMethod { name: String },

    #[error("cannot find `{name}` in this scope")]
    UnresolvedName { name: String },

    #[error("`{name}` may be unbound here")]
    PossiblyUnbound { name: String },

    #[error("`{name}` takes {expected} argument{}, found {found}", plural(*expected))]
    ArityMismatch {
        name: String,
        expected: usize,
        found: usize,
        takes_piped: bool,
    },

    #[error("`{name}` discards the piped value")]
    PipedValueUnused { name: String },

    #[error("`{operator}` has no preceding stage that can produce `Err`")]
    HandlerWithoutErrorSource { operator: &'static str },

    #[error("match block is missing an `{missing}` arm")]
    NonExhaustiveMatch { missing: ResultTag },

    #[error("match block has more than one `{tag}` arm")]
    DuplicateArm { tag: ResultTag },

    #[error("`{name}` is already captured in this scope")]
    DuplicateCapture { name: String },

    #[error("`|?` must directly follow a capture block")]
    MisplacedResume,
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}

impl ResolutionErrorKind {
    pub fn code(&self) -> ErrorCode {
        match self {
            ResolutionErrorKind::UnknownFunction { .. } => ErrorCode::E2001,
            ResolutionErrorKind::UnknownMethod { .. } => ErrorCode::E2002,
            ResolutionErrorKind::UnresolvedName { .. } => ErrorCode::E2003,
            ResolutionErrorKind::PossiblyUnbound { .. } => ErrorCode::E2004,
            ResolutionErrorKind::ArityMismatch { .. } => ErrorCode::E2005,
            ResolutionErrorKind::PipedValueUnused { .. } => ErrorCode::E2006,
            ResolutionErrorKind::HandlerWithoutErrorSource { .. } => ErrorCode::E2007,
            ResolutionErrorKind::NonExhaustiveMatch { .. } => ErrorCode::E2008,
            ResolutionErrorKind::DuplicateArm { .. } => ErrorCode::E2009,
            ResolutionErrorKind::DuplicateCapture { .. } => ErrorCode::E2010,
            ResolutionErrorKind::MisplacedResume => ErrorCode::E2011,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ResolutionErrorKind::UnknownFunction { .. } => "not registered as a function",
            ResolutionErrorKind::UnknownMethod { .. } => "not registered as a method",
            ResolutionErrorKind::UnresolvedName { .. } => "not found",
            ResolutionErrorKind::PossiblyUnbound { .. } => "read here",
            ResolutionErrorKind::ArityMismatch { .. } => "wrong number of arguments",
            ResolutionErrorKind::PipedValueUnused { .. } => "piped value is dropped",
            ResolutionErrorKind::HandlerWithoutErrorSource { .. } => "nothing to handle",
            ResolutionErrorKind::NonExhaustiveMatch { .. }
            | ResolutionErrorKind::DuplicateArm { .. } => "in this match",
            ResolutionErrorKind::DuplicateCapture { .. } => "captured again",
            ResolutionErrorKind::MisplacedResume => "no capture block before this",
        }
    }

    fn hint(&self) -> Option<&'static str> {
        match self {
            ResolutionErrorKind::PipedValueUnused { .. } => {
                Some("pass a captured value as an argument, or drop an argument so the piped value fills it")
            }
            ResolutionErrorKind::HandlerWithoutErrorSource { .. } => {
                Some("handlers must follow a fallible call, `|!`, or a block that re-raises")
            }
            ResolutionErrorKind::PossiblyUnbound { .. } => {
                Some("captures between a fallible stage and its handler are skipped on the error path")
            }
            ResolutionErrorKind::ArityMismatch {
                takes_piped: true, ..
            } => Some("the piped value counts as the first argument"),
            _ => None,
        }
    }
}

/// A resolution error with its location and an optional related span.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("{kind}")]
pub struct ResolutionError {
    pub kind: ResolutionErrorKind,
    pub span: Span,
    /// Earlier binding or stage this error relates to.
    pub related: Option<(Span, &'static str)>,
}

impl ResolutionError {
    pub fn new(kind: ResolutionErrorKind, span: Span) -> Self {
        ResolutionError {
            kind,
            span,
            related: None,
        }
    }

    #[must_use]
    pub fn with_related(mut self, span: Span, message: &'static str) -> Self {
        self.related = Some((span, message));
        self
    }

    pub fn code(&self) -> ErrorCode {
        self.kind.code()
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code())
            .with_message(self.kind.to_string())
            .with_label(self.span, self.kind.label());
        if let Some((span, message)) = self.related {
            diag = diag.with_secondary_label(span, message);
        }
        if let Some(hint) = self.kind.hint() {
            diag = diag.with_suggestion(hint);
        }
        diag
    }
}
