//! Evaluation faults.
//!
//! A fault is a host-level failure: a native callable gave up, a body nested
//! too deep, a name vanished at runtime. Faults abort evaluation through `?`.
//! They are never confused with a chain's `Err` outcome, which is ordinary
//! data that handlers can intercept.
//!
//! Factory functions below are the public way to build faults.

use sluice_diagnostic::{Diagnostic, ErrorCode};
use sluice_ir::Span;

use crate::Value;

/// Result of calling a native callable or evaluating an expression.
pub type EvalResult = Result<Value, EvalError>;

/// Typed fault category.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EvalErrorKind {
    #[error("undefined variable: {name}")]
    UndefinedVariable { name: String },

    #[error("no callable named `{name}`")]
    UndefinedCallable { name: String },

    #[error("{}", arity_message(name, *expected, *got))]
    ArityMismatch {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error("type mismatch: expected {expected}, got {got}")]
    TypeMismatch { expected: String, got: String },

    #[error("maximum body nesting depth exceeded (limit: {limit})")]
    DepthExceeded { limit: usize },

    #[error("{message}")]
    NativeFailure { message: String },
}

fn arity_message(name: &str, expected: usize, got: usize) -> String {
    let arg_word = if expected == 1 {
        "argument"
    } else {
        "arguments"
    };
    if name.is_empty() {
        format!("expected {expected} {arg_word}, got {got}")
    } else {
        format!("{name} expects {expected} {arg_word}, got {got}")
    }
}

/// Evaluation fault.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    /// Stage or expression being evaluated when the fault happened.
    pub span: Option<Span>,
    pub notes: Vec<String>,
}

impl EvalError {
    /// A native failure with a free-form message.
    pub fn new(message: impl Into<String>) -> Self {
        Self::from_kind(EvalErrorKind::NativeFailure {
            message: message.into(),
        })
    }

    fn from_kind(kind: EvalErrorKind) -> Self {
        EvalError {
            kind,
            span: None,
            notes: Vec::new(),
        }
    }

    /// Attach a span unless one is already set.
    ///
    /// Faults bubble out through nested bodies; the innermost span wins.
    #[must_use]
    pub fn with_span(mut self, span: Span) -> Self {
        if self.span.is_none() {
            self.span = Some(span);
        }
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind {
            EvalErrorKind::UndefinedVariable { .. } => ErrorCode::E3001,
            EvalErrorKind::UndefinedCallable { .. } => ErrorCode::E3002,
            EvalErrorKind::ArityMismatch { .. } => ErrorCode::E3003,
            EvalErrorKind::TypeMismatch { .. } => ErrorCode::E3004,
            EvalErrorKind::DepthExceeded { .. } => ErrorCode::E3005,
            EvalErrorKind::NativeFailure { .. } => ErrorCode::E3006,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.code()).with_message(self.kind.to_string());
        if let Some(span) = self.span {
            diag = diag.with_label(span, "while evaluating this");
        }
        for note in &self.notes {
            diag = diag.with_note(note.clone());
        }
        diag
    }
}

#[cold]
pub fn undefined_variable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedVariable {
        name: name.to_string(),
    })
}

#[cold]
pub fn undefined_callable(name: &str) -> EvalError {
    EvalError::from_kind(EvalErrorKind::UndefinedCallable {
        name: name.to_string(),
    })
}

/// Wrong number of arguments reached a native callable.
#[cold]
pub fn wrong_arg_count(name: &str, expected: usize, got: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::ArityMismatch {
        name: name.to_string(),
        expected,
        got,
    })
}

/// A callable got a value of the wrong shape.
#[cold]
pub fn type_mismatch(expected: &str, got: &Value) -> EvalError {
    EvalError::from_kind(EvalErrorKind::TypeMismatch {
        expected: expected.to_string(),
        got: got.type_name().to_string(),
    })
}

#[cold]
pub fn depth_exceeded(limit: usize) -> EvalError {
    EvalError::from_kind(EvalErrorKind::DepthExceeded { limit })
}

#[cold]
pub fn native_failure(message: impl Into<String>) -> EvalError {
    EvalError::new(message)
}
