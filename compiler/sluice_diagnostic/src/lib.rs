//! Diagnostic system for syntax, resolution and evaluation errors.
//!
//! - Error codes for searchability (`E0xxx` lexer, `E1xxx` parser,
//!   `E2xxx` resolver, `E3xxx` evaluator)
//! - Clear messages and primary spans
//! - Context labels, notes and suggestions
//! - Terminal rendering through `ariadne`

mod diagnostic;
pub mod emitter;
mod error_code;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use emitter::{render, render_all};
pub use error_code::ErrorCode;
