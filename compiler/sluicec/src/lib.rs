//! Sluice: compile and run pipe chains.
//!
//! This crate is the front door over the phase crates:
//!
//! - [`compile`]: source text to a reusable [`PipeChain`] (lex, parse, resolve)
//! - [`run_source`]: compile and evaluate in one step
//! - [`CompileError::render`]: ariadne reports for every phase's errors
//!
//! Hosts describe what a chain may call in a [`ScopeTable`] and supply outer
//! variable values through an [`Evaluator`].

use sluice_diagnostic::{render_all, Diagnostic};
use sluice_ir::TokenList;
use thiserror::Error;

pub use sluice_eval::{
    buffer_tap, init_tracing, silent_tap, tracing_tap, EvalConfig, Evaluator, EvaluatorBuilder,
    OuterBindings, SharedTapHandler,
};
pub use sluice_ir::{ResultTag, SharedInterner, Span};
pub use sluice_parse::ParseError;
pub use sluice_resolve::{
    DynamicDispatch, PipeChain, ResolutionError, ScopeTable, Signature,
};
pub use sluice_value::{native_failure, type_mismatch, EvalError, EvalResult, Outcome, Value};

/// A chain rejected before evaluation.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error("{} syntax error(s)", .0.len())]
    Syntax(Vec<ParseError>),
    #[error("{} resolution error(s)", .0.len())]
    Resolution(Vec<ResolutionError>),
}

impl CompileError {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        match self {
            CompileError::Syntax(errors) => errors.iter().map(ParseError::to_diagnostic).collect(),
            CompileError::Resolution(errors) => {
                errors.iter().map(ResolutionError::to_diagnostic).collect()
            }
        }
    }

    /// Render every error as an ariadne report against `source`.
    pub fn render(&self, source: &str) -> String {
        render_all(source, &self.diagnostics())
    }
}

/// Anything that can go wrong in [`run_source`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RunError {
    #[error(transparent)]
    Compile(#[from] CompileError),
    #[error(transparent)]
    Fault(#[from] EvalError),
}

impl RunError {
    pub fn render(&self, source: &str) -> String {
        match self {
            RunError::Compile(err) => err.render(source),
            RunError::Fault(err) => sluice_diagnostic::render(source, &err.to_diagnostic()),
        }
    }
}

/// Lex, parse and resolve one chain.
#[tracing::instrument(level = "debug", skip_all, fields(len = source.len()))]
pub fn compile(source: &str, table: &ScopeTable) -> Result<PipeChain, CompileError> {
    let parsed = sluice_parse::parse_source(source, table.interner())
        .map_err(CompileError::Syntax)?;
    sluice_resolve::resolve(&parsed, table).map_err(CompileError::Resolution)
}

/// Parse and resolve an already-lexed chain.
///
/// The tokens must have been lexed with the table's interner.
pub fn compile_tokens(tokens: &TokenList, table: &ScopeTable) -> Result<PipeChain, CompileError> {
    let parsed = sluice_parse::parse(tokens, table.interner())
        .map_err(|err| CompileError::Syntax(vec![err]))?;
    sluice_resolve::resolve(&parsed, table).map_err(CompileError::Resolution)
}

/// Lex a chain with the table's interner, for use with [`compile_tokens`].
pub fn lex(source: &str, table: &ScopeTable) -> Result<TokenList, CompileError> {
    let lexed = sluice_lexer::lex(source, table.interner());
    if lexed.has_errors() {
        return Err(CompileError::Syntax(
            lexed.errors.into_iter().map(ParseError::from).collect(),
        ));
    }
    Ok(lexed.tokens)
}

/// Compile `source` and run it once with `evaluator`.
///
/// The evaluator must have been built from the same `table`.
pub fn run_source(
    source: &str,
    table: &ScopeTable,
    evaluator: &Evaluator,
) -> Result<Outcome, RunError> {
    let chain = compile(source, table)?;
    Ok(evaluator.run(&chain)?)
}
