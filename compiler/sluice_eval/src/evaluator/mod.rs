//! Public evaluator entry points.
//!
//! An [`Evaluator`] holds everything that outlives a single run: outer
//! bindings, the dynamic dispatch fallback, the tap handler and limits. Each
//! call to [`Evaluator::run`] or [`Evaluator::evaluate`] builds a fresh
//! environment, so one evaluator and one plan can be reused freely.

mod builder;

pub use builder::EvaluatorBuilder;

use std::sync::Arc;

use rustc_hash::FxHashMap;
use sluice_ir::{Name, SharedInterner};
use sluice_resolve::{DynamicDispatch, PipeChain};
use sluice_value::{EvalError, Outcome, Value};

use crate::exec::Run;
use crate::tap::SharedTapHandler;

/// Default nesting limit for block bodies.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Evaluation limits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EvalConfig {
    /// Deepest allowed nesting of handler, arm, capture and branch bodies.
    pub max_depth: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Values for the outer variables a chain may read.
#[derive(Clone, Debug, Default)]
pub struct OuterBindings {
    values: FxHashMap<Name, Value>,
}

impl OuterBindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: Name, value: Value) {
        self.values.insert(name, value);
    }

    pub fn get(&self, name: Name) -> Option<&Value> {
        self.values.get(&name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Name, &Value)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

pub struct Evaluator {
    pub(crate) interner: SharedInterner,
    pub(crate) globals: OuterBindings,
    pub(crate) dynamic: Option<Arc<dyn DynamicDispatch>>,
    pub(crate) tap: SharedTapHandler,
    pub(crate) config: EvalConfig,
}

impl Evaluator {
    /// Evaluate a chain starting from its own seed expression.
    #[tracing::instrument(level = "debug", skip_all, fields(stages = chain.stages.len()))]
    pub fn run(&self, chain: &PipeChain) -> Result<Outcome, EvalError> {
        let result = Run::new(self).eval_chain(chain, None);
        log_result(&result);
        result
    }

    /// Evaluate a chain with `initial` standing in for the seed.
    ///
    /// `initial` is lifted into the outcome only when the seed itself is
    /// fallible.
    #[tracing::instrument(level = "debug", skip_all, fields(stages = chain.stages.len()))]
    pub fn evaluate(&self, chain: &PipeChain, initial: Value) -> Result<Outcome, EvalError> {
        let result = Run::new(self).eval_chain(chain, Some(initial));
        log_result(&result);
        result
    }

    pub fn config(&self) -> EvalConfig {
        self.config
    }

    pub fn tap_handler(&self) -> &SharedTapHandler {
        &self.tap
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }
}

fn log_result(result: &Result<Outcome, EvalError>) {
    match result {
        Ok(outcome) => tracing::debug!(tag = %outcome.tag(), "chain finished"),
        Err(fault) => tracing::debug!(code = %fault.code(), "chain faulted: {fault}"),
    }
}
