//! `EvaluatorBuilder` for configuring an [`Evaluator`].

use std::sync::Arc;

use sluice_ir::SharedInterner;
use sluice_resolve::{DynamicDispatch, ScopeTable};
use sluice_value::Value;

use super::{EvalConfig, Evaluator, OuterBindings};
use crate::tap::{tracing_tap, SharedTapHandler};

/// Builder for [`Evaluator`].
///
/// Starts from the scope table the chains were resolved against, so names
/// and the dynamic dispatch fallback line up with the plans.
pub struct EvaluatorBuilder {
    interner: SharedInterner,
    globals: OuterBindings,
    dynamic: Option<Arc<dyn DynamicDispatch>>,
    tap: Option<SharedTapHandler>,
    config: EvalConfig,
}

impl EvaluatorBuilder {
    pub fn new(table: &ScopeTable) -> Self {
        EvaluatorBuilder {
            interner: table.interner().clone(),
            globals: OuterBindings::new(),
            dynamic: table.dynamic().cloned(),
            tap: None,
            config: EvalConfig::default(),
        }
    }

    /// Supply the value of one outer variable.
    #[must_use]
    pub fn global(mut self, name: &str, value: Value) -> Self {
        let name = self.interner.intern(name);
        self.globals.insert(name, value);
        self
    }

    /// Replace all outer bindings.
    #[must_use]
    pub fn outer_bindings(mut self, globals: OuterBindings) -> Self {
        self.globals = globals;
        self
    }

    #[must_use]
    pub fn config(mut self, config: EvalConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.config.max_depth = max_depth;
        self
    }

    /// Defaults to a tracing tap.
    #[must_use]
    pub fn tap_handler(mut self, tap: SharedTapHandler) -> Self {
        self.tap = Some(tap);
        self
    }

    pub fn build(self) -> Evaluator {
        Evaluator {
            interner: self.interner,
            globals: self.globals,
            dynamic: self.dynamic,
            tap: self.tap.unwrap_or_else(tracing_tap),
            config: self.config,
        }
    }
}

impl Evaluator {
    pub fn builder(table: &ScopeTable) -> EvaluatorBuilder {
        EvaluatorBuilder::new(table)
    }
}
