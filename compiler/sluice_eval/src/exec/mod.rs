//! The stage walk.
//!
//! The state register is an [`Outcome`]. On `Ok` each stage applies its
//! operation. On `Err` only captures and guards are passed over; the first
//! handler or match block takes the payload, and any other stage ends the
//! walk with the `Err` unchanged.

mod call;
mod expr;

use sluice_ir::{Name, Span};
use sluice_resolve::{MatchArmPlan, PipeChain, PipeStage, StageNode};
use sluice_stack::ensure_sufficient_stack;
use sluice_value::{depth_exceeded, EvalError, Outcome, Value};

use crate::environment::Environment;
use crate::evaluator::Evaluator;
use crate::matching::{select_arm, settle_body};

/// State of one evaluation.
pub(crate) struct Run<'e> {
    pub(crate) evaluator: &'e Evaluator,
    pub(crate) env: Environment,
    /// Current body nesting level.
    pub(crate) depth: usize,
}

impl<'e> Run<'e> {
    pub(crate) fn new(evaluator: &'e Evaluator) -> Self {
        let mut env = Environment::new();
        for (name, value) in evaluator.globals.iter() {
            env.define_global(name, value.clone());
        }
        // Top-level captures live above the outer bindings.
        env.push_scope();
        Run {
            evaluator,
            env,
            depth: 0,
        }
    }

    fn name(&self, name: Name) -> &'static str {
        self.evaluator.interner.lookup(name)
    }

    pub(crate) fn eval_chain(
        &mut self,
        chain: &PipeChain,
        initial: Option<Value>,
    ) -> Result<Outcome, EvalError> {
        ensure_sufficient_stack(|| self.eval_chain_inner(chain, initial))
    }

    fn eval_chain_inner(
        &mut self,
        chain: &PipeChain,
        initial: Option<Value>,
    ) -> Result<Outcome, EvalError> {
        let seed = match initial {
            Some(value) => value,
            None => self.eval_expr(&chain.seed)?,
        };
        let mut state = if chain.seed_fallible {
            Outcome::lift(seed)
        } else {
            Outcome::Ok(seed)
        };

        for node in &chain.stages {
            state = match (&node.stage, state) {
                (PipeStage::Capture { name }, err @ Outcome::Err(_)) => {
                    tracing::trace!(capture = self.name(*name), "capture skipped on error path");
                    err
                }
                (PipeStage::ErrorGuard, err @ Outcome::Err(_)) => err,
                (
                    PipeStage::ErrorHandlerBlock { name, body }
                    | PipeStage::HandleSugar { name, body },
                    Outcome::Err(payload),
                ) => {
                    tracing::debug!(stage = node.stage.kind_name(), "handling error");
                    self.eval_body(Some((*name, payload)), body, node.span)?
                }
                (PipeStage::MatchBlock { arms }, outcome) => {
                    self.eval_match(arms, outcome, node.span)?
                }
                (_, Outcome::Err(payload)) => {
                    tracing::debug!(
                        stage = node.stage.kind_name(),
                        span = %node.span,
                        "short-circuit"
                    );
                    return Ok(Outcome::Err(payload));
                }
                (_, Outcome::Ok(value)) => self.apply_stage(node, value)?,
            };
        }
        Ok(state)
    }

    /// One stage on the `Ok` path.
    fn apply_stage(&mut self, node: &StageNode, value: Value) -> Result<Outcome, EvalError> {
        tracing::trace!(stage = node.stage.kind_name(), span = %node.span, "stage");
        match &node.stage {
            PipeStage::Transform(call) => Ok(Outcome::Ok(self.call_function(call, value)?)),
            PipeStage::MutatingCall(call) => {
                let mut value = value;
                self.call_method(call, &mut value)?;
                Ok(Outcome::Ok(value))
            }
            PipeStage::ResultUnwrap { call: None } => Ok(Outcome::lift(value)),
            PipeStage::ResultUnwrap { call: Some(call) } => self.call_fallible(call, value),
            PipeStage::Capture { name } => {
                self.env.define(*name, value.clone());
                Ok(Outcome::Ok(value))
            }
            PipeStage::CaptureBlock { name, body, .. } => {
                self.eval_body(Some((*name, value)), body, node.span)
            }
            PipeStage::Tap { label, args } => {
                let args = self.eval_args(args)?;
                self.evaluator.tap.record(self.name(*label), &value, &args);
                Ok(Outcome::Ok(value))
            }
            PipeStage::ErrorGuard
            | PipeStage::ErrorHandlerBlock { .. }
            | PipeStage::HandleSugar { .. } => Ok(Outcome::Ok(value)),
            PipeStage::MatchBlock { arms } => self.eval_match(arms, Outcome::Ok(value), node.span),
        }
    }

    /// Evaluate a nested body and apply the handler rule to its result.
    pub(crate) fn eval_body(
        &mut self,
        binding: Option<(Name, Value)>,
        body: &PipeChain,
        span: Span,
    ) -> Result<Outcome, EvalError> {
        let limit = self.evaluator.config.max_depth;
        if self.depth >= limit {
            return Err(depth_exceeded(limit).with_span(span));
        }
        let outcome = self.with_binding(binding, |run| run.eval_chain(body, None))?;
        Ok(settle_body(outcome, body.reraises))
    }

    fn eval_match(
        &mut self,
        arms: &[MatchArmPlan],
        outcome: Outcome,
        span: Span,
    ) -> Result<Outcome, EvalError> {
        let Some(arm) = select_arm(arms, &outcome) else {
            let message = format!("match has no `{}` arm", outcome.tag());
            return Err(EvalError::new(message).with_span(span));
        };
        tracing::debug!(tag = %arm.tag, "match arm selected");
        self.eval_body(Some((arm.binding, outcome.into_payload())), &arm.body, arm.span)
    }
}
