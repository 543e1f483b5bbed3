//! Native call dispatch.

use smallvec::SmallVec;
use sluice_resolve::{ArgMode, CallPlan, Callee, ResolvedExpr};
use sluice_value::{undefined_callable, wrong_arg_count, EvalError, EvalResult, Outcome, Value};

use super::Run;

/// Most stage calls take the piped value plus at most a few extras.
pub(super) type Args = SmallVec<[Value; 4]>;

impl Run<'_> {
    pub(super) fn eval_args(&mut self, args: &[ResolvedExpr]) -> Result<Args, EvalError> {
        let mut values = Args::with_capacity(args.len());
        for arg in args {
            values.push(self.eval_expr(arg)?);
        }
        Ok(values)
    }

    /// Call a function stage. In `Piped` mode the current value is the first
    /// argument; in `Explicit` mode it is dropped.
    pub(super) fn call_function(&mut self, call: &CallPlan, current: Value) -> EvalResult {
        let mut args = Args::new();
        if call.mode == ArgMode::Piped {
            args.push(current);
        }
        for arg in &call.args {
            args.push(self.eval_expr(arg)?);
        }
        self.invoke_function(call, &args)
    }

    /// Call a function in expression position.
    pub(super) fn call_expr(&mut self, call: &CallPlan) -> EvalResult {
        let args = self.eval_args(&call.args)?;
        self.invoke_function(call, &args)
    }

    fn invoke_function(&self, call: &CallPlan, args: &[Value]) -> EvalResult {
        let name = self.name(call.name);
        tracing::trace!(callee = name, args = args.len(), "call");
        let result = match &call.callee {
            Callee::Function(def) => {
                if args.len() == def.signature.arity {
                    (def.func)(args)
                } else {
                    Err(wrong_arg_count(name, def.signature.arity, args.len()))
                }
            }
            Callee::Dynamic(_) => match &self.evaluator.dynamic {
                Some(dispatch) => dispatch.call_function(name, args),
                None => Err(undefined_callable(name)),
            },
            Callee::Method(_) => Err(undefined_callable(name)),
        };
        result.map_err(|e| e.with_span(call.span))
    }

    /// Call a method on the current value in place; returns what the method
    /// returned.
    pub(super) fn call_method(&mut self, call: &CallPlan, receiver: &mut Value) -> EvalResult {
        let args = self.eval_args(&call.args)?;
        let name = self.name(call.name);
        tracing::trace!(method = name, args = args.len(), "method call");
        let result = match &call.callee {
            Callee::Method(def) => {
                if args.len() == def.signature.arity {
                    (def.method)(receiver, &args)
                } else {
                    Err(wrong_arg_count(name, def.signature.arity, args.len()))
                }
            }
            Callee::Dynamic(_) => match &self.evaluator.dynamic {
                Some(dispatch) => dispatch.call_method(name, receiver, &args),
                None => Err(undefined_callable(name)),
            },
            Callee::Function(_) => Err(undefined_callable(name)),
        };
        result.map_err(|e| e.with_span(call.span))
    }

    /// Fallible call stage. A method keeps the (mutated) receiver on `Ok`;
    /// a function's result is lifted.
    pub(super) fn call_fallible(
        &mut self,
        call: &CallPlan,
        current: Value,
    ) -> Result<Outcome, EvalError> {
        if let Callee::Method(_) = call.callee {
            let mut receiver = current;
            let returned = self.call_method(call, &mut receiver)?;
            return Ok(match Outcome::lift(returned) {
                Outcome::Ok(_) => Outcome::Ok(receiver),
                err @ Outcome::Err(_) => err,
            });
        }
        Ok(Outcome::lift(self.call_function(call, current)?))
    }
}
