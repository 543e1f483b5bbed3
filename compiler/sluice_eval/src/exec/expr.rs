//! Expression evaluation.

use sluice_resolve::{Guard, PipeChain, ResolvedExpr, ResolvedExprKind};
use sluice_value::{undefined_variable, EvalResult, Outcome, Value};

use super::Run;
use crate::matching::optional_unwrap;

impl Run<'_> {
    pub(crate) fn eval_expr(&mut self, expr: &ResolvedExpr) -> EvalResult {
        match &expr.kind {
            ResolvedExprKind::Literal(value) => Ok(value.clone()),
            ResolvedExprKind::Local(name) | ResolvedExprKind::Global(name) => self
                .env
                .lookup(*name)
                .ok_or_else(|| undefined_variable(self.name(*name)).with_span(expr.span)),
            ResolvedExprKind::Call(call) => self.call_expr(call),
            ResolvedExprKind::Ok(inner) => Ok(Value::ok(self.eval_expr(inner)?)),
            ResolvedExprKind::Err(inner) => Ok(Value::err(self.eval_expr(inner)?)),
            ResolvedExprKind::If {
                guard,
                then_branch,
                else_branch,
            } => self.eval_if(guard, then_branch, else_branch.as_deref(), expr),
        }
    }

    /// A conditional yields its branch's value; a branch `Err` that escapes
    /// the body comes back result-shaped.
    fn eval_if(
        &mut self,
        guard: &Guard,
        then_branch: &PipeChain,
        else_branch: Option<&PipeChain>,
        expr: &ResolvedExpr,
    ) -> EvalResult {
        let taken = match guard {
            Guard::Bool(cond) => self.eval_expr(cond)?.is_truthy().then_some(None),
            Guard::OptionalUnwrap { subject, binding } => {
                let subject = self.eval_expr(subject)?;
                optional_unwrap(subject).map(|payload| Some((*binding, payload)))
            }
        };

        let outcome = match (taken, else_branch) {
            (Some(binding), _) => self.eval_body(binding, then_branch, expr.span)?,
            (None, Some(else_branch)) => self.eval_body(None, else_branch, expr.span)?,
            (None, None) => return Ok(Value::None),
        };
        Ok(into_value(outcome))
    }
}

fn into_value(outcome: Outcome) -> Value {
    match outcome {
        Outcome::Ok(value) => value,
        Outcome::Err(payload) => Value::err(payload),
    }
}
