//! Expression resolution.

use sluice_ir::{Body, Condition, Expr, ExprKind, Name, Span};
use sluice_value::Value;

use super::{Binding, Resolver};
use crate::error::{ResolutionError, ResolutionErrorKind};
use crate::plan::{ArgMode, CallPlan, Callee, Guard, ResolvedExpr, ResolvedExprKind};

impl Resolver<'_> {
    pub(super) fn resolve_expr(&mut self, expr: &Expr) -> ResolvedExpr {
        let kind = match &expr.kind {
            ExprKind::Int(n) => ResolvedExprKind::Literal(Value::int(*n)),
            ExprKind::Str(name) => {
                ResolvedExprKind::Literal(Value::string(self.interner().lookup(*name)))
            }
            ExprKind::Bool(b) => ResolvedExprKind::Literal(Value::Bool(*b)),
            ExprKind::None => ResolvedExprKind::Literal(Value::None),
            ExprKind::Ident(name) => self.resolve_name(*name, expr.span),
            ExprKind::Call { func, args } => match self.resolve_call(*func, args, expr.span) {
                Some(call) => ResolvedExprKind::Call(call),
                None => ResolvedExprKind::Literal(Value::Void),
            },
            ExprKind::Ok(inner) => ResolvedExprKind::Ok(Box::new(self.resolve_expr(inner))),
            ExprKind::Err(inner) => ResolvedExprKind::Err(Box::new(self.resolve_expr(inner))),
            ExprKind::If {
                cond,
                then_branch,
                else_branch,
            } => self.resolve_if(cond, then_branch, else_branch.as_deref()),
        };
        ResolvedExpr::new(kind, expr.span)
    }

    /// Chain-local bindings shadow outer variables.
    fn resolve_name(&mut self, name: Name, span: Span) -> ResolvedExprKind {
        match self.scopes.lookup(name) {
            Some(Binding::Bound { .. }) => ResolvedExprKind::Local(name),
            Some(Binding::PossiblyUnbound { span: captured }) => {
                let kind = ResolutionErrorKind::PossiblyUnbound {
                    name: self.name_string(name),
                };
                self.errors.push(
                    ResolutionError::new(kind, span).with_related(captured, "captured here"),
                );
                ResolvedExprKind::Local(name)
            }
            None if self.table.is_global(name) => ResolvedExprKind::Global(name),
            None => {
                self.error(
                    ResolutionErrorKind::UnresolvedName {
                        name: self.name_string(name),
                    },
                    span,
                );
                ResolvedExprKind::Local(name)
            }
        }
    }

    /// A call in expression position: every argument is written out.
    fn resolve_call(&mut self, func: Name, args: &[Expr], span: Span) -> Option<CallPlan> {
        let args: Vec<ResolvedExpr> = args.iter().map(|arg| self.resolve_expr(arg)).collect();
        let table = self.table;

        let callee = if let Some(def) = table.function(func) {
            if args.len() != def.signature.arity {
                self.error(
                    ResolutionErrorKind::ArityMismatch {
                        name: self.name_string(func),
                        expected: def.signature.arity,
                        found: args.len(),
                        takes_piped: false,
                    },
                    span,
                );
                return None;
            }
            Callee::Function(def.clone())
        } else if table.dynamic().is_some() {
            Callee::Dynamic(func)
        } else {
            self.error(
                ResolutionErrorKind::UnknownFunction {
                    name: self.name_string(func),
                },
                span,
            );
            return None;
        };

        Some(CallPlan {
            name: func,
            callee,
            args,
            mode: ArgMode::Explicit,
            span,
        })
    }

    fn resolve_if(
        &mut self,
        cond: &Condition,
        then_branch: &Body,
        else_branch: Option<&Body>,
    ) -> ResolvedExprKind {
        let (guard, binding) = match cond {
            Condition::Bool(expr) => (Guard::Bool(self.resolve_expr(expr)), None),
            Condition::Unwrap {
                subject,
                binding,
                span,
            } => {
                let subject = self.resolve_expr(subject);
                (
                    Guard::OptionalUnwrap {
                        subject,
                        binding: *binding,
                    },
                    Some((*binding, *span)),
                )
            }
        };
        let then_branch = self.resolve_body(then_branch, binding);
        let else_branch = else_branch.map(|body| Box::new(self.resolve_body(body, None)));

        ResolvedExprKind::If {
            guard: Box::new(guard),
            then_branch: Box::new(then_branch),
            else_branch,
        }
    }
}
