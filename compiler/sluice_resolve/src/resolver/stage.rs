//! Stage selection and legality checks.

use sluice_ir::{CallTarget, Expr, MatchArm, ResultTag, Span, Stage, StageKind};

use super::{Flow, Resolver};
use crate::error::{ResolutionError, ResolutionErrorKind};
use crate::plan::{ArgMode, CallPlan, Callee, MatchArmPlan, PipeStage, ResolvedExpr};

impl Resolver<'_> {
    /// Pick the plan variant for one written stage and update `flow`.
    ///
    /// Returns `None` when the stage could not be resolved; the error has
    /// already been recorded.
    pub(super) fn resolve_stage(&mut self, stage: &Stage, flow: &mut Flow) -> Option<PipeStage> {
        match &stage.kind {
            StageKind::Transform(target) => {
                let (call, fallible) = self.resolve_transform(target)?;
                flow.settle(fallible, fallible);
                Some(if fallible {
                    PipeStage::ResultUnwrap { call: Some(call) }
                } else {
                    PipeStage::Transform(call)
                })
            }
            StageKind::MethodCall(target) => {
                let (call, fallible) = self.resolve_method(target)?;
                flow.settle(fallible, fallible);
                Some(if fallible {
                    PipeStage::ResultUnwrap { call: Some(call) }
                } else {
                    PipeStage::MutatingCall(call)
                })
            }
            StageKind::Bang { handler: None } => {
                if flow.lifted {
                    // Pending captures stay pending: a guard passes `Err` on.
                    flow.may_err = true;
                    flow.lifted = false;
                    Some(PipeStage::ErrorGuard)
                } else {
                    flow.settle(true, true);
                    Some(PipeStage::ResultUnwrap { call: None })
                }
            }
            StageKind::Bang {
                handler: Some(handler),
            } => {
                self.check_error_source(flow, "|!", stage.span);
                self.poison_pending(flow);
                let body = self.resolve_body(&handler.body, Some((handler.name, handler.span)));
                flow.settle(body.reraises, false);
                Some(PipeStage::ErrorHandlerBlock {
                    name: handler.name,
                    body: Box::new(body),
                })
            }
            StageKind::Handle { name, body } => {
                self.check_error_source(flow, "| handle", stage.span);
                self.poison_pending(flow);
                let body = self.resolve_body(body, Some((*name, stage.span)));
                flow.settle(body.reraises, false);
                Some(PipeStage::HandleSugar {
                    name: *name,
                    body: Box::new(body),
                })
            }
            StageKind::Capture { name, block: None } => {
                if let Some(first) = self.scopes.bind(*name, stage.span) {
                    let kind = ResolutionErrorKind::DuplicateCapture {
                        name: self.name_string(*name),
                    };
                    self.errors.push(
                        ResolutionError::new(kind, stage.span)
                            .with_related(first, "first captured here"),
                    );
                }
                if flow.may_err {
                    flow.pending.push(*name);
                }
                Some(PipeStage::Capture { name: *name })
            }
            StageKind::Capture {
                name,
                block: Some(body),
            } => {
                let body = self.resolve_body(body, Some((*name, stage.span)));
                flow.settle(body.reraises, false);
                Some(PipeStage::CaptureBlock {
                    name: *name,
                    body: Box::new(body),
                    resume: false,
                })
            }
            StageKind::Match { arms } => {
                let arms = self.resolve_match(arms, stage.span, flow);
                let reraises = arms.iter().any(|arm| arm.body.reraises);
                flow.settle(reraises, false);
                Some(PipeStage::MatchBlock { arms })
            }
            StageKind::Tap(target) => {
                let args = self.resolve_args(&target.args);
                flow.settle(false, false);
                Some(PipeStage::Tap {
                    label: target.name,
                    args,
                })
            }
            // Handled by the chain loop, which needs the previous stage.
            StageKind::Resume => None,
        }
    }

    fn check_error_source(&mut self, flow: &Flow, operator: &'static str, span: Span) {
        if !flow.may_err {
            self.error(
                ResolutionErrorKind::HandlerWithoutErrorSource { operator },
                span,
            );
        }
    }

    fn poison_pending(&mut self, flow: &mut Flow) {
        for name in flow.pending.drain(..) {
            self.scopes.poison(name);
        }
    }

    fn resolve_args(&mut self, args: &[Expr]) -> Vec<ResolvedExpr> {
        args.iter().map(|arg| self.resolve_expr(arg)).collect()
    }

    /// `|> name(args)`: decide whether the piped value fills the first slot.
    fn resolve_transform(&mut self, target: &CallTarget) -> Option<(CallPlan, bool)> {
        let args = self.resolve_args(&target.args);
        let found = args.len();
        let uses_local = args.iter().any(ResolvedExpr::references_local);
        let table = self.table;

        if let Some(def) = table.function(target.name) {
            let sig = def.signature;
            let mode = if sig.takes_piped && found + 1 == sig.arity {
                ArgMode::Piped
            } else if found == sig.arity {
                if !uses_local {
                    self.error(
                        ResolutionErrorKind::PipedValueUnused {
                            name: self.name_string(target.name),
                        },
                        target.span,
                    );
                }
                ArgMode::Explicit
            } else {
                self.error(
                    ResolutionErrorKind::ArityMismatch {
                        name: self.name_string(target.name),
                        expected: sig.arity,
                        found,
                        takes_piped: sig.takes_piped,
                    },
                    target.span,
                );
                return None;
            };
            let call = CallPlan {
                name: target.name,
                callee: Callee::Function(def.clone()),
                args,
                mode,
                span: target.span,
            };
            return Some((call, sig.fallible));
        }

        if table.dynamic().is_some() {
            let mode = if uses_local {
                ArgMode::Explicit
            } else {
                ArgMode::Piped
            };
            let call = CallPlan {
                name: target.name,
                callee: Callee::Dynamic(target.name),
                args,
                mode,
                span: target.span,
            };
            return Some((call, false));
        }

        self.error(
            ResolutionErrorKind::UnknownFunction {
                name: self.name_string(target.name),
            },
            target.span,
        );
        None
    }

    /// `|. name(args)`: the current value is always the receiver.
    fn resolve_method(&mut self, target: &CallTarget) -> Option<(CallPlan, bool)> {
        let args = self.resolve_args(&target.args);
        let table = self.table;

        let (callee, fallible) = if let Some(def) = table.method(target.name) {
            let sig = def.signature;
            if args.len() != sig.arity {
                self.error(
                    ResolutionErrorKind::ArityMismatch {
                        name: self.name_string(target.name),
                        expected: sig.arity,
                        found: args.len(),
                        takes_piped: false,
                    },
                    target.span,
                );
                return None;
            }
            (Callee::Method(def.clone()), sig.fallible)
        } else if table.dynamic().is_some() {
            (Callee::Dynamic(target.name), false)
        } else {
            self.error(
                ResolutionErrorKind::UnknownMethod {
                    name: self.name_string(target.name),
                },
                target.span,
            );
            return None;
        };

        let call = CallPlan {
            name: target.name,
            callee,
            args,
            mode: ArgMode::Piped,
            span: target.span,
        };
        Some((call, fallible))
    }

    /// Resolve match arms. `Ok` arms run on the success path, so pending
    /// captures are still bound inside them; `Err` arms see them poisoned.
    fn resolve_match(
        &mut self,
        arms: &[MatchArm],
        span: Span,
        flow: &mut Flow,
    ) -> Vec<MatchArmPlan> {
        let mut seen: [Option<Span>; 2] = [None, None];
        for arm in arms {
            let slot = &mut seen[tag_index(arm.tag)];
            if let Some(first) = *slot {
                let kind = ResolutionErrorKind::DuplicateArm { tag: arm.tag };
                self.errors
                    .push(ResolutionError::new(kind, arm.span).with_related(first, "first arm here"));
            } else {
                *slot = Some(arm.span);
            }
        }
        for tag in [ResultTag::Ok, ResultTag::Err] {
            if seen[tag_index(tag)].is_none() {
                self.error(ResolutionErrorKind::NonExhaustiveMatch { missing: tag }, span);
            }
        }

        let mut resolved: Vec<Option<MatchArmPlan>> = vec![None; arms.len()];
        for pass in [ResultTag::Ok, ResultTag::Err] {
            if pass == ResultTag::Err {
                self.poison_pending(flow);
            }
            for (slot, arm) in resolved.iter_mut().zip(arms).filter(|(_, a)| a.tag == pass) {
                *slot = Some(self.resolve_arm(arm));
            }
        }
        resolved.into_iter().flatten().collect()
    }

    fn resolve_arm(&mut self, arm: &MatchArm) -> MatchArmPlan {
        MatchArmPlan {
            tag: arm.tag,
            binding: arm.binding,
            body: self.resolve_body(&arm.body, Some((arm.binding, arm.span))),
            span: arm.span,
        }
    }
}

fn tag_index(tag: ResultTag) -> usize {
    match tag {
        ResultTag::Ok => 0,
        ResultTag::Err => 1,
    }
}
