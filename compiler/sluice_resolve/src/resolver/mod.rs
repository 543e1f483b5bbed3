//! Chain resolver.
//!
//! Walks a [`ParsedChain`] once, binding names against a [`ScopeTracker`]
//! and the host [`ScopeTable`], choosing a concrete [`PipeStage`] for every
//! written stage, and collecting every error instead of stopping at the
//! first one.

mod expr;
mod scope;
mod stage;

use sluice_ir::{Body, Name, ParsedChain, Span, StageKind, StringInterner};
use sluice_stack::ensure_sufficient_stack;

use crate::error::{ResolutionError, ResolutionErrorKind};
use crate::plan::{Callee, PipeChain, PipeStage, ResolvedExpr, ResolvedExprKind, StageNode};
use crate::scope_table::ScopeTable;

use scope::{Binding, ScopeTracker};

/// Error-flow facts about the stages resolved so far in one chain.
#[derive(Default)]
struct Flow {
    /// The last non-capture stage (or the seed) can leave the chain in `Err`.
    may_err: bool,
    /// The last non-capture stage lifted a value into the outcome.
    lifted: bool,
    /// Captures made while the chain may already be in `Err`. They are
    /// skipped on the error path, so a handler that follows poisons them.
    pending: Vec<Name>,
    /// The previous stage was a capture block not yet marked with `|?`.
    resumable: bool,
}

impl Flow {
    /// Record a stage that ends the pending-capture window without
    /// recovering from `Err`.
    fn settle(&mut self, may_err: bool, lifted: bool) {
        self.may_err = may_err;
        self.lifted = lifted;
        self.pending.clear();
    }
}

pub(crate) struct Resolver<'t> {
    table: &'t ScopeTable,
    scopes: ScopeTracker,
    errors: Vec<ResolutionError>,
}

impl<'t> Resolver<'t> {
    pub(crate) fn new(table: &'t ScopeTable) -> Self {
        Resolver {
            table,
            scopes: ScopeTracker::new(),
            errors: Vec::new(),
        }
    }

    pub(crate) fn finish(self, plan: PipeChain) -> Result<PipeChain, Vec<ResolutionError>> {
        if self.errors.is_empty() {
            Ok(plan)
        } else {
            Err(self.errors)
        }
    }

    fn interner(&self) -> &'t StringInterner {
        self.table.interner()
    }

    fn name_string(&self, name: Name) -> String {
        self.interner().lookup(name).to_owned()
    }

    fn error(&mut self, kind: ResolutionErrorKind, span: Span) {
        self.errors.push(ResolutionError::new(kind, span));
    }

    pub(crate) fn resolve_chain(&mut self, chain: &ParsedChain) -> PipeChain {
        ensure_sufficient_stack(|| self.resolve_chain_inner(chain))
    }

    fn resolve_chain_inner(&mut self, chain: &ParsedChain) -> PipeChain {
        let seed = self.resolve_expr(&chain.seed);
        let seed_fallible = yields_failure(&seed);
        let mut flow = Flow {
            may_err: seed_fallible,
            lifted: seed_fallible,
            ..Flow::default()
        };

        let mut stages: Vec<StageNode> = Vec::with_capacity(chain.stages.len());
        for stage in &chain.stages {
            if matches!(stage.kind, StageKind::Resume) {
                self.resolve_resume(stage.span, &mut stages, &mut flow);
                continue;
            }
            let resolved = self.resolve_stage(stage, &mut flow);
            flow.resumable = matches!(resolved, Some(PipeStage::CaptureBlock { .. }));
            if let Some(resolved) = resolved {
                tracing::trace!(stage = resolved.kind_name(), span = %stage.span, "resolved stage");
                stages.push(StageNode {
                    stage: resolved,
                    span: stage.span,
                });
            }
        }

        let reraises = match stages.last() {
            Some(node) => matches!(
                node.stage,
                PipeStage::ErrorGuard | PipeStage::ResultUnwrap { .. }
            ),
            None => seed_fallible,
        };

        PipeChain {
            seed,
            seed_fallible,
            stages,
            reraises,
            span: chain.span,
        }
    }

    /// Resolve a block body in its own frame, optionally binding one name.
    fn resolve_body(&mut self, body: &Body, binding: Option<(Name, Span)>) -> PipeChain {
        self.scopes.push_frame();
        if let Some((name, span)) = binding {
            self.scopes.bind(name, span);
        }
        let chain = self.resolve_chain(&body.chain);
        self.scopes.pop_frame();
        chain
    }

    fn resolve_resume(&mut self, span: Span, stages: &mut [StageNode], flow: &mut Flow) {
        let last = stages.last_mut().map(|node| &mut node.stage);
        match last {
            Some(PipeStage::CaptureBlock { resume, .. }) if flow.resumable => {
                *resume = true;
                flow.resumable = false;
            }
            _ => self.error(ResolutionErrorKind::MisplacedResume, span),
        }
    }
}

/// Whether an expression in seed position can put its chain into `Err`.
fn yields_failure(expr: &ResolvedExpr) -> bool {
    match &expr.kind {
        ResolvedExprKind::Call(call) => match &call.callee {
            Callee::Function(def) => def.signature.fallible,
            Callee::Method(_) | Callee::Dynamic(_) => false,
        },
        ResolvedExprKind::If {
            then_branch,
            else_branch,
            ..
        } => then_branch.reraises || else_branch.as_ref().is_some_and(|b| b.reraises),
        _ => false,
    }
}
