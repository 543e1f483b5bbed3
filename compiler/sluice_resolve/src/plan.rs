//! Resolved chain plan.
//!
//! A [`PipeChain`] is the only thing the evaluator sees. Every callee is a
//! direct reference into the host's [`ScopeTable`](crate::ScopeTable), every
//! stage variant has already been checked for legality, and every name is
//! known to be either chain-local or an outer variable. Plans are immutable
//! and can be shared across threads and evaluated any number of times.

use std::sync::Arc;

use sluice_ir::{Name, ResultTag, Span};
use sluice_value::Value;

use crate::scope_table::{FunctionDef, MethodDef};

/// A resolved chain: seed followed by typed stages.
#[derive(Clone, Debug)]
pub struct PipeChain {
    pub seed: ResolvedExpr,
    /// The seed is a fallible call (or a conditional with a re-raising
    /// branch), so its value is lifted into the initial outcome.
    pub seed_fallible: bool,
    pub stages: Vec<StageNode>,
    /// An `Err` reaching the end of this chain propagates out of the
    /// enclosing handler or block instead of being re-wrapped as `Ok`.
    pub reraises: bool,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct StageNode {
    pub stage: PipeStage,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum PipeStage {
    /// Non-fallible function call; the result replaces the current value.
    Transform(CallPlan),
    /// Non-fallible method call on the current value; the return value is
    /// discarded.
    MutatingCall(CallPlan),
    /// Lift into the outcome. With a call, the call result is lifted; a
    /// fallible method keeps the receiver on `Ok`. Without one, the current
    /// value itself is lifted.
    ResultUnwrap { call: Option<CallPlan> },
    /// Bind the current value in the current scope.
    Capture { name: Name },
    /// Bind the current value in a nested scope and run `body`; the body's
    /// result becomes current.
    CaptureBlock {
        name: Name,
        body: Box<PipeChain>,
        /// Followed by `|?`.
        resume: bool,
    },
    /// Bare `|!` after a lifting stage: pass `Ok` through, short-circuit on
    /// `Err`.
    ErrorGuard,
    /// `|! [name]: body` - runs only on `Err`.
    ErrorHandlerBlock { name: Name, body: Box<PipeChain> },
    /// `| match:` - exactly one `Ok` and one `Err` arm.
    MatchBlock { arms: Vec<MatchArmPlan> },
    /// `| handle [name]: body` - same semantics as an error handler block.
    HandleSugar { name: Name, body: Box<PipeChain> },
    /// `|$ label args` - observational, never changes the value.
    Tap { label: Name, args: Vec<ResolvedExpr> },
}

impl PipeStage {
    /// Short stage name for tracing.
    pub fn kind_name(&self) -> &'static str {
        match self {
            PipeStage::Transform(_) => "transform",
            PipeStage::MutatingCall(_) => "mutating_call",
            PipeStage::ResultUnwrap { .. } => "result_unwrap",
            PipeStage::Capture { .. } => "capture",
            PipeStage::CaptureBlock { .. } => "capture_block",
            PipeStage::ErrorGuard => "error_guard",
            PipeStage::ErrorHandlerBlock { .. } => "error_handler",
            PipeStage::MatchBlock { .. } => "match",
            PipeStage::HandleSugar { .. } => "handle",
            PipeStage::Tap { .. } => "tap",
        }
    }
}

#[derive(Clone, Debug)]
pub struct MatchArmPlan {
    pub tag: ResultTag,
    pub binding: Name,
    pub body: PipeChain,
    pub span: Span,
}

/// How a stage call fills its arguments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArgMode {
    /// The current value is the first argument (or the receiver for methods).
    Piped,
    /// Only the written arguments are passed.
    Explicit,
}

#[derive(Clone, Debug)]
pub enum Callee {
    Function(Arc<FunctionDef>),
    Method(Arc<MethodDef>),
    /// Not in the table; routed through the host's dynamic dispatch.
    Dynamic(Name),
}

#[derive(Clone, Debug)]
pub struct CallPlan {
    pub name: Name,
    pub callee: Callee,
    pub args: Vec<ResolvedExpr>,
    pub mode: ArgMode,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub struct ResolvedExpr {
    pub kind: ResolvedExprKind,
    pub span: Span,
}

#[derive(Clone, Debug)]
pub enum ResolvedExprKind {
    Literal(Value),
    /// Bound by a capture, handler, match arm or conditional unwrap.
    Local(Name),
    /// Outer variable from the host.
    Global(Name),
    Call(CallPlan),
    Ok(Box<ResolvedExpr>),
    Err(Box<ResolvedExpr>),
    If {
        guard: Box<Guard>,
        then_branch: Box<PipeChain>,
        else_branch: Option<Box<PipeChain>>,
    },
}

#[derive(Clone, Debug)]
pub enum Guard {
    Bool(ResolvedExpr),
    /// True when `subject` is neither `none` nor `Err`; the payload is bound
    /// to `binding` for the then-branch.
    OptionalUnwrap { subject: ResolvedExpr, binding: Name },
}

impl ResolvedExpr {
    pub fn new(kind: ResolvedExprKind, span: Span) -> Self {
        ResolvedExpr { kind, span }
    }

    /// Whether evaluating this expression reads a chain-local binding.
    ///
    /// Conditionals count as local: their branches run in chain scopes.
    pub fn references_local(&self) -> bool {
        match &self.kind {
            ResolvedExprKind::Literal(_) | ResolvedExprKind::Global(_) => false,
            ResolvedExprKind::Local(_) | ResolvedExprKind::If { .. } => true,
            ResolvedExprKind::Call(call) => call.args.iter().any(ResolvedExpr::references_local),
            ResolvedExprKind::Ok(inner) | ResolvedExprKind::Err(inner) => {
                inner.references_local()
            }
        }
    }
}
