//! Chain resolver: turns a [`ParsedChain`] into an executable [`PipeChain`].
//!
//! Resolution binds every identifier to a chain-local scope or a host
//! variable, binds every callee to its registered definition (or to the
//! host's dynamic dispatch), selects the concrete stage variant for each
//! operator, and rejects illegal stage orderings. All errors in a chain are
//! reported together.

mod error;
mod plan;
mod resolver;
mod scope_table;

use sluice_ir::ParsedChain;

pub use error::{ResolutionError, ResolutionErrorKind};
pub use plan::{
    ArgMode, CallPlan, Callee, Guard, MatchArmPlan, PipeChain, PipeStage, ResolvedExpr,
    ResolvedExprKind, StageNode,
};
pub use scope_table::{
    DynamicDispatch, FunctionDef, MethodDef, NativeFn, NativeMethod, ScopeTable, Signature,
};

/// Resolve a parsed chain against the host's scope table.
#[tracing::instrument(level = "debug", skip_all, fields(stages = chain.stages.len()))]
pub fn resolve(chain: &ParsedChain, table: &ScopeTable) -> Result<PipeChain, Vec<ResolutionError>> {
    let mut resolver = resolver::Resolver::new(table);
    let plan = resolver.resolve_chain(chain);
    let result = resolver.finish(plan);
    if let Err(errors) = &result {
        tracing::debug!(count = errors.len(), "resolution failed");
    }
    result
}
