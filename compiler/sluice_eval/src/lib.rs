//! Pipe-chain evaluator.
//!
//! Executes a resolved [`PipeChain`](sluice_resolve::PipeChain): threads one
//! current value through the stages, keeps the `Ok`/`Err` state register,
//! and manages the binding environment of captures and block bodies.
//!
//! Data-level failures travel on the `Err` channel of the returned
//! [`Outcome`]; an [`EvalError`] is a host fault (a native callable failed,
//! or bodies nested past the configured depth).

mod environment;
mod evaluator;
mod exec;
pub mod matching;
mod scope_guard;
pub mod tap;

pub use environment::{Environment, LocalScope, Scope};
pub use evaluator::{EvalConfig, Evaluator, EvaluatorBuilder, OuterBindings, DEFAULT_MAX_DEPTH};
pub use sluice_value::{EvalError, Outcome, Value};
pub use tap::{buffer_tap, silent_tap, tracing_tap, SharedTapHandler, TapHandlerImpl};

use std::sync::Once;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for debug output.
///
/// Safe to call multiple times. Only installs a subscriber when `RUST_LOG`
/// is set, e.g. `RUST_LOG=sluice_eval=debug` or `RUST_LOG=sluice::tap=info`.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // Another subscriber may already be installed by the host.
            let _ = tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init();
        }
    });
}

#[cfg(test)]
mod tests;
