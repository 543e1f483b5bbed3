//! Runtime data for pipe-chain evaluation.
//!
//! - [`Value`]: the opaque value handle threaded between stages
//! - [`Outcome`]: the `Ok`/`Err` state register of a running chain
//! - [`EvalError`]: host faults, kept apart from the data-level `Err` channel

mod errors;
mod outcome;
mod value;

pub use errors::{
    depth_exceeded, native_failure, type_mismatch, undefined_callable, undefined_variable,
    wrong_arg_count, EvalError, EvalErrorKind, EvalResult,
};
pub use outcome::Outcome;
pub use value::{Heap, Value};
