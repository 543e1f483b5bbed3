//! Outcome dispatch helpers shared by handlers, match blocks and `!?`.

use sluice_resolve::MatchArmPlan;
use sluice_value::{Outcome, Value};

/// First arm whose tag matches the outcome.
pub fn select_arm<'a>(arms: &'a [MatchArmPlan], outcome: &Outcome) -> Option<&'a MatchArmPlan> {
    let tag = outcome.tag();
    arms.iter().find(|arm| arm.tag == tag)
}

/// Apply the handler rule to a finished body.
///
/// A body `Err` escapes only when the body re-raises; otherwise it is kept
/// as a result-shaped value on the `Ok` channel.
pub fn settle_body(outcome: Outcome, reraises: bool) -> Outcome {
    match outcome {
        Outcome::Err(payload) if !reraises => Outcome::Ok(Value::err(payload)),
        other => other,
    }
}

/// Conditional-unwrap semantics of `!?`: absent for `none` and `Err`,
/// the payload for `Ok`, the value itself otherwise.
pub fn optional_unwrap(value: Value) -> Option<Value> {
    match value {
        Value::None | Value::Err(_) => None,
        Value::Ok(inner) => Some((*inner).clone()),
        other => Some(other),
    }
}
