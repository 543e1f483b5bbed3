//! The chain's state register.

use std::fmt;

use sluice_ir::ResultTag;

use crate::Value;

/// Success or failure of the value flowing through a chain.
///
/// Once a chain reaches `Err`, only handler and match stages see the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Ok(Value),
    Err(Value),
}

impl Outcome {
    /// Interpret a result-shaped value as an outcome.
    ///
    /// `Ok(x)` becomes `Ok(x)`, `Err(e)` becomes `Err(e)`, and any other value
    /// `v` becomes `Ok(v)`.
    pub fn lift(value: Value) -> Self {
        match value {
            Value::Ok(inner) => Outcome::Ok((*inner).clone()),
            Value::Err(inner) => Outcome::Err((*inner).clone()),
            other => Outcome::Ok(other),
        }
    }

    pub fn tag(&self) -> ResultTag {
        match self {
            Outcome::Ok(_) => ResultTag::Ok,
            Outcome::Err(_) => ResultTag::Err,
        }
    }

    #[inline]
    pub fn is_ok(&self) -> bool {
        matches!(self, Outcome::Ok(_))
    }

    #[inline]
    pub fn is_err(&self) -> bool {
        matches!(self, Outcome::Err(_))
    }

    pub fn payload(&self) -> &Value {
        match self {
            Outcome::Ok(v) | Outcome::Err(v) => v,
        }
    }

    pub fn into_payload(self) -> Value {
        match self {
            Outcome::Ok(v) | Outcome::Err(v) => v,
        }
    }

    /// Back to a result-shaped `Value`.
    pub fn into_value(self) -> Value {
        match self {
            Outcome::Ok(v) => Value::ok(v),
            Outcome::Err(e) => Value::err(e),
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Ok(v) => write!(f, "Ok({v})"),
            Outcome::Err(e) => write!(f, "Err({e})"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_lift_result_shapes() {
        assert_eq!(
            Outcome::lift(Value::ok(Value::int(1))),
            Outcome::Ok(Value::int(1))
        );
        assert_eq!(
            Outcome::lift(Value::err(Value::string("x"))),
            Outcome::Err(Value::string("x"))
        );
    }

    #[test]
    fn test_lift_plain_value_is_ok() {
        assert_eq!(Outcome::lift(Value::None), Outcome::Ok(Value::None));
        assert_eq!(Outcome::lift(Value::int(7)), Outcome::Ok(Value::int(7)));
    }

    #[test]
    fn test_lift_only_unwraps_one_level() {
        let nested = Value::ok(Value::err(Value::int(1)));
        assert_eq!(
            Outcome::lift(nested),
            Outcome::Ok(Value::err(Value::int(1)))
        );
    }

    #[test]
    fn test_tag_and_payload() {
        let out = Outcome::Err(Value::int(3));
        assert_eq!(out.tag(), ResultTag::Err);
        assert_eq!(out.payload(), &Value::int(3));
        assert_eq!(out.into_value(), Value::err(Value::int(3)));
    }
}
