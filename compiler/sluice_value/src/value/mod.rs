//! Runtime values passed between pipe stages.
//!
//! The evaluator only looks at a value's result shape (`Ok`, `Err`, `none`)
//! and its truthiness. Everything else is for native callables.
//!
//! Heap payloads go through [`Heap`], whose constructor is private, so every
//! heap value is built with a factory method:
//!
//! ```text
//! let s = Value::string("hello");
//! let xs = Value::list(vec![Value::int(1)]);
//! let failed = Value::err(Value::string("not found"));
//! ```

mod heap;

use std::fmt;

pub use heap::Heap;

/// Runtime value handle.
#[derive(Clone, PartialEq, Eq)]
pub enum Value {
    /// Unit value returned by side-effecting callables.
    Void,
    Bool(bool),
    Int(i64),
    Str(Heap<String>),
    List(Heap<Vec<Value>>),
    /// The absent-value sentinel `none`.
    None,
    /// Success payload.
    Ok(Heap<Value>),
    /// Failure payload.
    Err(Heap<Value>),
}

// Factory methods

impl Value {
    #[inline]
    pub fn int(n: i64) -> Self {
        Value::Int(n)
    }

    #[inline]
    pub fn string(s: impl Into<String>) -> Self {
        Value::Str(Heap::new(s.into()))
    }

    #[inline]
    pub fn list(items: Vec<Value>) -> Self {
        Value::List(Heap::new(items))
    }

    /// Wrap a value as `Ok(v)`.
    #[inline]
    pub fn ok(v: Value) -> Self {
        Value::Ok(Heap::new(v))
    }

    /// Wrap a value as `Err(e)`.
    #[inline]
    pub fn err(v: Value) -> Self {
        Value::Err(Heap::new(v))
    }
}

impl Value {
    /// Truthiness used by `if` guards.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Bool(b) => *b,
            Value::Int(n) => *n != 0,
            Value::Str(s) => !s.is_empty(),
            Value::List(items) => !items.is_empty(),
            Value::Ok(_) => true,
            Value::None | Value::Err(_) | Value::Void => false,
        }
    }

    /// True for `Ok(_)` and `Err(_)`.
    pub fn is_result(&self) -> bool {
        matches!(self, Value::Ok(_) | Value::Err(_))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Value::None)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    /// Mutable list access for in-place methods. Copies a shared list first.
    pub fn as_list_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Value::List(items) => Some(items.make_mut()),
            _ => None,
        }
    }

    /// Mutable string access for in-place methods. Copies a shared string first.
    pub fn as_string_mut(&mut self) -> Option<&mut String> {
        match self {
            Value::Str(s) => Some(s.make_mut()),
            _ => None,
        }
    }

    /// Name of the value's shape, for fault messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Void => "void",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Str(_) => "str",
            Value::List(_) => "list",
            Value::None => "none",
            Value::Ok(_) | Value::Err(_) => "Result",
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "Void"),
            Value::Bool(b) => write!(f, "Bool({b})"),
            Value::Int(n) => write!(f, "Int({n})"),
            Value::Str(s) => write!(f, "Str({:?})", &**s),
            Value::List(items) => write!(f, "List({:?})", &**items),
            Value::None => write!(f, "None"),
            Value::Ok(v) => write!(f, "Ok({:?})", &**v),
            Value::Err(v) => write!(f, "Err({:?})", &**v),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Void => write!(f, "void"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Str(s) => write!(f, "\"{}\"", &**s),
            Value::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Value::None => write!(f, "none"),
            Value::Ok(v) => write!(f, "Ok({})", &**v),
            Value::Err(v) => write!(f, "Err({})", &**v),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}
