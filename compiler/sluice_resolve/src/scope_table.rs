//! Host-provided callables and outer variable names.
//!
//! The resolver looks names up here once and stores direct references in the
//! plan, so evaluation never searches by name except through the optional
//! [`DynamicDispatch`] fallback.

use std::fmt;
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHashSet};
use sluice_ir::{Name, SharedInterner};
use sluice_value::{EvalResult, Value};

/// Native free function.
pub type NativeFn = Arc<dyn Fn(&[Value]) -> EvalResult + Send + Sync>;

/// Native method. The receiver may be mutated in place; the return value is
/// discarded by `|.` unless the method is fallible.
pub type NativeMethod = Arc<dyn Fn(&mut Value, &[Value]) -> EvalResult + Send + Sync>;

/// Call shape of a native callable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Number of arguments. For methods this excludes the receiver.
    pub arity: usize,
    /// The piped value may fill the first argument.
    pub takes_piped: bool,
    /// Returns `Ok(v)`/`Err(e)` to be lifted into the chain's outcome.
    pub fallible: bool,
}

impl Signature {
    /// A callable that only takes explicit arguments.
    pub const fn new(arity: usize) -> Self {
        Signature {
            arity,
            takes_piped: false,
            fallible: false,
        }
    }

    /// A callable whose first argument can be the piped value.
    pub const fn piped(arity: usize) -> Self {
        Signature {
            arity,
            takes_piped: true,
            fallible: false,
        }
    }

    #[must_use]
    pub const fn fallible(mut self) -> Self {
        self.fallible = true;
        self
    }
}

pub struct FunctionDef {
    pub name: Name,
    pub signature: Signature,
    pub func: NativeFn,
}

pub struct MethodDef {
    pub name: Name,
    pub signature: Signature,
    pub method: NativeMethod,
}

impl fmt::Debug for FunctionDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionDef")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl fmt::Debug for MethodDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MethodDef")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Fallback for callables the table does not know statically.
///
/// Dynamic callees are never treated as fallible; follow them with `|!` to
/// lift a result-shaped return value.
pub trait DynamicDispatch: Send + Sync {
    fn call_function(&self, name: &str, args: &[Value]) -> EvalResult;

    fn call_method(&self, name: &str, receiver: &mut Value, args: &[Value]) -> EvalResult;
}

/// Everything a chain may refer to from outside.
#[derive(Clone)]
pub struct ScopeTable {
    interner: SharedInterner,
    functions: FxHashMap<Name, Arc<FunctionDef>>,
    methods: FxHashMap<Name, Arc<MethodDef>>,
    globals: FxHashSet<Name>,
    dynamic: Option<Arc<dyn DynamicDispatch>>,
}

impl ScopeTable {
    pub fn new(interner: SharedInterner) -> Self {
        ScopeTable {
            interner,
            functions: FxHashMap::default(),
            methods: FxHashMap::default(),
            globals: FxHashSet::default(),
            dynamic: None,
        }
    }

    pub fn interner(&self) -> &SharedInterner {
        &self.interner
    }

    /// Register a free function, replacing any previous one of the same name.
    pub fn register_function(
        &mut self,
        name: &str,
        signature: Signature,
        func: impl Fn(&[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let name = self.interner.intern(name);
        self.functions.insert(
            name,
            Arc::new(FunctionDef {
                name,
                signature,
                func: Arc::new(func),
            }),
        );
        self
    }

    /// Register a method callable with `|.`.
    pub fn register_method(
        &mut self,
        name: &str,
        signature: Signature,
        method: impl Fn(&mut Value, &[Value]) -> EvalResult + Send + Sync + 'static,
    ) -> &mut Self {
        let name = self.interner.intern(name);
        self.methods.insert(
            name,
            Arc::new(MethodDef {
                name,
                signature,
                method: Arc::new(method),
            }),
        );
        self
    }

    /// Declare an outer variable the chain may read.
    pub fn declare_global(&mut self, name: &str) -> Name {
        let name = self.interner.intern(name);
        self.globals.insert(name);
        name
    }

    pub fn set_dynamic_dispatch(&mut self, dispatch: Arc<dyn DynamicDispatch>) -> &mut Self {
        self.dynamic = Some(dispatch);
        self
    }

    pub fn function(&self, name: Name) -> Option<&Arc<FunctionDef>> {
        self.functions.get(&name)
    }

    pub fn method(&self, name: Name) -> Option<&Arc<MethodDef>> {
        self.methods.get(&name)
    }

    pub fn is_global(&self, name: Name) -> bool {
        self.globals.contains(&name)
    }

    pub fn dynamic(&self) -> Option<&Arc<dyn DynamicDispatch>> {
        self.dynamic.as_ref()
    }
}

impl fmt::Debug for ScopeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScopeTable")
            .field("functions", &self.functions.len())
            .field("methods", &self.methods.len())
            .field("globals", &self.globals.len())
            .field("dynamic", &self.dynamic.is_some())
            .finish()
    }
}
