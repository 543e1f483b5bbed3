//! RAII scope guard for block bodies.
//!
//! The guard holds `&mut Run` and derefs to it, so a body is evaluated
//! through the guard. Dropping it pops the scope and the nesting level,
//! including during unwinding out of a native callable.

use std::ops::{Deref, DerefMut};

use sluice_ir::Name;
use sluice_value::Value;

use crate::exec::Run;

pub(crate) struct ScopedRun<'guard, 'e> {
    run: &'guard mut Run<'e>,
}

impl Drop for ScopedRun<'_, '_> {
    fn drop(&mut self) {
        self.run.env.pop_scope();
        self.run.depth -= 1;
    }
}

impl<'e> Deref for ScopedRun<'_, 'e> {
    type Target = Run<'e>;

    fn deref(&self) -> &Self::Target {
        self.run
    }
}

impl DerefMut for ScopedRun<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.run
    }
}

impl<'e> Run<'e> {
    /// Enter a nested scope one level deeper.
    pub(crate) fn scoped(&mut self) -> ScopedRun<'_, 'e> {
        self.env.push_scope();
        self.depth += 1;
        ScopedRun { run: self }
    }

    /// Run `f` in a nested scope, optionally with one binding defined.
    pub(crate) fn with_binding<T>(
        &mut self,
        binding: Option<(Name, Value)>,
        f: impl FnOnce(&mut Run<'e>) -> T,
    ) -> T {
        let mut scoped = self.scoped();
        if let Some((name, value)) = binding {
            scoped.env.define(name, value);
        }
        f(&mut *scoped)
    }
}
