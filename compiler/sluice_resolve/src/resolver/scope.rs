//! Lexical scope tracking for chain-local bindings.

use rustc_hash::FxHashMap;
use sluice_ir::{Name, Span};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Binding {
    Bound { span: Span },
    /// Captured only on the `Ok` path of a stage whose handler already ran.
    PossiblyUnbound { span: Span },
}

impl Binding {
    pub(crate) fn span(self) -> Span {
        match self {
            Binding::Bound { span } | Binding::PossiblyUnbound { span } => span,
        }
    }
}

/// Stack of binding frames. The outermost frame belongs to the top-level
/// chain; every block body and conditional branch pushes its own.
pub(crate) struct ScopeTracker {
    frames: Vec<FxHashMap<Name, Binding>>,
}

impl ScopeTracker {
    pub(crate) fn new() -> Self {
        ScopeTracker {
            frames: vec![FxHashMap::default()],
        }
    }

    pub(crate) fn push_frame(&mut self) {
        self.frames.push(FxHashMap::default());
    }

    pub(crate) fn pop_frame(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        }
    }

    /// Bind `name` in the innermost frame. Returns the span of an existing
    /// binding of the same name in that frame.
    pub(crate) fn bind(&mut self, name: Name, span: Span) -> Option<Span> {
        let frame = self.frames.last_mut()?;
        frame
            .insert(name, Binding::Bound { span })
            .map(Binding::span)
    }

    /// Mark a binding in the innermost frame as possibly skipped.
    pub(crate) fn poison(&mut self, name: Name) {
        if let Some(binding) = self.frames.last_mut().and_then(|f| f.get_mut(&name)) {
            *binding = Binding::PossiblyUnbound {
                span: binding.span(),
            };
        }
    }

    /// Innermost binding of `name`, if any.
    pub(crate) fn lookup(&self, name: Name) -> Option<Binding> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(&name).copied())
    }
}
