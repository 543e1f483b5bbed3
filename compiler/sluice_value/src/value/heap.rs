use std::fmt;
use std::ops::Deref;
use std::sync::Arc;

/// Shared, immutable-by-default heap payload of a [`Value`](super::Value).
///
/// The constructor is private to the `value` module; build heap values through
/// the `Value` factory methods.
#[derive(Clone, PartialEq, Eq)]
pub struct Heap<T>(Arc<T>);

impl<T> Heap<T> {
    #[inline]
    pub(super) fn new(inner: T) -> Self {
        Heap(Arc::new(inner))
    }

    /// True when both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(a: &Self, b: &Self) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }
}

impl<T: Clone> Heap<T> {
    /// Copy-on-write access for mutating methods.
    #[inline]
    pub(super) fn make_mut(&mut self) -> &mut T {
        Arc::make_mut(&mut self.0)
    }
}

impl<T> Deref for Heap<T> {
    type Target = T;

    #[inline]
    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: fmt::Debug> fmt::Debug for Heap<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
