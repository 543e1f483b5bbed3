//! Stack growth for nested pipe bodies.
//!
//! Bodies nest chains inside chains, and the parser, resolver and evaluator
//! all recurse once per level. Each recursive entry point wraps itself in
//! [`ensure_sufficient_stack`] so deep nesting grows the stack instead of
//! overflowing it. The evaluator still enforces its own depth limit on top.

/// Grow when less than this much stack remains.
const RED_ZONE: usize = 96 * 1024;

/// Size of each freshly allocated stack segment.
const NEW_SEGMENT: usize = 1024 * 1024;

/// Run `f`, first growing the stack if it is close to exhausted.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, NEW_SEGMENT, f)
}

/// The wasm runtime owns its stack; call straight through.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Models a body nested `depth` levels deep.
    fn nest(depth: u32) -> u32 {
        ensure_sufficient_stack(|| if depth == 0 { 0 } else { nest(depth - 1) + 1 })
    }

    #[test]
    fn test_passes_result_through() {
        let out: Result<&str, ()> = ensure_sufficient_stack(|| Ok("ok"));
        assert_eq!(out, Ok("ok"));
    }

    #[test]
    fn test_shallow_nesting() {
        assert_eq!(nest(16), 16);
    }

    #[test]
    fn test_deep_nesting_grows_stack() {
        assert_eq!(nest(200_000), 200_000);
    }
}
