//! Stack growth for the recursive tree walks
//!
//! Parsing, evaluation, rendering and dependency collection recurse once per
//! tree level. A 200k-term sum is a 200k-deep left spine, so each recursive
//! entry point runs inside [`ensure_sufficient_stack`].

/// Grow when less than this remains
const RED_ZONE: usize = 100 * 1024;

/// Size of each new stack segment
const STACK_PER_RECURSION: usize = 1024 * 1024;

#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

#[inline]
#[cfg(target_arch = "wasm32")]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}
