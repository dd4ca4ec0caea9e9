/// Stack left free before a nested body runs.
const RED_ZONE: usize = 128 * 1024;

/// Size of each additional stack segment.
const STACK_PER_BODY: usize = 2 * 1024 * 1024;

/// Runs `f`, growing the stack first if less than [`RED_ZONE`] remains.
///
/// Every Eve call and include re-enters the whole line driver, so a call
/// chain near `max_call_depth` needs far more stack than a spawned thread
/// gets by default.
///
/// ## Example
/// ```
/// use pile::util::stack::ensure_sufficient_stack;
///
/// fn depth(n: u32) -> u32 {
///     if n == 0 { 0 } else { ensure_sufficient_stack(|| depth(n - 1)) + 1 }
/// }
///
/// assert_eq!(depth(10_000), 10_000);
/// ```
#[inline]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_BODY, f)
}
