//! Non-faulting read prefetch for the branchless binary searches.
//!
//! The searches advance their index with a conditional move, so the branch
//! predictor cannot speculate ahead and fetch the next probe on its own. The
//! search loops therefore prefetch both candidate midpoints explicitly before
//! the index update.

/// Hints the CPU to fetch the cache line containing `ptr` into all cache
/// levels. A no-op on architectures without a prefetch intrinsic; correctness
/// never depends on it.
///
/// The address does not have to be in bounds of any allocation, so callers may
/// form it with wrapping pointer arithmetic.
#[inline(always)]
#[allow(unused_variables)]
pub(crate) fn prefetch_read<T>(ptr: *const T) {
    #[cfg(target_arch = "x86_64")]
    // SAFETY: prefetch instructions do not fault, any address is allowed.
    unsafe {
        use std::arch::x86_64::{_mm_prefetch, _MM_HINT_T0};
        _mm_prefetch::<{ _MM_HINT_T0 }>(ptr.cast::<i8>());
    }
}
