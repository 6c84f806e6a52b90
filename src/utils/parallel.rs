#[cfg(feature = "parallel")]
use rayon::prelude::*;

// Heuristic: rayon's scheduling overhead dominates for a handful of tiles
const PARALLEL_THRESHOLD: usize = 4;

/// Maps `f` over `items`, in parallel when the `parallel` feature is on and
/// the batch is large enough. Output order matches input order.
#[inline]
pub fn map_collect<T, R, F>(items: Vec<T>, f: F) -> Vec<R>
where
    T: Send,
    R: Send,
    F: Fn(T) -> R + Sync + Send,
{
    #[cfg(all(feature = "parallel", not(target_arch = "wasm32")))]
    {
        if items.len() >= PARALLEL_THRESHOLD {
            items.into_par_iter().map(f).collect()
        } else {
            items.into_iter().map(f).collect()
        }
    }
    #[cfg(any(not(feature = "parallel"), target_arch = "wasm32"))]
    {
        let _ = PARALLEL_THRESHOLD;
        items.into_iter().map(f).collect()
    }
}
