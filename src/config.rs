//! Process-scoped configuration: thread count and scheduling thresholds.
//!
//! Grounded on the teacher's lazily-initialized `OnceLock`-behind-an-
//! accessor pattern (`text_encoding.rs`'s `ENCODE_TABLE`/`get_encode_table`);
//! here it backs §5/§6's `set_number_of_threads` / `get_number_of_threads`
//! and the "small work" scheduling threshold that §9's open questions ask
//! to be a tunable rather than a hard-coded 70 000.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::OnceLock;

static NUM_THREADS: OnceLock<AtomicUsize> = OnceLock::new();
static MIN_PARALLEL_OPS: AtomicUsize = AtomicUsize::new(70_000);

fn default_thread_count() -> usize {
    std::env::var("PIXELFORGE_NUM_THREADS")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|&n| n > 0)
        .unwrap_or_else(|| std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1))
}

fn cell() -> &'static AtomicUsize {
    NUM_THREADS.get_or_init(|| AtomicUsize::new(default_thread_count()))
}

/// Returns the number of worker threads framework entry points may use.
///
/// Safe to call from any thread; not synchronized with in-flight framework
/// calls, per §9's design note on global defaults.
pub fn get_number_of_threads() -> usize {
    cell().load(Ordering::Relaxed)
}

/// Overrides the number of worker threads. Takes effect for framework calls
/// started after this returns; does not affect calls already in progress.
pub fn set_number_of_threads(n: usize) {
    cell().store(n.max(1), Ordering::Relaxed);
}

/// Returns the minimum number of basic operations (roughly: samples times an
/// estimate of per-sample work) below which a framework pass runs on the
/// calling thread instead of dividing work across the pool.
pub fn get_minimum_parallel_operations() -> usize {
    MIN_PARALLEL_OPS.load(Ordering::Relaxed)
}

/// Overrides the small-work threshold described above.
pub fn set_minimum_parallel_operations(n: usize) {
    MIN_PARALLEL_OPS.store(n, Ordering::Relaxed);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_count_is_at_least_one() {
        assert!(get_number_of_threads() >= 1);
    }

    #[test]
    fn set_and_get_round_trips() {
        let prev = get_number_of_threads();
        set_number_of_threads(3);
        assert_eq!(get_number_of_threads(), 3);
        set_number_of_threads(prev);
    }

    #[test]
    fn min_parallel_ops_default_matches_documented_tuning() {
        assert_eq!(get_minimum_parallel_operations(), 70_000);
    }
}
