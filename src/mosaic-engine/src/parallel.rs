//! Range-splitting parallel executor.
//!
//! [`ParallelRangeExecutor`] partitions `[0, total)` into contiguous,
//! non-overlapping ranges and runs a task per range on a rayon pool. Small
//! inputs and single-worker configurations run inline on the caller thread.

use std::ops::Range;

use log::{trace, warn};
use rayon::prelude::*;

use common_config::ExecutionConfig;

/// Default tuple count below which execution stays sequential.
pub const DEFAULT_MIN_PARALLEL: usize = 10_000;

/// Splits a tuple range across worker threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParallelRangeExecutor {
    total: usize,
    workers: usize,
    min_parallel: usize,
}

impl ParallelRangeExecutor {
    /// Executor over `[0, total)` using every available core.
    pub fn new(total: usize) -> Self {
        Self {
            total,
            workers: ExecutionConfig::default().effective_workers(),
            min_parallel: DEFAULT_MIN_PARALLEL,
        }
    }

    /// Executor configured from execution settings.
    pub fn from_config(total: usize, config: &ExecutionConfig) -> Self {
        Self {
            total,
            workers: config.effective_workers(),
            min_parallel: config.min_parallel_tuples,
        }
    }

    /// Set the worker count. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Set the tuple count below which execution stays sequential.
    pub fn with_min_parallel(mut self, threshold: usize) -> Self {
        self.min_parallel = threshold;
        self
    }

    /// Total number of tuples.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Configured worker count.
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Check if `run` would use more than the caller thread.
    pub fn is_parallel(&self) -> bool {
        self.workers > 1 && self.total >= self.min_parallel.max(2)
    }

    /// Contiguous ranges covering `[0, total)` with no overlap.
    ///
    /// One range per worker, sizes differing by at most one. A sequential
    /// executor yields a single range; an empty total yields none.
    pub fn ranges(&self) -> Vec<Range<usize>> {
        if self.total == 0 {
            return Vec::new();
        }
        let parts = if self.is_parallel() {
            self.workers.min(self.total)
        } else {
            1
        };
        let base = self.total / parts;
        let extra = self.total % parts;
        let mut start = 0;
        (0..parts)
            .map(|i| {
                let len = base + usize::from(i < extra);
                let range = start..start + len;
                start += len;
                range
            })
            .collect()
    }

    /// Run `task` once per range and wait for all of them.
    pub fn run<F>(&self, task: F)
    where
        F: Fn(Range<usize>) + Send + Sync,
    {
        let ranges = self.ranges();
        trace!("Running {} tuples as {} ranges", self.total, ranges.len());
        if ranges.len() <= 1 {
            ranges.into_iter().for_each(task);
            return;
        }
        match self.build_pool() {
            Ok(pool) => in_pool(pool.as_ref(), || ranges.into_par_iter().for_each(&task)),
            Err(e) => {
                warn!("Falling back to sequential execution: {e}");
                ranges.into_iter().for_each(&task);
            }
        }
    }

    /// Run `task` once per range with exclusive access to that range's
    /// slice of `output`, which holds `components` values per tuple.
    ///
    /// # Panics
    ///
    /// Panics if `output.len() != total * components`.
    pub fn run_mut<T, F>(&self, output: &mut [T], components: usize, task: F)
    where
        T: Send,
        F: Fn(Range<usize>, &mut [T]) + Send + Sync,
    {
        assert_eq!(
            output.len(),
            self.total * components,
            "output slice does not hold {} tuples of {components} components",
            self.total
        );
        let ranges = self.ranges();
        trace!("Running {} tuples as {} mutable ranges", self.total, ranges.len());
        let slices = split_ranges(output, &ranges, components);
        if slices.len() <= 1 {
            slices.into_iter().for_each(|(r, s)| task(r, s));
            return;
        }
        match self.build_pool() {
            Ok(pool) => in_pool(pool.as_ref(), || {
                slices.into_par_iter().for_each(|(r, s)| task(r, s));
            }),
            Err(e) => {
                warn!("Falling back to sequential execution: {e}");
                slices.into_iter().for_each(|(r, s)| task(r, s));
            }
        }
    }

    /// Map each range to a value and collect the results in range order.
    pub fn map_ranges<R, F>(&self, task: F) -> Vec<R>
    where
        R: Send,
        F: Fn(Range<usize>) -> R + Send + Sync,
    {
        let ranges = self.ranges();
        if ranges.len() <= 1 {
            return ranges.into_iter().map(task).collect();
        }
        match self.build_pool() {
            Ok(pool) => in_pool(pool.as_ref(), || ranges.into_par_iter().map(&task).collect()),
            Err(e) => {
                warn!("Falling back to sequential execution: {e}");
                ranges.into_iter().map(&task).collect()
            }
        }
    }

    /// A dedicated pool sized to `workers`, or `None` when the global pool
    /// already has that size.
    fn build_pool(&self) -> Result<Option<rayon::ThreadPool>, rayon::ThreadPoolBuildError> {
        if self.workers == rayon::current_num_threads() {
            return Ok(None);
        }
        rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .build()
            .map(Some)
    }
}

fn in_pool<R: Send>(pool: Option<&rayon::ThreadPool>, op: impl FnOnce() -> R + Send) -> R {
    match pool {
        Some(pool) => pool.install(op),
        None => op(),
    }
}

/// Split `output` into the disjoint sub-slices covering each range.
fn split_ranges<'a, T>(
    mut output: &'a mut [T],
    ranges: &[Range<usize>],
    components: usize,
) -> Vec<(Range<usize>, &'a mut [T])> {
    let mut slices = Vec::with_capacity(ranges.len());
    for range in ranges {
        let (head, tail) = output.split_at_mut(range.len() * components);
        slices.push((range.clone(), head));
        output = tail;
    }
    slices
}
