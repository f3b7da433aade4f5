//! Unit tests for mosaic-engine
//!
//! These tests focus on the dispatcher and the range executor through the
//! public API, without duplicating the module tests.

use proptest::prelude::*;

use mosaic_core::{AnyArray, DataArray, DataArrayPath, DataType, Primitive};
use mosaic_engine::{
    dispatch, dispatch_mut, ArrayVisitor, ArrayVisitorMut, FilterContext, ParallelRangeExecutor,
    TypeSet,
};

use common_error::codes;

/// Records which instantiation ran, in dispatch order.
struct Recorder(Vec<DataType>);

impl ArrayVisitor for Recorder {
    type Output = usize;

    fn visit<T: Primitive>(&mut self, array: &DataArray<T>) -> usize {
        self.0.push(T::DATA_TYPE);
        array.len()
    }
}

/// Squares values in place over a parallel range split.
struct SquareInPlace {
    workers: usize,
}

impl ArrayVisitorMut for SquareInPlace {
    type Output = ();

    fn supported(&self) -> TypeSet {
        TypeSet::NUMERIC
    }

    fn visit_mut<T: Primitive>(&mut self, array: &mut DataArray<T>) {
        let tuples = array.num_tuples();
        let comps = array.num_components();
        ParallelRangeExecutor::new(tuples)
            .with_workers(self.workers)
            .with_min_parallel(0)
            .run_mut(array.as_mut_slice(), comps, |_, slice| {
                for v in slice.iter_mut() {
                    let x = v.to_f64();
                    *v = T::from_f64(x * x);
                }
            });
    }
}

#[test]
fn test_dispatch_exhaustive_over_all_types() {
    let path = DataArrayPath::new("C", "M", "A");
    let mut recorder = Recorder(Vec::new());
    let mut ctx = FilterContext::new("Test");

    for ty in DataType::ALL {
        let array = AnyArray::create(ty, "A", 5, &[2]).unwrap();
        assert_eq!(dispatch(&array, &path, &mut ctx, &mut recorder), Some(10));
    }
    assert_eq!(recorder.0, DataType::ALL.to_vec());
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn test_unsupported_type_produces_one_diagnostic() {
    let path = DataArrayPath::new("C", "M", "Flags");
    let mut ctx = FilterContext::new("Square");
    let mut flags = AnyArray::create(DataType::Bool, "Flags", 5, &[1]).unwrap();

    let result = dispatch_mut(&mut flags, &path, &mut ctx, &mut SquareInPlace { workers: 2 });
    assert!(result.is_none());
    assert_eq!(ctx.diagnostics().len(), 1);
    assert_eq!(ctx.diagnostics()[0].code, codes::UNSUPPORTED_ARRAY_TYPE);
    assert_eq!(ctx.diagnostics()[0].filter, "Square");
}

fn run_square(workers: usize, tuples: usize) -> Vec<f32> {
    let data: Vec<f32> = (0..tuples * 3).map(|i| (i % 1000) as f32 * 0.5).collect();
    let mut array: AnyArray = DataArray::from_vec("V", data, &[3]).unwrap().into();
    let path = DataArrayPath::new("C", "M", "V");
    let mut ctx = FilterContext::new("Test");
    dispatch_mut(&mut array, &path, &mut ctx, &mut SquareInPlace { workers }).unwrap();
    array.into_typed::<f32>().unwrap().into_parts().1.into_vec()
}

#[test]
fn test_parallel_matches_sequential_on_million_tuples() {
    let sequential = run_square(1, 1_000_000);
    let parallel = run_square(8, 1_000_000);
    assert_eq!(sequential.len(), 3_000_000);
    assert!(sequential == parallel);
}

#[test]
fn test_parallel_reduction_is_deterministic() {
    let total = 1_000_000usize;
    let sum = |workers: usize| -> u64 {
        ParallelRangeExecutor::new(total)
            .with_workers(workers)
            .with_min_parallel(0)
            .map_ranges(|r| r.map(|i| (i as u64 * 31) % 97).sum::<u64>())
            .into_iter()
            .sum()
    };
    assert_eq!(sum(1), sum(6));
}

proptest! {
    /// Ranges are contiguous, disjoint and cover `[0, total)`.
    #[test]
    fn ranges_partition_total(total in 0usize..5000, workers in 1usize..33, threshold in 0usize..2000) {
        let exec = ParallelRangeExecutor::new(total)
            .with_workers(workers)
            .with_min_parallel(threshold);
        let ranges = exec.ranges();

        let mut next = 0;
        for r in &ranges {
            prop_assert_eq!(r.start, next);
            prop_assert!(r.end > r.start);
            next = r.end;
        }
        prop_assert_eq!(next, total);
        prop_assert!(ranges.len() <= workers.max(1));
        if !exec.is_parallel() {
            prop_assert!(ranges.len() <= 1);
        }
    }
}
