//! In-place scaling of numeric arrays.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::{Deserialize, Serialize};

use common_error::codes;
use mosaic_core::{DataArray, DataArrayPath, DataContainerArray, Primitive};
use mosaic_engine::prereq::get_prereq_array;
use mosaic_engine::{
    dispatch_mut, ArrayRequirement, ArrayVisitorMut, Filter, FilterContext, ParallelRangeExecutor,
    TypeSet,
};

/// Multiplies every value of a numeric array by `factor`.
///
/// Integer results are rounded and saturate at the bounds of the type; a
/// `VALUE_CLAMPED` warning reports how many values saturated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScaleArray {
    pub path: DataArrayPath,
    pub factor: f64,
}

impl ScaleArray {
    pub fn new(path: DataArrayPath, factor: f64) -> Self {
        Self { path, factor }
    }
}

struct Scale {
    factor: f64,
    executor: ParallelRangeExecutor,
}

impl ArrayVisitorMut for Scale {
    /// Number of values that saturated.
    type Output = usize;

    fn supported(&self) -> TypeSet {
        TypeSet::NUMERIC
    }

    fn visit_mut<T: Primitive>(&mut self, array: &mut DataArray<T>) -> usize {
        let factor = self.factor;
        let exact = integer_factor(factor).filter(|_| T::DATA_TYPE.is_integer());
        let clamped = AtomicUsize::new(0);
        let comps = array.num_components();
        self.executor.run_mut(array.as_mut_slice(), comps, |_, values| {
            let mut local = 0;
            for v in values.iter_mut() {
                let saturated = match (exact, v.to_i128()) {
                    (Some(f), Some(i)) => {
                        let product = i.saturating_mul(f);
                        *v = T::from_i128(product);
                        v.to_i128() != Some(product)
                    }
                    _ => {
                        let scaled = v.to_f64() * factor;
                        *v = T::from_f64(scaled);
                        T::DATA_TYPE.is_integer() && v.to_f64() != scaled.round()
                    }
                };
                local += usize::from(saturated);
            }
            clamped.fetch_add(local, Ordering::Relaxed);
        });
        clamped.into_inner()
    }
}

/// Whole-number factors scale integer arrays without a detour through `f64`.
#[allow(clippy::cast_possible_truncation)]
fn integer_factor(factor: f64) -> Option<i128> {
    (factor.fract() == 0.0 && factor.abs() < 2f64.powi(64)).then(|| factor as i128)
}

impl Filter for ScaleArray {
    fn name(&self) -> &str {
        "Scale Array"
    }

    fn required_inputs(&self) -> Vec<DataArrayPath> {
        vec![self.path.clone()]
    }

    fn data_check(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        if !self.factor.is_finite() {
            ctx.set_error(
                codes::INVALID_PARAMETER,
                format!("scale factor {} must be finite", self.factor),
            );
            return;
        }
        get_prereq_array(
            registry,
            ctx,
            &self.path,
            &ArrayRequirement::of_types(TypeSet::NUMERIC),
        );
    }

    fn execute(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        let Some(array) = ctx.check(registry.resolve_array_mut(&self.path)) else {
            return;
        };
        let mut visitor = Scale {
            factor: self.factor,
            executor: ctx.executor(array.num_tuples()),
        };
        let Some(clamped) = dispatch_mut(array, &self.path, ctx, &mut visitor) else {
            return;
        };
        if clamped > 0 {
            ctx.set_warning(
                codes::VALUE_CLAMPED,
                format!(
                    "{clamped} value(s) of '{}' saturated at the bounds of the array type",
                    self.path
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common_config::{ExecutionConfig, MosaicConfig};
    use mosaic_core::testing::{cell_path, RegistryFixture};
    use mosaic_engine::FilterRunner;

    #[test]
    fn test_scale_int8_saturates_with_warning() {
        let mut dca = RegistryFixture::new()
            .image([4, 1, 1])
            .unwrap()
            .cell_array::<i8>("A", &[1], |i| [-100, -1, 3, 100][i])
            .unwrap()
            .build();
        let mut runner = FilterRunner::new(ScaleArray::new(cell_path("A"), 1.5));
        assert_eq!(runner.execute(&mut dca), codes::NO_ERROR);
        assert_eq!(runner.warning_code(), codes::VALUE_CLAMPED);
        assert_eq!(dca.resolve_typed::<i8>(&cell_path("A")).unwrap().as_slice(), &[-128, -2, 5, 127]);
    }

    #[test]
    fn test_int64_whole_factor_is_exact() {
        let big = (1i64 << 53) + 1;
        let mut dca = RegistryFixture::new()
            .image([3, 1, 1])
            .unwrap()
            .cell_array::<i64>("A", &[1], |i| [big, -3, i64::MAX][i])
            .unwrap()
            .build();
        let mut runner = FilterRunner::new(ScaleArray::new(cell_path("A"), 3.0));
        assert_eq!(runner.execute(&mut dca), codes::NO_ERROR);
        assert_eq!(runner.warning_code(), codes::VALUE_CLAMPED);
        assert_eq!(
            dca.resolve_typed::<i64>(&cell_path("A")).unwrap().as_slice(),
            &[3 * big, -9, i64::MAX]
        );
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let build = || {
            RegistryFixture::new()
                .image([50, 40, 30])
                .unwrap()
                .cell_array::<f64>("A", &[2], |i| i as f64 * 0.25)
                .unwrap()
                .build()
        };
        let parallel = MosaicConfig {
            execution: ExecutionConfig::default().with_parallelism(4).with_min_parallel_tuples(1),
            ..MosaicConfig::default()
        };
        let sequential = MosaicConfig {
            execution: ExecutionConfig::sequential(),
            ..MosaicConfig::default()
        };

        let mut a = build();
        let mut b = build();
        let filter = ScaleArray::new(cell_path("A"), -3.0);
        assert_eq!(FilterRunner::new(filter.clone()).with_config(parallel).execute(&mut a), codes::NO_ERROR);
        assert_eq!(FilterRunner::new(filter).with_config(sequential).execute(&mut b), codes::NO_ERROR);
        assert_eq!(
            a.resolve_array(&cell_path("A")).unwrap().to_le_bytes(),
            b.resolve_array(&cell_path("A")).unwrap().to_le_bytes()
        );
    }

    #[test]
    fn test_non_finite_factor() {
        let mut dca = RegistryFixture::new()
            .image([1, 1, 1])
            .unwrap()
            .cell_array::<u8>("A", &[1], |_| 1)
            .unwrap()
            .build();
        let mut runner = FilterRunner::new(ScaleArray::new(cell_path("A"), f64::NAN));
        assert_eq!(runner.validate(&mut dca), codes::INVALID_PARAMETER);
    }
}
