//! Property-based tests for the reference filters.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use common_error::codes;
    use mosaic_core::testing::{cell_path, RegistryFixture};
    use mosaic_core::{DataContainerArray, DataType};
    use mosaic_engine::FilterRunner;

    use crate::{ConversionMethod, ConvertColorToGrayScale, CreateDataArray, ScaleArray};

    fn rgb_registry(pixels: &[[u8; 3]]) -> DataContainerArray {
        RegistryFixture::new()
            .image([pixels.len(), 1, 1])
            .unwrap()
            .cell_array::<u8>("RGB", &[3], |i| pixels[i / 3][i % 3])
            .unwrap()
            .build()
    }

    proptest! {
        /// Luminosity output is the rounded weighted sum, clamped to u8.
        #[test]
        fn grayscale_luminosity_formula(
            pixels in prop::collection::vec(any::<[u8; 3]>(), 1..64),
            weights in prop::array::uniform3(0.0f64..1.5)
        ) {
            let mut dca = rgb_registry(&pixels);
            let filter = ConvertColorToGrayScale::new(vec![cell_path("RGB")])
                .with_conversion(ConversionMethod::Luminosity { weights });
            prop_assert_eq!(FilterRunner::new(filter).execute(&mut dca), codes::NO_ERROR);

            let gray = dca.resolve_typed::<u8>(&cell_path("Gray_RGB")).unwrap();
            for (i, [r, g, b]) in pixels.iter().enumerate() {
                let sum = weights[0] * f64::from(*r) + weights[1] * f64::from(*g) + weights[2] * f64::from(*b);
                prop_assert_eq!(gray.value(i), sum.round().clamp(0.0, 255.0) as u8);
            }
        }

        /// Validating a creation filter twice leaves the same structure.
        #[test]
        fn create_array_validate_idempotent(
            data_type in prop::sample::select(DataType::ALL.to_vec()),
            dims in prop::collection::vec(1usize..4, 1..3)
        ) {
            let mut dca = RegistryFixture::new().image([3, 2, 2]).unwrap().build();
            let filter = CreateDataArray::new(cell_path("New"), data_type).with_component_dims(dims);
            let mut runner = FilterRunner::new(filter);
            prop_assert_eq!(runner.validate(&mut dca), codes::NO_ERROR);
            let first = dca.structure();
            prop_assert_eq!(runner.validate(&mut dca), codes::NO_ERROR);
            prop_assert_eq!(dca.structure(), first);
        }

        /// Scaling by a power of two and back restores doubles exactly.
        #[test]
        fn scale_power_of_two_roundtrip(
            values in prop::collection::vec(-1.0e6f64..1.0e6, 1..50),
            exponent in -4i32..5
        ) {
            let mut dca = RegistryFixture::new()
                .image([values.len(), 1, 1])
                .unwrap()
                .cell_array::<f64>("V", &[1], |i| values[i])
                .unwrap()
                .build();
            let factor = 2f64.powi(exponent);
            for f in [factor, 1.0 / factor] {
                let code = FilterRunner::new(ScaleArray::new(cell_path("V"), f)).execute(&mut dca);
                prop_assert_eq!(code, codes::NO_ERROR);
            }
            prop_assert_eq!(dca.resolve_typed::<f64>(&cell_path("V")).unwrap().as_slice(), values.as_slice());
        }
    }
}
