//! Color to grayscale conversion.

use serde::{Deserialize, Serialize};

use common_error::{codes, MosaicResult};
use mosaic_core::{AnyArray, DataArray, DataArrayPath, DataContainerArray, Primitive};
use mosaic_engine::prereq::{create_non_prereq_array, create_non_prereq_matrix, get_prereq_array};
use mosaic_engine::{
    dispatch, ArrayRequirement, ArrayVisitor, Filter, FilterContext, ParallelRangeExecutor, TypeSet,
};

/// How the color channels are combined into one intensity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ConversionMethod {
    /// Weighted sum of the three color channels.
    Luminosity { weights: [f64; 3] },
    /// Mean of the three color channels.
    Average,
    /// Midpoint of the largest and smallest color channel.
    Lightness,
    /// A single component copied through unchanged.
    SingleChannel { channel: usize },
}

impl ConversionMethod {
    /// Rec. 709 luma weights.
    pub const fn luminosity() -> Self {
        Self::Luminosity {
            weights: [0.2125, 0.7154, 0.0721],
        }
    }

    /// Intensity of one tuple. Only the components the method reads are
    /// fetched, so `SingleChannel` never touches `channels`.
    fn apply(self, channels: [usize; 3], pixel: impl Fn(usize) -> f64) -> f64 {
        let rgb = || channels.map(&pixel);
        match self {
            Self::Luminosity { weights } => {
                let [r, g, b] = rgb();
                weights[0] * r + weights[1] * g + weights[2] * b
            }
            Self::Average => rgb().iter().sum::<f64>() / 3.0,
            Self::Lightness => {
                let [r, g, b] = rgb();
                (r.max(g).max(b) + r.min(g).min(b)) / 2.0
            }
            Self::SingleChannel { channel } => pixel(channel),
        }
    }
}

impl Default for ConversionMethod {
    fn default() -> Self {
        Self::luminosity()
    }
}

/// Converts multi-component color arrays into single-component intensity
/// arrays named `<output_prefix><input name>`.
///
/// The output has the element type of its input. Integer outputs are rounded
/// to nearest and clamped to the range of the type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertColorToGrayScale {
    pub input_paths: Vec<DataArrayPath>,
    #[serde(default)]
    pub conversion: ConversionMethod,
    /// Components used as red, green and blue.
    #[serde(default = "default_channels")]
    pub color_channels: [usize; 3],
    #[serde(default = "default_prefix")]
    pub output_prefix: String,
    /// Write the outputs into a new matrix instead of next to the inputs.
    #[serde(default)]
    pub create_new_matrix: bool,
    #[serde(default = "default_matrix_name")]
    pub output_matrix_name: String,
}

fn default_channels() -> [usize; 3] {
    [0, 1, 2]
}

fn default_prefix() -> String {
    "Gray_".to_string()
}

fn default_matrix_name() -> String {
    "GrayScaleData".to_string()
}

impl ConvertColorToGrayScale {
    pub fn new(input_paths: Vec<DataArrayPath>) -> Self {
        Self {
            input_paths,
            conversion: ConversionMethod::default(),
            color_channels: default_channels(),
            output_prefix: default_prefix(),
            create_new_matrix: false,
            output_matrix_name: default_matrix_name(),
        }
    }

    pub fn with_conversion(mut self, conversion: ConversionMethod) -> Self {
        self.conversion = conversion;
        self
    }

    pub fn with_color_channels(mut self, channels: [usize; 3]) -> Self {
        self.color_channels = channels;
        self
    }

    pub fn with_output_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.output_prefix = prefix.into();
        self
    }

    pub fn with_new_matrix(mut self, name: impl Into<String>) -> Self {
        self.create_new_matrix = true;
        self.output_matrix_name = name.into();
        self
    }

    /// Output location for `input`.
    pub fn output_path(&self, input: &DataArrayPath) -> DataArrayPath {
        let name = format!("{}{}", self.output_prefix, input.array);
        if self.create_new_matrix {
            input.with_matrix(self.output_matrix_name.clone()).with_array(name)
        } else {
            input.with_array(name)
        }
    }

    fn highest_channel(&self) -> usize {
        match self.conversion {
            ConversionMethod::SingleChannel { channel } => channel,
            _ => self.color_channels.iter().copied().max().unwrap_or(0),
        }
    }

    fn check_parameters(&self, ctx: &mut FilterContext) -> bool {
        if self.input_paths.is_empty() {
            ctx.set_error(codes::INVALID_PARAMETER, "at least one input array must be selected");
            return false;
        }
        if let ConversionMethod::Luminosity { weights } = self.conversion {
            if weights.iter().any(|w| !w.is_finite()) {
                ctx.set_error(
                    codes::INVALID_PARAMETER,
                    format!("luminosity weights {weights:?} must be finite"),
                );
                return false;
            }
        }
        true
    }
}

/// Computes the intensity array for one input.
struct GrayVisitor<'a> {
    method: ConversionMethod,
    channels: [usize; 3],
    executor: ParallelRangeExecutor,
    name: &'a str,
}

impl ArrayVisitor for GrayVisitor<'_> {
    type Output = MosaicResult<AnyArray>;

    fn supported(&self) -> TypeSet {
        TypeSet::NUMERIC
    }

    fn visit<T: Primitive>(&mut self, input: &DataArray<T>) -> Self::Output {
        let comps = input.num_components();
        let src = input.as_slice();
        let (method, channels) = (self.method, self.channels);
        let mut out = vec![T::default(); input.num_tuples()];
        self.executor.run_mut(&mut out, 1, |range, slice| {
            for (value, tuple) in slice.iter_mut().zip(range) {
                let px = &src[tuple * comps..(tuple + 1) * comps];
                *value = match method {
                    ConversionMethod::SingleChannel { channel } => px[channel],
                    _ => T::from_f64(method.apply(channels, |c| px[c].to_f64())),
                };
            }
        });
        Ok(DataArray::from_vec(self.name, out, &[1])?.into())
    }
}

impl Filter for ConvertColorToGrayScale {
    fn name(&self) -> &str {
        "Convert Color To GrayScale"
    }

    fn required_inputs(&self) -> Vec<DataArrayPath> {
        self.input_paths.clone()
    }

    fn created_outputs(&self) -> Vec<DataArrayPath> {
        self.input_paths.iter().map(|p| self.output_path(p)).collect()
    }

    fn data_check(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        if !self.check_parameters(ctx) {
            return;
        }
        let requirement = ArrayRequirement::of_types(TypeSet::NUMERIC);
        for input in &self.input_paths {
            let Some(array) = get_prereq_array(registry, ctx, input, &requirement) else {
                continue;
            };
            let data_type = array.data_type();
            let comps = array.num_components();
            let needed = self.highest_channel() + 1;
            if comps < needed {
                ctx.set_error(
                    codes::COMPONENT_MISMATCH,
                    format!("data array '{input}' has {comps} components, the conversion reads {needed}"),
                );
                continue;
            }

            let output = self.output_path(input);
            if self.create_new_matrix {
                let Some(source) = ctx.check(registry.resolve_matrix(input)) else {
                    continue;
                };
                let (dims, category) = (source.tuple_dims().to_vec(), source.category());
                if !create_non_prereq_matrix(registry, ctx, &output, &dims, category) {
                    continue;
                }
            }
            create_non_prereq_array(registry, ctx, &output, data_type, &[1]);
        }
    }

    fn execute(&self, registry: &mut DataContainerArray, ctx: &mut FilterContext) {
        for input in &self.input_paths {
            let output = self.output_path(input);
            let Some(source) = ctx.check(registry.resolve_array(input)) else {
                return;
            };
            let mut visitor = GrayVisitor {
                method: self.conversion,
                channels: self.color_channels,
                executor: ctx.executor(source.num_tuples()),
                name: &output.array,
            };
            let Some(result) = dispatch(source, input, ctx, &mut visitor) else {
                return;
            };
            let Some(gray) = ctx.check(result) else {
                return;
            };
            if ctx.check(registry.insert_array(&output, gray)).is_none() {
                return;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mosaic_core::testing::{cell_path, rgb_image, RegistryFixture, IMAGE_CONTAINER};
    use mosaic_core::AttributeMatrixType;
    use mosaic_engine::FilterRunner;

    #[test]
    fn test_average_and_lightness() {
        let rgb = [[10_u8, 20, 60], [255, 255, 254]];
        let build = || {
            RegistryFixture::new()
                .image([2, 1, 1])
                .unwrap()
                .cell_array::<u8>("C", &[3], |i| rgb[i / 3][i % 3])
                .unwrap()
                .build()
        };

        let mut dca = build();
        let filter = ConvertColorToGrayScale::new(vec![cell_path("C")]).with_conversion(ConversionMethod::Average);
        assert_eq!(FilterRunner::new(filter).execute(&mut dca), codes::NO_ERROR);
        assert_eq!(dca.resolve_typed::<u8>(&cell_path("Gray_C")).unwrap().as_slice(), &[30, 255]);

        let mut dca = build();
        let filter = ConvertColorToGrayScale::new(vec![cell_path("C")])
            .with_conversion(ConversionMethod::Lightness)
            .with_output_prefix("L_");
        assert_eq!(FilterRunner::new(filter).execute(&mut dca), codes::NO_ERROR);
        assert_eq!(dca.resolve_typed::<u8>(&cell_path("L_C")).unwrap().as_slice(), &[35, 255]);
    }

    #[test]
    fn test_single_channel_on_float() {
        let mut dca = RegistryFixture::new()
            .image([3, 1, 1])
            .unwrap()
            .cell_array::<f32>("C", &[4], |i| i as f32 * 0.5)
            .unwrap()
            .build();
        let filter = ConvertColorToGrayScale::new(vec![cell_path("C")])
            .with_conversion(ConversionMethod::SingleChannel { channel: 3 });
        assert_eq!(FilterRunner::new(filter).execute(&mut dca), codes::NO_ERROR);
        let out = dca.resolve_typed::<f32>(&cell_path("Gray_C")).unwrap();
        assert_eq!(out.as_slice(), &[1.5, 3.5, 5.5]);
    }

    #[test]
    fn test_single_channel_on_one_component_array() {
        let mut dca = RegistryFixture::new()
            .image([2, 1, 1])
            .unwrap()
            .cell_array::<u8>("Mono", &[1], |i| 10 + i as u8)
            .unwrap()
            .build();
        let filter = ConvertColorToGrayScale::new(vec![cell_path("Mono")])
            .with_conversion(ConversionMethod::SingleChannel { channel: 0 });
        let mut runner = FilterRunner::new(filter);
        assert_eq!(runner.validate(&mut dca), codes::NO_ERROR);
        assert_eq!(runner.execute(&mut dca), codes::NO_ERROR);
        assert_eq!(dca.resolve_typed::<u8>(&cell_path("Gray_Mono")).unwrap().as_slice(), &[10, 11]);
    }

    #[test]
    fn test_new_matrix_mirrors_input_matrix() {
        let mut dca = rgb_image().unwrap();
        let filter = ConvertColorToGrayScale::new(vec![cell_path("RGB")]).with_new_matrix("Gray");
        assert_eq!(FilterRunner::new(filter).execute(&mut dca), codes::NO_ERROR);

        let matrix = dca.resolve_matrix(&DataArrayPath::matrix_only(IMAGE_CONTAINER, "Gray")).unwrap();
        assert_eq!(matrix.category(), AttributeMatrixType::Cell);
        assert_eq!(matrix.tuple_dims(), &[4, 4, 4]);
        assert_eq!(matrix.array_names(), vec!["Gray_RGB"]);
    }

    #[test]
    fn test_too_few_components() {
        let mut dca = RegistryFixture::new()
            .image([2, 1, 1])
            .unwrap()
            .cell_array::<u8>("C", &[2], |_| 0)
            .unwrap()
            .build();
        let mut runner = FilterRunner::new(ConvertColorToGrayScale::new(vec![cell_path("C")]));
        assert_eq!(runner.validate(&mut dca), codes::COMPONENT_MISMATCH);
        assert!(!dca.contains_path(&cell_path("Gray_C")));
    }

    #[test]
    fn test_bool_input_rejected() {
        let mut dca = RegistryFixture::new()
            .image([2, 1, 1])
            .unwrap()
            .cell_array::<bool>("C", &[3], |_| true)
            .unwrap()
            .build();
        let mut runner = FilterRunner::new(ConvertColorToGrayScale::new(vec![cell_path("C")]));
        assert_eq!(runner.validate(&mut dca), codes::TYPE_MISMATCH);
    }

    #[test]
    fn test_empty_selection() {
        let mut dca = rgb_image().unwrap();
        let mut runner = FilterRunner::new(ConvertColorToGrayScale::new(Vec::new()));
        assert_eq!(runner.validate(&mut dca), codes::INVALID_PARAMETER);
    }
}
