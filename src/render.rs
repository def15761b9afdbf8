//! Render capability: executes one filter over a source image.
//!
//! The engine only talks to [`RenderBackend`]. [`CpuRenderer`] is the
//! built-in implementation over the kernels in [`crate::filters`]; embedders
//! can plug in a GPU or platform backend instead.

use ndarray::ArrayView3;

use crate::error::RenderError;
use crate::filters::{blur, color, edge, sharpen, stylize};
use crate::params::ParameterKind;
use crate::registry::{FilterConfig, FilterKind};
use crate::ImageBuffer;

/// Executes a configured filter.
pub trait RenderBackend {
    /// Render `filter` with `config` over `source`.
    ///
    /// `config` only carries keys the filter declares; a missing key means the
    /// filter's own default.
    fn render(
        &self,
        filter: FilterKind,
        config: &FilterConfig,
        source: ArrayView3<u8>,
    ) -> Result<ImageBuffer, RenderError>;
}

impl<R: RenderBackend + ?Sized> RenderBackend for Box<R> {
    fn render(
        &self,
        filter: FilterKind,
        config: &FilterConfig,
        source: ArrayView3<u8>,
    ) -> Result<ImageBuffer, RenderError> {
        (**self).render(filter, config, source)
    }
}

/// Multi-threaded CPU implementation of every registered filter.
#[derive(Clone, Copy, Debug, Default)]
pub struct CpuRenderer;

impl RenderBackend for CpuRenderer {
    fn render(
        &self,
        filter: FilterKind,
        config: &FilterConfig,
        source: ArrayView3<u8>,
    ) -> Result<ImageBuffer, RenderError> {
        let name = filter.descriptor().name();
        let (height, width, channels) = source.dim();
        if height == 0 || width == 0 {
            return Err(RenderError::no_output(name, format!("empty image extent {width}x{height}")));
        }
        if !matches!(channels, 1 | 3 | 4) {
            return Err(RenderError::no_output(name, format!("unsupported channel count {channels}")));
        }

        let value = |kind: ParameterKind| -> Result<f32, RenderError> {
            let v = config
                .get(kind)
                .or_else(|| filter.default_value(kind))
                .ok_or_else(|| RenderError::no_output(name, format!("filter has no '{kind}' input")))?;
            if !v.is_finite() {
                return Err(RenderError::no_output(name, format!("non-finite '{kind}' value {v}")));
            }
            // Kernels are only sized for in-domain values.
            let (min, max) = kind.domain();
            Ok(v.clamp(min, max))
        };

        let output = match filter {
            FilterKind::Crystallize => stylize::crystallize_u8(source, value(ParameterKind::Radius)?),
            FilterKind::Edges => edge::edges_u8(source, value(ParameterKind::Intensity)?),
            FilterKind::GaussianBlur => blur::gaussian_blur_u8(source, value(ParameterKind::Radius)?),
            FilterKind::Pixellate => stylize::pixellate_u8(source, value(ParameterKind::Scale)?),
            FilterKind::SepiaTone => color::sepia_tone_u8(source, value(ParameterKind::Intensity)?),
            FilterKind::UnsharpMask => sharpen::unsharp_mask_u8(
                source,
                value(ParameterKind::Intensity)?,
                value(ParameterKind::Radius)?,
            ),
            FilterKind::Vignette => stylize::vignette_u8(
                source,
                value(ParameterKind::Intensity)?,
                value(ParameterKind::Radius)?,
            ),
        };

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::FILTERS;
    use ndarray::Array3;

    #[test]
    fn test_every_filter_renders_with_defaults() {
        let img = Array3::<u8>::from_elem((8, 8, 4), 140);
        for descriptor in FILTERS.iter() {
            let out = CpuRenderer
                .render(descriptor.kind(), &descriptor.default_config(), img.view())
                .unwrap();
            assert_eq!(out.dim(), img.dim(), "{}", descriptor.name());
        }
    }

    #[test]
    fn test_empty_extent_has_no_output() {
        let img = Array3::<u8>::zeros((0, 4, 4));
        let err = CpuRenderer
            .render(FilterKind::SepiaTone, &FilterConfig::default(), img.view())
            .unwrap_err();
        assert!(matches!(err, RenderError::NoOutput { filter: "Sepia Tone", .. }));
    }

    #[test]
    fn test_unsupported_channel_count_has_no_output() {
        let img = Array3::<u8>::zeros((2, 2, 2));
        let result = CpuRenderer.render(FilterKind::Edges, &FilterConfig::default(), img.view());
        assert!(matches!(result, Err(RenderError::NoOutput { .. })));
    }

    #[test]
    fn test_non_finite_config_has_no_output() {
        let img = Array3::<u8>::zeros((2, 2, 3));
        let mut config = FilterConfig::default();
        config.set(ParameterKind::Radius, f32::INFINITY);
        let result = CpuRenderer.render(FilterKind::GaussianBlur, &config, img.view());
        assert!(matches!(result, Err(RenderError::NoOutput { .. })));
    }

    #[test]
    fn test_out_of_domain_config_is_clamped() {
        let img = Array3::from_shape_fn((24, 24, 3), |(y, x, c)| ((y * 7 + x * 3 + c * 50) % 256) as u8);

        let mut huge = FilterConfig::default();
        huge.set(ParameterKind::Scale, 5000.0);
        let mut max = FilterConfig::default();
        max.set(ParameterKind::Scale, 10.0);

        let clamped = CpuRenderer.render(FilterKind::Pixellate, &huge, img.view()).unwrap();
        let expected = CpuRenderer.render(FilterKind::Pixellate, &max, img.view()).unwrap();
        assert_eq!(clamped, expected);
    }
}
