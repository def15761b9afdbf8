//! The filter engine: one owned session state and the operations a UI
//! drives it with.
//!
//! ```text
//!   Empty --load_image(Some)--> Loaded --select_filter / update_parameter--> Loaded
//! ```
//!
//! Every state change that can affect the picture (`load_image`,
//! `select_filter`, `update_parameter`, `set_mapping`) re-renders the output
//! from scratch when a source image is present. A failed render keeps the
//! previous output and reports the error; there is no error state.

use std::fmt;
use std::time::Instant;

use ndarray::ArrayView3;
use tracing::{debug, info, warn};

use crate::config::EngineConfig;
use crate::error::{ConfigError, Error, RenderError};
use crate::io::{ImageSink, ImageSource};
use crate::params::{ParameterKind, ParameterMapping, ParameterSet};
use crate::registry::{self, FilterConfig, FilterDescriptor};
use crate::render::{CpuRenderer, RenderBackend};
use crate::ImageBuffer;

/// Coarse lifecycle of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineState {
    /// No source image yet.
    Empty,
    /// A source image is present.
    Loaded,
}

/// Build the render configuration for `filter` from the current sliders.
///
/// Starts from the filter's own defaults and overwrites only the kinds the
/// filter declares; other kinds never appear in the result.
pub fn resolve_config(
    filter: &FilterDescriptor,
    params: &ParameterSet,
    mapping: ParameterMapping,
) -> FilterConfig {
    let filter = filter.kind().descriptor();
    let mut config = filter.default_config();
    for &kind in filter.supported() {
        config.set(kind, mapping.resolve(kind, params));
    }
    config
}

/// Session state plus the render capability that turns it into pixels.
pub struct FilterEngine<R = CpuRenderer> {
    renderer: R,
    mapping: ParameterMapping,
    source: Option<ImageBuffer>,
    filter: &'static FilterDescriptor,
    parameters: ParameterSet,
    applied: Option<FilterConfig>,
    output: Option<ImageBuffer>,
    revision: u64,
}

impl FilterEngine<CpuRenderer> {
    /// Engine with Sepia Tone selected and default sliders.
    pub fn new() -> Self {
        Self::with_renderer(CpuRenderer)
    }

    /// Engine with the filter, sliders and mapping taken from `config`.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        Self::with_renderer_and_config(CpuRenderer, config)
    }
}

impl Default for FilterEngine<CpuRenderer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RenderBackend> FilterEngine<R> {
    /// Default session state rendered by `renderer`.
    pub fn with_renderer(renderer: R) -> Self {
        Self {
            renderer,
            mapping: ParameterMapping::default(),
            source: None,
            filter: registry::default_filter(),
            parameters: ParameterSet::default(),
            applied: None,
            output: None,
            revision: 0,
        }
    }

    /// Session state from `config`, rendered by `renderer`.
    pub fn with_renderer_and_config(renderer: R, config: &EngineConfig) -> Result<Self, ConfigError> {
        let filter = config.initial_filter()?;
        let mut engine = Self::with_renderer(renderer);
        engine.filter = filter;
        engine.parameters = config.parameters.clamped();
        engine.mapping = config.mapping;
        debug!(filter = filter.name(), mapping = ?config.mapping, "engine configured");
        Ok(engine)
    }

    pub fn state(&self) -> EngineState {
        if self.source.is_some() {
            EngineState::Loaded
        } else {
            EngineState::Empty
        }
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn current_filter(&self) -> &'static FilterDescriptor {
        self.filter
    }

    pub fn parameters(&self) -> &ParameterSet {
        &self.parameters
    }

    pub fn mapping(&self) -> ParameterMapping {
        self.mapping
    }

    /// Parameter kinds the current filter listens to; the rest can be hidden.
    pub fn relevant_parameters(&self) -> &'static [ParameterKind] {
        self.filter.supported()
    }

    pub fn source_image(&self) -> Option<ArrayView3<'_, u8>> {
        self.source.as_ref().map(|img| img.view())
    }

    /// Result of the last successful render.
    pub fn output_image(&self) -> Option<ArrayView3<'_, u8>> {
        self.output.as_ref().map(|img| img.view())
    }

    /// Configuration the current output was rendered with.
    pub fn render_config(&self) -> Option<&FilterConfig> {
        self.applied.as_ref()
    }

    /// Number of successful renders so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Replace the source image and re-render.
    ///
    /// `None` means the pick was cancelled: nothing changes.
    pub fn load_image(&mut self, image: Option<ImageBuffer>) -> Result<(), RenderError> {
        let Some(image) = image else {
            debug!("no image picked, engine unchanged");
            return Ok(());
        };

        debug!(dims = ?image.dim(), "source image loaded");
        self.source = Some(image);
        self.recompute()
    }

    /// Ask `source` for an image and load whatever it returns.
    pub fn load_from<S: ImageSource + ?Sized>(&mut self, source: &mut S) -> Result<(), RenderError> {
        self.load_image(source.pick_image())
    }

    /// Switch filters. Slider values are kept.
    ///
    /// The registry entry for the descriptor's kind is what gets stored.
    pub fn select_filter(&mut self, descriptor: &'static FilterDescriptor) -> Result<(), RenderError> {
        let descriptor = descriptor.kind().descriptor();
        debug!(filter = descriptor.name(), "filter selected");
        self.filter = descriptor;
        self.recompute()
    }

    /// Switch filters by display name, ignoring case.
    pub fn select_filter_by_name(&mut self, name: &str) -> Result<(), Error> {
        let descriptor = registry::find_filter(name).ok_or_else(|| Error::UnknownFilter(name.to_string()))?;
        self.select_filter(descriptor)?;
        Ok(())
    }

    /// Move a slider. Out-of-domain values are clamped; NaN is ignored.
    pub fn update_parameter(&mut self, kind: ParameterKind, value: f32) -> Result<(), RenderError> {
        match self.parameters.set(kind, value) {
            Some(stored) => debug!(parameter = %kind, value = stored, "parameter updated"),
            None => {
                warn!(parameter = %kind, "ignoring NaN parameter value");
                return Ok(());
            }
        }
        self.recompute()
    }

    /// Change how sliders feed the filter and re-render.
    pub fn set_mapping(&mut self, mapping: ParameterMapping) -> Result<(), RenderError> {
        self.mapping = mapping;
        self.recompute()
    }

    /// Re-render the output from the source, filter and sliders.
    ///
    /// Does nothing without a source image. On failure the previous output
    /// and its configuration stay in place.
    pub fn recompute(&mut self) -> Result<(), RenderError> {
        let Some(source) = self.source.as_ref() else {
            return Ok(());
        };

        let config = resolve_config(self.filter, &self.parameters, self.mapping);
        let started = Instant::now();

        match self.renderer.render(self.filter.kind(), &config, source.view()) {
            Ok(image) => {
                debug!(
                    filter = self.filter.name(),
                    config = ?config,
                    elapsed_ms = started.elapsed().as_secs_f64() * 1000.0,
                    "output rendered"
                );
                self.output = Some(image);
                self.applied = Some(config);
                self.revision += 1;
                Ok(())
            }
            Err(err) => {
                warn!(filter = self.filter.name(), error = %err, "render failed, keeping previous output");
                Err(err)
            }
        }
    }

    /// Hand the current output to `sink`.
    ///
    /// Fails with [`RenderError::NothingToSave`] before the sink is touched
    /// when nothing has been rendered.
    pub fn save<S: ImageSink + ?Sized>(&self, sink: &mut S) -> Result<(), Error> {
        let Some(output) = self.output.as_ref() else {
            warn!("save requested without a rendered image");
            return Err(RenderError::NothingToSave.into());
        };

        sink.save(output.view())?;
        info!(filter = self.filter.name(), "filtered image saved");
        Ok(())
    }
}

impl<R> fmt::Debug for FilterEngine<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterEngine")
            .field("filter", &self.filter.name())
            .field("parameters", &self.parameters)
            .field("mapping", &self.mapping)
            .field("source", &self.source.as_ref().map(|img| img.dim()))
            .field("output", &self.output.as_ref().map(|img| img.dim()))
            .field("revision", &self.revision)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use ndarray::Array3;

    use super::*;
    use crate::error::SaveError;
    use crate::registry::{FilterKind, FILTERS};

    fn photo() -> ImageBuffer {
        let mut img = Array3::<u8>::zeros((6, 6, 4));
        for y in 0..6 {
            for x in 0..6 {
                img[[y, x, 0]] = (y * 40) as u8;
                img[[y, x, 1]] = (x * 40) as u8;
                img[[y, x, 2]] = ((x + y) * 20) as u8;
                img[[y, x, 3]] = 255;
            }
        }
        img
    }

    /// CPU renderer that can be told to fail.
    #[derive(Default)]
    struct Flaky {
        fail: Cell<bool>,
        calls: Cell<usize>,
    }

    impl RenderBackend for Flaky {
        fn render(
            &self,
            filter: FilterKind,
            config: &FilterConfig,
            source: ArrayView3<u8>,
        ) -> Result<ImageBuffer, RenderError> {
            self.calls.set(self.calls.get() + 1);
            if self.fail.get() {
                return Err(RenderError::no_output(filter.descriptor().name(), "forced failure"));
            }
            CpuRenderer.render(filter, config, source)
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        saved: Vec<ImageBuffer>,
    }

    impl ImageSink for RecordingSink {
        fn save(&mut self, image: ArrayView3<u8>) -> Result<(), SaveError> {
            self.saved.push(image.to_owned());
            Ok(())
        }
    }

    struct RefusingSink;

    impl ImageSink for RefusingSink {
        fn save(&mut self, _image: ArrayView3<u8>) -> Result<(), SaveError> {
            Err(SaveError::Rejected("photo library access denied".to_string()))
        }
    }

    #[test]
    fn test_new_engine_starts_empty_with_sepia() {
        let engine = FilterEngine::new();
        assert_eq!(engine.state(), EngineState::Empty);
        assert_eq!(engine.current_filter().kind(), FilterKind::SepiaTone);
        assert_eq!(*engine.parameters(), ParameterSet::default());
        assert!(engine.output_image().is_none());
        assert!(engine.render_config().is_none());
        assert_eq!(engine.revision(), 0);
    }

    #[test]
    fn test_parameter_before_load_is_applied_on_load() {
        let mut engine = FilterEngine::with_renderer(Flaky::default());

        engine.update_parameter(ParameterKind::Intensity, 0.9).unwrap();
        assert!(engine.output_image().is_none());
        assert_eq!(engine.renderer().calls.get(), 0);

        engine.load_image(Some(photo())).unwrap();
        assert_eq!(engine.state(), EngineState::Loaded);
        assert!(engine.output_image().is_some());
        assert_eq!(engine.render_config().unwrap().get(ParameterKind::Intensity), Some(0.9));
        assert_eq!(engine.renderer().calls.get(), 1);
    }

    #[test]
    fn test_only_supported_kinds_reach_the_config() {
        let mut engine = FilterEngine::new();
        engine.load_image(Some(photo())).unwrap();
        engine.update_parameter(ParameterKind::Intensity, 0.3).unwrap();
        engine.update_parameter(ParameterKind::Radius, 12.0).unwrap();
        engine.update_parameter(ParameterKind::Scale, 4.0).unwrap();

        for descriptor in FILTERS.iter() {
            engine.select_filter(descriptor).unwrap();
            let config = engine.render_config().unwrap();
            for kind in ParameterKind::ALL {
                if descriptor.supports(kind) {
                    assert_eq!(config.get(kind), Some(engine.parameters().get(kind)));
                } else {
                    assert!(!config.contains(kind), "{} got {kind}", descriptor.name());
                }
            }
        }
    }

    #[test]
    fn test_gaussian_blur_radius_only() {
        let mut engine = FilterEngine::new();
        engine.load_image(Some(photo())).unwrap();
        engine.select_filter(FilterKind::GaussianBlur.descriptor()).unwrap();
        engine.update_parameter(ParameterKind::Radius, 150.0).unwrap();

        let config = engine.render_config().unwrap();
        assert_eq!(config.get(ParameterKind::Radius), Some(150.0));
        assert_eq!(config.get(ParameterKind::Intensity), None);
        assert_eq!(config.get(ParameterKind::Scale), None);
        assert_eq!(config.len(), 1);
    }

    #[test]
    fn test_update_clamps_into_domain() {
        let mut engine = FilterEngine::new();
        engine.load_image(Some(photo())).unwrap();
        engine.select_filter(FilterKind::Pixellate.descriptor()).unwrap();

        engine.update_parameter(ParameterKind::Scale, 42.0).unwrap();
        assert_eq!(engine.render_config().unwrap().get(ParameterKind::Scale), Some(10.0));

        engine.update_parameter(ParameterKind::Scale, -1.0).unwrap();
        assert_eq!(engine.render_config().unwrap().get(ParameterKind::Scale), Some(0.0));
    }

    #[test]
    fn test_nan_update_is_ignored() {
        let mut engine = FilterEngine::new();
        engine.load_image(Some(photo())).unwrap();
        let revision = engine.revision();

        engine.update_parameter(ParameterKind::Intensity, f32::NAN).unwrap();

        assert_eq!(engine.parameters().intensity, 0.5);
        assert_eq!(engine.revision(), revision);
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let mut engine = FilterEngine::new();
        engine.load_image(Some(photo())).unwrap();
        engine.select_filter(FilterKind::Crystallize.descriptor()).unwrap();
        engine.update_parameter(ParameterKind::Radius, 3.0).unwrap();

        let first = engine.output_image().unwrap().to_owned();
        engine.recompute().unwrap();
        let second = engine.output_image().unwrap().to_owned();

        assert_eq!(first, second);
        assert_eq!(engine.revision(), 4);
    }

    #[test]
    fn test_select_filter_keeps_parameters() {
        let mut engine = FilterEngine::new();
        engine.load_image(Some(photo())).unwrap();
        engine.update_parameter(ParameterKind::Intensity, 0.8).unwrap();

        engine.select_filter(FilterKind::SepiaTone.descriptor()).unwrap();
        engine.select_filter(FilterKind::GaussianBlur.descriptor()).unwrap();
        engine.select_filter(FilterKind::SepiaTone.descriptor()).unwrap();

        assert_eq!(engine.parameters().intensity, 0.8);
        assert_eq!(engine.parameters().radius, 100.0);
        assert_eq!(engine.parameters().scale, 5.0);
    }

    #[test]
    fn test_cancelled_load_is_a_no_op() {
        let mut engine = FilterEngine::new();
        engine.load_image(None).unwrap();
        assert_eq!(engine.state(), EngineState::Empty);
        assert_eq!(engine.revision(), 0);

        engine.load_image(Some(photo())).unwrap();
        engine.update_parameter(ParameterKind::Intensity, 0.2).unwrap();
        let output = engine.output_image().unwrap().to_owned();
        let config = engine.render_config().cloned();
        let revision = engine.revision();

        engine.load_image(None).unwrap();

        assert_eq!(engine.source_image().unwrap(), photo().view());
        assert_eq!(engine.output_image().unwrap(), output.view());
        assert_eq!(engine.render_config().cloned(), config);
        assert_eq!(engine.revision(), revision);
        assert_eq!(engine.parameters().intensity, 0.2);
    }

    #[test]
    fn test_selection_without_image_is_stored() {
        let mut engine = FilterEngine::with_renderer(Flaky::default());
        engine.select_filter(FilterKind::Vignette.descriptor()).unwrap();

        assert_eq!(engine.renderer().calls.get(), 0);
        assert!(engine.output_image().is_none());

        engine.load_image(Some(photo())).unwrap();
        assert_eq!(engine.current_filter().kind(), FilterKind::Vignette);
        assert_eq!(engine.relevant_parameters(), &[ParameterKind::Intensity, ParameterKind::Radius]);
        let config = engine.render_config().unwrap();
        assert_eq!(config.get(ParameterKind::Radius), Some(100.0));
        assert!(!config.contains(ParameterKind::Scale));
    }

    #[test]
    fn test_failed_render_keeps_previous_output() {
        let mut engine = FilterEngine::with_renderer(Flaky::default());
        engine.load_image(Some(photo())).unwrap();
        let output = engine.output_image().unwrap().to_owned();
        let config = engine.render_config().cloned();

        engine.renderer().fail.set(true);
        let err = engine.update_parameter(ParameterKind::Intensity, 1.0).unwrap_err();

        assert!(matches!(err, RenderError::NoOutput { .. }));
        assert_eq!(engine.state(), EngineState::Loaded);
        assert_eq!(engine.output_image().unwrap(), output.view());
        assert_eq!(engine.render_config().cloned(), config);
        assert_eq!(engine.parameters().intensity, 1.0);

        engine.renderer().fail.set(false);
        engine.recompute().unwrap();
        assert_eq!(engine.render_config().unwrap().get(ParameterKind::Intensity), Some(1.0));
    }

    #[test]
    fn test_failed_render_of_new_image_keeps_previous_output() {
        let mut engine = FilterEngine::with_renderer(Flaky::default());
        engine.load_image(Some(photo())).unwrap();
        let output = engine.output_image().unwrap().to_owned();
        let config = engine.render_config().cloned();
        let revision = engine.revision();

        let replacement = Array3::<u8>::from_elem((3, 5, 4), 200);
        engine.renderer().fail.set(true);
        let err = engine.load_image(Some(replacement.clone())).unwrap_err();

        assert!(matches!(err, RenderError::NoOutput { .. }));
        assert_eq!(engine.source_image().unwrap(), replacement.view());
        assert_eq!(engine.output_image().unwrap(), output.view());
        assert_eq!(engine.output_image().unwrap().dim(), (6, 6, 4));
        assert_eq!(engine.render_config().cloned(), config);
        assert_eq!(engine.revision(), revision);
    }

    #[test]
    fn test_save_without_output_never_reaches_sink() {
        let engine = FilterEngine::new();
        let mut sink = RecordingSink::default();

        let err = engine.save(&mut sink).unwrap_err();

        assert!(matches!(err, Error::Render(RenderError::NothingToSave)));
        assert!(sink.saved.is_empty());
    }

    #[test]
    fn test_save_hands_output_to_sink() {
        let mut engine = FilterEngine::new();
        engine.load_image(Some(photo())).unwrap();
        let mut sink = RecordingSink::default();

        engine.save(&mut sink).unwrap();

        assert_eq!(sink.saved.len(), 1);
        assert_eq!(sink.saved[0].view(), engine.output_image().unwrap());
    }

    #[test]
    fn test_sink_failure_is_reported() {
        let mut engine = FilterEngine::new();
        engine.load_image(Some(photo())).unwrap();

        let err = engine.save(&mut RefusingSink).unwrap_err();

        assert!(matches!(err, Error::Save(SaveError::Rejected(_))));
        assert_eq!(err.to_string(), "photo library access denied");
    }

    #[test]
    fn test_linked_mapping_drives_radius_and_scale() {
        let mut engine = FilterEngine::new();
        engine.set_mapping(ParameterMapping::Linked).unwrap();
        engine.load_image(Some(photo())).unwrap();
        engine.update_parameter(ParameterKind::Intensity, 0.25).unwrap();

        engine.select_filter(FilterKind::Pixellate.descriptor()).unwrap();
        assert_eq!(engine.render_config().unwrap().get(ParameterKind::Scale), Some(2.5));

        engine.select_filter(FilterKind::UnsharpMask.descriptor()).unwrap();
        let config = engine.render_config().unwrap();
        assert_eq!(config.get(ParameterKind::Intensity), Some(0.25));
        assert_eq!(config.get(ParameterKind::Radius), Some(50.0));
    }

    #[test]
    fn test_select_by_name() {
        let mut engine = FilterEngine::new();
        engine.select_filter_by_name("edges").unwrap();
        assert_eq!(engine.current_filter().kind(), FilterKind::Edges);

        let err = engine.select_filter_by_name("Posterize").unwrap_err();
        assert!(matches!(err, Error::UnknownFilter(name) if name == "Posterize"));
        assert_eq!(engine.current_filter().kind(), FilterKind::Edges);
    }
}
