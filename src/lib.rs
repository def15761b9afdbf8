//! Instafilter Rust Core
//!
//! Filter application engine for a photo-filter app: pick a photo, choose a
//! filter, move the sliders, save the result. The engine keeps the session
//! state and re-renders the output whenever the image, the filter or a
//! slider changes. Optional Python bindings via PyO3 and WASM bindings for
//! JavaScript expose the same engine to UI layers.
//!
//! ## Image Format
//! Images are `ndarray` arrays shaped `(height, width, channels)` with u8
//! values (0-255):
//! - **Grayscale**: (height, width, 1) - single channel
//! - **RGB**: (height, width, 3) - 3 color channels
//! - **RGBA**: (height, width, 4) - 3 color channels + alpha
//!
//! ## Filters
//!
//! | Filter | Parameters |
//! |--------|------------|
//! | Crystalize | radius |
//! | Edges | intensity |
//! | Gaussian Blur | radius |
//! | Pixellate | scale |
//! | Sepia Tone | intensity |
//! | Unsharp Mask | intensity, radius |
//! | Vignette | intensity, radius |
//!
//! Sliders the selected filter does not declare never reach its
//! configuration.
//!
//! ## Example
//!
//! ```
//! use instafilter_rust::{FilterEngine, FilterKind, ParameterKind};
//! use ndarray::Array3;
//!
//! let mut engine = FilterEngine::new();
//! engine.load_image(Some(Array3::from_elem((4, 4, 4), 128u8)))?;
//! engine.select_filter(FilterKind::GaussianBlur.descriptor())?;
//! engine.update_parameter(ParameterKind::Radius, 2.0)?;
//!
//! assert!(engine.output_image().is_some());
//! assert_eq!(engine.render_config().unwrap().get(ParameterKind::Radius), Some(2.0));
//! # Ok::<(), instafilter_rust::RenderError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod filters;
pub mod io;
pub mod params;
pub mod registry;
pub mod render;

#[cfg(feature = "wasm")]
pub mod wasm;

/// Owned image buffer, `(height, width, channels)`.
pub type ImageBuffer = ndarray::Array3<u8>;

pub use config::EngineConfig;
pub use engine::{EngineState, FilterEngine};
pub use error::{ConfigError, Error, RenderError, SaveError};
pub use io::{FileImageSink, FileImageSource, ImageSink, ImageSource};
pub use params::{ParameterKind, ParameterMapping, ParameterSet};
pub use registry::{find_filter, FilterConfig, FilterDescriptor, FilterKind, FILTERS};
pub use render::{CpuRenderer, RenderBackend};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray3, PyReadonlyArray3};
    use pyo3::exceptions::{PyRuntimeError, PyValueError};
    use pyo3::prelude::*;

    use crate::engine::FilterEngine;
    use crate::error::Error;
    use crate::params::ParameterKind;
    use crate::registry;

    fn to_py_err(err: impl Into<Error>) -> PyErr {
        match err.into() {
            err @ (Error::UnknownFilter(_) | Error::UnknownParameter(_)) => PyValueError::new_err(err.to_string()),
            err => PyRuntimeError::new_err(err.to_string()),
        }
    }

    /// Filter engine session.
    ///
    /// Images are numpy arrays of shape (height, width, channels), dtype uint8.
    #[pyclass(name = "FilterEngine")]
    pub struct PyFilterEngine {
        inner: FilterEngine,
    }

    #[pymethods]
    impl PyFilterEngine {
        #[new]
        fn new() -> Self {
            Self {
                inner: FilterEngine::new(),
            }
        }

        /// Load a source image and re-render. `None` leaves the engine unchanged.
        #[pyo3(signature = (image=None))]
        fn load_image(&mut self, image: Option<PyReadonlyArray3<'_, u8>>) -> PyResult<()> {
            let image = image.map(|img| img.as_array().to_owned());
            self.inner.load_image(image).map_err(to_py_err)
        }

        /// Select a filter by display name, e.g. "Gaussian Blur".
        fn select_filter(&mut self, name: &str) -> PyResult<()> {
            self.inner.select_filter_by_name(name).map_err(to_py_err)
        }

        /// Move a slider: kind is "intensity", "radius" or "scale".
        fn update_parameter(&mut self, kind: &str, value: f32) -> PyResult<()> {
            let kind: ParameterKind = kind.parse().map_err(to_py_err)?;
            self.inner.update_parameter(kind, value).map_err(to_py_err)
        }

        /// Rendered image, or None before the first successful render.
        fn output_image<'py>(&self, py: Python<'py>) -> Option<Bound<'py, PyArray3<u8>>> {
            self.inner
                .output_image()
                .map(|img| img.to_owned().into_pyarray(py))
        }

        #[getter]
        fn current_filter(&self) -> &'static str {
            self.inner.current_filter().name()
        }

        /// Parameter names the current filter listens to.
        fn relevant_parameters(&self) -> Vec<&'static str> {
            self.inner
                .relevant_parameters()
                .iter()
                .map(|kind| kind.key())
                .collect()
        }

        #[getter]
        fn revision(&self) -> u64 {
            self.inner.revision()
        }
    }

    /// Display names of all filters, in menu order.
    #[pyfunction]
    pub fn filter_names() -> Vec<&'static str> {
        registry::filter_names().collect()
    }

    /// Instafilter Rust extension module
    #[pymodule]
    pub fn instafilter_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_class::<PyFilterEngine>()?;
        m.add_function(wrap_pyfunction!(filter_names, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::instafilter_rust;
