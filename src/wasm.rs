//! WebAssembly exports for the filter engine.
//!
//! These types are exposed to JavaScript via wasm-bindgen. Images cross the
//! boundary as flat RGBA byte arrays (length = width * height * 4), the
//! layout of `ImageData.data` in a browser canvas.

use ndarray::Array3;
use wasm_bindgen::prelude::*;

use crate::engine::FilterEngine;
use crate::params::ParameterKind;
use crate::registry;

fn to_js_err(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Filter engine session for JavaScript callers.
#[wasm_bindgen]
pub struct WasmFilterEngine {
    inner: FilterEngine,
}

#[wasm_bindgen]
impl WasmFilterEngine {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WasmFilterEngine {
        WasmFilterEngine {
            inner: FilterEngine::new(),
        }
    }

    /// Load an RGBA source image and re-render.
    ///
    /// # Arguments
    /// * `data` - Flat array of RGBA bytes (length = width * height * 4)
    /// * `width` - Image width in pixels
    /// * `height` - Image height in pixels
    pub fn load_rgba(&mut self, data: &[u8], width: usize, height: usize) -> Result<(), JsValue> {
        let input = Array3::from_shape_vec((height, width, 4), data.to_vec()).map_err(to_js_err)?;
        self.inner.load_image(Some(input)).map_err(to_js_err)
    }

    /// Select a filter by display name, e.g. "Gaussian Blur".
    pub fn select_filter(&mut self, name: &str) -> Result<(), JsValue> {
        self.inner.select_filter_by_name(name).map_err(to_js_err)
    }

    /// Move a slider: `kind` is "intensity", "radius" or "scale".
    pub fn update_parameter(&mut self, kind: &str, value: f32) -> Result<(), JsValue> {
        let kind: ParameterKind = kind.parse().map_err(to_js_err)?;
        self.inner.update_parameter(kind, value).map_err(to_js_err)
    }

    /// Flat RGBA bytes of the rendered image, if any.
    pub fn output_rgba(&self) -> Option<Vec<u8>> {
        self.inner.output_image().map(|img| img.iter().copied().collect())
    }

    pub fn current_filter(&self) -> String {
        self.inner.current_filter().name().to_string()
    }

    /// Parameter names the current filter listens to.
    pub fn relevant_parameters(&self) -> Vec<String> {
        self.inner
            .relevant_parameters()
            .iter()
            .map(|kind| kind.key().to_string())
            .collect()
    }

    pub fn revision(&self) -> u64 {
        self.inner.revision()
    }
}

impl Default for WasmFilterEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Display names of all filters, in menu order.
#[wasm_bindgen]
pub fn filter_names() -> Vec<String> {
    registry::filter_names().map(str::to_string).collect()
}
