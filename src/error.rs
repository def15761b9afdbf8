//! Error types for the filter engine and its collaborators.
//!
//! Every failure is returned as a value. Render failures keep the previous
//! output in place, so none of these errors leave the engine half-updated.

use std::path::PathBuf;

use thiserror::Error;

/// Failures produced while rendering or exporting the filtered image.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The render capability produced nothing for this configuration/input.
    #[error("filter '{filter}' produced no output: {reason}")]
    NoOutput { filter: &'static str, reason: String },

    /// Save was requested before any output was rendered.
    #[error("nothing to save: load a photo and apply a filter first")]
    NothingToSave,
}

impl RenderError {
    pub(crate) fn no_output(filter: &'static str, reason: impl Into<String>) -> Self {
        Self::NoOutput {
            filter,
            reason: reason.into(),
        }
    }
}

/// Failures reported by an image sink.
#[derive(Error, Debug)]
pub enum SaveError {
    #[error("cannot encode image with {channels} channels")]
    UnsupportedLayout { channels: usize },

    #[error("cannot encode {width}x{height} image: dimensions exceed u32")]
    TooLarge { width: usize, height: usize },

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Opaque failure from an external store (e.g. a photo library refusing access).
    #[error("{0}")]
    Rejected(String),
}

/// Failures while loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("unknown filter in config: {0}")]
    UnknownFilter(String),
}

/// Crate-level error for operations that cross more than one concern.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Render(#[from] RenderError),

    #[error(transparent)]
    Save(#[from] SaveError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("unknown filter: {0}")]
    UnknownFilter(String),

    #[error("unknown parameter: {0}")]
    UnknownParameter(String),
}
