//! Image source and sink collaborators.
//!
//! The engine never picks or stores photos itself. A UI hands it images
//! through [`ImageSource`] and exports results through [`ImageSink`];
//! platform integrations (photo picker, photo library) implement these
//! traits. File-backed versions using the `image` crate are provided here.

use std::path::{Path, PathBuf};

use image::{DynamicImage, GrayImage, RgbImage, RgbaImage};
use ndarray::{Array3, ArrayView3, ShapeError};
use tracing::{debug, warn};

use crate::error::SaveError;
use crate::ImageBuffer;

/// Supplies a decoded image, or `None` when the user cancels.
pub trait ImageSource {
    fn pick_image(&mut self) -> Option<ImageBuffer>;
}

/// Persists a finished image outside the process.
pub trait ImageSink {
    fn save(&mut self, image: ArrayView3<u8>) -> Result<(), SaveError>;
}

/// Convert a decoded image into an RGBA `(height, width, 4)` buffer.
pub fn image_from_dynamic(image: &DynamicImage) -> Result<ImageBuffer, ShapeError> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    Array3::from_shape_vec((height as usize, width as usize, 4), rgba.into_raw())
}

/// Convert a 1, 3 or 4 channel buffer into an encodable image.
pub fn image_to_dynamic(image: ArrayView3<u8>) -> Result<DynamicImage, SaveError> {
    let (height, width, channels) = image.dim();
    let (Ok(w), Ok(h)) = (u32::try_from(width), u32::try_from(height)) else {
        return Err(SaveError::TooLarge { width, height });
    };
    let raw: Vec<u8> = image.iter().copied().collect();

    let converted = match channels {
        1 => GrayImage::from_raw(w, h, raw).map(DynamicImage::ImageLuma8),
        3 => RgbImage::from_raw(w, h, raw).map(DynamicImage::ImageRgb8),
        4 => RgbaImage::from_raw(w, h, raw).map(DynamicImage::ImageRgba8),
        _ => None,
    };
    converted.ok_or(SaveError::UnsupportedLayout { channels })
}

/// Reads the image at a chosen path; no path means the pick was cancelled.
#[derive(Debug, Clone, Default)]
pub struct FileImageSource {
    path: Option<PathBuf>,
}

impl FileImageSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn cancelled() -> Self {
        Self::default()
    }
}

impl ImageSource for FileImageSource {
    fn pick_image(&mut self) -> Option<ImageBuffer> {
        let path = self.path.as_ref()?;
        let decoded = match image::open(path) {
            Ok(decoded) => decoded,
            Err(err) => {
                warn!(path = %path.display(), error = %err, "could not decode picked image");
                return None;
            }
        };
        match image_from_dynamic(&decoded) {
            Ok(buffer) => {
                debug!(path = %path.display(), dims = ?buffer.dim(), "decoded source image");
                Some(buffer)
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "decoded image has an unexpected layout");
                None
            }
        }
    }
}

/// Writes images to a fixed path; the format follows the file extension.
#[derive(Debug, Clone)]
pub struct FileImageSink {
    path: PathBuf,
}

impl FileImageSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ImageSink for FileImageSink {
    fn save(&mut self, image: ArrayView3<u8>) -> Result<(), SaveError> {
        let encoded = image_to_dynamic(image)?;
        // JPEG has no alpha channel.
        let encoded = match self.path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("jpg") || ext.eq_ignore_ascii_case("jpeg") => {
                DynamicImage::ImageRgb8(encoded.to_rgb8())
            }
            _ => encoded,
        };
        encoded.save(&self.path).map_err(|source| SaveError::Write {
            path: self.path.clone(),
            source,
        })?;
        debug!(path = %self.path.display(), "image written");
        Ok(())
    }
}
