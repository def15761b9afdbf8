//! Gaussian blur.
//!
//! The `radius` input is used as the standard deviation of the kernel.
//! Alpha is blurred along with the color channels.

use ndarray::{Array3, ArrayView3};

use super::core::gaussian_blur_f32;

/// Apply Gaussian blur - u8 version.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `radius` - Blur radius (sigma) in pixels; `<= 0` returns a copy
///
/// # Returns
/// Blurred image with same dimensions
pub fn gaussian_blur_u8(input: ArrayView3<u8>, radius: f32) -> Array3<u8> {
    if radius <= 0.0 {
        return input.to_owned();
    }

    gaussian_blur_f32(input, radius).mapv(|v| v.round().clamp(0.0, 255.0) as u8)
}
