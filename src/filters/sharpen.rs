//! Unsharp mask.
//!
//! Sharpens by adding back the difference between the image and a Gaussian
//! blurred copy of it: `out = in + (in - blur(in, radius)) * intensity`.
//!
//! ## Supported Formats
//!
//! - **Grayscale**: (height, width, 1) - processes the single channel
//! - **RGB**: (height, width, 3) - processes all 3 channels
//! - **RGBA**: (height, width, 4) - processes RGB, preserves alpha

use ndarray::{Array3, ArrayView3, Axis, Zip};

use super::core::{color_channels, gaussian_blur_f32};

/// Apply unsharp mask - u8 version.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `intensity` - Amount of detail added back (0.0 = no change)
/// * `radius` - Blur radius (sigma) of the mask in pixels
///
/// # Returns
/// Sharpened image with same channel count
pub fn unsharp_mask_u8(input: ArrayView3<u8>, intensity: f32, radius: f32) -> Array3<u8> {
    if radius <= 0.0 || intensity == 0.0 {
        return input.to_owned();
    }

    let (_, _, channels) = input.dim();
    let color = color_channels(channels);
    let blurred = gaussian_blur_f32(input, radius);
    let mut output = input.to_owned();

    Zip::from(output.lanes_mut(Axis(2)))
        .and(input.lanes(Axis(2)))
        .and(blurred.lanes(Axis(2)))
        .par_for_each(|mut out, src, blur| {
            for c in 0..color {
                let v = src[c] as f32;
                let sharpened = v + (v - blur[c]) * intensity;
                out[c] = sharpened.round().clamp(0.0, 255.0) as u8;
            }
        });

    output
}
