//! Edge detection.
//!
//! Sobel gradient magnitude computed per color channel, scaled by
//! `intensity`. Flat regions go black, edges light up in their own color.
//! Borders are handled by clamping sample coordinates to the image.
//!
//! ## Supported Formats
//!
//! All filters accept images with 1, 3, or 4 channels:
//! - **Grayscale**: (height, width, 1) - processes the single channel
//! - **RGB**: (height, width, 3) - processes all 3 channels
//! - **RGBA**: (height, width, 4) - processes RGB, preserves alpha

use ndarray::{Array3, ArrayView3, Axis};
use rayon::prelude::*;

use super::core::color_channels;

// Sobel kernels
const KERNEL_H: [[f32; 3]; 3] = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const KERNEL_V: [[f32; 3]; 3] = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];

/// Apply edge detection - u8 version.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `intensity` - Multiplier applied to the gradient magnitude
///
/// # Returns
/// Edge image with same channel count
pub fn edges_u8(input: ArrayView3<u8>, intensity: f32) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let color = color_channels(channels);
    let mut output = Array3::<u8>::zeros((height, width, channels));

    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            for x in 0..width {
                for c in 0..color {
                    let mut gx = 0.0f32;
                    let mut gy = 0.0f32;

                    for ky in 0..3 {
                        let py = (y as isize + ky as isize - 1).clamp(0, height as isize - 1) as usize;
                        for kx in 0..3 {
                            let px = (x as isize + kx as isize - 1).clamp(0, width as isize - 1) as usize;
                            let v = input[[py, px, c]] as f32;
                            gx += v * KERNEL_H[ky][kx];
                            gy += v * KERNEL_V[ky][kx];
                        }
                    }

                    let magnitude = (gx * gx + gy * gy).sqrt() * intensity;
                    row[[x, c]] = magnitude.round().clamp(0.0, 255.0) as u8;
                }
                if channels == 4 {
                    row[[x, 3]] = input[[y, x, 3]];
                }
            }
        });

    output
}
