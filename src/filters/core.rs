//! Shared helpers for the CPU filter kernels.
//!
//! - Gaussian kernel generation
//! - Separable Gaussian blur into an f32 working buffer
//! - Channel layout helpers
//!
//! Kernels assume a non-empty image; the renderer rejects empty extents
//! before any of them run.

use ndarray::{Array3, ArrayView3, Axis};
use rayon::prelude::*;

/// Number of channels that carry color (alpha excluded).
#[inline]
pub fn color_channels(channels: usize) -> usize {
    if channels == 4 {
        3
    } else {
        channels
    }
}

/// Generate a normalized 1D Gaussian kernel.
///
/// # Arguments
/// * `sigma` - Standard deviation of the Gaussian
///
/// # Returns
/// Normalized kernel of odd length, `[1.0]` for `sigma <= 0`
pub fn gaussian_kernel_1d(sigma: f32) -> Vec<f32> {
    if sigma <= 0.0 {
        return vec![1.0];
    }

    // Kernel size = 6 sigma (covers 99.7% of distribution), ensure odd
    let kernel_size = ((sigma * 6.0).ceil() as usize) | 1;
    let half = kernel_size / 2;

    let mut kernel: Vec<f32> = (0..kernel_size)
        .map(|i| {
            let x = i as f32 - half as f32;
            (-x * x / (2.0 * sigma * sigma)).exp()
        })
        .collect();

    let sum: f32 = kernel.iter().sum();
    for v in kernel.iter_mut() {
        *v /= sum;
    }

    kernel
}

/// Separable Gaussian blur of every channel, kept in f32 for callers that
/// combine the result with the source (unsharp mask).
///
/// Edges are clamped. Rows of each pass run in parallel.
pub fn gaussian_blur_f32(input: ArrayView3<u8>, sigma: f32) -> Array3<f32> {
    let (height, width, channels) = input.dim();
    let kernel = gaussian_kernel_1d(sigma);
    let half = kernel.len() as isize / 2;

    // Horizontal pass
    let mut temp = Array3::<f32>::zeros((height, width, channels));
    temp.axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            for x in 0..width {
                for c in 0..channels {
                    let mut sum = 0.0f32;
                    for (ki, &kv) in kernel.iter().enumerate() {
                        let sx = (x as isize + ki as isize - half).clamp(0, width as isize - 1) as usize;
                        sum += input[[y, sx, c]] as f32 * kv;
                    }
                    row[[x, c]] = sum;
                }
            }
        });

    // Vertical pass
    let mut result = Array3::<f32>::zeros((height, width, channels));
    result
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            for x in 0..width {
                for c in 0..channels {
                    let mut sum = 0.0f32;
                    for (ki, &kv) in kernel.iter().enumerate() {
                        let sy = (y as isize + ki as isize - half).clamp(0, height as isize - 1) as usize;
                        sum += temp[[sy, x, c]] * kv;
                    }
                    row[[x, c]] = sum;
                }
            }
        });

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kernel_is_normalized_and_odd() {
        let kernel = gaussian_kernel_1d(2.5);
        assert_eq!(kernel.len() % 2, 1);
        let sum: f32 = kernel.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert_eq!(gaussian_kernel_1d(0.0), vec![1.0]);
    }

    #[test]
    fn test_blur_keeps_flat_image_flat() {
        let img = Array3::<u8>::from_elem((4, 6, 3), 90);
        let blurred = gaussian_blur_f32(img.view(), 3.0);
        assert!(blurred.iter().all(|&v| (v - 90.0).abs() < 0.01));
    }
}
