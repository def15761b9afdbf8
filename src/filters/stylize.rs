//! Stylize filters: Pixellate, Crystallize, Vignette.
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

// ============================================================================
// Pixellate
// ============================================================================

/// Replace square blocks with their average color - u8 version.
///
/// Blocks are anchored at the top-left corner; edge blocks may be partial.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `scale` - Block size in pixels (rounded, values below 1 leave the image unchanged)
///
/// # Returns
/// Pixellated image with same channel count
pub fn pixellate_u8(input: ArrayView3<u8>, scale: f32) -> Array3<u8> {
    let block = scale.round().max(1.0) as usize;
    if block == 1 {
        return input.to_owned();
    }

    let (height, width, channels) = input.dim();
    let color = color_channels(channels);
    let blocks_y = height.div_ceil(block);
    let blocks_x = width.div_ceil(block);

    // Block averages
    let mut averages = Array3::<u8>::zeros((blocks_y, blocks_x, color));
    averages
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(by, mut row)| {
            let y0 = by * block;
            let y1 = (y0 + block).min(height);
            for bx in 0..blocks_x {
                let x0 = bx * block;
                let x1 = (x0 + block).min(width);
                let count = ((y1 - y0) * (x1 - x0)) as u64;
                for c in 0..color {
                    let mut sum = 0u64;
                    for y in y0..y1 {
                        for x in x0..x1 {
                            sum += input[[y, x, c]] as u64;
                        }
                    }
                    row[[bx, c]] = ((sum + count / 2) / count) as u8;
                }
            }
        });

    let mut output = input.to_owned();
    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            for x in 0..width {
                for c in 0..color {
                    row[[x, c]] = averages[[y / block, x / block, c]];
                }
            }
        });

    output
}

// ============================================================================
// Crystallize
// ============================================================================

/// Deterministic integer hash (splitmix64 finalizer).
#[inline]
fn hash_cell(y: usize, x: usize, salt: u64) -> u64 {
    let mut z = (y as u64)
        .wrapping_mul(0x9E37_79B9_7F4A_7C15)
        .wrapping_add((x as u64).wrapping_mul(0xBF58_476D_1CE4_E5B9))
        .wrapping_add(salt);
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

/// Seed point of grid cell `(cy, cx)`, jittered inside the cell.
#[inline]
fn cell_seed(cy: usize, cx: usize, cell: usize, height: usize, width: usize) -> (usize, usize) {
    let sy = cy * cell + (hash_cell(cy, cx, 1) % cell as u64) as usize;
    let sx = cx * cell + (hash_cell(cy, cx, 2) % cell as u64) as usize;
    (sy.min(height - 1), sx.min(width - 1))
}

/// Break the image into polygonal cells of flat color - u8 version.
///
/// One seed per `radius`-sized grid cell, jittered deterministically; every
/// pixel takes the color of the nearest seed among the surrounding cells.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `radius` - Cell size in pixels (rounded, values below 1 leave the image unchanged)
///
/// # Returns
/// Crystallized image with same channel count
pub fn crystallize_u8(input: ArrayView3<u8>, radius: f32) -> Array3<u8> {
    let cell = radius.round().max(1.0) as usize;
    if cell == 1 {
        return input.to_owned();
    }

    let (height, width, channels) = input.dim();
    let color = color_channels(channels);
    let cells_y = height.div_ceil(cell);
    let cells_x = width.div_ceil(cell);

    let mut output = input.to_owned();
    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            let cy = y / cell;
            for x in 0..width {
                let cx = x / cell;
                let mut nearest = (y, x);
                let mut best = usize::MAX;

                for ny in cy.saturating_sub(1)..=(cy + 1).min(cells_y - 1) {
                    for nx in cx.saturating_sub(1)..=(cx + 1).min(cells_x - 1) {
                        let (sy, sx) = cell_seed(ny, nx, cell, height, width);
                        let dist = sy.abs_diff(y).pow(2) + sx.abs_diff(x).pow(2);
                        if dist < best {
                            best = dist;
                            nearest = (sy, sx);
                        }
                    }
                }

                for c in 0..color {
                    row[[x, c]] = input[[nearest.0, nearest.1, c]];
                }
            }
        });

    output
}

// ============================================================================
// Vignette
// ============================================================================

/// Darken the image towards its corners - u8 version.
///
/// Pixels within `radius` of the center are untouched; beyond it the
/// darkening ramps smoothly up to `intensity` at the corners.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `intensity` - Darkening at the corners (0.0 = none, 1.0 = black)
/// * `radius` - Untouched radius around the center, in pixels
///
/// # Returns
/// Vignetted image with same channel count
pub fn vignette_u8(input: ArrayView3<u8>, intensity: f32, radius: f32) -> Array3<u8> {
    let (height, width, channels) = input.dim();
    let color = color_channels(channels);
    let center_y = height as f32 / 2.0;
    let center_x = width as f32 / 2.0;
    let max_dist = (center_x * center_x + center_y * center_y).sqrt();
    let radius = radius.max(0.0);
    let span = (max_dist - radius).max(f32::EPSILON);

    let mut output = input.to_owned();
    output
        .axis_iter_mut(Axis(0))
        .into_par_iter()
        .enumerate()
        .for_each(|(y, mut row)| {
            let dy = y as f32 + 0.5 - center_y;
            for x in 0..width {
                let dx = x as f32 + 0.5 - center_x;
                let dist = (dx * dx + dy * dy).sqrt();
                if dist <= radius {
                    continue;
                }

                let t = ((dist - radius) / span).clamp(0.0, 1.0);
                let falloff = t * t * (3.0 - 2.0 * t);
                let factor = (1.0 - intensity * falloff).clamp(0.0, 1.0);
                for c in 0..color {
                    row[[x, c]] = (row[[x, c]] as f32 * factor).round() as u8;
                }
            }
        });

    output
}
