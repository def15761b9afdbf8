//! Sepia tone.
//!
//! Maps colors through the classic sepia matrix and blends the result with
//! the input pixel by `intensity` (0.0 = unchanged, 1.0 = full sepia).
//! Grayscale images carry no color to tone and pass through unchanged.

use ndarray::{Array3, ArrayView3, Axis, Zip};

const SEPIA: [[f32; 3]; 3] = [
    [0.393, 0.769, 0.189],
    [0.349, 0.686, 0.168],
    [0.272, 0.534, 0.131],
];

/// Apply sepia tone - u8 version.
///
/// # Arguments
/// * `input` - Image with 1, 3, or 4 channels (height, width, channels)
/// * `intensity` - Blend amount (0.0-1.0)
///
/// # Returns
/// Toned image with same channel count, alpha preserved
pub fn sepia_tone_u8(input: ArrayView3<u8>, intensity: f32) -> Array3<u8> {
    let (_, _, channels) = input.dim();
    if channels < 3 {
        return input.to_owned();
    }

    let amount = intensity.clamp(0.0, 1.0);
    let mut output = input.to_owned();

    Zip::from(output.lanes_mut(Axis(2))).par_for_each(|mut px| {
        let rgb = [px[0] as f32, px[1] as f32, px[2] as f32];
        for (c, weights) in SEPIA.iter().enumerate() {
            let toned = weights[0] * rgb[0] + weights[1] * rgb[1] + weights[2] * rgb[2];
            let v = rgb[c] + (toned - rgb[c]) * amount;
            px[c] = v.round().clamp(0.0, 255.0) as u8;
        }
    });

    output
}
