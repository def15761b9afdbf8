//! CPU filter kernels backing [`CpuRenderer`](crate::render::CpuRenderer).
//!
//! ## Supported Formats
//!
//! | Format | Shape | Type | Description |
//! |--------|-------|------|-------------|
//! | Grayscale8 | (H, W, 1) | u8 | Single luminance channel, 0-255 |
//! | RGB8 | (H, W, 3) | u8 | Red, green, blue, 0-255 |
//! | RGBA8 | (H, W, 4) | u8 | RGB + alpha, 0-255 |
//!
//! Channel count is inferred from input array dimensions.
//!
//! ## Architecture
//!
//! - **Multi-channel aware** - Handles 1, 3, or 4 channels
//! - **Alpha preservation** - Alpha is left untouched, except by Gaussian blur
//! - **Deterministic** - Same input and parameters always give the same bytes
//! - **Parallel** - Rows are processed with rayon
//!
//! ## Filters
//!
//! - **Color**: sepia tone
//! - **Blur**: gaussian blur
//! - **Sharpen**: unsharp mask
//! - **Edge detection**: edges
//! - **Stylize**: pixellate, crystallize, vignette

pub mod core;
pub mod color;
pub mod blur;
pub mod sharpen;
pub mod edge;
pub mod stylize;
