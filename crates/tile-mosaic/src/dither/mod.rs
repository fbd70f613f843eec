//! Monochrome dithering algorithms.
//!
//! Two reducers take a grayscale-equivalent buffer down to pure black and
//! white, selected via [`DitherMode`]:
//!
//! - [`DitherMode::ErrorDiffusion`]: six-tap reduced error diffusion,
//!   raster-order dependent, organic texture.
//! - [`DitherMode::OrderedThreshold`]: 8x8 Bayer matrix threshold,
//!   order-independent and fully deterministic per pixel.
//!
//! Both write `R = G = B` with values in `{0, 255}` and leave alpha alone.

mod error_diffusion;
mod ordered;

use crate::buffer::PixelBuffer;

/// Which black/white reduction the pipeline runs as its final stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMode {
    /// Reduced (6/8) error diffusion in strict raster order.
    ///
    /// Best for photographic sources; produces an irregular grain.
    #[default]
    ErrorDiffusion,

    /// Ordered threshold against a tiled 8x8 Bayer matrix.
    ///
    /// Deterministic crosshatch pattern; two runs over the same input are
    /// byte-identical.
    OrderedThreshold,
}

impl DitherMode {
    /// Apply this reduction to the buffer in place.
    pub fn apply(self, buffer: &mut PixelBuffer) {
        match self {
            DitherMode::ErrorDiffusion => error_diffusion::apply(buffer),
            DitherMode::OrderedThreshold => ordered::apply(buffer),
        }
    }
}
