//! The image-to-mosaic processing pipeline.
//!
//! A source raster of arbitrary dimensions becomes the fixed-resolution,
//! pure black/white "dithered canvas" every tile samples from:
//!
//! 1. **Cover**: center-crop the source to the canvas aspect and scale it in
//! 2. **Contrast**: linear remap around the 128 midpoint
//! 3. **Quantize** (optional): flatten luminance over square blocks
//! 4. **Dither**: reduce to black/white with the selected algorithm
//!
//! Every run starts from a fresh crop of the source, so re-running with the
//! same source and parameters is byte-identical. The pipeline is *not*
//! idempotent over its own output -- dithering is lossy by design.

mod contrast;
mod cover;
mod quantize;

pub use contrast::apply_contrast;
pub use cover::cover_into;
pub use quantize::flatten_blocks;

use crate::buffer::PixelBuffer;
use crate::dither::DitherMode;
use crate::error::MosaicError;

/// Width of the dithered canvas in pixels.
pub const CANVAS_WIDTH: u32 = 400;

/// Height of the dithered canvas in pixels.
pub const CANVAS_HEIGHT: u32 = 565;

/// Validated per-run parameters.
///
/// Immutable once constructed; the editor triggers a fresh pipeline run
/// whenever a new set is supplied or the source frame changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingParameters {
    contrast: i32,
    block_size: u32,
    dither_mode: DitherMode,
}

impl Default for ProcessingParameters {
    /// Neutral parameters: no contrast change, no pixelation, error
    /// diffusion dithering.
    fn default() -> Self {
        Self {
            contrast: 0,
            block_size: 1,
            dither_mode: DitherMode::default(),
        }
    }
}

impl ProcessingParameters {
    /// Validate and build a parameter set.
    ///
    /// `contrast` must be in `[-255, 255]` (the contrast curve's denominator
    /// vanishes at 259) and `block_size` must be at least 1.
    pub fn new(contrast: i32, block_size: u32, dither_mode: DitherMode) -> Result<Self, MosaicError> {
        if !(-255..=255).contains(&contrast) {
            return Err(MosaicError::InvalidParameter {
                name: "contrast",
                value: contrast as i64,
                allowed: "-255..=255",
            });
        }
        if block_size < 1 {
            return Err(MosaicError::InvalidParameter {
                name: "block_size",
                value: block_size as i64,
                allowed: ">= 1",
            });
        }
        Ok(Self {
            contrast,
            block_size,
            dither_mode,
        })
    }

    #[inline]
    pub fn contrast(&self) -> i32 {
        self.contrast
    }

    #[inline]
    pub fn block_size(&self) -> u32 {
        self.block_size
    }

    #[inline]
    pub fn dither_mode(&self) -> DitherMode {
        self.dither_mode
    }
}

/// Runs the full cover -> contrast -> quantize -> dither chain.
#[derive(Debug, Clone, Copy)]
pub struct ProcessingPipeline {
    canvas_width: u32,
    canvas_height: u32,
}

impl Default for ProcessingPipeline {
    fn default() -> Self {
        Self {
            canvas_width: CANVAS_WIDTH,
            canvas_height: CANVAS_HEIGHT,
        }
    }
}

impl ProcessingPipeline {
    /// Pipeline targeting the standard canvas dimensions.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pipeline targeting custom canvas dimensions.
    pub fn with_canvas(width: u32, height: u32) -> Result<Self, MosaicError> {
        if width == 0 || height == 0 {
            return Err(MosaicError::EmptyBuffer { width, height });
        }
        Ok(Self {
            canvas_width: width,
            canvas_height: height,
        })
    }

    #[inline]
    pub fn canvas_width(&self) -> u32 {
        self.canvas_width
    }

    #[inline]
    pub fn canvas_height(&self) -> u32 {
        self.canvas_height
    }

    /// Process `source` into a freshly allocated dithered canvas.
    pub fn run(&self, source: &PixelBuffer, params: &ProcessingParameters) -> PixelBuffer {
        let mut canvas = PixelBuffer::new(self.canvas_width, self.canvas_height)
            .expect("canvas dimensions validated at construction");

        cover_into(source, &mut canvas);
        apply_contrast(&mut canvas, params.contrast);
        if params.block_size > 1 {
            flatten_blocks(&mut canvas, params.block_size);
        }
        params.dither_mode.apply(&mut canvas);

        tracing::debug!(
            width = canvas.width(),
            height = canvas.height(),
            contrast = params.contrast,
            block_size = params.block_size,
            mode = ?params.dither_mode,
            "pipeline run complete"
        );
        canvas
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_source() -> PixelBuffer {
        let mut source = PixelBuffer::new(60, 80).unwrap();
        for y in 0..80 {
            for x in 0..60 {
                let v = ((x * 255) / 60) as u8;
                source.set_rgba(x, y, [v, v, v, 255]);
            }
        }
        source
    }

    #[test]
    fn test_parameters_reject_out_of_range_contrast() {
        assert!(matches!(
            ProcessingParameters::new(256, 1, DitherMode::ErrorDiffusion),
            Err(MosaicError::InvalidParameter { name: "contrast", .. })
        ));
        assert!(matches!(
            ProcessingParameters::new(-256, 1, DitherMode::ErrorDiffusion),
            Err(MosaicError::InvalidParameter { name: "contrast", .. })
        ));
    }

    #[test]
    fn test_parameters_reject_zero_block_size() {
        assert!(matches!(
            ProcessingParameters::new(0, 0, DitherMode::OrderedThreshold),
            Err(MosaicError::InvalidParameter { name: "block_size", .. })
        ));
    }

    #[test]
    fn test_parameters_accept_domain_bounds() {
        assert!(ProcessingParameters::new(-255, 1, DitherMode::ErrorDiffusion).is_ok());
        assert!(ProcessingParameters::new(255, 64, DitherMode::OrderedThreshold).is_ok());
    }

    #[test]
    fn test_run_produces_canvas_sized_binary_output() {
        let pipeline = ProcessingPipeline::new();
        let params = ProcessingParameters::new(30, 4, DitherMode::OrderedThreshold).unwrap();
        let canvas = pipeline.run(&gradient_source(), &params);

        assert_eq!(canvas.width(), CANVAS_WIDTH);
        assert_eq!(canvas.height(), CANVAS_HEIGHT);
        for y in (0..canvas.height()).step_by(37) {
            for x in (0..canvas.width()).step_by(13) {
                let [r, g, b, _] = canvas.rgba(x, y);
                assert!(r == 0 || r == 255);
                assert_eq!(r, g);
                assert_eq!(g, b);
            }
        }
    }

    #[test]
    fn test_rerun_on_same_source_is_byte_identical() {
        let pipeline = ProcessingPipeline::with_canvas(40, 56).unwrap();
        let source = gradient_source();

        for mode in [DitherMode::ErrorDiffusion, DitherMode::OrderedThreshold] {
            let params = ProcessingParameters::new(-40, 3, mode).unwrap();
            let first = pipeline.run(&source, &params);
            let second = pipeline.run(&source, &params);
            assert_eq!(first.data(), second.data(), "{mode:?} run not reproducible");
        }
    }

    #[test]
    fn test_with_canvas_rejects_zero_dimension() {
        assert!(ProcessingPipeline::with_canvas(0, 10).is_err());
        assert!(ProcessingPipeline::with_canvas(10, 0).is_err());
    }
}
