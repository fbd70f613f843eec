//! Linear contrast remapping.
//!
//! The classic 259-based contrast curve: each channel is scaled away from
//! (or toward) the 128 midpoint by a factor derived from a contrast value
//! in [-255, 255]. A contrast of 0 yields factor 1.0 exactly and leaves the
//! buffer byte-identical.

use crate::buffer::{PixelBuffer, CHANNELS};

/// Remap R, G, and B of every pixel in place; alpha is untouched.
///
/// `contrast` must be in `[-255, 255]` -- the 259 denominator goes to zero
/// at 259, so the caller validates the domain before this runs.
pub fn apply_contrast(buffer: &mut PixelBuffer, contrast: i32) {
    debug_assert!(
        (-255..=255).contains(&contrast),
        "contrast {contrast} outside [-255, 255]"
    );

    let factor = (259.0 * (contrast as f32 + 255.0)) / (255.0 * (259.0 - contrast as f32));
    for pixel in buffer.data_mut().chunks_exact_mut(CHANNELS) {
        for channel in pixel.iter_mut().take(3) {
            let remapped = factor * (*channel as f32 - 128.0) + 128.0;
            *channel = remapped.clamp(0.0, 255.0) as u8;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient_buffer() -> PixelBuffer {
        let mut buffer = PixelBuffer::new(16, 16).unwrap();
        for y in 0..16 {
            for x in 0..16 {
                let v = (y * 16 + x) as u8;
                buffer.set_rgba(x, y, [v, v, v, 255]);
            }
        }
        buffer
    }

    #[test]
    fn test_zero_contrast_is_identity() {
        let original = gradient_buffer();
        let mut adjusted = original.clone();

        apply_contrast(&mut adjusted, 0);

        assert_eq!(original, adjusted, "contrast 0 must be pixel-exact no-op");
    }

    #[test]
    fn test_positive_contrast_pushes_away_from_midpoint() {
        let mut buffer = PixelBuffer::new(2, 1).unwrap();
        buffer.set_rgba(0, 0, [200, 200, 200, 255]);
        buffer.set_rgba(1, 0, [60, 60, 60, 255]);

        apply_contrast(&mut buffer, 128);

        assert!(buffer.rgba(0, 0)[0] > 200, "bright pixel should move toward 255");
        assert!(buffer.rgba(1, 0)[0] < 60, "dark pixel should move toward 0");
    }

    #[test]
    fn test_negative_contrast_pulls_toward_midpoint() {
        let mut buffer = PixelBuffer::new(2, 1).unwrap();
        buffer.set_rgba(0, 0, [200, 200, 200, 255]);
        buffer.set_rgba(1, 0, [60, 60, 60, 255]);

        apply_contrast(&mut buffer, -128);

        assert!(buffer.rgba(0, 0)[0] < 200, "bright pixel should move toward 128");
        assert!(buffer.rgba(1, 0)[0] > 60, "dark pixel should move toward 128");
    }

    #[test]
    fn test_extreme_contrast_clamps() {
        let mut buffer = PixelBuffer::new(2, 1).unwrap();
        buffer.set_rgba(0, 0, [250, 250, 250, 255]);
        buffer.set_rgba(1, 0, [5, 5, 5, 255]);

        apply_contrast(&mut buffer, 255);

        assert_eq!(buffer.rgba(0, 0), [255, 255, 255, 255]);
        assert_eq!(buffer.rgba(1, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_alpha_untouched() {
        let mut buffer = PixelBuffer::new(1, 1).unwrap();
        buffer.set_rgba(0, 0, [10, 10, 10, 42]);

        apply_contrast(&mut buffer, 200);

        assert_eq!(buffer.rgba(0, 0)[3], 42);
    }

    #[test]
    fn test_midpoint_is_fixed_point() {
        let mut buffer = PixelBuffer::new(1, 1).unwrap();
        buffer.set_rgba(0, 0, [128, 128, 128, 255]);

        apply_contrast(&mut buffer, 255);

        assert_eq!(buffer.rgba(0, 0), [128, 128, 128, 255]);
    }
}
