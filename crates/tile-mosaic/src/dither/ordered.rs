//! Ordered threshold dithering with an 8x8 Bayer matrix.
//!
//! Stateless and order-independent: every pixel is compared against a
//! position-dependent threshold from a fixed dispersed-dot matrix. Running
//! the pass twice on the same input is byte-identical, and no pixel depends
//! on any other.

use crate::buffer::PixelBuffer;

/// The 8x8 Bayer threshold matrix, values 0..=63.
///
/// The exact table is part of the output contract: callers compare rendered
/// mosaics bit-for-bit across runs and versions.
const BAYER_8X8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Reduce the buffer to pure black/white in place.
///
/// The matrix value is scaled by 4 to spread the 0..=63 range over 0..=252.
/// A pixel is black when its luminance is strictly below the threshold, so
/// luminance 0 at a zero-threshold cell comes out white -- an intentional
/// quirk carried over from the reference pattern.
pub(crate) fn apply(buffer: &mut PixelBuffer) {
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            let gray = buffer.luma(x, y);
            let threshold = BAYER_8X8[y as usize % 8][x as usize % 8] as f32 * 4.0;
            let out = if gray < threshold { 0 } else { 255 };
            buffer.set_gray(x, y, out);
        }
    }
}
