//! Block-average quantization ("pixelation").
//!
//! Partitions the buffer into `block_size` x `block_size` cells, computes
//! the mean luminance of each cell, and writes that mean back into R, G,
//! and B of every pixel in the cell. Cells at the right and bottom edges
//! are clipped to the buffer bounds.

use crate::buffer::PixelBuffer;

/// Flatten each aligned cell of the buffer to its mean luminance.
///
/// Callers skip this pass entirely for `block_size == 1`; running it anyway
/// grayscales each pixel to its own channel mean, which is invisible to the
/// luminance-based passes downstream.
pub fn flatten_blocks(buffer: &mut PixelBuffer, block_size: u32) {
    debug_assert!(block_size >= 1, "block_size must be at least 1");

    let width = buffer.width();
    let height = buffer.height();

    for block_y in (0..height).step_by(block_size as usize) {
        for block_x in (0..width).step_by(block_size as usize) {
            let x_end = (block_x + block_size).min(width);
            let y_end = (block_y + block_size).min(height);

            let mut sum = 0.0f64;
            let mut count = 0u32;
            for y in block_y..y_end {
                for x in block_x..x_end {
                    sum += buffer.luma(x, y) as f64;
                    count += 1;
                }
            }
            let mean = (sum / count as f64).round() as u8;

            for y in block_y..y_end {
                for x in block_x..x_end {
                    buffer.set_gray(x, y, mean);
                }
            }
        }
    }
}
