//! Reduced error diffusion dithering.
//!
//! A six-tap diffusion in the Atkinson family: each pixel is thresholded at
//! 128 and 1/8 of its quantization error is pushed to six forward neighbors,
//! so only 6/8 of the error survives. The discarded 2/8 is part of the
//! contract -- it lightens mid-tones and keeps large flat areas from
//! bleeding, and callers rely on the exact output pattern.
//!
//! The pass runs in strict raster order (left to right, top to bottom).
//! Later pixels read errors already deposited by earlier ones, so the scan
//! order is load-bearing; there is no serpentine variant here.

use crate::buffer::PixelBuffer;

/// Forward neighbors receiving `error / 8` each.
///
/// ```text
///        X   1   1
///    1   1   1
///        1
/// ```
const DIFFUSION_TAPS: [(i32, i32); 6] = [(1, 0), (2, 0), (-1, 1), (0, 1), (1, 1), (0, 2)];

/// Divisor applied to the quantization error for every tap.
const DIVISOR: f32 = 8.0;

/// Reduce the buffer to pure black/white in place.
///
/// Accumulated error lives in an f32 working plane and is deliberately not
/// clamped when deposited; clamping happens implicitly when the receiving
/// pixel is itself thresholded. Taps landing outside the buffer are skipped
/// without redistributing their share.
pub(crate) fn apply(buffer: &mut PixelBuffer) {
    let width = buffer.width() as usize;
    let height = buffer.height() as usize;

    let mut gray: Vec<f32> = Vec::with_capacity(width * height);
    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            gray.push(buffer.luma(x, y));
        }
    }

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let old = gray[idx];
            let new = if old < 128.0 { 0.0 } else { 255.0 };
            let error = old - new;
            gray[idx] = new;

            for (dx, dy) in DIFFUSION_TAPS {
                let nx = x as i64 + dx as i64;
                let ny = y as i64 + dy as i64;
                if nx < 0 || nx >= width as i64 || ny >= height as i64 {
                    continue;
                }
                gray[ny as usize * width + nx as usize] += error / DIVISOR;
            }
        }
    }

    for y in 0..buffer.height() {
        for x in 0..buffer.width() {
            buffer.set_gray(x, y, gray[y as usize * width + x as usize] as u8);
        }
    }
}
