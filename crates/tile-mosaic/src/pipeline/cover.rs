//! Crop-to-cover source sampling.
//!
//! A source image of arbitrary dimensions is scaled into the fixed canvas so
//! that it fills the whole target without letterboxing: the axis whose aspect
//! overshoots the target is center-cropped. Sampling is nearest-neighbor;
//! the dithering passes downstream destroy anything a fancier filter would
//! preserve.

use crate::buffer::PixelBuffer;

/// Center-crop `src` to the destination's aspect ratio and scale it into
/// `dst`, overwriting every destination pixel.
pub fn cover_into(src: &PixelBuffer, dst: &mut PixelBuffer) {
    let src_w = src.width() as f32;
    let src_h = src.height() as f32;
    let dst_w = dst.width() as f32;
    let dst_h = dst.height() as f32;

    let src_aspect = src_w / src_h;
    let dst_aspect = dst_w / dst_h;

    // The crop window inside the source, matching the destination aspect.
    let (crop_w, crop_h) = if src_aspect > dst_aspect {
        (src_h * dst_aspect, src_h)
    } else {
        (src_w, src_w / dst_aspect)
    };
    let crop_x = (src_w - crop_w) / 2.0;
    let crop_y = (src_h - crop_h) / 2.0;

    let max_x = src.width() - 1;
    let max_y = src.height() - 1;

    for y in 0..dst.height() {
        let v = crop_y + (y as f32 + 0.5) / dst_h * crop_h;
        let sy = (v.floor() as i64).clamp(0, max_y as i64) as u32;
        for x in 0..dst.width() {
            let u = crop_x + (x as f32 + 0.5) / dst_w * crop_w;
            let sx = (u.floor() as i64).clamp(0, max_x as i64) as u32;
            dst.set_rgba(x, y, src.rgba(sx, sy));
        }
    }
}
