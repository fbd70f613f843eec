//! Mosaic compositing.
//!
//! Renders a [`TileGrid`] over its dithered canvas into a freshly allocated
//! output buffer. Each tile samples its *home* rectangle from the canvas
//! and is drawn at its *current* grid rectangle, so the same arrangement
//! composites identically at any scale -- the screen preview at scale 1 and
//! a print export at scale 6 differ only by the linear scale factor.
//!
//! Rendering never mutates the canvas or the grid.

use crate::buffer::PixelBuffer;
use crate::error::MosaicError;
use crate::grid::selection::Rect;
use crate::grid::TileGrid;

/// Outline color for selected tiles in the preview.
const SELECTION_OUTLINE: [u8; 4] = [0, 150, 255, 255];

/// Outline thickness in preview pixels.
const OUTLINE_WEIGHT: u32 = 2;

/// Render the grid at an integer scale factor.
///
/// The output buffer is `canvas dimensions * scale`; area not covered by
/// any tile (the strip below the last whole tile row) stays transparent.
pub fn render(grid: &TileGrid, canvas: &PixelBuffer, scale: u32) -> Result<PixelBuffer, MosaicError> {
    if scale < 1 {
        return Err(MosaicError::InvalidParameter {
            name: "scale",
            value: scale as i64,
            allowed: ">= 1",
        });
    }

    let mut output = PixelBuffer::new(canvas.width() * scale, canvas.height() * scale)?;

    let sample_w = canvas.width() as f32 / grid.cols() as f32;
    let sample_h = canvas.height() as f32 / grid.rows().max(1) as f32;

    for tile in grid.tiles() {
        let src = Rect {
            x0: tile.home_col as f32 * sample_w,
            y0: tile.home_row as f32 * sample_h,
            x1: (tile.home_col + 1) as f32 * sample_w,
            y1: (tile.home_row + 1) as f32 * sample_h,
        };
        let dst = scaled_rect(grid, tile.grid_col, tile.grid_row, scale);
        blit_nearest(canvas, &src, &mut output, &dst);
    }

    Ok(output)
}

/// Render a scale-1 preview, outlining selected tiles when the selection
/// overlay is visible. Exports never carry the overlay.
pub fn render_preview(
    grid: &TileGrid,
    canvas: &PixelBuffer,
    show_selection: bool,
) -> Result<PixelBuffer, MosaicError> {
    let mut output = render(grid, canvas, 1)?;

    if show_selection {
        for tile in grid.tiles().iter().filter(|t| t.is_selected) {
            let rect = scaled_rect(grid, tile.grid_col, tile.grid_row, 1);
            outline_rect(&mut output, &rect, SELECTION_OUTLINE);
        }
    }

    Ok(output)
}

/// The output rectangle of a grid cell at the given scale.
fn scaled_rect(grid: &TileGrid, grid_col: u32, grid_row: u32, scale: u32) -> Rect {
    let scale = scale as f32;
    let x0 = grid_col as f32 * grid.tile_width() * scale;
    let y0 = grid_row as f32 * grid.tile_height() * scale;
    Rect {
        x0,
        y0,
        x1: x0 + grid.tile_width() * scale,
        y1: y0 + grid.tile_height() * scale,
    }
}

/// Nearest-neighbor copy of the source rectangle into the destination
/// rectangle, clipped to both buffers.
fn blit_nearest(src_buf: &PixelBuffer, src: &Rect, dst_buf: &mut PixelBuffer, dst: &Rect) {
    let dst_w = dst.x1 - dst.x0;
    let dst_h = dst.y1 - dst.y0;
    if dst_w <= 0.0 || dst_h <= 0.0 {
        return;
    }

    let x_begin = (dst.x0.round().max(0.0)) as u32;
    let y_begin = (dst.y0.round().max(0.0)) as u32;
    let x_end = (dst.x1.round() as i64).clamp(0, dst_buf.width() as i64) as u32;
    let y_end = (dst.y1.round() as i64).clamp(0, dst_buf.height() as i64) as u32;

    let src_max_x = src_buf.width() as i64 - 1;
    let src_max_y = src_buf.height() as i64 - 1;

    for y in y_begin..y_end {
        let v = src.y0 + (y as f32 + 0.5 - dst.y0) / dst_h * (src.y1 - src.y0);
        let sy = (v.floor() as i64).clamp(0, src_max_y) as u32;
        for x in x_begin..x_end {
            let u = src.x0 + (x as f32 + 0.5 - dst.x0) / dst_w * (src.x1 - src.x0);
            let sx = (u.floor() as i64).clamp(0, src_max_x) as u32;
            dst_buf.set_rgba(x, y, src_buf.rgba(sx, sy));
        }
    }
}

/// Stroke a rectangle outline inside the given bounds.
fn outline_rect(buffer: &mut PixelBuffer, rect: &Rect, color: [u8; 4]) {
    let x_begin = (rect.x0.round().max(0.0)) as u32;
    let y_begin = (rect.y0.round().max(0.0)) as u32;
    let x_end = (rect.x1.round() as i64).clamp(0, buffer.width() as i64) as u32;
    let y_end = (rect.y1.round() as i64).clamp(0, buffer.height() as i64) as u32;
    if x_begin >= x_end || y_begin >= y_end {
        return;
    }

    for y in y_begin..y_end {
        for x in x_begin..x_end {
            let from_edge = (x - x_begin)
                .min(x_end - 1 - x)
                .min(y - y_begin)
                .min(y_end - 1 - y);
            if from_edge < OUTLINE_WEIGHT {
                buffer.set_rgba(x, y, color);
            }
        }
    }
}
