//! tile-mosaic: monochrome halftone mosaic engine.
//!
//! This library turns an arbitrary source image into a pure black/white
//! mosaic of rearrangeable rectangular tiles, and keeps that mosaic
//! editable: tiles can be selected, swapped, and shuffled, every mutation
//! is undoable, and the current arrangement composites at any scale for
//! screen preview or high-resolution export.
//!
//! # Architecture
//!
//! ```text
//! source raster
//!     |
//!     v
//! ProcessingPipeline      cover -> contrast -> quantize -> dither
//!     |
//!     v
//! dithered canvas         fixed 400x565, pure black/white
//!     |
//!     v
//! TileGrid                home/grid positions, selection, shuffle
//!     |                   (HistoryManager snapshots every mutation)
//!     v
//! compositor              preview at scale 1, export at any scale
//! ```
//!
//! The [`MosaicEditor`] context ties the stages together behind a small
//! interaction API (`pointer_down` / `pointer_drag` / `pointer_up`,
//! `request_shuffle`, `request_undo` / `request_redo`,
//! `request_export`). Host environments supply pixels and pointer events;
//! the editor owns all state.
//!
//! # Quick Start
//!
//! ```
//! use tile_mosaic::{MosaicEditor, PixelBuffer};
//!
//! let mut source = PixelBuffer::new(64, 64).unwrap();
//! source.fill([180, 180, 180, 255]);
//!
//! let mut editor = MosaicEditor::with_seed(1);
//! editor.set_source(source);
//! editor.refresh().unwrap();
//!
//! let export = editor.request_export(2).unwrap();
//! assert_eq!(export.width(), 800);
//! assert_eq!(export.height(), 1130);
//! ```
//!
//! # Determinism
//!
//! The ordered-threshold ditherer and the compositor are fully
//! deterministic; the error-diffusion ditherer is deterministic for a given
//! input because it runs in strict raster order. Shuffling is the only
//! randomized operation, and [`MosaicEditor::with_seed`] pins it down for
//! reproducible output.

pub mod buffer;
pub mod compositor;
pub mod dither;
pub mod editor;
pub mod error;
pub mod grid;
pub mod pipeline;


pub use buffer::PixelBuffer;
pub use dither::DitherMode;
pub use editor::{MosaicEditor, DEFAULT_EXPORT_SCALE, DEFAULT_FRAME_SKIP};
pub use error::MosaicError;
pub use grid::history::HistoryManager;
pub use grid::selection::SelectionRegion;
pub use grid::{Tile, TileGrid, TILE_ASPECT};
pub use pipeline::{
    ProcessingParameters, ProcessingPipeline, CANVAS_HEIGHT, CANVAS_WIDTH,
};
