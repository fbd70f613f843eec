//! Error types for the tile-mosaic crate.

use thiserror::Error;

/// Errors surfaced by the mosaic core.
///
/// Interaction-level problems (pointer misses, undo on an empty history)
/// are deliberately *not* errors -- they are silent no-ops. This enum covers
/// the cases a caller must be told about: rejected parameters and operations
/// that need state which does not exist yet.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MosaicError {
    /// A parameter was outside its accepted domain. The previous valid
    /// state is kept; nothing was recomputed.
    #[error("invalid {name}: {value} (allowed {allowed})")]
    InvalidParameter {
        name: &'static str,
        value: i64,
        allowed: &'static str,
    },

    /// No source image or frame is available; the pipeline run was skipped
    /// and any previously dithered canvas is retained.
    #[error("no source image available")]
    EmptySource,

    /// A compositing or placement operation was requested before the tile
    /// grid was first built.
    #[error("tile grid has not been built yet")]
    GridNotBuilt,

    /// A buffer was constructed with a zero dimension.
    #[error("empty pixel buffer: {width}x{height}")]
    EmptyBuffer { width: u32, height: u32 },

    /// A raw pixel store does not match the declared dimensions.
    #[error("pixel store length {actual} does not match {width}x{height}x4 = {expected}")]
    BufferSizeMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },
}
