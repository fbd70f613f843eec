use thiserror::Error;
use tile_mosaic::MosaicError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG decode error: {0}")]
    PngDecode(#[from] png::DecodingError),

    #[error("PNG encode error: {0}")]
    PngEncode(#[from] png::EncodingError),

    #[error("Unsupported PNG format: {color_type:?} at {bit_depth:?}")]
    UnsupportedPng {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },

    #[error("Mosaic error: {0}")]
    Mosaic(#[from] MosaicError),
}
