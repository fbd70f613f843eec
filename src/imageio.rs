//! PNG decode/encode for the CLI.
//!
//! Decodes any 8-bit-normalizable PNG into the engine's RGBA
//! [`PixelBuffer`] and encodes buffers back out as RGBA PNGs. Palette and
//! 16-bit inputs are expanded/stripped by the decoder transformations;
//! anything that still isn't 8-bit afterwards is rejected.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use tile_mosaic::PixelBuffer;

use crate::error::AppError;

/// Decode a PNG file into an RGBA pixel buffer.
pub fn load_png(path: &Path) -> Result<PixelBuffer, AppError> {
    let file = File::open(path)?;
    decode_png(BufReader::new(file))
}

/// Decode PNG bytes from any reader into an RGBA pixel buffer.
pub fn decode_png<R: Read>(reader: R) -> Result<PixelBuffer, AppError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut png_reader = decoder.read_info()?;

    let mut raw = vec![0u8; png_reader.output_buffer_size()];
    let info = png_reader.next_frame(&mut raw)?;
    raw.truncate(info.buffer_size());

    if info.bit_depth != png::BitDepth::Eight {
        return Err(AppError::UnsupportedPng {
            color_type: info.color_type,
            bit_depth: info.bit_depth,
        });
    }

    let pixel_count = info.width as usize * info.height as usize;
    let mut rgba = Vec::with_capacity(pixel_count * 4);
    match info.color_type {
        png::ColorType::Rgba => rgba = raw,
        png::ColorType::Rgb => {
            for chunk in raw.chunks_exact(3) {
                rgba.extend_from_slice(&[chunk[0], chunk[1], chunk[2], 255]);
            }
        }
        png::ColorType::Grayscale => {
            for &v in &raw {
                rgba.extend_from_slice(&[v, v, v, 255]);
            }
        }
        png::ColorType::GrayscaleAlpha => {
            for chunk in raw.chunks_exact(2) {
                rgba.extend_from_slice(&[chunk[0], chunk[0], chunk[0], chunk[1]]);
            }
        }
        other => {
            return Err(AppError::UnsupportedPng {
                color_type: other,
                bit_depth: info.bit_depth,
            });
        }
    }

    tracing::debug!(
        width = info.width,
        height = info.height,
        color_type = ?info.color_type,
        "decoded PNG"
    );
    Ok(PixelBuffer::from_rgba(info.width, info.height, rgba)?)
}

/// Encode a pixel buffer as an RGBA PNG file.
pub fn save_png(path: &Path, buffer: &PixelBuffer) -> Result<(), AppError> {
    let file = File::create(path)?;
    encode_png(BufWriter::new(file), buffer)
}

/// Encode a pixel buffer as RGBA PNG bytes into any writer.
pub fn encode_png<W: Write>(writer: W, buffer: &PixelBuffer) -> Result<(), AppError> {
    let mut encoder = png::Encoder::new(writer, buffer.width(), buffer.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    let mut png_writer = encoder.write_header()?;
    png_writer.write_image_data(buffer.data())?;
    Ok(())
}
