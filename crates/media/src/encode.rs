//! In-memory PNG encoding of pixel buffers.

use common::error::{ExportError, ExportResult};
use common::pixels::PixelBuffer;

/// Vertical order of the rows stored in a [`PixelBuffer`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RowOrder {
    /// Row 0 is the top scanline.
    TopDown,
    /// Row 0 is the bottom scanline, as produced by the compositor.
    #[default]
    BottomUp,
}

/// Encode a buffer as an 8-bit RGBA PNG.
///
/// PNG stores the top scanline first, so bottom-up buffers are flipped on the
/// way out.
pub fn encode_png(buffer: &PixelBuffer, order: RowOrder) -> ExportResult<Vec<u8>> {
    if buffer.width() == 0 || buffer.height() == 0 {
        return Err(ExportError::InvalidDimensions {
            width: buffer.width(),
            height: buffer.height(),
        });
    }

    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, buffer.width(), buffer.height());
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::encode(e.to_string()))?;

        let result = match order {
            RowOrder::TopDown => writer.write_image_data(buffer.as_bytes()),
            RowOrder::BottomUp => {
                let stride = buffer.width() as usize * 4;
                let flipped: Vec<u8> = buffer
                    .as_bytes()
                    .chunks_exact(stride)
                    .rev()
                    .flatten()
                    .copied()
                    .collect();
                writer.write_image_data(&flipped)
            }
        };
        result.map_err(|e| ExportError::encode(e.to_string()))?;
        writer.finish().map_err(|e| ExportError::encode(e.to_string()))?;
    }

    Ok(out)
}
