//! Channel compositing.
//!
//! Interleaves a layer's separate red, green, blue and optional alpha planes
//! into one RGBA buffer. Source planes are stored top row first; the output
//! uses the bottom-up raster convention, so rows are flipped vertically while
//! columns keep their position.

use common::error::{ExportError, ExportResult};
use common::pixels::PixelBuffer;
use document::{ChannelRole, Layer};

/// Result of compositing a single layer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Composited {
    /// The layer's pixels.
    Buffer(PixelBuffer),
    /// The layer has zero width or height and produces no pixels.
    Skipped,
}

impl Composited {
    pub fn into_buffer(self) -> Option<PixelBuffer> {
        match self {
            Composited::Buffer(buffer) => Some(buffer),
            Composited::Skipped => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        matches!(self, Composited::Skipped)
    }
}

/// Channel planes of one layer, resolved once before the pixel loop.
struct ResolvedChannels<'a> {
    red: &'a [u8],
    green: &'a [u8],
    blue: &'a [u8],
    alpha: Option<&'a [u8]>,
}

impl<'a> ResolvedChannels<'a> {
    fn resolve(layer: &'a Layer) -> ExportResult<Self> {
        let pixel_count = layer.bounds.area();

        let plane = |role: ChannelRole| -> ExportResult<Option<&'a [u8]>> {
            let Some(channel) = layer.channel(role) else {
                return Ok(None);
            };
            if channel.data.len() != pixel_count {
                return Err(ExportError::ChannelSizeMismatch {
                    layer: layer.name.clone(),
                    channel_id: channel.id,
                    expected: pixel_count,
                    actual: channel.data.len(),
                });
            }
            Ok(Some(channel.data.as_slice()))
        };

        let required = |role: ChannelRole| -> ExportResult<&'a [u8]> {
            plane(role)?.ok_or_else(|| ExportError::missing_channel(layer.name.clone(), role.as_str()))
        };

        Ok(Self {
            red: required(ChannelRole::Red)?,
            green: required(ChannelRole::Green)?,
            blue: required(ChannelRole::Blue)?,
            alpha: plane(ChannelRole::Alpha)?,
        })
    }
}

/// Composite a layer's channels into an RGBA buffer.
///
/// Zero-area layers yield [`Composited::Skipped`]. A missing red, green or
/// blue plane is a [`ExportError::MissingChannel`]; when several planes share
/// a role the first one in channel order is used. Without an alpha plane every
/// pixel is opaque.
pub fn composite(layer: &Layer) -> ExportResult<Composited> {
    if layer.bounds.is_empty() {
        return Ok(Composited::Skipped);
    }

    let channels = ResolvedChannels::resolve(layer)?;
    let width = layer.width() as usize;
    let mut buffer = PixelBuffer::new(layer.width(), layer.height());

    // Source row 0 lands in the last destination row.
    let rows = buffer.as_bytes_mut().chunks_exact_mut(width * 4).rev();
    for (row, dst_row) in rows.enumerate() {
        let src_start = row * width;
        for (col, px) in dst_row.chunks_exact_mut(4).enumerate() {
            let i = src_start + col;
            px[0] = channels.red[i];
            px[1] = channels.green[i];
            px[2] = channels.blue[i];
            px[3] = channels.alpha.map_or(u8::MAX, |alpha| alpha[i]);
        }
    }

    Ok(Composited::Buffer(buffer))
}
