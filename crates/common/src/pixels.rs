//! RGBA8 pixel buffers.

use crate::color::Color;
use crate::error::{ExportError, ExportResult};

/// A tightly packed RGBA8 pixel buffer, row 0 first.
#[derive(Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Create a transparent buffer.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; Self::byte_len(width, height)],
        }
    }

    /// Wrap existing RGBA bytes. The length must be `width * height * 4`.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> ExportResult<Self> {
        if data.len() != Self::byte_len(width, height) {
            return Err(ExportError::InvalidDimensions { width, height });
        }
        Ok(Self { width, height, data })
    }

    /// Create a buffer filled with one color.
    pub fn filled(width: u32, height: u32, color: Color) -> Self {
        let mut buffer = Self::new(width, height);
        buffer.fill(color);
        buffer
    }

    #[inline]
    fn byte_len(width: u32, height: u32) -> usize {
        width as usize * height as usize * 4
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Fill with a color.
    pub fn fill(&mut self, color: Color) {
        for chunk in self.data.chunks_exact_mut(4) {
            chunk.copy_from_slice(&color.to_bytes());
        }
    }

    /// Get pixel at position.
    pub fn get_pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width || y >= self.height {
            return None;
        }

        let offset = self.offset(x, y);
        let mut bytes = [0; 4];
        bytes.copy_from_slice(&self.data[offset..offset + 4]);
        Some(Color::from_bytes(bytes))
    }

    /// Set pixel at position. Out-of-range writes are ignored.
    pub fn set_pixel(&mut self, x: u32, y: u32, color: Color) {
        if x >= self.width || y >= self.height {
            return;
        }

        let offset = self.offset(x, y);
        self.data[offset..offset + 4].copy_from_slice(&color.to_bytes());
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.width as usize + x as usize) * 4
    }

    /// Get as raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Get mutable bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }
}

impl std::fmt::Debug for PixelBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PixelBuffer")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.data.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_buffer_is_transparent() {
        let buffer = PixelBuffer::new(3, 2);
        assert_eq!(buffer.as_bytes().len(), 24);
        assert_eq!(buffer.get_pixel(2, 1), Some(Color::TRANSPARENT));
        assert_eq!(buffer.get_pixel(3, 0), None);
    }

    #[test]
    fn test_set_and_get_pixel() {
        let mut buffer = PixelBuffer::new(4, 4);
        buffer.set_pixel(1, 2, Color::rgba(1, 2, 3, 4));
        buffer.set_pixel(9, 9, Color::WHITE);

        assert_eq!(buffer.get_pixel(1, 2), Some(Color::rgba(1, 2, 3, 4)));
        assert_eq!(&buffer.as_bytes()[(2 * 4 + 1) * 4..][..4], &[1, 2, 3, 4]);
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(PixelBuffer::from_raw(2, 2, vec![0; 16]).is_ok());
        assert!(matches!(
            PixelBuffer::from_raw(2, 2, vec![0; 15]),
            Err(ExportError::InvalidDimensions { width: 2, height: 2 })
        ));
    }

    #[test]
    fn test_filled() {
        let buffer = PixelBuffer::filled(2, 3, Color::rgb(9, 8, 7));
        assert!(buffer.as_bytes().chunks_exact(4).all(|px| px == [9, 8, 7, 255]));
    }
}
