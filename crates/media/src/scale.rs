//! Reduced-resolution export variants.

use crate::resample::resample;
use common::error::ExportResult;
use common::pixels::PixelBuffer;
use serde::{Deserialize, Serialize};

/// Downscale factor applied to exported layers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScaleBy {
    /// Full resolution.
    #[default]
    X1,
    /// Half width and height.
    X2,
    /// Quarter width and height.
    X4,
}

impl ScaleBy {
    pub fn divisor(&self) -> u32 {
        match self {
            ScaleBy::X1 => 1,
            ScaleBy::X2 => 2,
            ScaleBy::X4 => 4,
        }
    }

    pub fn from_divisor(divisor: u32) -> Option<Self> {
        match divisor {
            1 => Some(ScaleBy::X1),
            2 => Some(ScaleBy::X2),
            4 => Some(ScaleBy::X4),
            _ => None,
        }
    }

    /// Size of the scaled variant; never smaller than one pixel.
    pub fn target_size(&self, width: u32, height: u32) -> (u32, u32) {
        let divisor = self.divisor();
        ((width / divisor).max(1), (height / divisor).max(1))
    }

    /// Produce the scaled variant of `buffer`.
    ///
    /// `X1`, and any factor that leaves the size unchanged, returns a copy.
    pub fn apply(&self, buffer: &PixelBuffer) -> ExportResult<PixelBuffer> {
        let (width, height) = self.target_size(buffer.width(), buffer.height());
        resample(buffer, width, height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::color::Color;
    use common::error::ExportError;

    #[test]
    fn test_divisors() {
        for scale in [ScaleBy::X1, ScaleBy::X2, ScaleBy::X4] {
            assert_eq!(ScaleBy::from_divisor(scale.divisor()), Some(scale));
        }
        assert_eq!(ScaleBy::from_divisor(3), None);
    }

    #[test]
    fn test_target_size() {
        assert_eq!(ScaleBy::X1.target_size(33, 17), (33, 17));
        assert_eq!(ScaleBy::X2.target_size(33, 17), (16, 8));
        assert_eq!(ScaleBy::X4.target_size(33, 17), (8, 4));
        assert_eq!(ScaleBy::X4.target_size(3, 2), (1, 1));
    }

    #[test]
    fn test_apply() {
        let buffer = PixelBuffer::filled(8, 4, Color::rgb(1, 2, 3));

        let same = ScaleBy::X1.apply(&buffer).unwrap();
        assert_eq!(same, buffer);

        let half = ScaleBy::X2.apply(&buffer).unwrap();
        assert_eq!((half.width(), half.height()), (4, 2));
        assert_eq!(half.get_pixel(3, 1), Some(Color::rgb(1, 2, 3)));
    }

    #[test]
    fn test_apply_to_single_row() {
        let buffer = PixelBuffer::filled(8, 1, Color::WHITE);
        assert!(matches!(ScaleBy::X2.apply(&buffer), Err(ExportError::DegenerateSource { .. })));
    }
}
