//! Color representation and manipulation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// RGBA color with 8-bit components.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);

    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; 4]) -> Self {
        Self::rgba(bytes[0], bytes[1], bytes[2], bytes[3])
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Components as unnormalised floats in `0.0..=255.0`.
    #[inline]
    pub fn to_f32_array(&self) -> [f32; 4] {
        [self.r as f32, self.g as f32, self.b as f32, self.a as f32]
    }

    /// Inverse of [`Color::to_f32_array`]; rounds to nearest and saturates.
    pub fn from_f32_array(values: [f32; 4]) -> Self {
        let quantize = |v: f32| v.round().clamp(0.0, 255.0) as u8;
        Self::rgba(
            quantize(values[0]),
            quantize(values[1]),
            quantize(values[2]),
            quantize(values[3]),
        )
    }
}

/// Linear interpolation between two float colors without clamping `t`.
#[inline]
pub fn lerp_unclamped(from: [f32; 4], to: [f32; 4], t: f32) -> [f32; 4] {
    [
        from[0] + (to[0] - from[0]) * t,
        from[1] + (to[1] - from[1]) * t,
        from[2] + (to[2] - from[2]) * t,
        from[3] + (to[3] - from[3]) * t,
    ]
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 255 {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_float_conversion() {
        let color = Color::rgba(10, 128, 255, 0);
        assert_eq!(Color::from_f32_array(color.to_f32_array()), color);
        assert_eq!(Color::from_f32_array([-4.0, 300.0, 127.5, 0.49]), Color::rgba(0, 255, 128, 0));
    }

    #[test]
    fn test_lerp_unclamped() {
        let from = Color::BLACK.to_f32_array();
        let to = Color::WHITE.to_f32_array();
        assert_eq!(lerp_unclamped(from, to, 0.5), [127.5, 127.5, 127.5, 255.0]);
        assert_eq!(lerp_unclamped(from, to, 2.0)[0], 510.0);
    }

    #[test]
    fn test_debug_format() {
        assert_eq!(format!("{:?}", Color::rgb(255, 0, 16)), "#ff0010");
        assert_eq!(format!("{}", Color::rgba(0, 0, 0, 128)), "#00000080");
    }
}
