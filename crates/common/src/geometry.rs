//! Geometric primitives.

use serde::{Deserialize, Serialize};

/// A 2D point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn lerp(&self, other: Point, t: f32) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Integer rectangle in document pixel space.
///
/// `x`/`y` may be negative (layers can hang off the canvas); a zero width or
/// height is a valid, empty rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub const ZERO: PixelRect = PixelRect { x: 0, y: 0, width: 0, height: 0 };

    #[inline]
    pub const fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Number of pixels covered.
    #[inline]
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    #[inline]
    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }

    /// Point inside the rectangle at normalised `(u, v)`, with `v` measured
    /// from the bottom edge upwards.
    pub fn anchor(&self, normalized: Point) -> Point {
        let bottom_left = Point::new(self.x as f32, self.bottom() as f32);
        let top_right = Point::new(self.right() as f32, self.y as f32);
        Point::new(
            bottom_left.lerp(top_right, normalized.x).x,
            bottom_left.lerp(top_right, normalized.y).y,
        )
    }
}
