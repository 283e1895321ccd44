//! Common types shared by the layer export crates.

pub mod color;
pub mod error;
pub mod geometry;
pub mod pixels;

pub use color::Color;
pub use error::{ExportError, ExportResult, GroupFault};
pub use geometry::{PixelRect, Point};
pub use pixels::PixelBuffer;
