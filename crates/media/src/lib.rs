//! Pixel buffer processing for exported layers.
//!
//! This crate handles:
//! - bilinear resampling
//! - reduced-resolution variants (`ScaleBy`)
//! - PNG encoding to memory

pub mod encode;
pub mod resample;
pub mod scale;

pub use encode::{encode_png, RowOrder};
pub use resample::resample;
pub use scale::ScaleBy;
