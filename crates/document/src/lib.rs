//! Decoded layered-document model.
//!
//! These records are produced by an upstream document parser and consumed
//! read-only by the compositor: a flat, ordered list of layers, each carrying
//! one byte per pixel per channel and optional group markers.

pub mod document;
pub mod layer;

pub use document::Document;
pub use layer::{Channel, ChannelRole, Layer, StructuralMarker};
