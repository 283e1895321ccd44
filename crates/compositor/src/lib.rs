//! Layer compositing for exported documents.
//!
//! - channel compositing: per-layer RGBA buffers from separate 8-bit planes
//! - group reconstruction: nested groups recovered from a flat marker stream
//! - visibility: effective per-layer visibility inherited through groups

pub mod channels;
pub mod groups;
pub mod visibility;

pub use channels::{composite, Composited};
pub use groups::{reconstruct, GroupId, GroupInterval, GroupNode, GroupTree};
pub use visibility::VisibilityTable;
