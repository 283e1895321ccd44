//! Layer export - turns a decoded layered document into sprite assets.
//!
//! This crate ties the export stages together:
//! - group reconstruction and visibility
//! - channel compositing
//! - optional downscaling
//! - PNG assets and a JSON sidecar

pub mod config;
pub mod manifest;
pub mod outline;
pub mod pipeline;

pub use config::{ExportSettings, MalformedGroupPolicy, PivotPos};
pub use manifest::{load_document, read_document, write_assets, AssetManifest};
pub use outline::outline;
pub use pipeline::{ExportReport, ExportedLayer, Exporter, LayerFailure};

/// Exporter version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
