//! JSON document manifests and export sidecars.
//!
//! The input manifest is a serialized [`Document`] with channel bytes already
//! decoded. The output sidecar lists every written asset with its placement
//! metadata so a scene builder can pick them up.

use std::fs;
use std::path::{Path, PathBuf};

use common::error::{ExportError, ExportResult};
use common::geometry::{PixelRect, Point};
use document::Document;
use media::{encode_png, RowOrder, ScaleBy};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::ExportSettings;
use crate::pipeline::ExportReport;

/// Parse a document manifest. Layer indices are rewritten to match order.
pub fn read_document(json: &str) -> ExportResult<Document> {
    let mut document: Document =
        serde_json::from_str(json).map_err(|e| ExportError::manifest(e.to_string()))?;
    document.reindex();
    Ok(document)
}

/// Load a document manifest from disk.
pub fn load_document(path: &Path) -> ExportResult<Document> {
    let json = fs::read_to_string(path)?;
    read_document(&json)
}

/// Sidecar describing an export run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetManifest {
    pub document: String,
    pub scale_by: ScaleBy,
    pub pixels_per_unit: f32,
    pub assets: Vec<AssetEntry>,
    pub groups: Vec<GroupEntry>,
    pub failures: Vec<FailureEntry>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AssetEntry {
    pub name: String,
    pub file: String,
    pub layer_index: usize,
    pub layer_name: String,
    pub bounds: PixelRect,
    pub pivot: Point,
    /// Pivot position in document pixels.
    pub anchor: Point,
    pub width: u32,
    pub height: u32,
    pub groups: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub name: String,
    pub start: usize,
    pub end: usize,
    pub visible: bool,
    pub opened: bool,
    pub parent: Option<usize>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub layer_index: usize,
    pub layer_name: String,
    pub error: String,
}

impl AssetManifest {
    /// Describe a report. Asset files are named `<asset name>.png`.
    pub fn from_report(report: &ExportReport, settings: &ExportSettings) -> Self {
        let assets = report
            .exported
            .iter()
            .map(|layer| AssetEntry {
                name: layer.asset_name.clone(),
                file: format!("{}.png", layer.asset_name),
                layer_index: layer.index,
                layer_name: layer.name.clone(),
                bounds: layer.bounds,
                pivot: layer.pivot,
                anchor: layer.bounds.anchor(layer.pivot),
                width: layer.buffer.width(),
                height: layer.buffer.height(),
                groups: layer.group_path.clone(),
            })
            .collect();

        let groups = report
            .groups
            .iter()
            .map(|(_, node)| GroupEntry {
                name: node.interval.name.clone(),
                start: node.interval.start,
                end: node.interval.end,
                visible: node.interval.visible,
                opened: node.interval.opened,
                parent: node.parent.map(|id| id.index()),
            })
            .collect();

        let failures = report
            .failures
            .iter()
            .map(|failure| FailureEntry {
                layer_index: failure.index,
                layer_name: failure.name.clone(),
                error: failure.error.to_string(),
            })
            .collect();

        Self {
            document: report.document.clone(),
            scale_by: settings.scale_by,
            pixels_per_unit: settings.pixels_per_unit,
            assets,
            groups,
            failures,
        }
    }

    pub fn to_json(&self) -> ExportResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ExportError::manifest(e.to_string()))
    }
}

/// Write every exported layer as PNG plus a `<document>.export.json` sidecar.
///
/// Returns the paths written, sidecar last.
pub fn write_assets(
    report: &ExportReport,
    settings: &ExportSettings,
    out_dir: &Path,
) -> ExportResult<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)?;
    let manifest = AssetManifest::from_report(report, settings);
    let mut written = Vec::with_capacity(manifest.assets.len() + 1);

    for (layer, entry) in report.exported.iter().zip(&manifest.assets) {
        let path = out_dir.join(&entry.file);
        let png = encode_png(&layer.buffer, RowOrder::BottomUp)?;
        fs::write(&path, png)?;
        debug!("Wrote {}", path.display());
        written.push(path);
    }

    let stem = manifest.document.replace(['/', '\\'], "_");
    let sidecar = out_dir.join(format!("{stem}.export.json"));
    fs::write(&sidecar, manifest.to_json()?)?;
    info!("Wrote {} assets to {}", manifest.assets.len(), out_dir.display());
    written.push(sidecar);

    Ok(written)
}
