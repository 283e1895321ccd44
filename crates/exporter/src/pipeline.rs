//! Export pipeline - coordinates group reconstruction, compositing and scaling.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use common::error::{ExportError, ExportResult};
use common::geometry::{PixelRect, Point};
use common::pixels::PixelBuffer;
use compositor::{composite, reconstruct, Composited, GroupTree};
use document::{Document, Layer};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::config::{ExportSettings, MalformedGroupPolicy};

/// Exports the visible layers of a document as pixel buffers.
pub struct Exporter {
    settings: ExportSettings,
}

impl Exporter {
    /// Create a new exporter.
    pub fn new(settings: ExportSettings) -> Self {
        Self { settings }
    }

    /// Create with default settings.
    pub fn with_defaults() -> Self {
        Self::new(ExportSettings::default())
    }

    pub fn settings(&self) -> &ExportSettings {
        &self.settings
    }

    /// Run the export.
    ///
    /// Groups are reconstructed first; every layer that is effectively
    /// visible and carries pixels is then composited and scaled. Failures of
    /// individual layers are collected in the report unless `fail_fast` is
    /// set.
    pub fn export(&self, document: &Document) -> ExportResult<ExportReport> {
        let start = Instant::now();
        let layers = document.layers();
        info!("Exporting '{}' ({} layers)", document.name, layers.len());

        let (groups, flattened) = self.build_groups(layers)?;

        let selected: Vec<usize> = (0..layers.len())
            .filter(|&index| groups.is_visible(index) && !layers[index].is_structural())
            .collect();
        debug!(
            "{} of {} layers selected for export",
            selected.len(),
            layers.len()
        );

        let render = |&index: &usize| (index, self.render_layer(&layers[index]));
        let outcomes: Vec<(usize, ExportResult<Composited>)> = if self.settings.parallel {
            selected.par_iter().map(render).collect()
        } else {
            selected.iter().map(render).collect()
        };

        let mut report = ExportReport {
            document: document.name.clone(),
            exported: Vec::new(),
            skipped: Vec::new(),
            failures: Vec::new(),
            flattened,
            groups,
            duration: Duration::ZERO,
        };
        let mut names = AssetNames::default();

        for (index, outcome) in outcomes {
            let layer = &layers[index];
            match outcome {
                Ok(Composited::Buffer(buffer)) => {
                    debug!(
                        "Layer {} '{}' exported at {}x{}",
                        index,
                        layer.name,
                        buffer.width(),
                        buffer.height()
                    );
                    let asset_name = names.claim(&document.name, &layer.name);
                    let group_path = report.groups.path(index).into_iter().map(String::from).collect();
                    report.exported.push(ExportedLayer {
                        index,
                        name: layer.name.clone(),
                        asset_name,
                        bounds: layer.bounds,
                        pivot: self.settings.pivot.vector(),
                        pixels_per_unit: self.settings.pixels_per_unit,
                        group_path,
                        buffer,
                    });
                }
                Ok(Composited::Skipped) => {
                    debug!("Layer {} '{}' is empty, skipping", index, layer.name);
                    report.skipped.push(index);
                }
                Err(error) if self.settings.fail_fast => return Err(error),
                Err(error) => {
                    warn!("Layer {} '{}' failed: {}", index, layer.name, error);
                    report.failures.push(LayerFailure {
                        index,
                        name: layer.name.clone(),
                        error,
                    });
                }
            }
        }

        report.duration = start.elapsed();
        info!(
            "Exported {} layers ({} empty, {} failed) in {:?}",
            report.exported.len(),
            report.skipped.len(),
            report.failures.len(),
            report.duration
        );
        Ok(report)
    }

    fn build_groups(&self, layers: &[Layer]) -> ExportResult<(GroupTree, bool)> {
        match reconstruct(layers) {
            Ok(groups) => {
                debug!("Reconstructed {} groups", groups.len());
                Ok((groups, false))
            }
            Err(error) => match self.settings.on_malformed_groups {
                MalformedGroupPolicy::Abort => Err(error),
                MalformedGroupPolicy::Flatten => {
                    warn!("{}; exporting without groups", error);
                    Ok((GroupTree::flat(layers), true))
                }
            },
        }
    }

    /// Composite one layer and apply the configured scale.
    fn render_layer(&self, layer: &Layer) -> ExportResult<Composited> {
        let buffer = match composite(layer)? {
            Composited::Buffer(buffer) => buffer,
            Composited::Skipped => return Ok(Composited::Skipped),
        };

        match self.settings.scale_by.apply(&buffer) {
            Ok(scaled) => Ok(Composited::Buffer(scaled)),
            Err(error @ ExportError::DegenerateSource { .. }) => {
                warn!("Layer '{}' kept at full size: {}", layer.name, error);
                Ok(Composited::Buffer(buffer))
            }
            Err(error) => Err(error),
        }
    }
}

impl Default for Exporter {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// One exported layer.
#[derive(Clone, Debug)]
pub struct ExportedLayer {
    /// Index of the source layer.
    pub index: usize,
    /// Source layer name.
    pub name: String,
    /// Unique asset name, `<document>_<layer>`.
    pub asset_name: String,
    /// Layer bounds in document pixels.
    pub bounds: PixelRect,
    /// Normalised pivot.
    pub pivot: Point,
    /// Pixels per world unit.
    pub pixels_per_unit: f32,
    /// Enclosing group names, outermost first.
    pub group_path: Vec<String>,
    /// Composited, scaled pixels, bottom row first.
    pub buffer: PixelBuffer,
}

/// A layer that could not be exported.
#[derive(Debug)]
pub struct LayerFailure {
    pub index: usize,
    pub name: String,
    pub error: ExportError,
}

/// Result of exporting a document.
#[derive(Debug)]
pub struct ExportReport {
    /// Document name.
    pub document: String,
    /// Exported layers, ascending layer index.
    pub exported: Vec<ExportedLayer>,
    /// Visible layers with no pixels.
    pub skipped: Vec<usize>,
    /// Layers that failed.
    pub failures: Vec<LayerFailure>,
    /// Whether the group structure was discarded as malformed.
    pub flattened: bool,
    /// Group structure used for visibility.
    pub groups: GroupTree,
    /// Time spent.
    pub duration: Duration,
}

impl ExportReport {
    /// Whether every selected layer was exported or skipped.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && !self.flattened
    }

    pub fn find(&self, index: usize) -> Option<&ExportedLayer> {
        self.exported.iter().find(|layer| layer.index == index)
    }
}

/// Hands out unique asset names for a document.
#[derive(Default)]
struct AssetNames {
    seen: HashMap<String, usize>,
}

impl AssetNames {
    fn claim(&mut self, document: &str, layer: &str) -> String {
        let base = format!("{}_{}", sanitize(document), sanitize(layer));
        let count = self.seen.entry(base.clone()).or_insert(0);
        *count += 1;
        if *count == 1 {
            base
        } else {
            format!("{}_{}", base, count)
        }
    }
}

/// Replace characters that are unsafe in file names.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();

    if cleaned.is_empty() {
        "layer".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::color::Color;
    use document::StructuralMarker;
    use media::ScaleBy;

    fn solid(name: &str, width: u32, height: u32, color: Color) -> Layer {
        let n = (width * height) as usize;
        Layer::new(name, 0, PixelRect::new(0, 0, width, height))
            .with_channel(0, vec![color.r; n])
            .with_channel(1, vec![color.g; n])
            .with_channel(2, vec![color.b; n])
            .with_channel(-1, vec![color.a; n])
    }

    fn header(name: &str, visible: bool) -> Layer {
        Layer::new(name, 0, PixelRect::ZERO)
            .with_visible(visible)
            .with_marker(StructuralMarker::GroupOpen)
    }

    fn divider() -> Layer {
        Layer::new("</Layer group>", 0, PixelRect::ZERO).with_marker(StructuralMarker::GroupDivider)
    }

    fn sample_document() -> Document {
        Document::new("scene", 64, 64)
            .with_layer(solid("Background", 8, 8, Color::rgb(10, 20, 30)))
            .with_layer(divider())
            .with_layer(solid("Hero", 4, 4, Color::rgba(200, 0, 0, 128)))
            .with_layer(Layer::new("Empty", 0, PixelRect::new(3, 3, 0, 0)))
            .with_layer(header("Characters", true))
            .with_layer(divider())
            .with_layer(solid("Ghost", 4, 4, Color::WHITE))
            .with_layer(header("Hidden", false))
            .with_layer(solid("Off", 2, 2, Color::BLACK).with_visible(false))
    }

    #[test]
    fn test_export_visible_layers() {
        let report = Exporter::with_defaults().export(&sample_document()).unwrap();

        let indices: Vec<_> = report.exported.iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![0, 2]);
        assert_eq!(report.skipped, vec![3]);
        assert!(report.failures.is_empty());
        assert!(report.is_clean());

        let hero = report.find(2).unwrap();
        assert_eq!(hero.asset_name, "scene_Hero");
        assert_eq!(hero.group_path, vec!["Characters".to_string()]);
        assert_eq!(hero.pivot, Point::new(0.5, 0.5));
        assert_eq!(hero.buffer.get_pixel(0, 0), Some(Color::rgba(200, 0, 0, 128)));
    }

    #[test]
    fn test_sequential_matches_parallel() {
        let doc = sample_document();
        let parallel = Exporter::with_defaults().export(&doc).unwrap();
        let sequential = Exporter::new(ExportSettings::new().with_parallel(false))
            .export(&doc)
            .unwrap();

        let buffers = |report: &ExportReport| -> Vec<PixelBuffer> {
            report.exported.iter().map(|l| l.buffer.clone()).collect()
        };
        assert_eq!(buffers(&parallel), buffers(&sequential));
    }

    #[test]
    fn test_scaled_export() {
        let settings = ExportSettings::new().with_scale(ScaleBy::X2);
        let report = Exporter::new(settings).export(&sample_document()).unwrap();

        let background = report.find(0).unwrap();
        assert_eq!((background.buffer.width(), background.buffer.height()), (4, 4));
        assert_eq!(background.buffer.get_pixel(3, 3), Some(Color::rgb(10, 20, 30)));
    }

    #[test]
    fn test_degenerate_scale_keeps_full_size() {
        let doc = Document::new("strip", 8, 1).with_layer(solid("Line", 8, 1, Color::WHITE));
        let settings = ExportSettings::new().with_scale(ScaleBy::X4);
        let report = Exporter::new(settings).export(&doc).unwrap();

        let line = report.find(0).unwrap();
        assert_eq!((line.buffer.width(), line.buffer.height()), (8, 1));
    }

    #[test]
    fn test_layer_failure_is_collected() {
        let broken = Layer::new("Broken", 0, PixelRect::new(0, 0, 2, 2)).with_channel(0, vec![0; 4]);
        let doc = Document::new("doc", 4, 4)
            .with_layer(solid("Fine", 2, 2, Color::WHITE))
            .with_layer(broken);

        let report = Exporter::with_defaults().export(&doc).unwrap();
        assert_eq!(report.exported.len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].index, 1);
        assert!(matches!(report.failures[0].error, ExportError::MissingChannel { .. }));
        assert!(!report.is_clean());

        let strict = Exporter::new(ExportSettings::strict()).export(&doc);
        assert!(matches!(strict, Err(ExportError::MissingChannel { .. })));
    }

    #[test]
    fn test_malformed_groups_policy() {
        let doc = Document::new("doc", 4, 4)
            .with_layer(solid("Fine", 2, 2, Color::WHITE))
            .with_layer(divider());

        let aborted = Exporter::with_defaults().export(&doc);
        assert!(matches!(aborted, Err(ExportError::MalformedGroupStructure { index: 1, .. })));

        let report = Exporter::new(ExportSettings::lenient()).export(&doc).unwrap();
        assert!(report.flattened);
        assert!(report.groups.is_empty());
        assert_eq!(report.exported.len(), 1);
    }

    #[test]
    fn test_duplicate_names_are_unique() {
        let doc = Document::new("ui/menu", 4, 4)
            .with_layer(solid("Button", 2, 2, Color::WHITE))
            .with_layer(solid("Button", 2, 2, Color::BLACK))
            .with_layer(solid("  ", 2, 2, Color::BLACK));

        let report = Exporter::with_defaults().export(&doc).unwrap();
        let names: Vec<_> = report.exported.iter().map(|l| l.asset_name.as_str()).collect();
        assert_eq!(names, vec!["ui_menu_Button", "ui_menu_Button_2", "ui_menu_layer"]);
    }

    #[test]
    fn test_sanitize() {
        assert_eq!(sanitize("a/b\\c:d"), "a_b_c_d");
        assert_eq!(sanitize(" Title "), "Title");
        assert_eq!(sanitize(""), "layer");
    }
}
