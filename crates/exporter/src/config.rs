//! Export configuration.

use common::error::{ExportError, ExportResult};
use common::geometry::Point;
use media::ScaleBy;
use serde::{Deserialize, Serialize};

/// Export settings.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    /// Downscale factor for exported assets.
    pub scale_by: ScaleBy,
    /// Pivot recorded for every exported asset.
    pub pivot: PivotPos,
    /// Pixels per world unit recorded for every exported asset.
    pub pixels_per_unit: f32,
    /// What to do when the group markers do not match up.
    pub on_malformed_groups: MalformedGroupPolicy,
    /// Abort the whole export on the first failing layer.
    pub fail_fast: bool,
    /// Composite layers on the rayon thread pool.
    pub parallel: bool,
}

impl ExportSettings {
    /// Create settings with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Settings that refuse any malformed input.
    pub fn strict() -> Self {
        Self {
            on_malformed_groups: MalformedGroupPolicy::Abort,
            fail_fast: true,
            ..Self::default()
        }
    }

    /// Settings that export as much as possible from a damaged document.
    pub fn lenient() -> Self {
        Self {
            on_malformed_groups: MalformedGroupPolicy::Flatten,
            fail_fast: false,
            ..Self::default()
        }
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> ExportResult<Self> {
        serde_json::from_str(json).map_err(|e| ExportError::manifest(format!("settings: {e}")))
    }

    /// Set the downscale factor.
    pub fn with_scale(mut self, scale_by: ScaleBy) -> Self {
        self.scale_by = scale_by;
        self
    }

    /// Set the pivot.
    pub fn with_pivot(mut self, pivot: PivotPos) -> Self {
        self.pivot = pivot;
        self
    }

    /// Set pixels per unit.
    pub fn with_pixels_per_unit(mut self, pixels_per_unit: f32) -> Self {
        self.pixels_per_unit = pixels_per_unit;
        self
    }

    /// Set the malformed group policy.
    pub fn with_malformed_groups(mut self, policy: MalformedGroupPolicy) -> Self {
        self.on_malformed_groups = policy;
        self
    }

    /// Set fail-fast mode.
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// Set parallel compositing.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            scale_by: ScaleBy::X1,
            pivot: PivotPos::Center,
            pixels_per_unit: 100.0,
            on_malformed_groups: MalformedGroupPolicy::Abort,
            fail_fast: false,
            parallel: true,
        }
    }
}

/// Handling of unmatched group markers.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MalformedGroupPolicy {
    /// Fail the export.
    #[default]
    Abort,
    /// Ignore groups and use each layer's own visibility.
    Flatten,
}

/// Sprite pivot position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum PivotPos {
    #[default]
    Center,
    TopLeft,
    Top,
    TopRight,
    Left,
    Right,
    BottomLeft,
    Bottom,
    BottomRight,
    /// Explicit normalised pivot.
    Custom { x: f32, y: f32 },
}

impl PivotPos {
    /// Normalised pivot, `(0, 0)` bottom-left and `(1, 1)` top-right.
    pub fn vector(&self) -> Point {
        let (x, y) = match *self {
            PivotPos::Custom { x, y } => return Point::new(x, y),
            PivotPos::Center => (0.5, 0.5),
            PivotPos::TopLeft => (0.0, 1.0),
            PivotPos::Top => (0.5, 1.0),
            PivotPos::TopRight => (1.0, 1.0),
            PivotPos::Left => (0.0, 0.5),
            PivotPos::Right => (1.0, 0.5),
            PivotPos::BottomLeft => (0.0, 0.0),
            PivotPos::Bottom => (0.5, 0.0),
            PivotPos::BottomRight => (1.0, 0.0),
        };
        Point::new(x, y)
    }

    /// Parse a named pivot such as `top-left` or `BottomRight`.
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_lowercase();

        match normalized.as_str() {
            "center" | "centre" => Some(PivotPos::Center),
            "topleft" => Some(PivotPos::TopLeft),
            "top" => Some(PivotPos::Top),
            "topright" => Some(PivotPos::TopRight),
            "left" => Some(PivotPos::Left),
            "right" => Some(PivotPos::Right),
            "bottomleft" => Some(PivotPos::BottomLeft),
            "bottom" => Some(PivotPos::Bottom),
            "bottomright" => Some(PivotPos::BottomRight),
            _ => None,
        }
    }
}
