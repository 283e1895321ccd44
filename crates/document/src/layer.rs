//! Layers, channels and group markers.

use common::geometry::PixelRect;
use serde::{Deserialize, Serialize};

/// What a channel contributes to the final pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChannelRole {
    Red,
    Green,
    Blue,
    Alpha,
}

impl ChannelRole {
    /// Classify a raw channel id. Ids other than 0, 1 and 2 are treated as alpha.
    pub fn from_id(id: i16) -> Self {
        match id {
            0 => ChannelRole::Red,
            1 => ChannelRole::Green,
            2 => ChannelRole::Blue,
            _ => ChannelRole::Alpha,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelRole::Red => "red",
            ChannelRole::Green => "green",
            ChannelRole::Blue => "blue",
            ChannelRole::Alpha => "alpha",
        }
    }
}

/// One 8-bit plane of a layer, row-major with row 0 at the top.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// Raw role id.
    pub id: i16,
    /// One byte per pixel.
    pub data: Vec<u8>,
}

impl Channel {
    pub fn new(id: i16, data: Vec<u8>) -> Self {
        Self { id, data }
    }

    #[inline]
    pub fn role(&self) -> ChannelRole {
        ChannelRole::from_id(self.id)
    }
}

/// Group boundary annotation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructuralMarker {
    /// Group header, folder expanded.
    GroupOpen,
    /// Group header, folder collapsed.
    GroupClosed,
    /// Opposite boundary of a group's index span.
    GroupDivider,
}

/// A single layer of the document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layer {
    /// Display name.
    pub name: String,
    /// Position in document order.
    #[serde(default)]
    pub index: usize,
    /// Bounding rectangle in document pixels.
    pub bounds: PixelRect,
    /// The layer's own visibility flag, ignoring enclosing groups.
    #[serde(default = "default_visible")]
    pub visible: bool,
    /// Channel planes, in document order.
    #[serde(default)]
    pub channels: Vec<Channel>,
    /// Group markers attached to this layer.
    #[serde(default)]
    pub markers: Vec<StructuralMarker>,
}

fn default_visible() -> bool {
    true
}

impl Layer {
    pub fn new(name: impl Into<String>, index: usize, bounds: PixelRect) -> Self {
        Self {
            name: name.into(),
            index,
            bounds,
            visible: true,
            channels: Vec::new(),
            markers: Vec::new(),
        }
    }

    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    pub fn with_channel(mut self, id: i16, data: Vec<u8>) -> Self {
        self.channels.push(Channel::new(id, data));
        self
    }

    pub fn with_marker(mut self, marker: StructuralMarker) -> Self {
        self.markers.push(marker);
        self
    }

    /// The marker that classifies this layer. The first marker wins.
    #[inline]
    pub fn marker(&self) -> Option<StructuralMarker> {
        self.markers.first().copied()
    }

    /// Whether this layer is a group header or divider rather than content.
    #[inline]
    pub fn is_structural(&self) -> bool {
        self.marker().is_some()
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.bounds.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.bounds.height
    }

    /// First channel with the given role.
    pub fn channel(&self, role: ChannelRole) -> Option<&Channel> {
        self.channels.iter().find(|c| c.role() == role)
    }
}
