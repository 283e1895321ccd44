//! Layered document container.

use crate::layer::Layer;
use serde::{Deserialize, Serialize};

/// A decoded layered document: canvas size plus layers in storage order.
///
/// Index 0 is the bottom-most layer; group headers sit above their content.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Document name, used to derive asset names.
    pub name: String,
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
    /// Layers in document order.
    #[serde(default)]
    pub layers: Vec<Layer>,
}

impl Document {
    pub fn new(name: impl Into<String>, width: u32, height: u32) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            layers: Vec::new(),
        }
    }

    /// Append a layer, assigning it the next index.
    pub fn push_layer(&mut self, mut layer: Layer) -> usize {
        let index = self.layers.len();
        layer.index = index;
        self.layers.push(layer);
        index
    }

    /// Builder form of [`Document::push_layer`].
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.push_layer(layer);
        self
    }

    /// Rewrite every layer's index to match its position.
    ///
    /// Parsers that fill `layers` directly can call this once instead of
    /// tracking indices themselves.
    pub fn reindex(&mut self) {
        for (index, layer) in self.layers.iter_mut().enumerate() {
            layer.index = index;
        }
    }

    /// Get a layer by index.
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Get number of layers.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Check if the document has no layers.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::geometry::PixelRect;

    #[test]
    fn test_push_assigns_indices() {
        let doc = Document::new("scene", 64, 64)
            .with_layer(Layer::new("a", 99, PixelRect::ZERO))
            .with_layer(Layer::new("b", 99, PixelRect::ZERO));

        assert_eq!(doc.len(), 2);
        assert_eq!(doc.layer(0).unwrap().index, 0);
        assert_eq!(doc.layer(1).unwrap().index, 1);
        assert!(doc.layer(2).is_none());
    }

    #[test]
    fn test_reindex() {
        let mut doc = Document::new("scene", 8, 8);
        doc.layers.push(Layer::new("a", 5, PixelRect::ZERO));
        doc.layers.push(Layer::new("b", 5, PixelRect::ZERO));
        doc.reindex();

        let indices: Vec<_> = doc.layers().iter().map(|l| l.index).collect();
        assert_eq!(indices, vec![0, 1]);
    }
}
