//! Effective layer visibility.

use document::Layer;

/// One effective-visibility bit per layer index.
///
/// Built once per document, either from the reconstructed group tree or as a
/// flat fallback, and read-only afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VisibilityTable {
    visible: Vec<bool>,
}

impl VisibilityTable {
    pub(crate) fn from_bits(visible: Vec<bool>) -> Self {
        Self { visible }
    }

    /// Table that ignores groups entirely: each layer keeps its own flag.
    pub fn flat(layers: &[Layer]) -> Self {
        Self {
            visible: layers.iter().map(|layer| layer.visible).collect(),
        }
    }

    /// Effective visibility of a layer. Unknown indices are hidden.
    #[inline]
    pub fn is_visible(&self, index: usize) -> bool {
        self.visible.get(index).copied().unwrap_or(false)
    }

    /// Indices of all effectively visible layers, ascending.
    pub fn visible_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.visible
            .iter()
            .enumerate()
            .filter(|(_, visible)| **visible)
            .map(|(index, _)| index)
    }

    pub fn len(&self) -> usize {
        self.visible.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visible.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::geometry::PixelRect;

    #[test]
    fn test_flat_table() {
        let layers = vec![
            Layer::new("a", 0, PixelRect::ZERO),
            Layer::new("b", 1, PixelRect::ZERO).with_visible(false),
            Layer::new("c", 2, PixelRect::ZERO),
        ];
        let table = VisibilityTable::flat(&layers);

        assert_eq!(table.len(), 3);
        assert!(table.is_visible(0));
        assert!(!table.is_visible(1));
        assert!(!table.is_visible(3));
        assert_eq!(table.visible_indices().collect::<Vec<_>>(), vec![0, 2]);
    }
}
