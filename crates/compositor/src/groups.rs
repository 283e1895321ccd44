//! Layer group reconstruction.
//!
//! Documents store groups as a flat list: a header layer sits above the
//! group's content and a divider layer below it. Walking the list from the top
//! (highest index) down, every header is met before its divider, so a stack of
//! open groups is enough to match them up and recover the nesting.

use crate::visibility::VisibilityTable;
use common::error::{ExportError, ExportResult, GroupFault};
use document::{Layer, StructuralMarker};
use smallvec::SmallVec;

/// Identifier of a group inside a [`GroupTree`].
///
/// Ids follow header order: the group whose header has the highest layer
/// index is `0`. A parent always has a lower id than its children.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GroupId(usize);

impl GroupId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Inclusive span of layer indices covered by a group.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupInterval {
    /// Name of the header layer.
    pub name: String,
    /// Index of the divider layer.
    pub start: usize,
    /// Index of the header layer.
    pub end: usize,
    /// The group's own visibility flag.
    pub visible: bool,
    /// Whether the folder is expanded. Has no effect on export.
    pub opened: bool,
}

impl GroupInterval {
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.start <= index && index <= self.end
    }

    #[inline]
    pub fn span(&self) -> usize {
        self.end - self.start
    }

    /// Whether two intervals overlap without one containing the other.
    pub fn partially_overlaps(&self, other: &GroupInterval) -> bool {
        let disjoint = self.end < other.start || other.end < self.start;
        let nested = (self.start <= other.start && other.end <= self.end)
            || (other.start <= self.start && self.end <= other.end);
        !disjoint && !nested
    }
}

/// A group with its position in the forest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GroupNode {
    pub interval: GroupInterval,
    pub parent: Option<GroupId>,
    /// Direct subgroups, topmost header first.
    pub children: SmallVec<[GroupId; 4]>,
}

/// Reconstructed group forest plus per-layer effective visibility.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GroupTree {
    groups: Vec<GroupNode>,
    innermost: Vec<Option<GroupId>>,
    visibility: VisibilityTable,
}

/// Rebuild the group forest from a document's layers.
///
/// Layers are visited from the highest index down to 0. A header pushes a
/// new open group whose `end` is the header's index; a divider pops the
/// innermost open group and sets its `start`. A divider with nothing to close,
/// or a header left open at the end, is a
/// [`ExportError::MalformedGroupStructure`].
pub fn reconstruct(layers: &[Layer]) -> ExportResult<GroupTree> {
    let mut groups: Vec<GroupNode> = Vec::new();
    let mut innermost = vec![None; layers.len()];
    let mut open: Vec<GroupId> = Vec::new();

    for (index, layer) in layers.iter().enumerate().rev() {
        match layer.marker() {
            Some(marker @ (StructuralMarker::GroupOpen | StructuralMarker::GroupClosed)) => {
                let id = GroupId(groups.len());
                let parent = open.last().copied();
                groups.push(GroupNode {
                    interval: GroupInterval {
                        name: layer.name.clone(),
                        start: index,
                        end: index,
                        visible: layer.visible,
                        opened: marker == StructuralMarker::GroupOpen,
                    },
                    parent,
                    children: SmallVec::new(),
                });
                if let Some(parent) = parent {
                    groups[parent.0].children.push(id);
                }
                open.push(id);
                innermost[index] = Some(id);
            }
            Some(StructuralMarker::GroupDivider) => {
                let id = open
                    .pop()
                    .ok_or_else(|| ExportError::malformed(index, GroupFault::UnmatchedDivider))?;
                groups[id.0].interval.start = index;
                innermost[index] = Some(id);
            }
            None => innermost[index] = open.last().copied(),
        }
    }

    if let Some(&id) = open.last() {
        return Err(ExportError::malformed(
            groups[id.0].interval.end,
            GroupFault::UnmatchedHeader,
        ));
    }

    // Parents precede children, so one forward pass settles inherited flags.
    let mut group_visible = Vec::with_capacity(groups.len());
    for node in &groups {
        let inherited = node.parent.map_or(true, |parent| group_visible[parent.0]);
        group_visible.push(inherited && node.interval.visible);
    }

    let visibility = layers
        .iter()
        .zip(&innermost)
        .map(|(layer, group)| layer.visible && group.map_or(true, |g| group_visible[g.0]))
        .collect();

    let tree = GroupTree {
        groups,
        innermost,
        visibility: VisibilityTable::from_bits(visibility),
    };
    debug_assert!(tree.validate_laminar().is_ok());
    Ok(tree)
}

impl GroupTree {
    /// A tree without groups whose visibility is each layer's own flag.
    ///
    /// Callers use this when [`reconstruct`] rejects the marker stream and
    /// they prefer exporting the document as if it were ungrouped.
    pub fn flat(layers: &[Layer]) -> Self {
        Self {
            groups: Vec::new(),
            innermost: vec![None; layers.len()],
            visibility: VisibilityTable::flat(layers),
        }
    }

    pub fn visibility(&self) -> &VisibilityTable {
        &self.visibility
    }

    /// Effective visibility of a layer.
    #[inline]
    pub fn is_visible(&self, index: usize) -> bool {
        self.visibility.is_visible(index)
    }

    pub fn get(&self, id: GroupId) -> Option<&GroupNode> {
        self.groups.get(id.0)
    }

    pub fn interval(&self, id: GroupId) -> Option<&GroupInterval> {
        self.get(id).map(|node| &node.interval)
    }

    /// All groups in header order.
    pub fn iter(&self) -> impl Iterator<Item = (GroupId, &GroupNode)> {
        self.groups.iter().enumerate().map(|(i, node)| (GroupId(i), node))
    }

    /// All intervals in header order.
    pub fn intervals(&self) -> impl Iterator<Item = &GroupInterval> {
        self.groups.iter().map(|node| &node.interval)
    }

    /// Top-level groups, topmost header first.
    pub fn roots(&self) -> impl Iterator<Item = GroupId> + '_ {
        self.iter().filter(|(_, node)| node.parent.is_none()).map(|(id, _)| id)
    }

    pub fn parent(&self, id: GroupId) -> Option<GroupId> {
        self.get(id).and_then(|node| node.parent)
    }

    pub fn children(&self, id: GroupId) -> &[GroupId] {
        self.get(id).map(|node| node.children.as_slice()).unwrap_or(&[])
    }

    /// Id of the smallest group containing `index`.
    ///
    /// A group's header and divider layers count as inside the group. In a
    /// laminar family the smallest containing interval is unique; should two
    /// candidates ever share the minimal span the one with the lower id wins.
    pub fn innermost_group_id(&self, index: usize) -> Option<GroupId> {
        self.innermost.get(index).copied().flatten()
    }

    /// The smallest group interval containing `index`, if any.
    pub fn innermost_group(&self, index: usize) -> Option<&GroupInterval> {
        self.innermost_group_id(index).and_then(|id| self.interval(id))
    }

    /// The group whose header is the layer at `index`.
    pub fn group_by_header(&self, index: usize) -> Option<GroupId> {
        self.innermost_group_id(index)
            .filter(|id| self.groups[id.0].interval.end == index)
    }

    /// Groups containing `index`, innermost first.
    pub fn enclosing_groups(&self, index: usize) -> impl Iterator<Item = GroupId> + '_ {
        std::iter::successors(self.innermost_group_id(index), move |id| self.parent(*id))
    }

    /// Nesting depth of a layer: the number of groups containing it.
    pub fn depth(&self, index: usize) -> usize {
        self.enclosing_groups(index).count()
    }

    /// Names of the groups containing `index`, outermost first.
    pub fn path(&self, index: usize) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .enclosing_groups(index)
            .map(|id| self.groups[id.0].interval.name.as_str())
            .collect();
        names.reverse();
        names
    }

    /// Check that no two intervals partially overlap and that every covered
    /// index has a unique smallest containing group.
    pub fn validate_laminar(&self) -> ExportResult<()> {
        for (i, a) in self.groups.iter().enumerate() {
            for b in &self.groups[i + 1..] {
                let (a, b) = (&a.interval, &b.interval);
                if a.partially_overlaps(b) {
                    return Err(ExportError::malformed(
                        a.start.max(b.start),
                        GroupFault::AmbiguousNesting,
                    ));
                }
                if a.start == b.start && a.end == b.end {
                    return Err(ExportError::malformed(a.start, GroupFault::AmbiguousNesting));
                }
            }
        }
        Ok(())
    }

    /// Number of groups.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}
