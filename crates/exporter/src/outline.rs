//! Indented text listing of a document's layers.

use std::fmt::Write;

use compositor::GroupTree;
use document::{Document, StructuralMarker};

/// Render the layer list top to bottom, indented by group depth.
///
/// Group headers are listed at their parent's depth with their content one
/// level deeper. Divider layers are omitted. Layers hidden by themselves or
/// by an enclosing group are tagged `(hidden)`.
pub fn outline(document: &Document, groups: &GroupTree) -> String {
    let mut out = String::new();

    for (index, layer) in document.layers().iter().enumerate().rev() {
        let depth = groups.depth(index);
        let (depth, label) = match layer.marker() {
            Some(StructuralMarker::GroupDivider) => continue,
            Some(StructuralMarker::GroupOpen) => (depth.saturating_sub(1), "[+] "),
            Some(StructuralMarker::GroupClosed) => (depth.saturating_sub(1), "[-] "),
            None => (depth, ""),
        };

        let _ = write!(out, "{}{}{}", "  ".repeat(depth), label, layer.name);
        if !groups.is_visible(index) {
            out.push_str(" (hidden)");
        }
        out.push('\n');
    }

    out
}
