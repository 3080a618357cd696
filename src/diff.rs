//! Reconciliation between computed geometry and rendered nodes
//!
//! Every diff matches fresh geometry to existing nodes by a stable identity
//! key, mutates matched nodes in place when any positional or presentation
//! field moved, and hands unmatched geometry back for the caller to
//! instantiate. Nodes left without matching geometry are orphans; the
//! caller removes them before the next cycle.

use crate::layout::{Glyph, LabelBox, PathSegment};
use crate::renderer::{DrawableHandle, GlyphNode, LabelNode, PathNode};

/// Outcome of one reconciliation pass.
#[derive(Debug)]
pub struct DiffResult<T> {
    /// Indices of nodes that were mutated in place
    pub updated: Vec<usize>,
    /// Geometry with no existing node; the caller creates these
    pub created: Vec<T>,
}

impl<T> DiffResult<T> {
    fn new() -> Self {
        Self {
            updated: Vec::new(),
            created: Vec::new(),
        }
    }
}

/// Reconcile glyph nodes against a re-flowed glyph list of the same text.
///
/// Glyphs keep their source index across reflows, so nodes and geometry
/// pair up positionally. Returns the indices of nodes that moved.
pub fn glyph_diff(nodes: &mut [GlyphNode], glyphs: &[Glyph]) -> Vec<usize> {
    let mut updated = Vec::new();
    for (i, (node, glyph)) in nodes.iter_mut().zip(glyphs).enumerate() {
        let moved = node.glyph.x != glyph.x
            || node.glyph.y != glyph.y
            || node.glyph.width != glyph.width
            || node.glyph.row_index != glyph.row_index
            || node.glyph.line_begin != glyph.line_begin
            || node.glyph.line_end != glyph.line_end;
        if moved {
            node.glyph = *glyph;
            updated.push(i);
        }
    }
    updated
}

/// Reconcile label nodes against freshly placed boxes.
///
/// Identity is `(start_index, end_index, ex_data)`; captions and styles are
/// updated alongside positions.
pub fn label_diff(nodes: &mut [LabelNode], boxes: &[LabelBox]) -> DiffResult<LabelBox> {
    let mut result = DiffResult::new();
    for label_box in boxes {
        let found = nodes.iter_mut().enumerate().find(|(_, node)| {
            node.label.start_index == label_box.start_index
                && node.label.end_index == label_box.end_index
                && node.label.ex_data == label_box.ex_data
        });
        let Some((i, node)) = found else {
            result.created.push(label_box.clone());
            continue;
        };

        let mut changed = node.label.style != label_box.style;
        node.label.style = label_box.style.clone();
        if node.label.text != label_box.text {
            node.label.text = label_box.text.clone();
            changed = true;
        }
        if node.label.x != label_box.x
            || node.label.y != label_box.y
            || node.label.width != label_box.width
            || node.label.height != label_box.height
            || node.label.row_index != label_box.row_index
        {
            node.label.x = label_box.x;
            node.label.y = label_box.y;
            node.label.width = label_box.width;
            node.label.height = label_box.height;
            node.label.row_index = label_box.row_index;
            changed = true;
        }
        if changed {
            result.updated.push(i);
        }
    }
    result
}

/// Reconcile path nodes against freshly routed segments.
///
/// Identity is the six-field segment key. A segment whose `single_line`
/// flag flipped has a different key and therefore never matches here: the
/// stale node must already have been removed as an orphan, and the new
/// shape comes back in `created`.
pub fn path_diff(nodes: &mut [PathNode], segments: &[PathSegment]) -> DiffResult<PathSegment> {
    let mut result = DiffResult::new();
    for segment in segments {
        let key = segment.key();
        let found = nodes
            .iter_mut()
            .enumerate()
            .find(|(_, node)| node.segment.key() == key);
        let Some((i, node)) = found else {
            result.created.push(segment.clone());
            continue;
        };

        let mut changed = node.segment.style != segment.style;
        node.segment.style = segment.style.clone();
        if node.segment.text != segment.text {
            node.segment.text = segment.text.clone();
            changed = true;
        }
        if node.segment.points != segment.points {
            node.segment.points = segment.points;
            changed = true;
        }
        if node.segment.row_index != segment.row_index
            || node.segment.start_row != segment.start_row
            || node.segment.end_row != segment.end_row
        {
            node.segment.row_index = segment.row_index;
            node.segment.start_row = segment.start_row;
            node.segment.end_row = segment.end_row;
            changed = true;
        }
        if changed {
            result.updated.push(i);
        }
    }
    result
}

/// Remove nodes whose identity no longer appears in the fresh segment list,
/// reporting their handles so the caller can drop the drawables.
pub fn orphaned_paths(nodes: &mut Vec<PathNode>, segments: &[PathSegment]) -> Vec<DrawableHandle> {
    let mut removed = Vec::new();
    nodes.retain(|node| {
        let key = node.segment.key();
        if segments.iter().any(|segment| segment.key() == key) {
            true
        } else {
            removed.push(node.handle);
            false
        }
    });
    removed
}

/// Remove label nodes with no surviving box, reporting their handles.
pub fn orphaned_labels(nodes: &mut Vec<LabelNode>, boxes: &[LabelBox]) -> Vec<DrawableHandle> {
    let mut removed = Vec::new();
    nodes.retain(|node| {
        let alive = boxes.iter().any(|label_box| {
            label_box.start_index == node.label.start_index
                && label_box.end_index == node.label.end_index
                && label_box.ex_data == node.label.ex_data
        });
        if !alive {
            removed.push(node.handle);
        }
        alive
    });
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{LabelId, Point};
    use crate::style::{LabelStyle, PathStyle};

    fn glyph(index: usize, x: f64) -> Glyph {
        Glyph {
            index,
            row_index: 1,
            ch: 'a',
            x,
            y: 20.0,
            width: 8.0,
            height: 20.0,
            line_begin: index == 0,
            line_end: false,
        }
    }

    fn label_box(id: u64, start: usize, end: usize, y: f64) -> LabelBox {
        LabelBox {
            id: LabelId(id),
            row_index: 1,
            x: 80.0,
            y,
            width: 20.0,
            height: 19.0,
            text: "T".into(),
            start_index: start,
            end_index: end,
            style: LabelStyle::default(),
            ex_data: None,
        }
    }

    fn segment(single_line: bool, y: f64) -> PathSegment {
        PathSegment {
            start: LabelId(1),
            end: LabelId(2),
            start_row: 1,
            end_row: 1,
            row_index: Some(1),
            points: [
                Point::new(0.0, y),
                Point::new(10.0, y - 19.0),
                Point::new(40.0, y - 19.0),
                Point::new(50.0, y),
            ],
            is_arrow: true,
            single_line,
            connect: false,
            text: "r".into(),
            style: PathStyle::default(),
            ex_data: None,
        }
    }

    #[test]
    fn test_glyph_diff_reports_only_moved() {
        let mut nodes = vec![
            GlyphNode {
                handle: DrawableHandle(1),
                glyph: glyph(0, 80.0),
            },
            GlyphNode {
                handle: DrawableHandle(2),
                glyph: glyph(1, 88.0),
            },
        ];
        let mut fresh = vec![glyph(0, 80.0), glyph(1, 88.0)];
        fresh[1].x = 120.0;

        let updated = glyph_diff(&mut nodes, &fresh);

        assert_eq!(updated, vec![1]);
        assert_eq!(nodes[1].glyph.x, 120.0);
        assert_eq!(nodes[0].glyph.x, 80.0);
    }

    #[test]
    fn test_label_diff_updates_in_place() {
        let mut nodes = vec![LabelNode {
            handle: DrawableHandle(1),
            label: label_box(1, 0, 2, 20.0),
        }];
        let fresh = vec![label_box(1, 0, 2, 39.0)];

        let result = label_diff(&mut nodes, &fresh);

        assert_eq!(result.updated, vec![0]);
        assert!(result.created.is_empty());
        assert_eq!(nodes[0].label.y, 39.0);
        // the node keeps its handle: update, not recreate
        assert_eq!(nodes[0].handle, DrawableHandle(1));
    }

    #[test]
    fn test_label_diff_creates_unmatched() {
        let mut nodes = vec![LabelNode {
            handle: DrawableHandle(1),
            label: label_box(1, 0, 2, 20.0),
        }];
        let fresh = vec![label_box(1, 0, 2, 20.0), label_box(2, 4, 6, 20.0)];

        let result = label_diff(&mut nodes, &fresh);

        assert!(result.updated.is_empty());
        assert_eq!(result.created.len(), 1);
        assert_eq!(result.created[0].start_index, 4);
    }

    #[test]
    fn test_path_diff_single_line_flip_is_create_not_update() {
        let mut nodes = vec![PathNode {
            handle: DrawableHandle(1),
            segment: segment(true, 40.0),
        }];
        let fresh = vec![segment(false, 40.0)];

        let result = path_diff(&mut nodes, &fresh);

        assert!(result.updated.is_empty());
        assert_eq!(result.created.len(), 1);
        // and the stale node is an orphan of the fresh set
        let removed = orphaned_paths(&mut nodes, &fresh);
        assert_eq!(removed, vec![DrawableHandle(1)]);
        assert!(nodes.is_empty());
    }

    #[test]
    fn test_path_diff_caption_edit_reuses_node() {
        let mut nodes = vec![PathNode {
            handle: DrawableHandle(7),
            segment: segment(true, 40.0),
        }];
        let mut fresh = segment(true, 40.0);
        fresh.text = "renamed".into();

        let result = path_diff(&mut nodes, &[fresh]);

        assert_eq!(result.updated, vec![0]);
        assert!(result.created.is_empty());
        assert_eq!(nodes[0].segment.text, "renamed");
        assert_eq!(nodes[0].handle, DrawableHandle(7));
    }

    #[test]
    fn test_orphaned_labels_reports_handles() {
        let mut nodes = vec![
            LabelNode {
                handle: DrawableHandle(1),
                label: label_box(1, 0, 2, 20.0),
            },
            LabelNode {
                handle: DrawableHandle(2),
                label: label_box(2, 4, 6, 20.0),
            },
        ];
        let fresh = vec![label_box(1, 0, 2, 20.0)];

        let removed = orphaned_labels(&mut nodes, &fresh);

        assert_eq!(removed, vec![DrawableHandle(2)]);
        assert_eq!(nodes.len(), 1);
    }
}
