//! Core types for the layout engine

use std::fmt;

use crate::style::{LabelStyle, PathStyle};

/// A 2D point in the document coordinate system
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A bounding box representing the spatial extent of an element
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge y-coordinate
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check if this bounding box contains a point
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.right()
            && point.y >= self.y
            && point.y <= self.bottom()
    }

    /// Check whether two boxes occupy common area.
    ///
    /// Two boxes overlap unless one is fully above, below, left of, or right
    /// of the other; boxes that merely touch along an edge do not overlap.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.x < other.right()
            && self.right() > other.x
            && self.y < other.bottom()
            && self.bottom() > other.y
    }
}

/// One laid-out character of the source text.
///
/// Coordinates exclude wrap offsets; row queries add them back in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Glyph {
    /// Stable position in the source text
    pub index: usize,
    /// 1-based display row
    pub row_index: usize,
    pub ch: char,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// First glyph of its row
    pub line_begin: bool,
    /// Last glyph of its row
    pub line_end: bool,
}

/// Bounding coordinates of one display row, wrap offsets included.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowBounds {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

/// Extra vertical space reserved at a row for stacked labels and paths.
///
/// Contributions to the same row accumulate; everything at or below the row
/// shifts down by the accumulated height.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WrapOffset {
    pub row_index: usize,
    pub height: f64,
}

/// Stable identity of a placed label, assigned on first add.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LabelId(pub u64);

impl fmt::Display for LabelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "label#{}", self.0)
    }
}

/// A caller-supplied annotation request over an inclusive glyph range.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelSpec {
    pub start_index: usize,
    pub end_index: usize,
    /// Caption shown in the label box, distinct from the underlying text
    pub text: String,
    pub style: LabelStyle,
    /// Opaque identity payload supplied by the caller
    pub ex_data: Option<String>,
}

impl LabelSpec {
    pub fn new(start_index: usize, end_index: usize, text: impl Into<String>) -> Self {
        Self {
            start_index,
            end_index,
            text: text.into(),
            style: LabelStyle::default(),
            ex_data: None,
        }
    }

    /// Attach an identity payload
    pub fn with_ex_data(mut self, ex_data: impl Into<String>) -> Self {
        self.ex_data = Some(ex_data.into());
        self
    }

    /// Override the default style
    pub fn with_style(mut self, style: LabelStyle) -> Self {
        self.style = style;
        self
    }

    /// Two specs describe the same label when range, caption and identity
    /// payload all match.
    pub fn same_spec(&self, other: &LabelSpec) -> bool {
        self.start_index == other.start_index
            && self.end_index == other.end_index
            && self.text == other.text
            && self.ex_data == other.ex_data
    }
}

/// Computed placement of a label above its anchor row.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelBox {
    pub id: LabelId,
    pub row_index: usize,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub text: String,
    pub start_index: usize,
    pub end_index: usize,
    pub style: LabelStyle,
    pub ex_data: Option<String>,
}

impl LabelBox {
    pub fn bounds(&self) -> BoundingBox {
        BoundingBox::new(self.x, self.y, self.width, self.height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }
}

/// A relationship-link request between two placed labels.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSpec {
    pub start: LabelId,
    pub end: LabelId,
    /// Caption shown on the routed line
    pub text: String,
    pub style: PathStyle,
    pub ex_data: Option<String>,
}

impl PathSpec {
    pub fn new(start: LabelId, end: LabelId, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            text: text.into(),
            style: PathStyle::default(),
            ex_data: None,
        }
    }

    pub fn with_ex_data(mut self, ex_data: impl Into<String>) -> Self {
        self.ex_data = Some(ex_data.into());
        self
    }

    pub fn with_style(mut self, style: PathStyle) -> Self {
        self.style = style;
        self
    }

    pub fn same_spec(&self, other: &PathSpec) -> bool {
        self.start == other.start
            && self.end == other.end
            && self.text == other.text
            && self.ex_data == other.ex_data
    }
}

/// Identity key matching a routed segment to its rendered node.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SegmentKey {
    pub start: LabelId,
    pub end: LabelId,
    pub is_arrow: bool,
    pub single_line: bool,
    pub connect: bool,
    pub ex_data: Option<String>,
}

/// One routed polyline of a path.
///
/// Same-row paths produce a single segment; cross-row paths produce a
/// leaving segment, an arriving segment, and one synthesized connector
/// stitching them along the shared margin.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    pub start: LabelId,
    pub end: LabelId,
    /// Anchor rows of the two labels at routing time
    pub start_row: usize,
    pub end_row: usize,
    /// Row the segment itself belongs to; connectors have none
    pub row_index: Option<usize>,
    /// Four control points, in drawing order
    pub points: [Point; 4],
    /// Only the segment arriving at the end label carries an arrowhead
    pub is_arrow: bool,
    /// True only for same-row routes
    pub single_line: bool,
    /// True only for the synthesized stitching segment
    pub connect: bool,
    pub text: String,
    pub style: PathStyle,
    pub ex_data: Option<String>,
}

impl PathSegment {
    pub fn key(&self) -> SegmentKey {
        SegmentKey {
            start: self.start,
            end: self.end,
            is_arrow: self.is_arrow,
            single_line: self.single_line,
            connect: self.connect,
            ex_data: self.ex_data.clone(),
        }
    }

    /// Rectangle swept by the horizontal run of the segment, used by both
    /// collision-avoidance passes.
    pub fn run_rect(&self, caption_height: f64) -> BoundingBox {
        let [_, p2, p3, _] = self.points;
        BoundingBox::new(p2.x.min(p3.x), p2.y, (p2.x - p3.x).abs(), caption_height)
    }
}

/// One highlight rectangle of a mark, pinned to its display row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkRect {
    pub row_index: usize,
    pub rect: BoundingBox,
}

/// A translucent highlight over a glyph range, one rectangle per row.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkBox {
    pub from_index: usize,
    pub to_index: usize,
    /// Label this mark belongs to, if any
    pub label: Option<LabelId>,
    pub rects: Vec<MarkRect>,
    pub style: crate::style::MarkStyle,
}
