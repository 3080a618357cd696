//! The layout engine
//!
//! Owns the glyph list, the label/path specs, and the wrap-offset registry,
//! and is the only writer of any of them. Text assignment rebuilds glyphs
//! wholesale; label and path mutations recompute placements incrementally
//! or, for removals and edits, from the stored specs. Row growth produced
//! along the way is queued for the coordinator to broadcast and to apply to
//! already-rendered nodes.

use tracing::debug;

use crate::measure::{caption_extent, char_extent, path_caption_extent};
use crate::style::{LabelStyle, PathStyle};

use super::config::LayoutOptions;
use super::error::LayoutError;
use super::routing;
use super::types::{
    BoundingBox, Glyph, LabelBox, LabelId, LabelSpec, PathSegment, PathSpec, RowBounds, WrapOffset,
};

/// A stored label spec together with its assigned identity.
#[derive(Debug, Clone)]
struct LabelRecord {
    id: LabelId,
    spec: LabelSpec,
}

/// Layout state for one annotated document.
pub struct LayoutEngine {
    options: LayoutOptions,
    text: String,
    glyphs: Vec<Glyph>,
    wrap_offsets: Vec<WrapOffset>,
    labels: Vec<LabelRecord>,
    label_boxes: Vec<LabelBox>,
    paths: Vec<PathSpec>,
    segments: Vec<PathSegment>,
    next_label_id: u64,
    /// Row growth registered since the coordinator last drained it
    grown: Vec<WrapOffset>,
}

impl LayoutEngine {
    pub fn new(options: LayoutOptions) -> Self {
        Self {
            options,
            text: String::new(),
            glyphs: Vec::new(),
            wrap_offsets: Vec::new(),
            labels: Vec::new(),
            label_boxes: Vec::new(),
            paths: Vec::new(),
            segments: Vec::new(),
            next_label_id: 1,
            grown: Vec::new(),
        }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn glyphs(&self) -> &[Glyph] {
        &self.glyphs
    }

    pub fn label_boxes(&self) -> &[LabelBox] {
        &self.label_boxes
    }

    pub fn path_segments(&self) -> &[PathSegment] {
        &self.segments
    }

    pub fn path_specs(&self) -> &[PathSpec] {
        &self.paths
    }

    pub fn wrap_offsets(&self) -> &[WrapOffset] {
        &self.wrap_offsets
    }

    /// Iterate over stored labels with their identities, in insertion order.
    pub fn label_entries(&self) -> impl Iterator<Item = (LabelId, &LabelSpec)> {
        self.labels.iter().map(|record| (record.id, &record.spec))
    }

    /// Computed placement of one label.
    pub fn label_box(&self, id: LabelId) -> Option<&LabelBox> {
        self.label_boxes.iter().find(|el| el.id == id)
    }

    /// Drain the row growth recorded since the last call.
    pub fn take_row_growth(&mut self) -> Vec<WrapOffset> {
        std::mem::take(&mut self.grown)
    }

    /// Replace the document text. Clears all labels, paths and offsets.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.wrap_offsets.clear();
        self.labels.clear();
        self.label_boxes.clear();
        self.paths.clear();
        self.segments.clear();
        self.grown.clear();
        self.layout_text();
        debug!(glyphs = self.glyphs.len(), rows = self.max_row(), "text laid out");
    }

    /// Replace the flow options and re-run layout, keeping all specs.
    pub fn set_options(&mut self, options: LayoutOptions) -> Result<(), LayoutError> {
        self.options = options;
        self.layout_text();
        self.refresh_labels()
    }

    /// 1-based index of the last display row, 0 when there is no text.
    pub fn max_row(&self) -> usize {
        self.glyphs.last().map_or(0, |glyph| glyph.row_index)
    }

    /// Accumulated wrap offset for all rows up to and including `row_index`.
    pub fn row_offset_through(&self, row_index: usize) -> f64 {
        self.wrap_offsets
            .iter()
            .filter(|offset| offset.row_index <= row_index)
            .map(|offset| offset.height)
            .sum()
    }

    /// Accumulated wrap offset for all rows strictly above `row_index`.
    pub fn row_offset_before(&self, row_index: usize) -> f64 {
        self.wrap_offsets
            .iter()
            .filter(|offset| offset.row_index < row_index)
            .map(|offset| offset.height)
            .sum()
    }

    /// Wrap offset reserved at `row_index` itself.
    pub fn row_offset_at(&self, row_index: usize) -> f64 {
        self.wrap_offsets
            .iter()
            .filter(|offset| offset.row_index == row_index)
            .map(|offset| offset.height)
            .sum()
    }

    /// Bounding coordinates of one row, wrap offsets included.
    pub fn row_bounds(&self, row_index: usize) -> Result<RowBounds, LayoutError> {
        let mut row_glyphs = self
            .glyphs
            .iter()
            .filter(|glyph| glyph.row_index == row_index);
        let first = row_glyphs
            .next()
            .ok_or_else(|| LayoutError::empty_row(row_index))?;
        let last = row_glyphs.last().unwrap_or(first);
        let offset = self.row_offset_through(row_index);
        Ok(RowBounds {
            x0: first.x,
            y0: first.y + offset,
            x1: last.x + last.width,
            y1: last.y + last.height + offset,
        })
    }

    /// Final y of a glyph, wrap offsets included.
    pub fn shifted_glyph_y(&self, glyph: &Glyph) -> f64 {
        glyph.y + self.row_offset_through(glyph.row_index)
    }

    /// Total document height: last glyph plus accumulated growth, one line
    /// height, and the bottom padding. Zero for empty text.
    pub fn content_height(&self) -> f64 {
        let Some(last) = self.glyphs.last() else {
            return 0.0;
        };
        let grown: f64 = self.wrap_offsets.iter().map(|offset| offset.height).sum();
        last.y + grown + self.options.line_height + self.options.padding_bottom
    }

    /// Flow the text into positioned glyphs.
    ///
    /// Characters advance left to right; a row ends at the paragraph break
    /// character or when the next character would exceed the usable width.
    /// Paragraph spacing accumulates per break seen; the before-paragraph
    /// indent applies to a paragraph's first row and is consumed by the
    /// first width-driven wrap.
    fn layout_text(&mut self) {
        self.glyphs.clear();
        if self.text.is_empty() {
            return;
        }

        let left = self.options.left();
        let max_width = self.options.max_row_width();
        let mut row_index = 1usize;
        let mut row_width = 0.0f64;
        let mut paragraph_gap_total = 0.0f64;
        let mut before_paragraph = 0.0f64;

        for (i, ch) in self.text.chars().enumerate() {
            let extent = char_extent(ch, self.options.font_size);
            let width = extent.width + self.options.letter_spacing;
            let is_break = ch == self.options.paragraph_break;

            if is_break {
                paragraph_gap_total += self.options.paragraph_spacing;
            }
            if is_break || i == 0 {
                before_paragraph = self.options.before_paragraph;
            }

            let wraps = row_width + width + before_paragraph > max_width;
            if is_break || wraps {
                row_index += 1;
                row_width = 0.0;
                if let Some(prev) = self.glyphs.last_mut() {
                    prev.line_end = true;
                }
            }
            if wraps && !is_break {
                before_paragraph = 0.0;
            }

            self.glyphs.push(Glyph {
                index: i,
                row_index,
                ch,
                x: left + row_width + before_paragraph,
                y: self.options.padding_top
                    + (row_index - 1) as f64 * self.options.line_height
                    + paragraph_gap_total,
                width,
                height: extent.height,
                line_begin: row_width == 0.0,
                line_end: false,
            });
            row_width += width;
        }
    }

    fn validate_range(&self, start: usize, end: usize) -> Result<(), LayoutError> {
        if start > end {
            return Err(LayoutError::inverted_range(start, end));
        }
        if end >= self.glyphs.len() {
            return Err(LayoutError::index_out_of_range(end, self.glyphs.len()));
        }
        Ok(())
    }

    /// Add labels, skipping exact duplicates, and return the identity of
    /// every requested label (existing identities for duplicates).
    ///
    /// All ranges are validated before any placement happens.
    pub fn add_labels(&mut self, specs: Vec<LabelSpec>) -> Result<Vec<LabelId>, LayoutError> {
        for spec in &specs {
            let duplicate = self.labels.iter().any(|r| r.spec.same_spec(spec));
            if !duplicate {
                self.validate_range(spec.start_index, spec.end_index)?;
            }
        }

        let mut ids = Vec::with_capacity(specs.len());
        let mut changed = false;
        for spec in specs {
            if let Some(existing) = self.labels.iter().find(|r| r.spec.same_spec(&spec)) {
                ids.push(existing.id);
                continue;
            }
            let id = LabelId(self.next_label_id);
            self.next_label_id += 1;
            let record = LabelRecord { id, spec };
            self.place_and_commit(&record)?;
            self.labels.push(record);
            ids.push(id);
            changed = true;
        }

        if changed {
            self.refresh_paths()?;
        }
        Ok(ids)
    }

    /// Remove a label, all paths attached to it, and recompute everything
    /// else from the stored specs.
    pub fn remove_label(&mut self, id: LabelId) -> Result<LabelSpec, LayoutError> {
        let position = self
            .labels
            .iter()
            .position(|record| record.id == id)
            .ok_or(LayoutError::UnknownLabel(id))?;
        let record = self.labels.remove(position);
        self.paths.retain(|path| path.start != id && path.end != id);
        self.refresh_labels()?;
        Ok(record.spec)
    }

    /// Update a label's caption and optionally its style, then recompute.
    pub fn edit_label(
        &mut self,
        id: LabelId,
        text: &str,
        style: Option<LabelStyle>,
    ) -> Result<(), LayoutError> {
        let record = self
            .labels
            .iter_mut()
            .find(|record| record.id == id)
            .ok_or(LayoutError::UnknownLabel(id))?;
        record.spec.text = text.to_string();
        if let Some(style) = style {
            record.spec.style = style;
        }
        self.refresh_labels()
    }

    /// Add one path; duplicates and self-links are no-ops. Returns whether
    /// the path was actually added.
    pub fn add_path(&mut self, spec: PathSpec) -> Result<bool, LayoutError> {
        if spec.start == spec.end {
            return Ok(false);
        }
        if self.paths.iter().any(|path| path.same_spec(&spec)) {
            return Ok(false);
        }
        self.label_box(spec.start)
            .ok_or(LayoutError::UnknownLabel(spec.start))?;
        self.label_box(spec.end)
            .ok_or(LayoutError::UnknownLabel(spec.end))?;

        self.insert_path_geometry(&spec)?;
        self.paths.push(spec);
        routing::synthesize_connectors(&mut self.segments);
        Ok(true)
    }

    /// Remove the path linking two labels and recompute from specs.
    pub fn remove_path(
        &mut self,
        start: LabelId,
        end: LabelId,
        ex_data: Option<&str>,
    ) -> Result<PathSpec, LayoutError> {
        let position = self
            .paths
            .iter()
            .position(|path| {
                path.start == start && path.end == end && path.ex_data.as_deref() == ex_data
            })
            .ok_or(LayoutError::UnknownPath { start, end })?;
        let spec = self.paths.remove(position);
        self.refresh_labels()?;
        Ok(spec)
    }

    /// Update a path's caption and style, then re-route all paths.
    pub fn edit_path(
        &mut self,
        start: LabelId,
        end: LabelId,
        ex_data: Option<&str>,
        text: Option<&str>,
        style: Option<PathStyle>,
    ) -> Result<(), LayoutError> {
        let path = self
            .paths
            .iter_mut()
            .find(|path| {
                path.start == start && path.end == end && path.ex_data.as_deref() == ex_data
            })
            .ok_or(LayoutError::UnknownPath { start, end })?;
        if let Some(text) = text {
            path.text = text.to_string();
        }
        if let Some(style) = style {
            path.style = style;
        }
        self.refresh_paths()
    }

    /// Recompute every label box (and then every path) from the stored
    /// specs, rebuilding the wrap-offset registry from empty.
    pub fn refresh_labels(&mut self) -> Result<(), LayoutError> {
        self.wrap_offsets.clear();
        self.label_boxes.clear();
        // placement re-runs in insertion order so stacking is reproducible
        for i in 0..self.labels.len() {
            let record = self.labels[i].clone();
            self.place_and_commit(&record)?;
        }
        self.refresh_paths()
    }

    /// Re-route every path from the stored specs. Wrap offsets already
    /// registered stay in place; re-routing only adds what is still missing.
    pub fn refresh_paths(&mut self) -> Result<(), LayoutError> {
        self.segments.clear();
        let specs = self.paths.clone();
        for spec in &specs {
            self.insert_path_geometry(spec)?;
            routing::synthesize_connectors(&mut self.segments);
        }
        Ok(())
    }

    /// Place one label and fold its growth into the current state.
    fn place_and_commit(&mut self, record: &LabelRecord) -> Result<(), LayoutError> {
        let (label_box, grow) = self.place_label(record)?;
        if let Some(offset) = grow {
            self.register_offset(offset);
            for el in &mut self.label_boxes {
                if el.row_index >= offset.row_index {
                    el.y += offset.height;
                }
            }
        }
        self.label_boxes.push(label_box);
        Ok(())
    }

    /// Compute one label's placement against the current state.
    ///
    /// The anchor is the glyph at the spec's start index. A row with no
    /// reserved band yet gets the label directly above its text and reports
    /// one caption height of growth. Otherwise the label probes the
    /// reserved band bottom-up in caption-height steps against the boxes
    /// already in the band, and reports growth only when the probe would
    /// escape the band's top edge.
    fn place_label(
        &self,
        record: &LabelRecord,
    ) -> Result<(LabelBox, Option<WrapOffset>), LayoutError> {
        let spec = &record.spec;
        let anchor = self
            .glyphs
            .get(spec.start_index)
            .copied()
            .ok_or_else(|| LayoutError::index_out_of_range(spec.start_index, self.glyphs.len()))?;
        let row_index = anchor.row_index;
        let caption = caption_extent(&spec.text);

        let text_offset = self.row_offset_before(row_index);
        let row_before = self.row_offset_at(row_index);

        let make = |x: f64, y: f64| LabelBox {
            id: record.id,
            row_index,
            x,
            y,
            width: caption.width,
            height: caption.height,
            text: spec.text.clone(),
            start_index: spec.start_index,
            end_index: spec.end_index,
            style: spec.style.clone(),
            ex_data: spec.ex_data.clone(),
        };
        let grow = WrapOffset {
            row_index,
            height: caption.height,
        };

        let x = anchor.x;
        let mut y = anchor.y + text_offset;

        if row_before == 0.0 {
            // first layer above this row: the row itself must make room
            return Ok((make(x, y), Some(grow)));
        }

        y += row_before - caption.height;
        let bounds = self.row_bounds(row_index)?;
        let band = BoundingBox::new(
            bounds.x0,
            bounds.y0 - row_before,
            bounds.x1 - bounds.x0,
            row_before,
        );
        let band_top = band.y;

        // boxes whose top-left corner sits inside the reserved band
        let occupants: Vec<BoundingBox> = self
            .label_boxes
            .iter()
            .filter(|el| {
                el.x >= band.x && el.x <= band.right() && el.y >= band.y && el.y <= band.bottom()
            })
            .map(|el| el.bounds())
            .collect();

        let mut probe = BoundingBox::new(x, y, caption.width, caption.height);
        if !occupants.iter().any(|other| probe.overlaps(other)) {
            return Ok((make(probe.x, probe.y), None));
        }
        loop {
            if probe.y - caption.height < band_top {
                // the stack is full; commit here and grow the band
                return Ok((make(probe.x, probe.y), Some(grow)));
            }
            probe.y -= caption.height;
            if !occupants.iter().any(|other| probe.overlaps(other)) {
                return Ok((make(probe.x, probe.y), None));
            }
        }
    }

    /// Route one path spec and merge its segments and growth into the
    /// current state. Both avoidance passes run against everything already
    /// routed; growth decisions are taken before the new segments join the
    /// set, then applied in order.
    fn insert_path_geometry(&mut self, spec: &PathSpec) -> Result<(), LayoutError> {
        let start_box = self
            .label_box(spec.start)
            .cloned()
            .ok_or(LayoutError::UnknownLabel(spec.start))?;
        let end_box = self
            .label_box(spec.end)
            .cloned()
            .ok_or(LayoutError::UnknownLabel(spec.end))?;
        let caption = path_caption_extent(&spec.text);

        let routed = if start_box.row_index == end_box.row_index {
            let mut segment = routing::same_row_route(spec, &start_box, &end_box, &caption);
            routing::avoid_labels(&mut segment.points, caption.height, &self.label_boxes);
            routing::avoid_paths(&mut segment.points, caption.height, &self.segments);
            vec![segment]
        } else {
            let (mut from_segment, mut to_segment) = routing::cross_row_route(
                spec,
                &start_box,
                &end_box,
                &caption,
                self.options.left(),
                self.options.right(),
            );
            for segment in [&mut from_segment, &mut to_segment] {
                routing::avoid_labels(&mut segment.points, caption.height, &self.label_boxes);
                routing::avoid_paths(&mut segment.points, caption.height, &self.segments);
            }
            // the margin ends track whatever height the runs settled at
            from_segment.points[3].y = from_segment.points[2].y;
            to_segment.points[0].y = to_segment.points[1].y;
            vec![from_segment, to_segment]
        };

        let mut growth = Vec::with_capacity(routed.len());
        for segment in &routed {
            if let Some(row_index) = segment.row_index {
                let bounds = self.row_bounds(row_index)?;
                let band_top = bounds.y0 - self.row_offset_at(row_index);
                if segment.points[1].y < band_top {
                    growth.push(WrapOffset {
                        row_index,
                        height: caption.height,
                    });
                }
            }
        }

        self.segments.extend(routed);
        for offset in growth {
            self.apply_path_offset(offset);
        }
        Ok(())
    }

    /// Fold path-driven row growth into every row-anchored placement.
    fn apply_path_offset(&mut self, offset: WrapOffset) {
        self.register_offset(offset);
        for segment in &mut self.segments {
            if segment.row_index.is_some_and(|row| row >= offset.row_index) {
                for point in &mut segment.points {
                    point.y += offset.height;
                }
            }
        }
        for el in &mut self.label_boxes {
            if el.row_index >= offset.row_index {
                el.y += offset.height;
            }
        }
    }

    /// Record growth at a row; same-row contributions accumulate.
    fn register_offset(&mut self, offset: WrapOffset) {
        match self
            .wrap_offsets
            .iter_mut()
            .find(|existing| existing.row_index == offset.row_index)
        {
            Some(existing) => existing.height += offset.height,
            None => self.wrap_offsets.push(offset),
        }
        self.grown.push(offset);
        debug!(row = offset.row_index, height = offset.height, "row grew");
    }
}
