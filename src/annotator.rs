//! The annotation coordinator
//!
//! [`Annotator`] owns the layout engine, the rendered-node lists, the event
//! bus and the rendering backend, and drives reconciliation after every
//! mutation. Incremental operations (label/path adds, path edits) shift
//! already-rendered nodes by the row growth the engine queued; full
//! recomputations (removals, label edits, option changes) reset glyph nodes
//! to their base positions first and re-apply the rebuilt offsets.

use std::cmp::Ordering;

use tracing::debug;

use crate::diff;
use crate::events::{EventBus, EventKind, LayoutEvent, SubscriberId};
use crate::layout::{
    BoundingBox, LabelId, LabelSpec, LayoutEngine, LayoutError, LayoutOptions, MarkBox, MarkRect,
    PathSpec, Point,
};
use crate::measure::{text_extent, CAPTION_FONT_SIZE};
use crate::renderer::{
    Drawable, GlyphNode, LabelNode, MarkNode, PathNode, RenderBackend,
};
use crate::selection::{SelectionOutcome, SelectionRange, SelectionSession};
use crate::style::{LabelStyle, MarkStyle, PathStyle, Theme};
use crate::AnnotateError;

/// A path request addressed by label identity payloads instead of ids.
#[derive(Debug, Clone, PartialEq)]
pub struct LinkSpec {
    pub start_ex: String,
    pub end_ex: String,
    pub text: String,
    pub style: PathStyle,
    pub ex_data: Option<String>,
}

impl LinkSpec {
    pub fn new(
        start_ex: impl Into<String>,
        end_ex: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            start_ex: start_ex.into(),
            end_ex: end_ex.into(),
            text: text.into(),
            style: PathStyle::default(),
            ex_data: None,
        }
    }

    pub fn with_ex_data(mut self, ex_data: impl Into<String>) -> Self {
        self.ex_data = Some(ex_data.into());
        self
    }
}

/// What a pointer click landed on.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    Label(LabelId),
    Path {
        start: LabelId,
        end: LabelId,
        text: String,
    },
    /// A connect workflow resolved to its endpoint pair
    Connected { start: LabelId, end: LabelId },
}

/// Two-click linking workflow state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConnectPhase {
    Idle,
    AwaitingEndpoint(LabelId),
}

/// Coordinates layout, reconciliation and rendering for one document.
pub struct Annotator<B: RenderBackend> {
    engine: LayoutEngine,
    backend: B,
    bus: EventBus,
    theme: Theme,
    glyph_nodes: Vec<GlyphNode>,
    label_nodes: Vec<LabelNode>,
    path_nodes: Vec<PathNode>,
    /// Label-bound highlight marks plus caller-managed marks
    marks: Vec<MarkNode>,
    /// Persistent marks for completed multi-select gestures
    selection_marks: Vec<MarkNode>,
    /// The in-flight drag highlight
    selection_preview: Option<MarkNode>,
    selection: Option<SelectionSession>,
    connect: ConnectPhase,
}

impl<B: RenderBackend> Annotator<B> {
    /// Create an annotator with default options and theme.
    pub fn new(backend: B) -> Self {
        Self::with_config(backend, LayoutOptions::default(), Theme::default())
    }

    pub fn with_config(backend: B, options: LayoutOptions, theme: Theme) -> Self {
        Self {
            engine: LayoutEngine::new(options),
            backend,
            bus: EventBus::new(),
            theme,
            glyph_nodes: Vec::new(),
            label_nodes: Vec::new(),
            path_nodes: Vec::new(),
            marks: Vec::new(),
            selection_marks: Vec::new(),
            selection_preview: None,
            selection: None,
            connect: ConnectPhase::Idle,
        }
    }

    pub fn engine(&self) -> &LayoutEngine {
        &self.engine
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn labels(&self) -> &[LabelNode] {
        &self.label_nodes
    }

    pub fn paths(&self) -> &[PathNode] {
        &self.path_nodes
    }

    pub fn glyphs(&self) -> &[GlyphNode] {
        &self.glyph_nodes
    }

    pub fn marks(&self) -> &[MarkNode] {
        &self.marks
    }

    pub fn content_height(&self) -> f64 {
        self.engine.content_height()
    }

    /// Subscribe to one event kind.
    pub fn on(
        &mut self,
        kind: EventKind,
        callback: impl FnMut(&LayoutEvent) + 'static,
    ) -> SubscriberId {
        self.bus.subscribe(kind, callback)
    }

    /// Drop a subscription.
    pub fn off(&mut self, id: SubscriberId) {
        self.bus.unsubscribe(id);
    }

    /// Replace the document text. All annotations, marks and sessions drop;
    /// glyph nodes are rebuilt wholesale.
    pub fn set_text(&mut self, text: &str) {
        for node in self.glyph_nodes.drain(..) {
            self.backend.remove(node.handle);
        }
        for node in self.label_nodes.drain(..) {
            self.backend.remove(node.handle);
        }
        for node in self.path_nodes.drain(..) {
            self.backend.remove(node.handle);
        }
        for node in self.marks.drain(..) {
            self.backend.remove(node.handle);
        }
        self.clear_selection_visuals();
        self.selection = None;
        self.connect = ConnectPhase::Idle;

        self.engine.set_text(text);
        for glyph in self.engine.glyphs() {
            let handle = self.backend.create(Drawable::Glyph(glyph));
            self.glyph_nodes.push(GlyphNode {
                handle,
                glyph: *glyph,
            });
        }
        self.notify_content_resized();
        debug!(glyphs = self.glyph_nodes.len(), "text replaced");
    }

    /// Replace the flow options, reflowing the current text and shifting
    /// existing nodes in place rather than recreating them.
    pub fn set_layout_options(&mut self, options: LayoutOptions) -> Result<(), AnnotateError> {
        self.engine.set_options(options)?;
        self.after_full_refresh();
        Ok(())
    }

    /// Add labels; duplicates are silently skipped. Returns one id per
    /// request (existing ids for duplicates).
    pub fn add_labels(&mut self, specs: Vec<LabelSpec>) -> Result<Vec<LabelId>, AnnotateError> {
        let ids = self.engine.add_labels(specs)?;
        self.after_incremental();
        Ok(ids)
    }

    /// Remove a label, its marks, and every path attached to it.
    pub fn remove_label(&mut self, id: LabelId) -> Result<(), AnnotateError> {
        self.engine.remove_label(id)?;
        self.after_full_refresh();
        Ok(())
    }

    /// Remove the unique label carrying this identity payload.
    pub fn remove_label_by_ex_data(&mut self, ex_data: &str) -> Result<LabelId, AnnotateError> {
        let id = self.find_label_by_ex_data(ex_data)?;
        self.remove_label(id)?;
        Ok(id)
    }

    /// Change a label's caption and optionally its style.
    pub fn edit_label(
        &mut self,
        id: LabelId,
        text: &str,
        style: Option<LabelStyle>,
    ) -> Result<(), AnnotateError> {
        self.engine.edit_label(id, text, style)?;
        self.after_full_refresh();
        Ok(())
    }

    /// Edit the unique label carrying this identity payload.
    pub fn edit_label_by_ex_data(
        &mut self,
        ex_data: &str,
        text: &str,
        style: Option<LabelStyle>,
    ) -> Result<LabelId, AnnotateError> {
        let id = self.find_label_by_ex_data(ex_data)?;
        self.edit_label(id, text, style)?;
        Ok(id)
    }

    /// Resolve the unique label carrying this identity payload.
    pub fn find_label_by_ex_data(&self, ex_data: &str) -> Result<LabelId, AnnotateError> {
        let matches: Vec<LabelId> = self
            .engine
            .label_entries()
            .filter(|(_, spec)| spec.ex_data.as_deref() == Some(ex_data))
            .map(|(id, _)| id)
            .collect();
        match matches.len() {
            0 => Err(AnnotateError::LabelNotFound),
            1 => Ok(matches[0]),
            n => Err(AnnotateError::AmbiguousLabel { matches: n }),
        }
    }

    /// Add paths between already-placed labels; duplicates and self-links
    /// are silently skipped.
    pub fn add_paths(&mut self, specs: Vec<PathSpec>) -> Result<(), AnnotateError> {
        for spec in specs {
            self.engine.add_path(spec)?;
        }
        self.after_incremental();
        Ok(())
    }

    /// Add one path addressed by label identity payloads.
    pub fn add_link(&mut self, link: &LinkSpec) -> Result<(), AnnotateError> {
        let start = self.find_label_by_ex_data(&link.start_ex)?;
        let end = self.find_label_by_ex_data(&link.end_ex)?;
        let mut spec = PathSpec::new(start, end, link.text.clone()).with_style(link.style.clone());
        spec.ex_data = link.ex_data.clone();
        self.engine.add_path(spec)?;
        self.after_incremental();
        Ok(())
    }

    /// Remove the path linking two labels.
    pub fn remove_path(
        &mut self,
        start: LabelId,
        end: LabelId,
        ex_data: Option<&str>,
    ) -> Result<(), AnnotateError> {
        self.engine.remove_path(start, end, ex_data)?;
        self.after_full_refresh();
        Ok(())
    }

    /// Change a path's caption and/or style.
    pub fn edit_path(
        &mut self,
        start: LabelId,
        end: LabelId,
        ex_data: Option<&str>,
        text: Option<&str>,
        style: Option<PathStyle>,
    ) -> Result<(), AnnotateError> {
        self.engine.edit_path(start, end, ex_data, text, style)?;
        self.after_incremental();
        Ok(())
    }

    /// Remove the unique path carrying this identity payload.
    pub fn remove_path_by_ex_data(&mut self, ex_data: &str) -> Result<(), AnnotateError> {
        let (start, end) = self.find_path_by_ex_data(ex_data)?;
        self.engine.remove_path(start, end, Some(ex_data))?;
        self.after_full_refresh();
        Ok(())
    }

    /// Edit the unique path carrying this identity payload.
    pub fn edit_path_by_ex_data(
        &mut self,
        ex_data: &str,
        text: Option<&str>,
        style: Option<PathStyle>,
    ) -> Result<(), AnnotateError> {
        let (start, end) = self.find_path_by_ex_data(ex_data)?;
        self.edit_path(start, end, Some(ex_data), text, style)
    }

    /// Resolve the unique path carrying this identity payload.
    pub fn find_path_by_ex_data(&self, ex_data: &str) -> Result<(LabelId, LabelId), AnnotateError> {
        let matches: Vec<(LabelId, LabelId)> = self
            .engine
            .path_specs()
            .iter()
            .filter(|spec| spec.ex_data.as_deref() == Some(ex_data))
            .map(|spec| (spec.start, spec.end))
            .collect();
        match matches.len() {
            0 => Err(AnnotateError::PathNotFound),
            1 => Ok(matches[0]),
            n => Err(AnnotateError::AmbiguousPath { matches: n }),
        }
    }

    /// Add a caller-managed highlight mark over a glyph range.
    pub fn add_mark(
        &mut self,
        range: SelectionRange,
        style: Option<MarkStyle>,
    ) -> Result<(), AnnotateError> {
        if range.end >= self.engine.glyphs().len() {
            return Err(AnnotateError::Layout(LayoutError::index_out_of_range(
                range.end,
                self.engine.glyphs().len(),
            )));
        }
        if range.start > range.end {
            return Err(AnnotateError::Layout(LayoutError::inverted_range(
                range.start,
                range.end,
            )));
        }
        let mark = MarkBox {
            from_index: range.start,
            to_index: range.end,
            label: None,
            rects: self.mark_rects(range.start, range.end),
            style: style.unwrap_or_else(|| self.theme.mark.clone()),
        };
        let handle = self.backend.create(Drawable::Mark(&mark));
        self.marks.push(MarkNode { handle, mark });
        Ok(())
    }

    // ---- selection -----------------------------------------------------

    /// Begin a selection workflow. Any previous session is discarded.
    pub fn select(&mut self, multiple: bool) {
        self.clear_selection_visuals();
        self.selection = Some(SelectionSession::new(multiple));
    }

    /// Pointer pressed inside the container.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        if let Some(session) = self.selection.as_mut() {
            session.pointer_down(&self.engine, x, y);
        }
    }

    /// Pointer moved while a session is dragging.
    pub fn pointer_move(&mut self, x: f64, y: f64) -> Option<SelectionRange> {
        let range = self
            .selection
            .as_mut()?
            .pointer_move(&self.engine, x, y)?;
        self.update_selection_preview(range);
        self.bus.emit(&LayoutEvent::SelectionChanged { range });
        Some(range)
    }

    /// Pointer released (or left the container, which resolves the same
    /// way).
    ///
    /// An empty resolution rejects the whole workflow: the session is torn
    /// down and the error carries whatever a multi-select session had
    /// completed so far.
    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<SelectionRange, AnnotateError> {
        let (outcome, multiple) = match self.selection.as_mut() {
            None => return Err(AnnotateError::NoActiveSelection),
            Some(session) => (
                session.pointer_up(&self.engine, x, y),
                session.is_multiple(),
            ),
        };

        match outcome {
            SelectionOutcome::Resolved(range) => {
                if multiple {
                    self.promote_preview(range);
                } else {
                    self.selection = None;
                    self.clear_selection_visuals();
                    self.bus.emit(&LayoutEvent::SelectionCleared);
                }
                Ok(range)
            }
            SelectionOutcome::Empty => {
                let partial = match self.selection.take() {
                    Some(session) => session.cancel(),
                    None => Vec::new(),
                };
                self.clear_selection_visuals();
                self.bus.emit(&LayoutEvent::SelectionCleared);
                Err(AnnotateError::EmptySelection { partial })
            }
        }
    }

    /// Pointer left the container mid-drag.
    pub fn pointer_leave(&mut self, x: f64, y: f64) -> Result<SelectionRange, AnnotateError> {
        self.pointer_up(x, y)
    }

    /// Step a multi-select session back one gesture.
    pub fn undo_last_selection(&mut self) -> Option<SelectionRange> {
        let range = self.selection.as_mut()?.undo_last()?;
        if let Some(position) = self
            .selection_marks
            .iter()
            .position(|node| node.mark.from_index == range.start && node.mark.to_index == range.end)
        {
            let node = self.selection_marks.remove(position);
            self.backend.remove(node.handle);
        }
        Some(range)
    }

    /// Cancel the selection workflow, returning whatever completed.
    pub fn cancel_select(&mut self) -> Vec<SelectionRange> {
        let partial = match self.selection.take() {
            Some(session) => session.cancel(),
            None => Vec::new(),
        };
        self.clear_selection_visuals();
        self.bus.emit(&LayoutEvent::SelectionCleared);
        partial
    }

    // ---- connect workflow ----------------------------------------------

    /// Arm the two-click linking workflow at a start label.
    pub fn begin_connect(&mut self, start: LabelId) -> Result<(), AnnotateError> {
        if self.engine.label_box(start).is_none() {
            return Err(AnnotateError::LabelNotFound);
        }
        self.connect = ConnectPhase::AwaitingEndpoint(start);
        Ok(())
    }

    /// Abort the linking workflow.
    pub fn cancel_connect(&mut self) {
        self.connect = ConnectPhase::Idle;
    }

    /// The start label the workflow is waiting to pair, if armed.
    pub fn pending_connect(&self) -> Option<LabelId> {
        match self.connect {
            ConnectPhase::AwaitingEndpoint(start) => Some(start),
            ConnectPhase::Idle => None,
        }
    }

    /// Hit-test a click against labels and path captions.
    pub fn click_at(&mut self, x: f64, y: f64) -> Option<ClickOutcome> {
        let point = Point::new(x, y);

        if let Some(node) = self
            .label_nodes
            .iter()
            .find(|node| node.label.bounds().contains(point))
        {
            let id = node.label.id;
            if let ConnectPhase::AwaitingEndpoint(start) = self.connect {
                if start != id {
                    self.connect = ConnectPhase::Idle;
                    return Some(ClickOutcome::Connected { start, end: id });
                }
            }
            self.bus.emit(&LayoutEvent::LabelClicked { id });
            return Some(ClickOutcome::Label(id));
        }

        let hit = self.path_nodes.iter().find_map(|node| {
            let segment = &node.segment;
            if segment.connect {
                return None;
            }
            let caption = text_extent(&segment.text, CAPTION_FONT_SIZE);
            let caption_box = BoundingBox::new(
                (segment.points[1].x + segment.points[2].x - caption.width) / 2.0,
                segment.points[2].y - caption.height / 2.0,
                caption.width,
                caption.height,
            );
            caption_box.contains(point).then(|| ClickOutcome::Path {
                start: segment.start,
                end: segment.end,
                text: segment.text.clone(),
            })
        });
        if let Some(ClickOutcome::Path { start, end, text }) = &hit {
            self.bus.emit(&LayoutEvent::PathClicked {
                start: *start,
                end: *end,
                text: text.clone(),
            });
        }
        hit
    }

    // ---- reconciliation ------------------------------------------------

    /// Post-mutation pass for incremental changes: rendered nodes keep
    /// their accumulated shifts and only the queued growth is applied.
    fn after_incremental(&mut self) {
        self.apply_row_growth();
        self.reconcile_labels();
        self.reconcile_paths();
        self.rebuild_marks();
        self.notify_content_resized();
    }

    /// Post-mutation pass for full recomputations: the offset registry was
    /// rebuilt from empty, so glyph nodes reset to base positions before
    /// the rebuilt offsets re-apply.
    fn after_full_refresh(&mut self) {
        let updated = diff::glyph_diff(&mut self.glyph_nodes, self.engine.glyphs());
        for i in updated {
            let node = &self.glyph_nodes[i];
            self.backend.update(node.handle, Drawable::Glyph(&node.glyph));
        }
        self.after_incremental();
    }

    /// Shift rendered glyph nodes by the growth the engine queued and
    /// broadcast each registration.
    fn apply_row_growth(&mut self) {
        for offset in self.engine.take_row_growth() {
            for node in &mut self.glyph_nodes {
                if node.glyph.row_index >= offset.row_index {
                    node.glyph.y += offset.height;
                    self.backend.update(node.handle, Drawable::Glyph(&node.glyph));
                }
            }
            self.bus.emit(&LayoutEvent::RowGrew {
                row_index: offset.row_index,
                height: offset.height,
            });
        }
    }

    fn reconcile_labels(&mut self) {
        let boxes = self.engine.label_boxes().to_vec();
        for handle in diff::orphaned_labels(&mut self.label_nodes, &boxes) {
            self.backend.remove(handle);
        }
        let result = diff::label_diff(&mut self.label_nodes, &boxes);
        for i in result.updated {
            let node = &self.label_nodes[i];
            self.backend.update(node.handle, Drawable::Label(&node.label));
        }
        for label_box in result.created {
            let handle = self.backend.create(Drawable::Label(&label_box));
            self.label_nodes.push(LabelNode {
                handle,
                label: label_box,
            });
        }
    }

    fn reconcile_paths(&mut self) {
        let segments = self.engine.path_segments().to_vec();
        for handle in diff::orphaned_paths(&mut self.path_nodes, &segments) {
            self.backend.remove(handle);
        }
        let result = diff::path_diff(&mut self.path_nodes, &segments);
        debug!(
            updated = result.updated.len(),
            created = result.created.len(),
            "paths reconciled"
        );
        for i in result.updated {
            let node = &self.path_nodes[i];
            self.backend.update(node.handle, Drawable::Path(&node.segment));
        }
        for segment in result.created {
            let handle = self.backend.create(Drawable::Path(&segment));
            self.path_nodes.push(PathNode { handle, segment });
        }

        // visual layering: lower horizontal runs paint first
        self.path_nodes.sort_by(|a, b| {
            a.segment.points[1]
                .y
                .partial_cmp(&b.segment.points[1].y)
                .unwrap_or(Ordering::Equal)
        });
        let order: Vec<_> = self.path_nodes.iter().map(|node| node.handle).collect();
        self.backend.restack_paths(&order);
    }

    /// Re-derive every mark from current glyph and label nodes: drop marks
    /// of dead labels, refresh geometry of the rest, create marks for
    /// labels that gained a node this cycle.
    fn rebuild_marks(&mut self) {
        let alive: Vec<LabelId> = self.label_nodes.iter().map(|node| node.label.id).collect();
        let mut removed = Vec::new();
        self.marks.retain(|node| {
            let keep = match node.mark.label {
                Some(id) => alive.contains(&id),
                None => true,
            };
            if !keep {
                removed.push(node.handle);
            }
            keep
        });
        for handle in removed {
            self.backend.remove(handle);
        }

        for i in 0..self.marks.len() {
            let rects = self.mark_rects(self.marks[i].mark.from_index, self.marks[i].mark.to_index);
            let style = self.marks[i].mark.label.and_then(|id| {
                self.label_nodes
                    .iter()
                    .find(|node| node.label.id == id)
                    .map(|node| MarkStyle {
                        background_color: node.label.style.background_color.clone(),
                        opacity: self.theme.mark.opacity,
                    })
            });
            let mut changed = false;
            if self.marks[i].mark.rects != rects {
                self.marks[i].mark.rects = rects;
                changed = true;
            }
            if let Some(style) = style {
                if self.marks[i].mark.style != style {
                    self.marks[i].mark.style = style;
                    changed = true;
                }
            }
            if changed {
                let node = &self.marks[i];
                self.backend.update(node.handle, Drawable::Mark(&node.mark));
            }
        }

        let missing: Vec<(LabelId, usize, usize, String)> = self
            .label_nodes
            .iter()
            .filter(|node| {
                !self
                    .marks
                    .iter()
                    .any(|mark| mark.mark.label == Some(node.label.id))
            })
            .map(|node| {
                (
                    node.label.id,
                    node.label.start_index,
                    node.label.end_index,
                    node.label.style.background_color.clone(),
                )
            })
            .collect();
        for (id, from, to, background_color) in missing {
            let mark = MarkBox {
                from_index: from,
                to_index: to,
                label: Some(id),
                rects: self.mark_rects(from, to),
                style: MarkStyle {
                    background_color,
                    opacity: self.theme.mark.opacity,
                },
            };
            let handle = self.backend.create(Drawable::Mark(&mark));
            self.marks.push(MarkNode { handle, mark });
        }
    }

    /// Row-grouped highlight rectangles over a glyph range, tracking the
    /// rendered (shifted) glyph positions.
    fn mark_rects(&self, from: usize, to: usize) -> Vec<MarkRect> {
        let mut rects: Vec<MarkRect> = Vec::new();
        for node in &self.glyph_nodes {
            let glyph = &node.glyph;
            if glyph.index < from || glyph.index > to {
                continue;
            }
            match rects.last_mut() {
                Some(last) if last.row_index == glyph.row_index => {
                    let left = last.rect.x.min(glyph.x);
                    let right = last.rect.right().max(glyph.x + glyph.width);
                    last.rect = BoundingBox::new(left, last.rect.y, right - left, last.rect.height);
                }
                _ => rects.push(MarkRect {
                    row_index: glyph.row_index,
                    rect: BoundingBox::new(glyph.x, glyph.y, glyph.width, glyph.height),
                }),
            }
        }
        rects
    }

    fn update_selection_preview(&mut self, range: SelectionRange) {
        let mark = MarkBox {
            from_index: range.start,
            to_index: range.end,
            label: None,
            rects: self.mark_rects(range.start, range.end),
            style: self.theme.mark.clone(),
        };
        match self.selection_preview.take() {
            Some(mut node) => {
                node.mark = mark;
                self.backend.update(node.handle, Drawable::Mark(&node.mark));
                self.selection_preview = Some(node);
            }
            None => {
                let handle = self.backend.create(Drawable::Mark(&mark));
                self.selection_preview = Some(MarkNode { handle, mark });
            }
        }
    }

    /// Turn the drag preview into a persistent multi-select mark.
    fn promote_preview(&mut self, range: SelectionRange) {
        if let Some(node) = self.selection_preview.take() {
            self.backend.remove(node.handle);
        }
        let mark = MarkBox {
            from_index: range.start,
            to_index: range.end,
            label: None,
            rects: self.mark_rects(range.start, range.end),
            style: self.theme.mark.clone(),
        };
        let handle = self.backend.create(Drawable::Mark(&mark));
        self.selection_marks.push(MarkNode { handle, mark });
    }

    fn clear_selection_visuals(&mut self) {
        if let Some(node) = self.selection_preview.take() {
            self.backend.remove(node.handle);
        }
        for node in self.selection_marks.drain(..) {
            self.backend.remove(node.handle);
        }
    }

    fn notify_content_resized(&mut self) {
        let height = self.engine.content_height();
        self.backend
            .resize_content(self.engine.options().width, height);
        self.bus.emit(&LayoutEvent::ContentResized { height });
    }
}
