//! Pointer-to-text-index selection resolution
//!
//! Raw pointer coordinates are classified onto display rows, then a pair of
//! classified points resolves to a contiguous glyph-index range. A drag
//! gesture is a short-lived session: armed on pointer-down, updated on
//! every move, resolved on pointer-up or when the pointer leaves the
//! container. Multi-select sessions re-arm after each gesture and keep the
//! list of completed ranges until cancelled.

use crate::layout::{Glyph, LayoutEngine};

/// An inclusive glyph-index range produced by a selection gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionRange {
    pub start: usize,
    pub end: usize,
}

impl SelectionRange {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start && index <= self.end
    }
}

/// Where a drag session currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPhase {
    /// Waiting for a pointer-down
    Armed,
    /// Pointer is down and moving
    Dragging,
    /// Session finished (single-select only)
    Done,
}

/// A pointer position classified onto a display row.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifiedPoint {
    pub x: f64,
    pub y: f64,
    pub row_index: usize,
    /// The point misses every row band or falls outside its row's glyph span
    pub out_of_line: bool,
}

/// Snap a pointer position onto a row.
///
/// The first row whose band bottom lies at or below `y` wins; anything
/// below the last row snaps to it. Returns `None` when there is no text.
pub fn classify_point(engine: &LayoutEngine, x: f64, y: f64) -> Option<ClassifiedPoint> {
    let max_row = engine.max_row();
    if max_row == 0 {
        return None;
    }
    let mut row_index = max_row;
    for row in 1..=max_row {
        // a glyph-less leading row cannot be hit
        if let Ok(bounds) = engine.row_bounds(row) {
            if y <= bounds.y1 {
                row_index = row;
                break;
            }
        }
    }
    let bounds = engine.row_bounds(row_index).ok()?;
    let out_of_line = x <= bounds.x0 || x >= bounds.x1;
    Some(ClassifiedPoint {
        x,
        y,
        row_index,
        out_of_line,
    })
}

/// Resolve two classified points to a glyph-index range.
///
/// Points order by row first, then x within a shared row. Candidate glyphs
/// lie within one line-height band below their point and on the inward side
/// of it; an empty candidate set on a cross-row gesture falls back to the
/// adjacent row's full glyph list. `None` is the empty-selection sentinel.
pub fn resolve_range(
    engine: &LayoutEngine,
    a: &ClassifiedPoint,
    b: &ClassifiedPoint,
) -> Option<SelectionRange> {
    let (p0, p1) = if a.row_index == b.row_index {
        if a.x > b.x {
            (b, a)
        } else {
            (a, b)
        }
    } else if a.row_index < b.row_index {
        (a, b)
    } else {
        (b, a)
    };

    let options = engine.options();
    let half_char = options.font_size / 2.0;
    let in_band = |point: &ClassifiedPoint, glyph: &Glyph| {
        let distance = point.y - engine.shifted_glyph_y(glyph);
        distance > 0.0 && distance < options.line_height
    };

    let start_set: Vec<&Glyph> = engine
        .glyphs()
        .iter()
        .filter(|&glyph| {
            glyph.row_index == p0.row_index && glyph.x >= p0.x - half_char && in_band(p0, glyph)
        })
        .collect();
    let end_set: Vec<&Glyph> = engine
        .glyphs()
        .iter()
        .filter(|&glyph| glyph.row_index == p1.row_index && glyph.x <= p1.x && in_band(p1, glyph))
        .collect();

    let range = if p0.row_index == p1.row_index {
        let (first, last) = match (start_set.is_empty(), end_set.is_empty()) {
            (true, true) => return None,
            (true, false) => (end_set[0], end_set[end_set.len() - 1]),
            (false, true) => (start_set[0], start_set[start_set.len() - 1]),
            (false, false) => (start_set[0], end_set[end_set.len() - 1]),
        };
        SelectionRange::new(first.index, last.index)
    } else {
        // a drag that left the text area resolves against the adjacent row
        let row_fallback = |row: usize| -> Vec<&Glyph> {
            engine
                .glyphs()
                .iter()
                .filter(|glyph| glyph.row_index == row)
                .collect()
        };
        let start_set = if start_set.is_empty() {
            row_fallback(p0.row_index + 1)
        } else {
            start_set
        };
        let end_set = if end_set.is_empty() {
            row_fallback(p1.row_index.saturating_sub(1))
        } else {
            end_set
        };
        let first = start_set.first()?;
        let last = end_set.last()?;
        SelectionRange::new(first.index, last.index)
    };

    if range.start > range.end {
        Some(SelectionRange::new(range.end, range.start))
    } else {
        Some(range)
    }
}

/// Outcome of finishing a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionOutcome {
    Resolved(SelectionRange),
    /// Nothing selectable under the gesture
    Empty,
}

/// One selection workflow: a single drag gesture, or a sequence of them in
/// multi-select mode.
#[derive(Debug)]
pub struct SelectionSession {
    multiple: bool,
    phase: SelectionPhase,
    anchor: Option<ClassifiedPoint>,
    completed: Vec<SelectionRange>,
}

impl SelectionSession {
    pub fn new(multiple: bool) -> Self {
        Self {
            multiple,
            phase: SelectionPhase::Armed,
            anchor: None,
            completed: Vec::new(),
        }
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    /// Ranges completed so far in multi-select mode.
    pub fn completed(&self) -> &[SelectionRange] {
        &self.completed
    }

    /// Begin a drag gesture.
    pub fn pointer_down(&mut self, engine: &LayoutEngine, x: f64, y: f64) {
        if self.phase == SelectionPhase::Done {
            return;
        }
        self.anchor = classify_point(engine, x, y);
        self.phase = SelectionPhase::Dragging;
    }

    /// Track a pointer move, yielding the live range when one resolves.
    pub fn pointer_move(
        &mut self,
        engine: &LayoutEngine,
        x: f64,
        y: f64,
    ) -> Option<SelectionRange> {
        if self.phase != SelectionPhase::Dragging {
            return None;
        }
        let anchor = self.anchor?;
        let current = classify_point(engine, x, y)?;
        resolve_range(engine, &anchor, &current)
    }

    /// Finish the gesture at the given position.
    ///
    /// A range covering exactly one paragraph-break glyph counts as empty:
    /// there is no horizontal text under such a gesture.
    pub fn pointer_up(&mut self, engine: &LayoutEngine, x: f64, y: f64) -> SelectionOutcome {
        let resolved = self.pointer_move(engine, x, y);
        let resolved = resolved.filter(|range| {
            !(range.start == range.end
                && engine
                    .glyphs()
                    .get(range.start)
                    .is_some_and(|glyph| glyph.ch == engine.options().paragraph_break))
        });

        match resolved {
            Some(range) => {
                if self.multiple {
                    self.completed.push(range);
                    self.anchor = None;
                    self.phase = SelectionPhase::Armed;
                } else {
                    self.phase = SelectionPhase::Done;
                }
                SelectionOutcome::Resolved(range)
            }
            None => SelectionOutcome::Empty,
        }
    }

    /// Step a multi-select session back one gesture.
    pub fn undo_last(&mut self) -> Option<SelectionRange> {
        if self.multiple {
            self.completed.pop()
        } else {
            None
        }
    }

    /// Tear the session down, yielding whatever completed.
    pub fn cancel(mut self) -> Vec<SelectionRange> {
        std::mem::take(&mut self.completed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::LayoutOptions;

    fn engine_with(text: &str) -> LayoutEngine {
        let mut engine = LayoutEngine::new(LayoutOptions::default());
        engine.set_text(text);
        engine
    }

    #[test]
    fn test_classify_point_empty_text() {
        let engine = engine_with("");
        assert!(classify_point(&engine, 100.0, 30.0).is_none());
    }

    #[test]
    fn test_classify_point_snaps_below_last_row() {
        let engine = engine_with("ab\ncd");
        let point = classify_point(&engine, 114.0, 500.0).unwrap();
        assert_eq!(point.row_index, 2);
    }

    #[test]
    fn test_classify_point_flags_outside_span() {
        let engine = engine_with("ab\ncd");
        let inside = classify_point(&engine, 114.0, 30.0).unwrap();
        let outside = classify_point(&engine, 10.0, 30.0).unwrap();
        assert!(!inside.out_of_line);
        assert!(outside.out_of_line);
    }

    #[test]
    fn test_cross_row_drag_resolves_full_span() {
        let engine = engine_with("ab\ncd");
        let start = classify_point(&engine, 113.0, 30.0).unwrap();
        let end = classify_point(&engine, 125.0, 60.0).unwrap();

        let range = resolve_range(&engine, &start, &end).unwrap();
        assert_eq!(range, SelectionRange::new(0, 4));
    }

    #[test]
    fn test_reversed_drag_resolves_same_span() {
        let engine = engine_with("ab\ncd");
        let start = classify_point(&engine, 125.0, 60.0).unwrap();
        let end = classify_point(&engine, 113.0, 30.0).unwrap();

        let range = resolve_range(&engine, &start, &end).unwrap();
        assert_eq!(range, SelectionRange::new(0, 4));
    }

    #[test]
    fn test_session_single_select_lifecycle() {
        let engine = engine_with("ab\ncd");
        let mut session = SelectionSession::new(false);

        session.pointer_down(&engine, 113.0, 30.0);
        assert_eq!(session.phase(), SelectionPhase::Dragging);
        let live = session.pointer_move(&engine, 125.0, 60.0).unwrap();
        assert_eq!(live, SelectionRange::new(0, 4));

        let outcome = session.pointer_up(&engine, 125.0, 60.0);
        assert_eq!(
            outcome,
            SelectionOutcome::Resolved(SelectionRange::new(0, 4))
        );
        assert_eq!(session.phase(), SelectionPhase::Done);
    }

    #[test]
    fn test_newline_only_click_is_empty() {
        let engine = engine_with("ab\n\ncd");
        let mut session = SelectionSession::new(false);

        // row 2 holds only the first break character
        session.pointer_down(&engine, 112.5, 60.0);
        let outcome = session.pointer_up(&engine, 112.5, 60.0);
        assert_eq!(outcome, SelectionOutcome::Empty);
    }

    #[test]
    fn test_drag_past_bottom_resolves_against_last_row() {
        let engine = engine_with("ab\ncd");
        let mut session = SelectionSession::new(false);

        session.pointer_down(&engine, 114.0, 60.0);
        let outcome = session.pointer_up(&engine, 114.0, 400.0);
        // the end point snaps to row 2 and resolves through its last glyph
        assert_eq!(
            outcome,
            SelectionOutcome::Resolved(SelectionRange::new(2, 4))
        );
    }

    #[test]
    fn test_multi_select_accumulates_and_undoes() {
        let engine = engine_with("ab\ncd");
        let mut session = SelectionSession::new(true);

        session.pointer_down(&engine, 113.0, 30.0);
        session.pointer_up(&engine, 125.0, 30.0);
        assert_eq!(session.phase(), SelectionPhase::Armed);

        session.pointer_down(&engine, 113.0, 60.0);
        session.pointer_up(&engine, 125.0, 60.0);
        assert_eq!(session.completed().len(), 2);

        let undone = session.undo_last().unwrap();
        assert_eq!(undone, SelectionRange::new(2, 4));
        assert_eq!(session.completed().len(), 1);

        let remaining = session.cancel();
        assert_eq!(remaining, vec![SelectionRange::new(0, 1)]);
    }
}
