//! Integration tests for pointer-driven selection

use std::cell::RefCell;
use std::rc::Rc;

use text_annotator::selection::SelectionRange;
use text_annotator::{
    AnnotateError, Annotator, EventKind, LayoutEvent, SvgBackend, SvgConfig,
};

fn annotator(text: &str) -> Annotator<SvgBackend> {
    let mut annotator = Annotator::new(SvgBackend::new(SvgConfig::default()));
    annotator.set_text(text);
    annotator
}

#[test]
fn test_cross_row_drag_selects_full_span() {
    let mut annotator = annotator("ab\ncd");
    annotator.select(false);
    annotator.pointer_down(113.0, 30.0);
    annotator.pointer_move(125.0, 60.0);
    let range = annotator.pointer_up(125.0, 60.0).unwrap();
    assert_eq!(range, SelectionRange::new(0, 4));
}

#[test]
fn test_reversed_drag_selects_same_span() {
    let mut annotator = annotator("ab\ncd");
    annotator.select(false);
    annotator.pointer_down(125.0, 60.0);
    let range = annotator.pointer_up(113.0, 30.0).unwrap();
    assert_eq!(range, SelectionRange::new(0, 4));
}

#[test]
fn test_newline_only_click_rejects() {
    let mut annotator = annotator("ab\n\ncd");
    annotator.select(false);
    annotator.pointer_down(112.5, 60.0);
    let err = annotator.pointer_up(112.5, 60.0).unwrap_err();
    assert!(matches!(err, AnnotateError::EmptySelection { partial } if partial.is_empty()));
}

#[test]
fn test_drag_past_container_bottom_falls_back_to_last_row() {
    let mut annotator = annotator("ab\ncd");
    annotator.select(false);
    annotator.pointer_down(114.0, 60.0);
    let range = annotator.pointer_up(114.0, 500.0).unwrap();
    // the end point resolves as if it were the last glyph of row 2
    assert_eq!(range.end, 4);
}

#[test]
fn test_selection_change_events_fire() {
    let mut annotator = annotator("ab\ncd");
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    annotator.on(EventKind::SelectionChanged, move |event| {
        if let LayoutEvent::SelectionChanged { range } = event {
            sink.borrow_mut().push(*range);
        }
    });

    annotator.select(false);
    annotator.pointer_down(113.0, 30.0);
    annotator.pointer_move(120.0, 30.0);
    annotator.pointer_move(125.0, 60.0);
    annotator.pointer_up(125.0, 60.0).unwrap();

    let seen = seen.borrow();
    assert!(seen.len() >= 2);
    assert_eq!(*seen.last().unwrap(), SelectionRange::new(0, 4));
}

#[test]
fn test_multi_select_collects_ranges_and_cancel_returns_them() {
    let mut annotator = annotator("ab\ncd");
    annotator.select(true);

    annotator.pointer_down(113.0, 30.0);
    annotator.pointer_up(125.0, 30.0).unwrap();

    annotator.pointer_down(113.0, 60.0);
    annotator.pointer_up(125.0, 60.0).unwrap();

    let ranges = annotator.cancel_select();
    assert_eq!(
        ranges,
        vec![SelectionRange::new(0, 1), SelectionRange::new(2, 4)]
    );
}

#[test]
fn test_multi_select_undo_steps_back_one_gesture() {
    let mut annotator = annotator("ab\ncd");
    annotator.select(true);

    annotator.pointer_down(113.0, 30.0);
    annotator.pointer_up(125.0, 30.0).unwrap();
    annotator.pointer_down(113.0, 60.0);
    annotator.pointer_up(125.0, 60.0).unwrap();

    let undone = annotator.undo_last_selection().unwrap();
    assert_eq!(undone, SelectionRange::new(2, 4));

    let ranges = annotator.cancel_select();
    assert_eq!(ranges, vec![SelectionRange::new(0, 1)]);
}

#[test]
fn test_pointer_leave_resolves_like_pointer_up() {
    let mut annotator = annotator("ab\ncd");
    annotator.select(false);
    annotator.pointer_down(113.0, 30.0);
    let range = annotator.pointer_leave(125.0, 60.0).unwrap();
    assert_eq!(range, SelectionRange::new(0, 4));
}

#[test]
fn test_pointer_without_session_is_error() {
    let mut annotator = annotator("ab\ncd");
    assert!(matches!(
        annotator.pointer_up(100.0, 30.0),
        Err(AnnotateError::NoActiveSelection)
    ));
}

#[test]
fn test_selection_survives_label_growth() {
    // selection coordinates are document coordinates: after a label grows
    // row 1, the same text sits lower
    let mut annotator = annotator("ab\ncd");
    annotator
        .add_labels(vec![text_annotator::LabelSpec::new(0, 1, "T")])
        .unwrap();
    let grown = annotator.engine().row_offset_through(1);
    assert!(grown > 0.0);

    annotator.select(false);
    annotator.pointer_down(113.0, 30.0 + grown);
    let range = annotator.pointer_up(125.0, 60.0 + grown).unwrap();
    assert_eq!(range, SelectionRange::new(0, 4));
}
