//! Integration tests for character flow layout

use text_annotator::{LayoutEngine, LayoutOptions};

fn engine(text: &str, options: LayoutOptions) -> LayoutEngine {
    let mut engine = LayoutEngine::new(options);
    engine.set_text(text);
    engine
}

#[test]
fn test_single_row_layout() {
    let engine = engine("hello", LayoutOptions::default());
    assert_eq!(engine.max_row(), 1);
    assert!(engine.glyphs()[0].line_begin);
    assert!(engine.glyphs().iter().all(|g| !g.line_end));
}

#[test]
fn test_rows_snapshot() {
    let engine = engine("ab\ncd", LayoutOptions::default());
    let summary = (1..=engine.max_row())
        .map(|row| {
            engine
                .glyphs()
                .iter()
                .filter(|g| g.row_index == row)
                .map(|g| if g.ch == '\n' { '⏎' } else { g.ch })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("|");
    insta::assert_snapshot!(summary, @"ab|⏎cd");
}

#[test]
fn test_explicit_break_ends_row() {
    let engine = engine("ab\ncd", LayoutOptions::default());
    let glyphs = engine.glyphs();
    assert!(glyphs[1].line_end);
    assert_eq!(glyphs[2].row_index, 2);
    assert_eq!(glyphs[4].row_index, 2);
}

#[test]
fn test_width_exhaustion_wraps() {
    let options = LayoutOptions::default()
        .with_width(100.0)
        .with_padding(10.0, 10.0, 10.0, 10.0)
        .with_before_paragraph(0.0);
    // usable width 80px, 8px per char: ten glyphs per row
    let engine = engine("abcdefghijklmnopqrst", options);
    assert_eq!(engine.max_row(), 2);
    assert_eq!(engine.glyphs()[9].row_index, 1);
    assert!(engine.glyphs()[9].line_end);
    assert_eq!(engine.glyphs()[10].row_index, 2);
    assert!(engine.glyphs()[10].line_begin);
}

#[test]
fn test_indent_consumed_by_width_wrap() {
    let options = LayoutOptions::default()
        .with_width(100.0)
        .with_padding(10.0, 10.0, 10.0, 10.0)
        .with_before_paragraph(16.0);
    let engine = engine("abcdefghijklmnopqrst", options);
    // first paragraph row is indented, the wrapped continuation is not
    let first = &engine.glyphs()[0];
    let continuation = engine.glyphs().iter().find(|g| g.row_index == 2).unwrap();
    assert_eq!(first.x, 10.0 + 16.0);
    assert_eq!(continuation.x, 10.0);
}

#[test]
fn test_paragraph_spacing_offsets_following_rows() {
    let options = LayoutOptions::default();
    let engine = engine("a\nb\nc", options.clone());
    let row3_glyph = engine
        .glyphs()
        .iter()
        .find(|g| g.row_index == 3 && g.ch == 'c')
        .unwrap();
    assert_eq!(
        row3_glyph.y,
        options.padding_top + 2.0 * options.line_height + 2.0 * options.paragraph_spacing
    );
}

#[test]
fn test_content_height_formula() {
    let options = LayoutOptions::default();
    let engine = engine("hello", options.clone());
    let last = engine.glyphs().last().unwrap();
    assert_eq!(
        engine.content_height(),
        last.y + options.line_height + options.padding_bottom
    );
}

#[test]
fn test_full_width_characters_occupy_two_cells() {
    let engine = engine("汉字ab", LayoutOptions::default());
    let glyphs = engine.glyphs();
    assert_eq!(glyphs[0].width, glyphs[2].width * 2.0);
    // x advances by the full glyph width
    assert_eq!(glyphs[1].x, glyphs[0].x + glyphs[0].width);
}

#[test]
fn test_row_bounds_match_glyph_extents() {
    let engine = engine("abc", LayoutOptions::default());
    let bounds = engine.row_bounds(1).unwrap();
    let first = &engine.glyphs()[0];
    let last = &engine.glyphs()[2];
    assert_eq!(bounds.x0, first.x);
    assert_eq!(bounds.x1, last.x + last.width);
    assert_eq!(bounds.y0, first.y);
}

#[test]
fn test_row_bounds_of_missing_row_errors() {
    let engine = engine("abc", LayoutOptions::default());
    assert!(engine.row_bounds(5).is_err());
}
