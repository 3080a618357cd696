//! Deterministic text measurement
//!
//! The layout engine never touches a font rasterizer. Character extents are
//! derived from the configured font size with a fixed aspect ratio, widened
//! for East Asian full-width characters. This keeps layout reproducible
//! across platforms and makes geometry assertions in tests exact.

use unicode_width::UnicodeWidthChar;

/// Font size used for label and path captions, independent of the body text.
pub const CAPTION_FONT_SIZE: f64 = 12.0;

/// Padding added to a measured caption on each axis (2px per side).
pub const CAPTION_PADDING: f64 = 4.0;

/// Stand-in caption measured for empty label text, so that a label with no
/// caption still reserves a visible box.
pub const EMPTY_CAPTION_PLACEHOLDER: &str = "unnamed";

/// Fraction of the font size occupied by one narrow character cell.
const CHAR_ASPECT: f64 = 0.5;

/// Fraction of the font size added above/below the glyph box.
const LINE_ASPECT: f64 = 1.25;

/// Measured pixel extent of a piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub width: f64,
    pub height: f64,
}

/// Measure a single character at the given font size.
///
/// Control characters (including the paragraph break) take no horizontal
/// space; full-width characters take two cells.
pub fn char_extent(ch: char, font_size: f64) -> Extent {
    let cells = ch.width().unwrap_or(0);
    Extent {
        width: cells as f64 * CHAR_ASPECT * font_size,
        height: LINE_ASPECT * font_size,
    }
}

/// Measure a whole string at the given font size.
pub fn text_extent(text: &str, font_size: f64) -> Extent {
    let width = text
        .chars()
        .map(|ch| char_extent(ch, font_size).width)
        .sum();
    Extent {
        width,
        height: LINE_ASPECT * font_size,
    }
}

/// Measure a label or path caption, including its box padding.
///
/// Empty captions measure the placeholder text instead, so zero-length
/// captions never collapse to a zero-size box.
pub fn caption_extent(text: &str) -> Extent {
    let effective = if text.is_empty() {
        EMPTY_CAPTION_PLACEHOLDER
    } else {
        text
    };
    let mut extent = text_extent(effective, CAPTION_FONT_SIZE);
    extent.width += CAPTION_PADDING;
    extent.height += CAPTION_PADDING;
    extent
}

/// Measure a path caption.
///
/// Path captions pad their height (the jog leg length) but keep the bare
/// text width, which sizes the minimum run length.
pub fn path_caption_extent(text: &str) -> Extent {
    let effective = if text.is_empty() {
        EMPTY_CAPTION_PLACEHOLDER
    } else {
        text
    };
    let mut extent = text_extent(effective, CAPTION_FONT_SIZE);
    extent.height += CAPTION_PADDING;
    extent
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_narrow_char_extent() {
        let e = char_extent('a', 16.0);
        assert_eq!(e.width, 8.0);
        assert_eq!(e.height, 20.0);
    }

    #[test]
    fn test_full_width_char_is_two_cells() {
        let narrow = char_extent('a', 16.0);
        let wide = char_extent('字', 16.0);
        assert_eq!(wide.width, narrow.width * 2.0);
    }

    #[test]
    fn test_newline_has_no_width() {
        assert_eq!(char_extent('\n', 16.0).width, 0.0);
    }

    #[test]
    fn test_text_extent_sums_chars() {
        let e = text_extent("abc", 16.0);
        assert_eq!(e.width, 24.0);
    }

    #[test]
    fn test_caption_extent_includes_padding() {
        let bare = text_extent("PER", CAPTION_FONT_SIZE);
        let padded = caption_extent("PER");
        assert_eq!(padded.width, bare.width + CAPTION_PADDING);
        assert_eq!(padded.height, bare.height + CAPTION_PADDING);
    }

    #[test]
    fn test_empty_caption_measures_placeholder() {
        let e = caption_extent("");
        assert!(e.width > CAPTION_PADDING);
    }

    #[test]
    fn test_path_caption_width_is_unpadded() {
        let bare = text_extent("rel", CAPTION_FONT_SIZE);
        let path = path_caption_extent("rel");
        assert_eq!(path.width, bare.width);
        assert_eq!(path.height, bare.height + CAPTION_PADDING);
    }
}
