//! Configuration for the character flow layout

use serde::Deserialize;

/// Flow parameters of the annotated document.
///
/// Coordinates grow rightward and downward from the container's top-left
/// corner; the usable text band spans `padding_left .. width - padding_right`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LayoutOptions {
    /// Container width in pixels
    pub width: f64,

    pub padding_top: f64,
    pub padding_right: f64,
    pub padding_bottom: f64,
    pub padding_left: f64,

    /// Fixed height of one text row
    pub line_height: f64,

    /// Extra horizontal space after every character
    pub letter_spacing: f64,

    /// Body text font size
    pub font_size: f64,

    /// Character that forces a row break and starts a new paragraph
    pub paragraph_break: char,

    /// Vertical gap added below every paragraph break seen so far
    pub paragraph_spacing: f64,

    /// Indent applied to the first row of each paragraph
    pub before_paragraph: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            width: 800.0,
            padding_top: 20.0,
            padding_right: 80.0,
            padding_bottom: 20.0,
            padding_left: 80.0,
            line_height: 25.0,
            letter_spacing: 0.0,
            font_size: 16.0,
            paragraph_break: '\n',
            paragraph_spacing: 5.0,
            before_paragraph: 32.0,
        }
    }
}

impl LayoutOptions {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the container width
    pub fn with_width(mut self, width: f64) -> Self {
        self.width = width;
        self
    }

    /// Set all four paddings at once
    pub fn with_padding(mut self, top: f64, right: f64, bottom: f64, left: f64) -> Self {
        self.padding_top = top;
        self.padding_right = right;
        self.padding_bottom = bottom;
        self.padding_left = left;
        self
    }

    /// Set the row height
    pub fn with_line_height(mut self, line_height: f64) -> Self {
        self.line_height = line_height;
        self
    }

    /// Set the spacing between characters
    pub fn with_letter_spacing(mut self, letter_spacing: f64) -> Self {
        self.letter_spacing = letter_spacing;
        self
    }

    /// Set the body font size
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the paragraph break character
    pub fn with_paragraph_break(mut self, ch: char) -> Self {
        self.paragraph_break = ch;
        self
    }

    /// Set the gap below paragraph breaks
    pub fn with_paragraph_spacing(mut self, spacing: f64) -> Self {
        self.paragraph_spacing = spacing;
        self
    }

    /// Set the first-row paragraph indent
    pub fn with_before_paragraph(mut self, indent: f64) -> Self {
        self.before_paragraph = indent;
        self
    }

    /// Left boundary of the text band
    pub fn left(&self) -> f64 {
        self.padding_left
    }

    /// Right boundary of the text band
    pub fn right(&self) -> f64 {
        self.width - self.padding_right
    }

    /// Usable row width
    pub fn max_row_width(&self) -> f64 {
        self.right() - self.left()
    }
}
