//! Error types for the layout engine

use thiserror::Error;

use super::types::LabelId;

/// Errors that can occur during layout computation
#[derive(Debug, Error)]
pub enum LayoutError {
    /// A glyph index outside the laid-out text
    #[error("glyph index {index} out of range for text of {len} glyphs")]
    IndexOutOfRange { index: usize, len: usize },

    /// A range whose start comes after its end
    #[error("invalid glyph range: start {start} is after end {end}")]
    InvertedRange { start: usize, end: usize },

    /// A row query against a row that holds no glyphs
    #[error("row {row_index} has no glyphs")]
    EmptyRow { row_index: usize },

    /// A path endpoint referencing a label the engine does not know
    #[error("{0} is not known to the layout")]
    UnknownLabel(LabelId),

    /// A path lookup that matched no stored spec
    #[error("no path links {start} and {end}")]
    UnknownPath { start: LabelId, end: LabelId },
}

impl LayoutError {
    /// Create an out-of-range index error
    pub fn index_out_of_range(index: usize, len: usize) -> Self {
        Self::IndexOutOfRange { index, len }
    }

    /// Create an inverted range error
    pub fn inverted_range(start: usize, end: usize) -> Self {
        Self::InvertedRange { start, end }
    }

    /// Create an empty row error
    pub fn empty_row(row_index: usize) -> Self {
        Self::EmptyRow { row_index }
    }
}
