//! text-annotator - entity and relation annotation over flowed text
//!
//! This library lays long-form text out on a scrollable canvas, lets a
//! caller select character ranges, attach labels to those ranges, and draw
//! relationship paths between labels, keeping every placement collision-free
//! and reconciling geometry changes against a stable set of rendered nodes.
//!
//! # Example
//!
//! ```rust
//! use text_annotator::{Annotator, LabelSpec, PathSpec, SvgBackend, SvgConfig};
//!
//! let mut annotator = Annotator::new(SvgBackend::new(SvgConfig::default()));
//! annotator.set_text("Alice employs Bob");
//! let ids = annotator
//!     .add_labels(vec![
//!         LabelSpec::new(0, 4, "PER").with_ex_data("alice"),
//!         LabelSpec::new(14, 16, "PER").with_ex_data("bob"),
//!     ])
//!     .unwrap();
//! annotator
//!     .add_paths(vec![PathSpec::new(ids[0], ids[1], "employs")])
//!     .unwrap();
//!
//! let svg = annotator.backend().document();
//! assert!(svg.contains("<svg"));
//! ```

pub mod annotator;
pub mod diff;
pub mod events;
pub mod layout;
pub mod measure;
pub mod renderer;
pub mod selection;
pub mod style;

pub use annotator::{Annotator, ClickOutcome, LinkSpec};
pub use events::{EventBus, EventKind, LayoutEvent, SubscriberId};
pub use layout::{
    BoundingBox, Glyph, LabelBox, LabelId, LabelSpec, LayoutEngine, LayoutError, LayoutOptions,
    PathSegment, PathSpec, Point, WrapOffset,
};
pub use renderer::{Drawable, DrawableHandle, DrawableKind, RenderBackend, SvgBackend, SvgConfig};
pub use selection::{SelectionPhase, SelectionRange};
pub use style::{LabelStyle, MarkStyle, PathStyle, Theme, ThemeError};

use thiserror::Error;

/// Errors surfaced by the public annotation operations
#[derive(Debug, Error)]
pub enum AnnotateError {
    /// Error during layout computation
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),

    /// Error loading a theme
    #[error("theme error: {0}")]
    Theme(#[from] ThemeError),

    /// A label description matched nothing
    #[error("no label matches the description")]
    LabelNotFound,

    /// A label description matched more than one label
    #[error("label description is ambiguous: {matches} labels match")]
    AmbiguousLabel { matches: usize },

    /// A path description matched nothing
    #[error("no path matches the description")]
    PathNotFound,

    /// A path description matched more than one path
    #[error("path description is ambiguous: {matches} paths match")]
    AmbiguousPath { matches: usize },

    /// A selection gesture resolved to nothing selectable; carries whatever
    /// a multi-select session had already completed
    #[error("selection resolved to an empty range")]
    EmptySelection { partial: Vec<SelectionRange> },

    /// A pointer event arrived with no selection session armed
    #[error("no selection session is active")]
    NoActiveSelection,
}

/// Lay out and render one annotated document to an SVG string.
///
/// Labels are added first; links then address them by their `ex_data`
/// payloads. This is the one-shot entry point used by the CLI.
///
/// # Example
///
/// ```rust
/// use text_annotator::{render_svg, LabelSpec, LayoutOptions, LinkSpec, Theme};
///
/// let svg = render_svg(
///     "Alice employs Bob",
///     vec![
///         LabelSpec::new(0, 4, "PER").with_ex_data("alice"),
///         LabelSpec::new(14, 16, "PER").with_ex_data("bob"),
///     ],
///     vec![LinkSpec::new("alice", "bob", "employs")],
///     LayoutOptions::default(),
///     Theme::default(),
/// )
/// .unwrap();
/// assert!(svg.contains("PER"));
/// assert!(svg.contains("employs"));
/// ```
pub fn render_svg(
    text: &str,
    labels: Vec<LabelSpec>,
    links: Vec<LinkSpec>,
    options: LayoutOptions,
    theme: Theme,
) -> Result<String, AnnotateError> {
    let config = SvgConfig::default()
        .with_font_size(options.font_size)
        .with_background_color(theme.background_color.0.clone());
    let mut annotator = Annotator::with_config(SvgBackend::new(config), options, theme);
    annotator.set_text(text);
    annotator.add_labels(labels)?;
    for link in &links {
        annotator.add_link(link)?;
    }
    Ok(annotator.backend().document())
}
