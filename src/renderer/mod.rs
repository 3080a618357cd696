//! Rendering backend seam
//!
//! The layout core never draws. It hands positioned geometry to a
//! [`RenderBackend`], which owns one drawable per rendered node and mutates
//! it in place as the node's geometry changes. Handles are opaque and
//! stable for the lifetime of the node.

pub mod svg;

pub use svg::{SvgBackend, SvgConfig};

use crate::layout::{Glyph, LabelBox, MarkBox, PathSegment};

/// Opaque identifier of one drawable owned by a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DrawableHandle(pub u64);

/// What kind of drawable a handle refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawableKind {
    Glyph,
    Mark,
    Label,
    Path,
}

/// Positioned geometry handed to the backend.
#[derive(Debug, Clone, Copy)]
pub enum Drawable<'a> {
    Glyph(&'a Glyph),
    Mark(&'a MarkBox),
    Label(&'a LabelBox),
    Path(&'a PathSegment),
}

impl Drawable<'_> {
    pub fn kind(&self) -> DrawableKind {
        match self {
            Drawable::Glyph(_) => DrawableKind::Glyph,
            Drawable::Mark(_) => DrawableKind::Mark,
            Drawable::Label(_) => DrawableKind::Label,
            Drawable::Path(_) => DrawableKind::Path,
        }
    }
}

/// A backend that turns laid-out nodes into concrete drawables.
///
/// `resize_content` and `restack_paths` have default no-op implementations
/// for backends that derive extent and layering on their own.
pub trait RenderBackend {
    /// Create a drawable for new geometry and return its handle.
    fn create(&mut self, drawable: Drawable<'_>) -> DrawableHandle;

    /// Replace the geometry of an existing drawable.
    fn update(&mut self, handle: DrawableHandle, drawable: Drawable<'_>);

    /// Destroy a drawable.
    fn remove(&mut self, handle: DrawableHandle);

    /// The document extent changed.
    fn resize_content(&mut self, _width: f64, _height: f64) {}

    /// Path drawables must layer in the given order, first lowest.
    fn restack_paths(&mut self, _order: &[DrawableHandle]) {}
}

/// A rendered glyph: handle plus last-committed geometry.
#[derive(Debug, Clone)]
pub struct GlyphNode {
    pub handle: DrawableHandle,
    pub glyph: Glyph,
}

/// A rendered label box.
#[derive(Debug, Clone)]
pub struct LabelNode {
    pub handle: DrawableHandle,
    pub label: LabelBox,
}

/// A rendered path segment.
#[derive(Debug, Clone)]
pub struct PathNode {
    pub handle: DrawableHandle,
    pub segment: PathSegment,
}

/// A rendered range-highlight mark.
#[derive(Debug, Clone)]
pub struct MarkNode {
    pub handle: DrawableHandle,
    pub mark: MarkBox,
}
