//! SVG string backend
//!
//! Renders each drawable as an SVG fragment and assembles the document in
//! four layers: marks under the text, then paths, then labels on top. Path
//! fragments follow the stacking order the coordinator reports, so lower
//! runs paint first.

use std::collections::HashMap;

use crate::layout::routing::arrow_tips;
use crate::layout::{Glyph, LabelBox, MarkBox, PathSegment};
use crate::measure::{text_extent, CAPTION_FONT_SIZE};

use super::{Drawable, DrawableHandle, DrawableKind, RenderBackend};

/// Configuration options for SVG output
#[derive(Debug, Clone)]
pub struct SvgConfig {
    /// Prefix for CSS class names (e.g. "ta-" for "ta-label")
    pub class_prefix: Option<String>,

    /// Body text font size used for glyph elements
    pub font_size: f64,

    /// Document background color
    pub background_color: String,

    /// Whether to include the XML declaration
    pub standalone: bool,
}

impl Default for SvgConfig {
    fn default() -> Self {
        Self {
            class_prefix: Some("ta-".to_string()),
            font_size: 16.0,
            background_color: "#ffffff".to_string(),
            standalone: true,
        }
    }
}

impl SvgConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the CSS class prefix
    pub fn with_class_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.class_prefix = Some(prefix.into());
        self
    }

    /// Remove the CSS class prefix
    pub fn without_class_prefix(mut self) -> Self {
        self.class_prefix = None;
        self
    }

    /// Set the body font size
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Set the background color
    pub fn with_background_color(mut self, color: impl Into<String>) -> Self {
        self.background_color = color.into();
        self
    }

    /// Set whether output carries an XML declaration
    pub fn with_standalone(mut self, standalone: bool) -> Self {
        self.standalone = standalone;
        self
    }
}

struct Fragment {
    kind: DrawableKind,
    markup: String,
}

/// A [`RenderBackend`] producing a standalone SVG document string.
pub struct SvgBackend {
    config: SvgConfig,
    next: u64,
    fragments: HashMap<DrawableHandle, Fragment>,
    /// Insertion order per layer; paths reordered by `restack_paths`
    glyph_order: Vec<DrawableHandle>,
    mark_order: Vec<DrawableHandle>,
    label_order: Vec<DrawableHandle>,
    path_order: Vec<DrawableHandle>,
    width: f64,
    height: f64,
}

impl SvgBackend {
    pub fn new(config: SvgConfig) -> Self {
        Self {
            config,
            next: 0,
            fragments: HashMap::new(),
            glyph_order: Vec::new(),
            mark_order: Vec::new(),
            label_order: Vec::new(),
            path_order: Vec::new(),
            width: 0.0,
            height: 0.0,
        }
    }

    fn prefix(&self) -> &str {
        self.config.class_prefix.as_deref().unwrap_or("")
    }

    fn render_fragment(&self, drawable: &Drawable<'_>) -> String {
        match drawable {
            Drawable::Glyph(glyph) => self.render_glyph(glyph),
            Drawable::Mark(mark) => self.render_mark(mark),
            Drawable::Label(label) => self.render_label(label),
            Drawable::Path(segment) => self.render_path(segment),
        }
    }

    fn render_glyph(&self, glyph: &Glyph) -> String {
        format!(
            r#"<text class="{prefix}glyph" x="{x}" y="{y}" font-size="{size}" dominant-baseline="text-before-edge">{ch}</text>"#,
            prefix = self.prefix(),
            x = glyph.x,
            y = glyph.y,
            size = self.config.font_size,
            ch = escape_xml(&glyph.ch.to_string()),
        )
    }

    fn render_mark(&self, mark: &MarkBox) -> String {
        let mut markup = format!(
            r#"<g class="{prefix}mark" fill="{fill}" opacity="{opacity}">"#,
            prefix = self.prefix(),
            fill = escape_xml(&mark.style.background_color),
            opacity = mark.style.opacity,
        );
        for piece in &mark.rects {
            markup.push_str(&format!(
                r#"<rect x="{x}" y="{y}" width="{w}" height="{h}"/>"#,
                x = piece.rect.x,
                y = piece.rect.y,
                w = piece.rect.width,
                h = piece.rect.height,
            ));
        }
        markup.push_str("</g>");
        markup
    }

    fn render_label(&self, label: &LabelBox) -> String {
        format!(
            concat!(
                r#"<g class="{prefix}label">"#,
                r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" rx="{rx}" fill="{fill}"/>"#,
                r#"<text x="{tx}" y="{ty}" font-size="{size}" fill="{color}" dominant-baseline="text-before-edge">{caption}</text>"#,
                "</g>"
            ),
            prefix = self.prefix(),
            x = label.x,
            y = label.y,
            w = label.width,
            h = label.height,
            rx = label.style.border_radius,
            fill = escape_xml(&label.style.background_color),
            tx = label.x + 2.0,
            ty = label.y + 2.0,
            size = CAPTION_FONT_SIZE,
            color = escape_xml(&label.style.color),
            caption = escape_xml(&label.text),
        )
    }

    fn render_path(&self, segment: &PathSegment) -> String {
        let [p1, p2, p3, p4] = segment.points;
        let mut markup = format!(
            r#"<g class="{prefix}path"><polyline points="{x1},{y1} {x2},{y2} {x3},{y3} {x4},{y4}" fill="none" stroke="{stroke}" stroke-width="1.5"/>"#,
            prefix = self.prefix(),
            x1 = p1.x,
            y1 = p1.y,
            x2 = p2.x,
            y2 = p2.y,
            x3 = p3.x,
            y3 = p3.y,
            x4 = p4.x,
            y4 = p4.y,
            stroke = escape_xml(&segment.style.border_color),
        );

        // connectors carry no caption of their own
        if !segment.connect {
            let caption = text_extent(&segment.text, CAPTION_FONT_SIZE);
            let caption_x = (p2.x + p3.x - caption.width) / 2.0;
            let caption_y = p3.y - caption.height / 2.0;
            markup.push_str(&format!(
                r#"<rect x="{x}" y="{y}" width="{w}" height="{h}" fill="{fill}"/>"#,
                x = caption_x,
                y = caption_y,
                w = caption.width,
                h = caption.height,
                fill = escape_xml(&self.config.background_color),
            ));
            markup.push_str(&format!(
                r#"<text x="{x}" y="{y}" font-size="{size}" fill="{color}" dominant-baseline="text-before-edge">{caption}</text>"#,
                x = caption_x,
                y = caption_y,
                size = CAPTION_FONT_SIZE,
                color = escape_xml(&segment.style.border_color),
                caption = escape_xml(&segment.text),
            ));
        }

        if segment.is_arrow {
            if let Some((near, far)) = arrow_tips(p4, p3) {
                markup.push_str(&format!(
                    r#"<polyline points="{ax},{ay} {tx},{ty} {bx},{by}" fill="{fill}" stroke="{fill}"/>"#,
                    ax = near.x,
                    ay = near.y,
                    tx = p4.x,
                    ty = p4.y,
                    bx = far.x,
                    by = far.y,
                    fill = escape_xml(&segment.style.border_color),
                ));
            }
        }
        markup.push_str("</g>");
        markup
    }

    /// Assemble the full SVG document from the current drawables.
    pub fn document(&self) -> String {
        let mut out = String::new();
        if self.config.standalone {
            out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        }
        out.push_str(&format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" style="background-color:{bg}">"#,
            w = self.width,
            h = self.height,
            bg = escape_xml(&self.config.background_color),
        ));
        out.push('\n');

        for order in [
            &self.mark_order,
            &self.glyph_order,
            &self.path_order,
            &self.label_order,
        ] {
            for handle in order {
                if let Some(fragment) = self.fragments.get(handle) {
                    out.push_str("  ");
                    out.push_str(&fragment.markup);
                    out.push('\n');
                }
            }
        }
        out.push_str("</svg>\n");
        out
    }
}

impl RenderBackend for SvgBackend {
    fn create(&mut self, drawable: Drawable<'_>) -> DrawableHandle {
        self.next += 1;
        let handle = DrawableHandle(self.next);
        let kind = drawable.kind();
        let markup = self.render_fragment(&drawable);
        self.fragments.insert(handle, Fragment { kind, markup });
        match kind {
            DrawableKind::Glyph => self.glyph_order.push(handle),
            DrawableKind::Mark => self.mark_order.push(handle),
            DrawableKind::Label => self.label_order.push(handle),
            DrawableKind::Path => self.path_order.push(handle),
        }
        handle
    }

    fn update(&mut self, handle: DrawableHandle, drawable: Drawable<'_>) {
        let markup = self.render_fragment(&drawable);
        if let Some(fragment) = self.fragments.get_mut(&handle) {
            fragment.markup = markup;
        }
    }

    fn remove(&mut self, handle: DrawableHandle) {
        if let Some(fragment) = self.fragments.remove(&handle) {
            let order = match fragment.kind {
                DrawableKind::Glyph => &mut self.glyph_order,
                DrawableKind::Mark => &mut self.mark_order,
                DrawableKind::Label => &mut self.label_order,
                DrawableKind::Path => &mut self.path_order,
            };
            order.retain(|existing| *existing != handle);
        }
    }

    fn resize_content(&mut self, width: f64, height: f64) {
        self.width = width;
        self.height = height;
    }

    fn restack_paths(&mut self, order: &[DrawableHandle]) {
        self.path_order = order.to_vec();
    }
}

/// Escape text content and attribute values for XML.
fn escape_xml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
