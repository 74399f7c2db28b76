use std::sync::Arc;

use anyhow::Context;

use crate::{
    assets::store::PreparedImage,
    foundation::error::{ClipforgeError, ClipforgeResult},
    timeline::model::{ShapeKind, ShapePayload, TextPayload},
};

/// Edge length of a shape layer before scaling.
pub const SHAPE_SIZE: f64 = 100.0;

const MAX_DIM: u32 = 16_384;

/// Turns text and shape payloads into rasters via generated SVG.
#[derive(Clone)]
pub struct SvgRasterizer {
    fontdb: Arc<usvg::fontdb::Database>,
}

impl std::fmt::Debug for SvgRasterizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SvgRasterizer")
            .field("faces", &self.fontdb.len())
            .finish()
    }
}

impl Default for SvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl SvgRasterizer {
    /// Rasterizer backed by the system font set.
    pub fn new() -> Self {
        let mut db = usvg::fontdb::Database::new();
        db.load_system_fonts();
        Self::with_fontdb(db)
    }

    /// Rasterizer backed by a caller-provided font set.
    pub fn with_fontdb(db: usvg::fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(db),
        }
    }

    /// Rasterize a text clip at its estimated layer size.
    pub fn rasterize_text(&self, text: &TextPayload) -> ClipforgeResult<PreparedImage> {
        self.rasterize_svg(&text_svg(text))
    }

    /// Rasterize a shape clip into a [`SHAPE_SIZE`] square.
    pub fn rasterize_shape(&self, shape: &ShapePayload) -> ClipforgeResult<PreparedImage> {
        self.rasterize_svg(&shape_svg(shape))
    }

    /// Parse and rasterize an SVG document at its intrinsic size.
    pub fn rasterize_svg(&self, svg: &str) -> ClipforgeResult<PreparedImage> {
        let opts = usvg::Options {
            fontdb: self.fontdb.clone(),
            ..Default::default()
        };
        let tree = usvg::Tree::from_data(svg.as_bytes(), &opts).context("parse svg tree")?;
        rasterize_tree(&tree)
    }
}

fn rasterize_tree(tree: &usvg::Tree) -> ClipforgeResult<PreparedImage> {
    let size = tree.size();
    let to_px = |v: f32| -> ClipforgeResult<u32> {
        if !v.is_finite() || v <= 0.0 {
            return Err(ClipforgeError::render("svg has invalid width/height"));
        }
        Ok((v.ceil() as u32).max(1))
    };
    let full_w = to_px(size.width())?;
    let full_h = to_px(size.height())?;

    // Oversized layers are rasterized at reduced size; `scale` lets the
    // compositor place them at their full layer size.
    let longest = full_w.max(full_h);
    let scale = if longest > MAX_DIM {
        f64::from(MAX_DIM) / f64::from(longest)
    } else {
        1.0
    };
    let fit = |v: u32| ((f64::from(v) * scale).floor() as u32).clamp(1, MAX_DIM);
    let (width, height) = if scale < 1.0 {
        tracing::debug!(full_w, full_h, scale, "downscaling oversized svg raster");
        (fit(full_w), fit(full_h))
    } else {
        (full_w, full_h)
    };

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| ClipforgeError::render("failed to allocate svg pixmap"))?;
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(scale as f32, scale as f32),
        &mut pixmap.as_mut(),
    );

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(pixmap.take()),
        scale,
    })
}

/// Approximate layer box for a single line of text.
pub fn text_box(text: &TextPayload) -> (f64, f64) {
    let chars = text.content.chars().count().max(1) as f64;
    let w = (chars * text.font_size * 0.6).ceil().max(1.0);
    let h = (text.font_size * 1.25).ceil().max(1.0);
    (w, h)
}

/// Single-line SVG for a text clip, sized by [`text_box`].
pub fn text_svg(text: &TextPayload) -> String {
    let (w, h) = text_box(text);
    let baseline = text.font_size;
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><text x="{cx}" y="{baseline}" text-anchor="middle" font-family="{font}" font-size="{size}" fill="{fill}">{content}</text></svg>"#,
        cx = w / 2.0,
        font = xml_escape(&text.font),
        size = text.font_size,
        fill = xml_escape(&text.color),
        content = xml_escape(&text.content),
    )
}

/// SVG for a shape clip, filling a [`SHAPE_SIZE`] square.
pub fn shape_svg(shape: &ShapePayload) -> String {
    let sw = shape.stroke_width;
    // Inset by half the stroke so it stays inside the layer box.
    let inset = sw / 2.0;
    let s = SHAPE_SIZE;
    let body = match shape.shape_type {
        ShapeKind::Rectangle => format!(
            r#"<rect x="{inset}" y="{inset}" width="{w}" height="{w}"/>"#,
            w = (s - sw).max(0.0)
        ),
        ShapeKind::Circle => format!(
            r#"<circle cx="{c}" cy="{c}" r="{r}"/>"#,
            c = s / 2.0,
            r = (s / 2.0 - inset).max(0.0)
        ),
        ShapeKind::Triangle => format!(
            r#"<polygon points="{mid},{inset} {far},{far} {inset},{far}"/>"#,
            mid = s / 2.0,
            far = s - inset
        ),
    };
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{s}" height="{s}" viewBox="0 0 {s} {s}"><g fill="{fill}" stroke="{stroke}" stroke-width="{sw}">{body}</g></svg>"#,
        fill = xml_escape(&shape.fill_color),
        stroke = xml_escape(&shape.stroke_color),
    )
}

/// Characters XML 1.0 allows in documents.
fn is_xml_char(c: char) -> bool {
    matches!(
        c,
        '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}'
    )
}

/// Escape markup and drop characters XML cannot carry.
fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
