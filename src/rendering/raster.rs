//! Rasterizers turn a `VisualTree` into encoded image bytes.
//!
//! [`SvgRasterizer`] serializes the tree to SVG and renders it with resvg.
//! Remote images are embedded as base64 data URIs from an [`AssetStore`];
//! sources missing from the store are painted with their placeholder color.

use std::path::Path;
use std::sync::Arc;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use resvg::tiny_skia;
use resvg::usvg::{self, fontdb};

use super::paint::{Node, Rect, TextAnchor, VisualTree};
use super::AssetStore;
use crate::{CardConfig, Error, Result};

const FONT_FAMILY: &str = "Inter, 'DejaVu Sans', Helvetica, Arial, sans-serif";

/// Backend that rasterizes a visual tree.
pub trait Rasterizer: Send + Sync {
    /// Encode `tree` as an image. `assets` holds the bytes of the tree's image
    /// sources that could be fetched.
    fn rasterize(&self, tree: &VisualTree, assets: &AssetStore) -> Result<Vec<u8>>;

    /// MIME type of the bytes produced by `rasterize`.
    fn content_type(&self) -> &'static str {
        "image/png"
    }
}

/// PNG rasterizer backed by resvg.
#[derive(Debug, Clone)]
pub struct SvgRasterizer {
    fontdb: Arc<fontdb::Database>,
}

impl SvgRasterizer {
    pub fn new(fontdb: fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    /// System fonts plus the configured font directory, if any.
    pub fn from_config(config: &CardConfig) -> Self {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        if let Some(dir) = &config.font_dir {
            load_font_dir(&mut db, dir);
        }
        log::info!("loaded {} font faces", db.len());
        Self::new(db)
    }
}

fn load_font_dir(db: &mut fontdb::Database, dir: &Path) {
    if !dir.is_dir() {
        log::warn!("font directory {} does not exist", dir.display());
        return;
    }
    db.load_fonts_dir(dir);
}

impl Rasterizer for SvgRasterizer {
    fn rasterize(&self, tree: &VisualTree, assets: &AssetStore) -> Result<Vec<u8>> {
        let svg = to_svg(tree, assets);

        let mut options = usvg::Options::default();
        options.font_family = "Inter".to_string();
        options.fontdb = self.fontdb.clone();

        let rtree = usvg::Tree::from_str(&svg, &options)
            .map_err(|e| Error::RenderError(format!("Failed to parse SVG: {}", e)))?;

        let mut pixmap = tiny_skia::Pixmap::new(tree.width, tree.height)
            .ok_or_else(|| Error::RenderError(format!("Invalid canvas size {}x{}", tree.width, tree.height)))?;

        resvg::render(&rtree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

        pixmap
            .encode_png()
            .map_err(|e| Error::RenderError(format!("Failed to encode PNG: {}", e)))
    }
}

/// Serialize a visual tree to a standalone SVG document.
pub fn to_svg(tree: &VisualTree, assets: &AssetStore) -> String {
    let mut out = format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{font}">"#,
        w = tree.width,
        h = tree.height,
        font = FONT_FAMILY,
    );
    out.push_str(&format!(
        r#"<rect width="{}" height="{}" fill="{}"/>"#,
        tree.width,
        tree.height,
        tree.background.to_css()
    ));

    let mut clip_ids = 0usize;
    for node in &tree.nodes {
        write_node(&mut out, node, assets, &mut clip_ids);
    }
    out.push_str("</svg>");
    out
}

fn write_node(out: &mut String, node: &Node, assets: &AssetStore, clip_ids: &mut usize) {
    match node {
        Node::Block {
            rect,
            fill,
            stroke,
            radius,
            children,
        } => {
            if fill.is_some() || stroke.is_some() {
                let fill = fill.map(|c| c.to_css()).unwrap_or_else(|| "none".into());
                let (stroke_color, stroke_width) = match stroke {
                    Some(s) => (s.color.to_css(), s.width),
                    None => ("none".to_string(), 0),
                };
                // Strokes are drawn inside the box.
                let inset = stroke_width as f32 / 2.0;
                out.push_str(&format!(
                    r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" stroke="{}" stroke-width="{}"/>"#,
                    rect.x as f32 + inset,
                    rect.y as f32 + inset,
                    (rect.width as f32 - 2.0 * inset).max(0.0),
                    (rect.height as f32 - 2.0 * inset).max(0.0),
                    radius,
                    fill,
                    stroke_color,
                    stroke_width
                ));
            }
            for child in children {
                write_node(out, child, assets, clip_ids);
            }
        }
        Node::Text {
            x,
            y,
            size,
            anchor,
            spans,
        } => {
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            out.push_str(&format!(
                r#"<text x="{}" y="{}" font-size="{}" text-anchor="{}" xml:space="preserve">"#,
                x, y, size, anchor
            ));
            for span in spans {
                out.push_str(&format!(
                    r#"<tspan fill="{}">{}</tspan>"#,
                    span.color.to_css(),
                    escape_xml(&span.content)
                ));
            }
            out.push_str("</text>");
        }
        Node::Image {
            rect,
            src,
            circle,
            placeholder,
        } => {
            let clip = if *circle {
                *clip_ids += 1;
                let id = format!("clip{}", clip_ids);
                let (cx, cy) = rect.center();
                out.push_str(&format!(
                    r#"<clipPath id="{}"><circle cx="{}" cy="{}" r="{}"/></clipPath>"#,
                    id,
                    cx,
                    cy,
                    rect.width.min(rect.height) / 2
                ));
                format!(r#" clip-path="url(#{})""#, id)
            } else {
                String::new()
            };

            match assets.get(src) {
                Some(bytes) => out.push_str(&format!(
                    r#"<image x="{}" y="{}" width="{}" height="{}" preserveAspectRatio="xMidYMid slice" xlink:href="data:{};base64,{}"{}/>"#,
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    sniff_mime(bytes),
                    BASE64.encode(bytes),
                    clip
                )),
                None => out.push_str(&placeholder_shape(rect, placeholder.to_css(), &clip)),
            }
        }
    }
}

fn placeholder_shape(rect: &Rect, fill: String, clip: &str) -> String {
    format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{}"{}/>"#,
        rect.x, rect.y, rect.width, rect.height, fill, clip
    )
}

/// Image MIME type from magic bytes; PNG when unknown.
fn sniff_mime(bytes: &[u8]) -> &'static str {
    if bytes.starts_with(&[0xff, 0xd8, 0xff]) {
        "image/jpeg"
    } else if bytes.starts_with(b"GIF8") {
        "image/gif"
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        "image/webp"
    } else {
        "image/png"
    }
}

/// Escape markup and replace characters XML 1.0 cannot carry with U+FFFD.
fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c if is_xml_char(c) => out.push(c),
            _ => out.push(char::REPLACEMENT_CHARACTER),
        }
    }
    out
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..='\u{10FFFF}')
}
