//! Rendering: visual tree, themes, layout and rasterization

pub mod layout;
pub mod paint;
pub mod raster;
pub mod theme;

use std::collections::HashMap;

pub use paint::{Color, Node, Rect, VisualTree};
pub use theme::{Palette, Theme};

/// An encoded image ready to be sent as a response body.
#[derive(Debug, Clone)]
pub struct RenderedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
    pub content_type: &'static str,
    pub cache_control: Option<&'static str>,
}

impl RenderedImage {
    /// Response headers for this image.
    pub fn headers(&self) -> Vec<(&'static str, &'static str)> {
        let mut headers = vec![("content-type", self.content_type)];
        if let Some(cache) = self.cache_control {
            headers.push(("cache-control", cache));
        }
        headers
    }
}

/// Downloaded image bytes keyed by source URL.
#[derive(Debug, Clone, Default)]
pub struct AssetStore {
    assets: HashMap<String, Vec<u8>>,
}

impl AssetStore {
    pub fn insert(&mut self, src: String, bytes: Vec<u8>) {
        self.assets.insert(src, bytes);
    }

    pub fn get(&self, src: &str) -> Option<&[u8]> {
        self.assets.get(src).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}
