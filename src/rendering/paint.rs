//! Plain-data visual tree handed to a rasterizer.
//!
//! Positions are absolute pixels within the tree's canvas. Text positions
//! are baselines.

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    /// Build a color from a `0xRRGGBB` literal.
    pub const fn hex(rgb: u32) -> Self {
        Color((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8)
    }

    /// `rrggbb`, without a leading `#`.
    pub fn to_hex(self) -> String {
        format!("{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }

    /// `#rrggbb`, as used by SVG and CSS.
    pub fn to_css(self) -> String {
        format!("#{}", self.to_hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    pub fn center(&self) -> (i32, i32) {
        (
            self.x + (self.width / 2) as i32,
            self.y + (self.height / 2) as i32,
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stroke {
    pub color: Color,
    pub width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// A run of text sharing one color.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSpan {
    pub content: String,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A rectangle, optionally filled, stroked and rounded, with children
    /// painted on top of it.
    Block {
        rect: Rect,
        fill: Option<Color>,
        stroke: Option<Stroke>,
        radius: u32,
        children: Vec<Node>,
    },
    /// One line of text.
    Text {
        x: i32,
        y: i32,
        size: u32,
        anchor: TextAnchor,
        spans: Vec<TextSpan>,
    },
    /// A remote image scaled to cover `rect`. `placeholder` is painted when
    /// the source could not be fetched.
    Image {
        rect: Rect,
        src: String,
        circle: bool,
        placeholder: Color,
    },
}

impl Node {
    pub fn block(rect: Rect, fill: Option<Color>) -> Self {
        Node::Block {
            rect,
            fill,
            stroke: None,
            radius: 0,
            children: Vec::new(),
        }
    }

    /// Single-color text node.
    pub fn text(x: i32, y: i32, size: u32, color: Color, content: impl Into<String>) -> Self {
        Node::Text {
            x,
            y,
            size,
            anchor: TextAnchor::Start,
            spans: vec![TextSpan {
                content: content.into(),
                color,
            }],
        }
    }

    /// Concatenated text of a `Text` node.
    pub fn text_content(&self) -> Option<String> {
        match self {
            Node::Text { spans, .. } => Some(spans.iter().map(|s| s.content.as_str()).collect()),
            _ => None,
        }
    }

    fn visit<'a>(&'a self, out: &mut Vec<&'a Node>) {
        out.push(self);
        if let Node::Block { children, .. } = self {
            for child in children {
                child.visit(out);
            }
        }
    }
}

/// Declarative description of one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualTree {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    pub nodes: Vec<Node>,
}

impl VisualTree {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        Self {
            width,
            height,
            background,
            nodes: Vec::new(),
        }
    }

    /// All nodes in paint order (parents before children).
    pub fn walk(&self) -> Vec<&Node> {
        let mut out = Vec::new();
        for node in &self.nodes {
            node.visit(&mut out);
        }
        out
    }

    /// Text of every text node, in paint order.
    pub fn texts(&self) -> Vec<String> {
        self.walk().into_iter().filter_map(Node::text_content).collect()
    }

    /// Distinct image sources, in paint order.
    pub fn image_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for node in self.walk() {
            if let Node::Image { src, .. } = node {
                if !sources.contains(src) {
                    sources.push(src.clone());
                }
            }
        }
        sources
    }

    /// Every color referenced by the tree, background first.
    pub fn colors(&self) -> Vec<Color> {
        let mut colors = vec![self.background];
        for node in self.walk() {
            match node {
                Node::Block { fill, stroke, .. } => {
                    colors.extend(fill);
                    colors.extend(stroke.map(|s| s.color));
                }
                Node::Text { spans, .. } => colors.extend(spans.iter().map(|s| s.color)),
                Node::Image { placeholder, .. } => colors.push(*placeholder),
            }
        }
        colors
    }
}
