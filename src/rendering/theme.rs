//! Light and dark color palettes

use super::paint::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark_flag(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn palette(self) -> Palette {
        match self {
            Theme::Light => LIGHT,
            Theme::Dark => DARK,
        }
    }
}

/// Every color a profile card uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub canvas: Color,
    pub background: Color,
    pub text: Color,
    pub muted: Color,
    pub handle_prefix: Color,
    pub handle: Color,
    pub border: Color,
    /// Level 0 through 4
    pub activity: [Color; 5],
    pub qr_background: Color,
    pub qr_foreground: Color,
}

const LIGHT: Palette = Palette {
    canvas: Color::hex(0xf8fafc),
    background: Color::hex(0xffffff),
    text: Color::hex(0x000000),
    muted: Color::hex(0x64748b),
    handle_prefix: Color::hex(0x94a3b8),
    handle: Color::hex(0x94a3b8),
    border: Color::hex(0xe5e7eb),
    activity: [
        Color::hex(0xf1f5f9),
        Color::hex(0xdcfce7),
        Color::hex(0xbbf7d0),
        Color::hex(0x86efac),
        Color::hex(0x4ade80),
    ],
    qr_background: Color::hex(0xffffff),
    qr_foreground: Color::hex(0x64748b),
};

const DARK: Palette = Palette {
    canvas: Color::hex(0x020617),
    background: Color::hex(0x0f172a),
    text: Color::hex(0xe2e8f0),
    muted: Color::hex(0xcbd5e1),
    handle_prefix: Color::hex(0x64748b),
    handle: Color::hex(0xcbd5e1),
    border: Color::hex(0x334155),
    activity: [
        Color::hex(0x334155),
        Color::hex(0x14532d),
        Color::hex(0x166534),
        Color::hex(0x15803d),
        Color::hex(0x16a34a),
    ],
    qr_background: Color::hex(0x0f172a),
    qr_foreground: Color::hex(0xcbd5e1),
};

/// Light palette used by error cards.
pub const ERROR_HEADER: Color = Color::hex(0xdc2626);
pub const ERROR_HEADER_TEXT: Color = Color::hex(0xffffff);

impl Palette {
    /// Cell color for an activity level; levels above 4 use the top color.
    pub fn activity(&self, level: u8) -> Color {
        self.activity[usize::from(level.min(4))]
    }

    /// Named tokens, for exhaustive comparisons.
    pub fn tokens(&self) -> Vec<(&'static str, Color)> {
        let mut tokens = vec![
            ("canvas", self.canvas),
            ("background", self.background),
            ("text", self.text),
            ("muted", self.muted),
            ("handle_prefix", self.handle_prefix),
            ("handle", self.handle),
            ("border", self.border),
            ("qr_background", self.qr_background),
            ("qr_foreground", self.qr_foreground),
        ];
        const LEVELS: [&str; 5] = ["activity0", "activity1", "activity2", "activity3", "activity4"];
        tokens.extend(LEVELS.iter().copied().zip(self.activity));
        tokens
    }
}
