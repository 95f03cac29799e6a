//! Card layout: turns a profile and its activity into a `VisualTree`.
//!
//! Geometry is fixed to the 1200×628 card. Text is measured with an average
//! glyph advance, so wrapping is approximate but deterministic.

use chrono::{DateTime, Utc};

use super::paint::{Node, Rect, Stroke, TextAnchor, TextSpan, VisualTree};
use super::theme::{Palette, Theme, ERROR_HEADER, ERROR_HEADER_TEXT};
use crate::activity::{WeeklyActivity, DAYS_PER_WEEK};
use crate::github::ProfileRecord;
use crate::Viewport;

/// Host shown in front of the login on the handle line.
pub const DISPLAY_HOST: &str = "github.com/";

const PAD: i32 = 32;
const FOOTER_HEIGHT: u32 = 100;
const FOOTER_PAD: i32 = 8;
const AVATAR_SIZE: u32 = 256;
const CELL_SIZE: u32 = 8;
const CELL_PITCH: i32 = 12;
const QR_SIZE: u32 = 84;
const GLYPH_ADVANCE: f32 = 0.55;

/// Build the profile card.
///
/// `qr_src` is the URL of the QR code image for the profile's canonical URL.
pub fn profile_card(
    profile: &ProfileRecord,
    activity: &WeeklyActivity,
    theme: Theme,
    qr_src: &str,
) -> VisualTree {
    let palette = theme.palette();
    let Viewport { width, height } = Viewport::default();
    let mut tree = VisualTree::new(width, height, palette.canvas);

    let card = Rect::new(
        PAD,
        PAD,
        width - 2 * PAD as u32,
        height - 2 * PAD as u32,
    );
    let footer_top = card.y + card.height as i32 - FOOTER_HEIGHT as i32;
    let upper = Rect::new(card.x, card.y, card.width, (footer_top - card.y) as u32);
    let center_y = upper.y + (upper.height / 2) as i32;

    let mut children = vec![Node::Block {
        rect: upper,
        fill: None,
        stroke: Some(Stroke {
            color: palette.border,
            width: 4,
        }),
        radius: 0,
        children: Vec::new(),
    }];
    children.extend(avatar_column(profile, &palette, card, center_y));
    children.extend(details_column(profile, &palette, card, center_y));
    children.push(footer(
        activity,
        &palette,
        Rect::new(card.x, footer_top, card.width, FOOTER_HEIGHT),
        qr_src,
    ));

    tree.nodes.push(Node::Block {
        rect: card,
        fill: Some(palette.background),
        stroke: None,
        radius: 0,
        children,
    });
    tree
}

fn avatar_column(profile: &ProfileRecord, palette: &Palette, card: Rect, center_y: i32) -> Vec<Node> {
    let column_right = card.x + (card.width / 3) as i32 - 48;
    let column_height = (AVATAR_SIZE + 16 + 28) as i32;
    let top = center_y - column_height / 2 - 24;

    let avatar = Rect::new(column_right - AVATAR_SIZE as i32, top, AVATAR_SIZE, AVATAR_SIZE);
    let mut nodes = vec![Node::Image {
        rect: avatar,
        src: profile.avatar_url.clone(),
        circle: true,
        placeholder: palette.border,
    }];

    if let Some(label) = joined_label(&profile.created_at) {
        nodes.push(Node::Text {
            x: avatar.center().0,
            y: baseline(avatar.y + AVATAR_SIZE as i32 + 16, 28, 20),
            size: 20,
            anchor: TextAnchor::Middle,
            spans: vec![TextSpan {
                content: label,
                color: palette.muted,
            }],
        });
    }
    nodes
}

fn details_column(profile: &ProfileRecord, palette: &Palette, card: Rect, center_y: i32) -> Vec<Node> {
    let column_width = card.width / 3;
    let x = card.x + column_width as i32;
    let max_width = card.width - column_width - 64;

    let bio_lines = profile
        .bio
        .as_deref()
        .and_then(clean_bio)
        .map(|bio| wrap_text(&bio, 24, max_width))
        .unwrap_or_default();
    let badge_rows = flow_badges(&badges(profile), 24, max_width);

    let content_height = 60
        + (36 + 8)
        + bio_lines.len() as i32 * 32
        + (32 + 32 + 8)
        + badge_rows.len() as i32 * (32 + 8);
    let mut y = (center_y - content_height / 2).max(card.y + 24);

    let mut nodes = vec![Node::text(x, baseline(y, 60, 60), 60, palette.text, profile.display_name())];
    y += 60;

    nodes.push(Node::Text {
        x,
        y: baseline(y, 36, 30),
        size: 30,
        anchor: TextAnchor::Start,
        spans: vec![
            TextSpan {
                content: DISPLAY_HOST.to_string(),
                color: palette.handle_prefix,
            },
            TextSpan {
                content: profile.login.clone(),
                color: palette.handle,
            },
        ],
    });
    y += 36 + 8;

    for line in bio_lines {
        nodes.push(Node::text(x, baseline(y, 32, 24), 24, palette.text, line));
        y += 32;
    }

    y += 32;
    let stats = format!(
        "👥 {} · {} following",
        followers_label(profile.followers),
        format_count(profile.following)
    );
    nodes.push(Node::text(x, baseline(y, 32, 24), 24, palette.text, stats));
    y += 32 + 8;

    for row in badge_rows {
        for (offset, label) in row {
            nodes.push(Node::text(x + offset, baseline(y, 32, 24), 24, palette.text, label));
        }
        y += 32 + 8;
    }
    nodes
}

fn footer(activity: &WeeklyActivity, palette: &Palette, rect: Rect, qr_src: &str) -> Node {
    let grid_x = rect.x + FOOTER_PAD;
    let grid_y = rect.y + FOOTER_PAD;

    // Keep the most recent weeks when the calendar is wider than the band.
    let room = rect.width as i32 - 2 * FOOTER_PAD - QR_SIZE as i32 - FOOTER_PAD;
    let max_weeks = (room / CELL_PITCH).max(0) as usize;
    let weeks = activity.weeks();
    let shown = &weeks[weeks.len().saturating_sub(max_weeks)..];

    let mut children = Vec::with_capacity(shown.len() * DAYS_PER_WEEK + 1);
    for (w, week) in shown.iter().enumerate() {
        for (d, level) in week.iter().enumerate() {
            children.push(Node::block(
                Rect::new(
                    grid_x + w as i32 * CELL_PITCH + 2,
                    grid_y + d as i32 * CELL_PITCH + 2,
                    CELL_SIZE,
                    CELL_SIZE,
                ),
                Some(palette.activity(*level)),
            ));
        }
    }

    children.push(Node::Image {
        rect: Rect::new(
            rect.x + rect.width as i32 - FOOTER_PAD - QR_SIZE as i32,
            grid_y,
            QR_SIZE,
            QR_SIZE,
        ),
        src: qr_src.to_string(),
        circle: false,
        placeholder: palette.qr_background,
    });

    Node::Block {
        rect,
        fill: None,
        stroke: Some(Stroke {
            color: palette.border,
            width: 1,
        }),
        radius: 0,
        children,
    }
}

/// Build the error card. Always uses the light palette.
pub fn error_card(message: &str) -> VisualTree {
    let palette = Theme::Light.palette();
    let Viewport { width, height } = Viewport::default();
    let mut tree = VisualTree::new(width, height, palette.background);

    let card_width = width / 2;
    let lines = wrap_text(message, 20, card_width - 34);
    let header_height = 52u32;
    let body_height = lines.len().max(1) as u32 * 28 + 32;
    let total = header_height + body_height;
    let x = ((width - card_width) / 2) as i32;
    let top = ((height - total.min(height)) / 2) as i32;

    let body_top = top + header_height as i32;
    let mut body_children = Vec::new();
    for (i, line) in lines.into_iter().enumerate() {
        let line_top = body_top + 16 + i as i32 * 28;
        body_children.push(Node::text(x + 17, baseline(line_top, 28, 20), 20, palette.text, line));
    }

    tree.nodes.push(Node::Block {
        rect: Rect::new(x, top, card_width, total),
        fill: Some(ERROR_HEADER),
        stroke: None,
        radius: 12,
        children: vec![
            Node::text(x + 16, baseline(top + 8, 36, 30), 30, ERROR_HEADER_TEXT, "Error"),
            Node::Block {
                rect: Rect::new(x + 1, body_top, card_width - 2, body_height - 1),
                fill: Some(palette.background),
                stroke: None,
                radius: 11,
                children: body_children,
            },
        ],
    });
    tree
}

/// Baseline of a line of `size` px text vertically centered in a line box.
fn baseline(top: i32, line_height: u32, size: u32) -> i32 {
    top + (line_height as f32 / 2.0 + size as f32 * 0.35).round() as i32
}

fn text_width(text: &str, size: u32) -> u32 {
    (text.chars().count() as f32 * size as f32 * GLYPH_ADVANCE).ceil() as u32
}

/// Greedy word wrap on single spaces.
///
/// Runs of spaces inside a line are preserved; line breaks in the input are
/// kept as hard breaks and blank lines are dropped. Words longer than a line
/// are broken across lines.
pub fn wrap_text(text: &str, size: u32, max_width: u32) -> Vec<String> {
    let chars_per_line = ((max_width as f32 / (size as f32 * GLYPH_ADVANCE)) as usize).max(1);
    let mut lines = Vec::new();

    for paragraph in text.lines() {
        let mut cur = String::new();
        let mut len = 0usize;
        let mut started = false;
        for word in paragraph.split(' ').flat_map(|w| split_long_word(w, chars_per_line)) {
            let word_len = word.chars().count();
            if started && len + 1 + word_len > chars_per_line {
                lines.push(std::mem::take(&mut cur));
                len = 0;
                started = false;
            }
            if started {
                cur.push(' ');
                len += 1;
            }
            cur.push_str(&word);
            len += word_len;
            started = true;
        }
        if !cur.trim().is_empty() {
            lines.push(cur);
        }
    }

    lines
        .into_iter()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect()
}

/// Pieces of at most `max_chars` characters; short words come back whole.
fn split_long_word(word: &str, max_chars: usize) -> Vec<String> {
    if word.chars().count() <= max_chars {
        return vec![word.to_string()];
    }
    let chars: Vec<char> = word.chars().collect();
    chars.chunks(max_chars).map(|c| c.iter().collect()).collect()
}

fn is_pictograph(c: char) -> bool {
    matches!(
        c as u32,
        0x2011..=0x26FF | 0x2700..=0x27BF | 0xE000..=0xF8FF | 0x1F000..=0x1F7FF | 0x1F910..=0x1F9FF
    )
}

/// Remove emoji and pictographic symbols.
pub fn strip_pictographs(text: &str) -> String {
    text.chars().filter(|c| !is_pictograph(*c)).collect()
}

/// Bio as displayed: pictographs stripped, trimmed, `None` when nothing is left.
pub fn clean_bio(bio: &str) -> Option<String> {
    let cleaned = strip_pictographs(bio);
    let trimmed = cleaned.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// `1234567` → `1,234,567`
pub fn format_count(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn followers_label(followers: u64) -> String {
    if followers == 1 {
        "1 follower".to_string()
    } else {
        format!("{} followers", format_count(followers))
    }
}

/// `Since January 2011`, or `None` if the timestamp is not RFC 3339.
pub fn joined_label(created_at: &str) -> Option<String> {
    let created = DateTime::parse_from_rfc3339(created_at).ok()?;
    Some(format!("Since {}", created.with_timezone(&Utc).format("%B %Y")))
}

fn badges(profile: &ProfileRecord) -> Vec<String> {
    let present = |v: &Option<String>| v.as_deref().map(str::trim).filter(|s| !s.is_empty()).map(str::to_string);

    let mut out = Vec::new();
    if let Some(company) = present(&profile.company) {
        out.push(format!("🏢 {}", company));
    }
    if let Some(location) = present(&profile.location) {
        out.push(format!("📍 {}", location));
    }
    if let Some(twitter) = present(&profile.twitter_username) {
        out.push(format!("🕊 @{}", twitter));
    }
    out
}

/// Lay badges out left to right, wrapping when a row is full.
fn flow_badges(labels: &[String], size: u32, max_width: u32) -> Vec<Vec<(i32, String)>> {
    let mut rows: Vec<Vec<(i32, String)>> = Vec::new();
    let mut row = Vec::new();
    let mut x = 0u32;
    for label in labels {
        let w = text_width(label, size) + 16;
        if !row.is_empty() && x + w > max_width {
            rows.push(std::mem::take(&mut row));
            x = 0;
        }
        row.push((x as i32, label.clone()));
        x += w;
    }
    if !row.is_empty() {
        rows.push(row);
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activity::group_weeks;
    use crate::rendering::paint::Color;

    fn profile() -> ProfileRecord {
        ProfileRecord {
            login: "octocat".into(),
            name: Some("The Octocat".into()),
            avatar_url: "https://avatars.example/u/1".into(),
            bio: Some("Hello 👋 World".into()),
            created_at: "2011-01-25T18:44:36Z".into(),
            followers: 12345,
            following: 9,
            company: Some("@github".into()),
            location: Some("San Francisco".into()),
            twitter_username: None,
        }
    }

    fn activity() -> WeeklyActivity {
        let levels: Vec<u8> = (0..52 * 7 + 3).map(|i| (i % 5) as u8).collect();
        group_weeks(&levels)
    }

    const QR: &str = "https://qr.example/?data=x";

    #[test]
    fn bio_strips_pictographs_without_collapsing_spaces() {
        assert_eq!(strip_pictographs("Hello 👋 World"), "Hello  World");
        assert_eq!(clean_bio("  🚀 Rustacean ✨ "), Some("Rustacean".to_string()));
        assert_eq!(clean_bio("👋🎉"), None);

        let tree = profile_card(&profile(), &activity(), Theme::Light, QR);
        assert!(tree.texts().contains(&"Hello  World".to_string()));
    }

    #[test]
    fn bio_is_omitted_when_absent() {
        let mut p = profile();
        p.bio = None;
        let with_bio = profile_card(&profile(), &activity(), Theme::Light, QR);
        let without = profile_card(&p, &activity(), Theme::Light, QR);
        assert_eq!(without.texts().len() + 1, with_bio.texts().len());
    }

    #[test]
    fn follower_wording() {
        assert_eq!(followers_label(1), "1 follower");
        assert_eq!(followers_label(0), "0 followers");
        assert_eq!(followers_label(2), "2 followers");
        assert_eq!(followers_label(1_234_567), "1,234,567 followers");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1000), "1,000");

        let mut p = profile();
        p.followers = 1;
        p.following = 1500;
        let tree = profile_card(&p, &activity(), Theme::Dark, QR);
        assert!(tree.texts().contains(&"👥 1 follower · 1,500 following".to_string()));
    }

    #[test]
    fn header_lines() {
        let tree = profile_card(&profile(), &activity(), Theme::Light, QR);
        let texts = tree.texts();
        assert!(texts.contains(&"The Octocat".to_string()));
        assert!(texts.contains(&"github.com/octocat".to_string()));
        assert!(texts.contains(&"Since January 2011".to_string()));
    }

    #[test]
    fn badges_only_for_present_fields() {
        let mut p = profile();
        p.company = Some(String::new());
        p.twitter_username = Some("octo".into());
        let texts = profile_card(&p, &activity(), Theme::Light, QR).texts();
        assert!(!texts.iter().any(|t| t.starts_with("🏢")));
        assert!(texts.contains(&"📍 San Francisco".to_string()));
        assert!(texts.contains(&"🕊 @octo".to_string()));
    }

    #[test]
    fn badges_wrap_when_row_is_full() {
        let labels = vec!["🏢 ".to_string() + &"a".repeat(40), "📍 ".to_string() + &"b".repeat(40)];
        let rows = flow_badges(&labels, 24, 694);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1][0].0, 0);
    }

    #[test]
    fn grid_has_one_cell_per_day() {
        let activity = activity();
        let tree = profile_card(&profile(), &activity, Theme::Light, QR);
        let palette = Theme::Light.palette();
        let cells = tree
            .walk()
            .into_iter()
            .filter(|n| matches!(n, Node::Block { rect, .. } if rect.width == CELL_SIZE))
            .count();
        assert_eq!(cells, activity.flatten().len());

        let levels = activity.flatten();
        let cell_colors: Vec<Color> = tree
            .walk()
            .into_iter()
            .filter_map(|n| match n {
                Node::Block { rect, fill, .. } if rect.width == CELL_SIZE => *fill,
                _ => None,
            })
            .collect();
        for (level, color) in levels.iter().zip(cell_colors) {
            assert_eq!(palette.activity(*level), color);
        }
    }

    #[test]
    fn grid_keeps_most_recent_weeks_when_too_wide() {
        let levels: Vec<u8> = (0..120 * 7).map(|i| if i < 7 { 4 } else { 0 }).collect();
        let tree = profile_card(&profile(), &group_weeks(&levels), Theme::Light, QR);
        let palette = Theme::Light.palette();
        let hot = tree
            .walk()
            .into_iter()
            .filter(|n| matches!(n, Node::Block { fill: Some(c), rect, .. } if rect.width == CELL_SIZE && *c == palette.activity(4)))
            .count();
        assert_eq!(hot, 0);
        assert!(tree.walk().iter().all(|n| match n {
            Node::Block { rect, .. } => rect.x + rect.width as i32 <= 1200,
            _ => true,
        }));
    }

    #[test]
    fn every_color_is_themed() {
        let light = profile_card(&profile(), &activity(), Theme::Light, QR);
        let dark = profile_card(&profile(), &activity(), Theme::Dark, QR);
        let (lc, dc) = (light.colors(), dark.colors());
        assert_eq!(lc.len(), dc.len());
        for (l, d) in lc.iter().zip(dc.iter()) {
            assert_ne!(l, d);
        }

        let dark_tokens: Vec<Color> = Theme::Dark.palette().tokens().into_iter().map(|(_, c)| c).collect();
        assert!(dc.iter().all(|c| dark_tokens.contains(c)));
    }

    #[test]
    fn layout_is_deterministic() {
        let a = profile_card(&profile(), &activity(), Theme::Dark, QR);
        let b = profile_card(&profile(), &activity(), Theme::Dark, QR);
        assert_eq!(a, b);
        assert_eq!(a.image_sources(), vec![profile().avatar_url, QR.to_string()]);
    }

    #[test]
    fn joined_label_formats_month_and_year() {
        assert_eq!(joined_label("2008-02-08T10:00:00Z").as_deref(), Some("Since February 2008"));
        assert_eq!(joined_label("yesterday"), None);
    }

    #[test]
    fn wrap_preserves_spacing_and_breaks_long_text() {
        assert_eq!(wrap_text("Hello  World", 24, 694), vec!["Hello  World"]);
        let long = "word ".repeat(40);
        let lines = wrap_text(&long, 24, 694);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| l.chars().count() <= 52));
        assert_eq!(lines.join(" "), long.trim());
        assert_eq!(wrap_text("a\n\nb", 24, 694), vec!["a", "b"]);
    }

    #[test]
    fn wrap_breaks_words_longer_than_a_line() {
        let word = "x".repeat(120);
        let lines = wrap_text(&format!("ab {} cd", word), 20, 566);
        assert_eq!(lines, vec!["ab".to_string(), "x".repeat(51), "x".repeat(51), "x".repeat(18) + " cd"]);
    }

    #[test]
    fn error_card_keeps_long_usernames_inside_the_card() {
        let tree = error_card(&format!("No GitHub user with username “{}”.", "a".repeat(200)));
        let card = match &tree.nodes[0] {
            Node::Block { rect, .. } => *rect,
            other => panic!("unexpected root node {:?}", other),
        };
        let lines: Vec<(i32, u32, String)> = tree
            .walk()
            .into_iter()
            .filter_map(|n| match n {
                Node::Text { x, size, .. } => Some((*x, *size, n.text_content().unwrap_or_default())),
                _ => None,
            })
            .skip(1)
            .collect();
        assert!(lines.len() > 3);
        for (x, size, line) in lines {
            assert!(x as u32 + text_width(&line, size) <= (card.x + card.width as i32) as u32, "{}", line);
        }
        assert!(tree.texts().concat().contains(&"a".repeat(200)));
    }

    #[test]
    fn error_card_shows_title_and_message() {
        let tree = error_card("No username provided.");
        assert_eq!((tree.width, tree.height), (1200, 628));
        assert_eq!(tree.texts(), vec!["Error", "No username provided."]);
        assert!(tree.colors().contains(&ERROR_HEADER));
    }
}
