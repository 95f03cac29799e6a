//! Contribution activity extraction.
//!
//! The public profile page embeds one element per calendar day carrying a
//! `data-date` and a `data-level` attribute. Extraction is split in two
//! steps: a tokenizing parse producing typed [`ContributionDay`] records, and
//! a pure bucketing step ([`group_weeks`]) over the flat level sequence.

use scraper::{Html, Selector};

/// Highest activity level the palette knows about.
pub const MAX_LEVEL: u8 = 4;

/// Days per grid column.
pub const DAYS_PER_WEEK: usize = 7;

/// One day of the contribution calendar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributionDay {
    pub date: String,
    pub level: u8,
}

/// Activity levels grouped into weeks, in chronological order.
///
/// Every week holds between 1 and 7 levels; only the last week may be
/// partial.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeeklyActivity {
    weeks: Vec<Vec<u8>>,
}

impl WeeklyActivity {
    pub fn weeks(&self) -> &[Vec<u8>] {
        &self.weeks
    }

    pub fn is_empty(&self) -> bool {
        self.weeks.is_empty()
    }

    /// Flat level sequence in chronological order.
    pub fn flatten(&self) -> Vec<u8> {
        self.weeks.iter().flatten().copied().collect()
    }
}

/// Collect every `data-date`/`data-level` pair in document order.
///
/// Levels that are not integers are skipped and levels above
/// [`MAX_LEVEL`] are clamped. Markup without markers yields an empty vector.
pub fn parse_contributions(html: &str) -> Vec<ContributionDay> {
    let document = Html::parse_document(html);
    let Ok(sel) = Selector::parse("[data-date][data-level]") else {
        return Vec::new();
    };

    document
        .select(&sel)
        .filter_map(|el| {
            let date = el.value().attr("data-date")?;
            let level = el.value().attr("data-level")?.trim().parse::<u32>().ok()?;
            Some(ContributionDay {
                date: date.to_string(),
                level: level.min(MAX_LEVEL as u32) as u8,
            })
        })
        .collect()
}

/// Partition a flat level sequence into consecutive weeks of seven.
pub fn group_weeks(levels: &[u8]) -> WeeklyActivity {
    WeeklyActivity {
        weeks: levels
            .chunks(DAYS_PER_WEEK)
            .map(|week| week.to_vec())
            .collect(),
    }
}

/// Parse a profile page and bucket its activity levels into weeks.
pub fn extract_weekly_activity(html: &str) -> WeeklyActivity {
    let levels: Vec<u8> = parse_contributions(html)
        .into_iter()
        .map(|day| day.level)
        .collect();
    log::debug!("extracted {} contribution days", levels.len());
    group_weeks(&levels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn calendar(levels: &[&str]) -> String {
        let cells: String = levels
            .iter()
            .enumerate()
            .map(|(i, l)| {
                format!(
                    r#"<td class="ContributionCalendar-day" data-date="2024-01-{:02}" data-level="{}"></td>"#,
                    i + 1,
                    l
                )
            })
            .collect();
        format!("<html><body><table><tr>{}</tr></table></body></html>", cells)
    }

    #[test]
    fn parses_days_in_document_order() {
        let days = parse_contributions(&calendar(&["0", "3", "1"]));
        assert_eq!(days.len(), 3);
        assert_eq!(days[0].date, "2024-01-01");
        assert_eq!(
            days.iter().map(|d| d.level).collect::<Vec<_>>(),
            vec![0, 3, 1]
        );
    }

    #[test]
    fn skips_non_numeric_and_clamps_high_levels() {
        let days = parse_contributions(&calendar(&["2", "x", "9"]));
        assert_eq!(days.iter().map(|d| d.level).collect::<Vec<_>>(), vec![2, 4]);
    }

    #[test]
    fn ignores_elements_missing_either_attribute() {
        let html = r#"<div data-date="2024-01-01"></div><div data-level="2"></div><div data-level="1" data-date="2024-01-02"></div>"#;
        let days = parse_contributions(html);
        assert_eq!(days, vec![ContributionDay { date: "2024-01-02".into(), level: 1 }]);
    }

    #[test]
    fn no_markers_is_empty_not_error() {
        assert!(parse_contributions("<html><p>nothing here</html>").is_empty());
        assert!(extract_weekly_activity("<<<not html").is_empty());
    }

    #[test]
    fn group_weeks_makes_minimal_partition() {
        let levels: Vec<u8> = (0..15).map(|i| (i % 5) as u8).collect();
        let weekly = group_weeks(&levels);
        let sizes: Vec<usize> = weekly.weeks().iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![7, 7, 1]);

        // exact multiple of seven: no trailing empty week
        let weekly = group_weeks(&levels[..14]);
        assert_eq!(weekly.weeks().len(), 2);
        assert!(group_weeks(&[]).is_empty());
    }

    #[test]
    fn regrouping_flattened_levels_is_stable() {
        let levels: Vec<u8> = (0..371).map(|i| ((i * 7 + 3) % 5) as u8).collect();
        let weekly = group_weeks(&levels);
        assert_eq!(weekly.flatten(), levels);
        assert_eq!(group_weeks(&weekly.flatten()), weekly);
        assert!(weekly.flatten().iter().all(|l| *l <= MAX_LEVEL));
    }
}
