use criterion::{criterion_group, criterion_main, Criterion};

use ghcard::activity::{extract_weekly_activity, group_weeks};
use ghcard::github::ProfileRecord;
use ghcard::rendering::layout::profile_card;
use ghcard::rendering::raster::to_svg;
use ghcard::rendering::{AssetStore, Theme};

// Run with:
//    cargo bench --bench card_bench

fn calendar_html() -> String {
    let cells: String = (0..371)
        .map(|i| {
            format!(
                r#"<td class="ContributionCalendar-day" data-date="2024-01-01" data-level="{}"></td>"#,
                i % 5
            )
        })
        .collect();
    format!("<html><body><table><tr>{}</tr></table></body></html>", cells)
}

fn profile() -> ProfileRecord {
    ProfileRecord {
        login: "octocat".into(),
        name: Some("The Octocat".into()),
        avatar_url: "https://avatars.githubusercontent.com/u/583231?v=4".into(),
        bio: Some("A long enough bio to wrap over a couple of lines in the card layout 🚀".into()),
        created_at: "2011-01-25T18:44:36Z".into(),
        followers: 12345,
        following: 9,
        company: Some("@github".into()),
        location: Some("San Francisco".into()),
        twitter_username: Some("github".into()),
    }
}

/// Bench: extract the contribution calendar from a profile page
fn bench_extract(c: &mut Criterion) {
    let html = calendar_html();
    c.bench_function("extract_weekly_activity", |b| {
        b.iter(|| extract_weekly_activity(&html))
    });
}

/// Bench: lay out a card and serialize it to SVG
fn bench_layout(c: &mut Criterion) {
    let levels: Vec<u8> = (0..371).map(|i| (i % 5) as u8).collect();
    let weeks = group_weeks(&levels);
    let profile = profile();
    let assets = AssetStore::default();

    c.bench_function("profile_card_to_svg", |b| {
        b.iter(|| {
            let tree = profile_card(&profile, &weeks, Theme::Dark, "https://qr.example/");
            to_svg(&tree, &assets)
        })
    });
}

criterion_group!(benches, bench_extract, bench_layout);
criterion_main!(benches);
