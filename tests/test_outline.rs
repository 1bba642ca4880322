//! Integration tests for outline extraction.
//!
//! Builds small synthetic layouts (title page plus numbered sections) and
//! checks the assembled outline.

use outline_oxide::geometry::Rect;
use outline_oxide::layout::{
    Bookmark, DocumentLayout, FontFlags, HeadingLevel, LayoutBlock, LayoutLine, PageLayout,
    StrategyProfile, TextSpan,
};
use outline_oxide::outline::{Outline, OutlineBuilder, OutlineConfig};
use outline_oxide::pipeline::outline_for_path;
use outline_oxide::source::JsonLayoutSource;

const BODY: &str = "Visitors spent an average of four nights in each coastal town this year";

fn block(text: &str, size: f32, bold: bool, y: f32) -> LayoutBlock {
    let flags = if bold { FontFlags::BOLD } else { FontFlags::empty() };
    let bbox = Rect::new(72.0, y, 420.0, size + 2.0);
    LayoutBlock {
        bbox,
        lines: vec![LayoutLine {
            spans: vec![TextSpan::new(text, size, flags, bbox)],
        }],
    }
}

fn body(y: f32) -> LayoutBlock {
    block(BODY, 11.0, false, y)
}

fn page(number: u32, blocks: Vec<LayoutBlock>) -> PageLayout {
    let mut p = PageLayout::new(number);
    p.blocks = blocks;
    p
}

fn report() -> DocumentLayout {
    let mut layout = DocumentLayout::new("travel_report.pdf");
    layout.pages = vec![
        page(
            1,
            vec![
                block("Annual Travel Report", 24.0, true, 80.0),
                body(140.0),
                body(160.0),
                body(180.0),
                body(200.0),
                body(220.0),
                body(240.0),
                block("Annual Travel Report", 24.0, true, 700.0),
            ],
        ),
        page(
            2,
            vec![
                block("1. Destinations", 16.0, true, 80.0),
                body(120.0),
                body(140.0),
                body(160.0),
                block("Coastal Towns", 12.0, true, 300.0),
                body(330.0),
                body(350.0),
                body(370.0),
                block("Coastal Towns", 12.0, true, 500.0),
            ],
        ),
        page(
            3,
            vec![
                block("2. Budget", 16.0, true, 80.0),
                body(120.0),
                body(140.0),
                body(160.0),
                body(180.0),
                body(200.0),
                body(220.0),
            ],
        ),
    ];
    layout
}

fn flat(outline: &Outline) -> Vec<(HeadingLevel, &str, u32)> {
    outline
        .entries
        .iter()
        .map(|e| (e.level, e.text.as_str(), e.page))
        .collect()
}

#[test]
fn test_empty_document_uses_stem() {
    let layout = DocumentLayout::new("blank_form.pdf");
    let outline = OutlineBuilder::default().build(&layout);
    assert_eq!(outline.title, "blank_form");
    assert!(outline.is_empty());

    let mut layout = DocumentLayout::new("blank_form.pdf");
    layout.pages.push(PageLayout::new(1));
    let outline = OutlineBuilder::default().build(&layout);
    assert_eq!(outline.title, "blank_form");
    assert!(outline.is_empty());
}

#[test]
fn test_report_outline() {
    let outline = OutlineBuilder::default().build(&report());
    assert_eq!(outline.title, "Annual Travel Report");
    assert_eq!(
        flat(&outline),
        vec![
            (HeadingLevel::H2, "Destinations", 2),
            (HeadingLevel::H3, "Coastal Towns", 2),
            (HeadingLevel::H2, "Budget", 3),
        ]
    );
}

#[test]
fn test_title_never_repeated_as_entry() {
    let outline = OutlineBuilder::default().build(&report());
    assert!(outline.entries.iter().all(|e| e.text != outline.title));
}

#[test]
fn test_profiles_agree_on_report() {
    let auto = OutlineBuilder::default().build(&report());
    let statistical = OutlineBuilder::new(OutlineConfig::default().with_profile(StrategyProfile::Statistical))
        .build(&report());
    assert_eq!(auto, statistical);
}

#[test]
fn test_max_pages_limits_analysis() {
    let config = OutlineConfig::default().with_max_pages(Some(2));
    let outline = OutlineBuilder::new(config).build(&report());
    assert_eq!(outline.title, "Annual Travel Report");
    assert_eq!(outline.entries.len(), 2);
    assert!(outline.entries.iter().all(|e| e.page <= 2));
}

#[test]
fn test_max_entries_cap() {
    let config = OutlineConfig::default().with_max_entries(1);
    let outline = OutlineBuilder::new(config).build(&report());
    assert_eq!(flat(&outline), vec![(HeadingLevel::H2, "Destinations", 2)]);
}

#[test]
fn test_bookmarks_take_precedence() {
    let mut layout = report();
    layout.title = Some("Travel Report 2024".to_string());
    layout.bookmarks = vec![Bookmark {
        title: "Where We Went".to_string(),
        page: Some(2),
        children: vec![Bookmark {
            title: "Seaside".to_string(),
            page: None,
            children: Vec::new(),
        }],
    }];

    let outline = OutlineBuilder::default().build(&layout);
    assert_eq!(outline.title, "Travel Report 2024");
    assert_eq!(
        flat(&outline),
        vec![(HeadingLevel::H1, "Where We Went", 2), (HeadingLevel::H2, "Seaside", 2)]
    );

    let inferred = OutlineBuilder::new(OutlineConfig::default().with_bookmarks(false)).build(&layout);
    assert_eq!(inferred.title, "Annual Travel Report");
    assert_eq!(inferred.entries.len(), 3);
}

#[test]
fn test_outline_from_layout_dump() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("travel_report.pdf.layout.json");
    JsonLayoutSource::save(&report(), &path).unwrap();

    let outline = outline_for_path(&JsonLayoutSource::new(), &path, &OutlineConfig::default());
    assert_eq!(outline.title, "Annual Travel Report");
    assert_eq!(outline.entries.len(), 3);
}

#[test]
fn test_unreadable_dump_yields_empty_outline() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.layout.json");
    std::fs::write(&path, "{ not json").unwrap();

    let outline = outline_for_path(&JsonLayoutSource::new(), &path, &OutlineConfig::default());
    assert_eq!(outline.title, "broken");
    assert!(outline.is_empty());
}
