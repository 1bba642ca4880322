//! Integration tests for section-anchored chunking.

use outline_oxide::extractors::{ChunkerConfig, DocumentChunker};
use outline_oxide::geometry::Rect;
use outline_oxide::layout::{DocumentLayout, FontFlags, LayoutBlock, LayoutLine, PageLayout, TextSpan};
use outline_oxide::source::{JsonLayoutSource, LayoutSource};
use proptest::prelude::*;

fn block(text: &str, flags: FontFlags, y: f32) -> LayoutBlock {
    let bbox = Rect::new(72.0, y, 420.0, 12.0);
    LayoutBlock {
        bbox,
        lines: vec![LayoutLine {
            spans: vec![TextSpan::new(text, 10.0, flags, bbox)],
        }],
    }
}

fn guide() -> DocumentLayout {
    let mut p1 = PageLayout::new(1);
    p1.blocks = vec![
        block("Guide to the South of France", FontFlags::empty(), 20.0),
        block("Overview", FontFlags::BOLD, 90.0),
        block("The region stretches from the Pyrenees to the Italian border.", FontFlags::empty(), 110.0),
        block("1", FontFlags::empty(), 770.0),
    ];
    let mut p2 = PageLayout::new(2);
    p2.blocks = vec![
        block("Guide to the South of France", FontFlags::empty(), 20.0),
        block("It is famous for lavender fields and hill towns.", FontFlags::empty(), 90.0),
        block("NIGHTLIFE", FontFlags::empty(), 200.0),
        block("Bars along the old port stay open until the early morning hours.", FontFlags::empty(), 220.0),
        block("Open late.", FontFlags::empty(), 400.0),
        block("2", FontFlags::empty(), 770.0),
    ];
    let mut layout = DocumentLayout::new("south_of_france.pdf");
    layout.pages = vec![p1, p2];
    layout
}

#[test]
fn test_guide_chunks() {
    let chunks = DocumentChunker::default().chunk(&guide(), "south_of_france.pdf");

    assert_eq!(chunks.len(), 2);
    assert_eq!(chunks[0].section_title, "Overview");
    assert_eq!(chunks[0].page_number, 1);
    assert!(chunks[0].text.ends_with("lavender fields and hill towns."));
    assert!(!chunks[0].text.contains("Guide to the South"));

    assert_eq!(chunks[1].section_title, "NIGHTLIFE");
    assert_eq!(chunks[1].page_number, 2);
    assert!(chunks[1].text.ends_with("Open late."));
}

#[test]
fn test_zero_margin_keeps_running_headers() {
    let chunker = DocumentChunker::new(ChunkerConfig::default().with_margin(0.0));
    let chunks = chunker.chunk(&guide(), "south_of_france.pdf");
    assert!(chunks.iter().any(|c| c.text.contains("Guide to the South of France")));
}

#[test]
fn test_custom_minimum_and_default_title() {
    let mut page = PageLayout::new(1);
    page.blocks = vec![block("Short intro line", FontFlags::empty(), 100.0)];
    let mut layout = DocumentLayout::new("note.pdf");
    layout.pages = vec![page];

    assert!(DocumentChunker::default().chunk(&layout, "note.pdf").is_empty());

    let chunker = DocumentChunker::new(
        ChunkerConfig::default()
            .with_min_chunk_chars(10)
            .with_default_section_title("Preamble"),
    );
    let chunks = chunker.chunk(&layout, "note.pdf");
    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].section_title, "Preamble");
}

#[test]
fn test_chunks_from_layout_dump() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("south_of_france.pdf.layout.json");
    JsonLayoutSource::save(&guide(), &path).unwrap();

    let layout = JsonLayoutSource::new().load(&path).unwrap();
    let chunks = DocumentChunker::default().chunk(&layout, "south_of_france.pdf");
    assert_eq!(chunks.len(), 2);
}

fn arb_block() -> impl Strategy<Value = (bool, String, f32)> {
    (
        any::<bool>(),
        prop::collection::vec("[a-z]{1,9}", 1..14).prop_map(|w| w.join(" ")),
        0.0f32..780.0,
    )
}

proptest! {
    #[test]
    fn prop_every_chunk_meets_minimum(
        pages in prop::collection::vec(prop::collection::vec(arb_block(), 0..8), 0..4),
    ) {
        let mut layout = DocumentLayout::new("random.pdf");
        for (i, blocks) in pages.iter().enumerate() {
            let mut page = PageLayout::new(i as u32 + 1);
            page.blocks = blocks
                .iter()
                .map(|(bold, text, y)| {
                    let flags = if *bold { FontFlags::BOLD } else { FontFlags::empty() };
                    block(text, flags, *y)
                })
                .collect();
            layout.pages.push(page);
        }

        let chunker = DocumentChunker::default();
        let min = chunker.config().min_chunk_chars;
        for chunk in chunker.chunk(&layout, "random.pdf") {
            prop_assert!(chunk.text.chars().count() >= min);
            prop_assert!(chunk.page_number >= 1 && chunk.page_number as usize <= pages.len());
            prop_assert!(!chunk.section_title.is_empty());
            prop_assert_eq!(chunk.document.as_str(), "random.pdf");
        }
    }
}
