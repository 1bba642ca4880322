//! PDF input through pdfium.
//!
//! pdfium reports individual characters with a font size, font name and
//! bounds in a bottom-left coordinate system. Characters are grouped here:
//! consecutive characters with the same style form a span, an explicit line
//! break or a vertical jump starts a new line, and a vertical gap larger than
//! the line height starts a new block. Bounds are flipped into the top-left
//! system used by [`crate::geometry::Rect`].

use crate::error::{Error, Result};
use crate::geometry::Rect;
use crate::layout::{
    Bookmark, DocumentLayout, FontFlags, LayoutBlock, LayoutLine, PageLayout, TextSpan,
};
use crate::source::LayoutSource;
use log::debug;
use pdfium_render::prelude::*;
use std::path::Path;

/// Maximum bookmark nesting followed.
const MAX_BOOKMARK_DEPTH: usize = 16;

/// Reads PDFs via the system pdfium library.
#[derive(Debug, Clone, Copy, Default)]
pub struct PdfiumLayoutSource;

impl PdfiumLayoutSource {
    /// Create the source. The library is bound on each load.
    pub fn new() -> Self {
        Self
    }
}

/// One positioned, styled character.
#[derive(Debug, Clone, Copy)]
struct Glyph {
    ch: char,
    size: f32,
    flags: FontFlags,
    bbox: Rect,
}

impl Glyph {
    fn same_style(&self, other: &Glyph) -> bool {
        (self.size - other.size).abs() < 0.1 && self.flags == other.flags
    }
}

fn font_flags(font_name: &str) -> FontFlags {
    let name = font_name.to_lowercase();
    let mut flags = FontFlags::empty();
    if name.contains("bold") || name.contains("black") || name.contains("heavy") {
        flags |= FontFlags::BOLD;
    }
    if name.contains("italic") || name.contains("oblique") {
        flags |= FontFlags::ITALIC;
    }
    if name.contains("mono") || name.contains("courier") {
        flags |= FontFlags::MONOSPACED;
    }
    flags
}

/// Accumulates glyphs into spans, lines and blocks for one page.
#[derive(Default)]
struct PageBuilder {
    blocks: Vec<LayoutBlock>,
    lines: Vec<LayoutLine>,
    spans: Vec<TextSpan>,
    span_text: String,
    span_start: Option<Glyph>,
    span_bbox: Option<Rect>,
    line_bbox: Option<Rect>,
    block_bbox: Option<Rect>,
    last_line_bottom: Option<f32>,
}

impl PageBuilder {
    fn push(&mut self, glyph: Glyph) {
        if let Some(line) = self.line_bbox {
            let center = glyph.bbox.top() + glyph.bbox.height / 2.0;
            if center < line.top() || center > line.bottom() {
                self.end_line();
            }
        }
        if let Some(start) = self.span_start {
            if !start.same_style(&glyph) {
                self.end_span();
            }
        }

        if let Some(prev_bottom) = self.last_line_bottom {
            if self.line_bbox.is_none() && glyph.bbox.top() - prev_bottom > glyph.size.max(1.0) {
                self.end_block();
            }
        }

        self.span_start.get_or_insert(glyph);
        self.span_text.push(glyph.ch);
        self.span_bbox = Some(self.span_bbox.map_or(glyph.bbox, |b| b.union(&glyph.bbox)));
        self.line_bbox = Some(self.line_bbox.map_or(glyph.bbox, |b| b.union(&glyph.bbox)));
    }

    fn end_span(&mut self) {
        if let (Some(start), Some(bbox)) = (self.span_start.take(), self.span_bbox.take()) {
            let text = std::mem::take(&mut self.span_text);
            self.spans.push(TextSpan::new(text, start.size, start.flags, bbox));
        }
        self.span_text.clear();
    }

    fn end_line(&mut self) {
        self.end_span();
        if let Some(bbox) = self.line_bbox.take() {
            if !self.spans.is_empty() {
                self.lines.push(LayoutLine {
                    spans: std::mem::take(&mut self.spans),
                });
                self.block_bbox = Some(self.block_bbox.map_or(bbox, |b| b.union(&bbox)));
                self.last_line_bottom = Some(bbox.bottom());
            }
        }
    }

    fn end_block(&mut self) {
        self.end_line();
        if let Some(bbox) = self.block_bbox.take() {
            if !self.lines.is_empty() {
                self.blocks.push(LayoutBlock {
                    bbox,
                    lines: std::mem::take(&mut self.lines),
                });
            }
        }
    }

    fn finish(mut self) -> Vec<LayoutBlock> {
        self.end_block();
        self.blocks
    }
}

fn read_page(page: &PdfPage, number: u32) -> std::result::Result<PageLayout, PdfiumError> {
    let height = page.height().value;
    let mut layout = PageLayout::new(number);
    layout.width = page.width().value;
    layout.height = height;

    let text = page.text()?;

    let mut builder = PageBuilder::default();
    for ch in text.chars().iter() {
        let Some(c) = ch.unicode_char() else {
            continue;
        };
        if c == '\n' || c == '\r' {
            builder.end_line();
            continue;
        }
        let Ok(bounds) = ch.loose_bounds() else {
            continue;
        };
        let bbox = Rect::from_points(
            bounds.left().value,
            height - bounds.top().value,
            bounds.right().value,
            height - bounds.bottom().value,
        );
        builder.push(Glyph {
            ch: c,
            size: ch.scaled_font_size().value,
            flags: font_flags(&ch.font_name()),
            bbox,
        });
    }

    layout.blocks = builder.finish();
    Ok(layout)
}

fn read_bookmark(bookmark: &PdfBookmark, depth: usize) -> Bookmark {
    let page = bookmark
        .destination()
        .and_then(|d| d.page_index().ok())
        .map(|i| i as u32 + 1);

    let mut children = Vec::new();
    if depth < MAX_BOOKMARK_DEPTH {
        let mut child = bookmark.first_child();
        while let Some(c) = child {
            children.push(read_bookmark(&c, depth + 1));
            child = c.next_sibling();
        }
    }

    Bookmark {
        title: bookmark.title().unwrap_or_default(),
        page,
        children,
    }
}

fn read_bookmarks(document: &PdfDocument) -> Vec<Bookmark> {
    let mut out = Vec::new();
    let mut current = document.bookmarks().root();
    while let Some(b) = current {
        out.push(read_bookmark(&b, 0));
        current = b.next_sibling();
    }
    out
}

impl LayoutSource for PdfiumLayoutSource {
    fn name(&self) -> &str {
        "pdfium"
    }

    fn extensions(&self) -> &[&str] {
        &["pdf"]
    }

    fn load(&self, path: &Path) -> Result<DocumentLayout> {
        let bindings = Pdfium::bind_to_system_library()
            .map_err(|e| Error::UnsupportedSource(format!("pdfium library not available: {:?}", e)))?;
        let pdfium = Pdfium::new(bindings);

        let document = pdfium
            .load_pdf_from_file(path, None)
            .map_err(|e| Error::document_open(path, format!("{:?}", e)))?;

        let mut layout = DocumentLayout::new(
            path.file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default(),
        );
        layout.title = document
            .metadata()
            .get(PdfDocumentMetadataTagType::Title)
            .map(|tag| tag.value().trim().to_string())
            .filter(|t| !t.is_empty());

        for (index, page) in document.pages().iter().enumerate() {
            let page_layout = read_page(&page, index as u32 + 1)
                .map_err(|e| Error::document_open(path, format!("page {}: {:?}", index + 1, e)))?;
            layout.pages.push(page_layout);
        }
        layout.bookmarks = read_bookmarks(&document);

        debug!(
            "{}: {} pages, {} top-level bookmarks",
            layout.name,
            layout.pages.len(),
            layout.bookmarks.len()
        );
        Ok(layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn glyph(ch: char, x: f32, y: f32, size: f32, flags: FontFlags) -> Glyph {
        Glyph {
            ch,
            size,
            flags,
            bbox: Rect::new(x, y, size * 0.5, size),
        }
    }

    #[test]
    fn test_font_flags_from_name() {
        assert_eq!(font_flags("Helvetica-BoldOblique"), FontFlags::BOLD | FontFlags::ITALIC);
        assert_eq!(font_flags("CourierNew"), FontFlags::MONOSPACED);
        assert_eq!(font_flags("Times-Roman"), FontFlags::empty());
    }

    #[test]
    fn test_grouping_spans_lines_blocks() {
        let mut b = PageBuilder::default();
        for (i, c) in "Title".chars().enumerate() {
            b.push(glyph(c, 72.0 + i as f32 * 10.0, 100.0, 20.0, FontFlags::BOLD));
        }
        // next line, same block, two styles
        for (i, c) in "ab".chars().enumerate() {
            b.push(glyph(c, 72.0 + i as f32 * 5.0, 122.0, 10.0, FontFlags::empty()));
        }
        for (i, c) in "CD".chars().enumerate() {
            b.push(glyph(c, 82.0 + i as f32 * 5.0, 122.0, 10.0, FontFlags::BOLD));
        }
        // far below: new block
        for (i, c) in "xy".chars().enumerate() {
            b.push(glyph(c, 72.0 + i as f32 * 5.0, 300.0, 10.0, FontFlags::empty()));
        }

        let blocks = b.finish();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].text(), "Title\nabCD");
        assert_eq!(blocks[0].lines[1].spans.len(), 2);
        assert!(blocks[0].lines[0].spans[0].is_bold());
        assert_eq!(blocks[1].text(), "xy");
    }
}
