//! Text layout representation for outline and chunk analysis.
//!
//! This mirrors the nesting reported by text-layout extractors: a page holds
//! blocks, a block holds lines, a line holds spans (runs of uniformly styled
//! text). All units are immutable once produced by a layout source.

use crate::geometry::Rect;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Span font flags using the common extractor bit encoding.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FontFlags: u32 {
        /// Superscripted text
        const SUPERSCRIPT = 1;
        /// Italic or oblique face
        const ITALIC = 1 << 1;
        /// Serifed face
        const SERIFED = 1 << 2;
        /// Monospaced face
        const MONOSPACED = 1 << 3;
        /// Bold face
        const BOLD = 1 << 4;
    }
}

/// RGB color representation.
///
/// Serialized as a packed `0xRRGGBB` integer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "u32", into = "u32")]
pub struct Color {
    /// Red channel (0.0 - 1.0)
    pub r: f32,
    /// Green channel (0.0 - 1.0)
    pub g: f32,
    /// Blue channel (0.0 - 1.0)
    pub b: f32,
}

impl Color {
    /// Create a new color.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Create a black color.
    pub fn black() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

impl From<u32> for Color {
    fn from(packed: u32) -> Self {
        let channel = |shift: u32| ((packed >> shift) & 0xFF) as f32 / 255.0;
        Color::new(channel(16), channel(8), channel(0))
    }
}

impl From<Color> for u32 {
    fn from(color: Color) -> Self {
        let channel = |v: f32| ((v.clamp(0.0, 1.0) * 255.0).round() as u32) & 0xFF;
        (channel(color.r) << 16) | (channel(color.g) << 8) | channel(color.b)
    }
}

/// A run of uniformly styled text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// The span text
    pub text: String,
    /// Font size in points
    #[serde(rename = "size")]
    pub font_size: f32,
    /// Raw font flag bits (see [`FontFlags`])
    #[serde(default)]
    pub flags: u32,
    /// Text color
    #[serde(default)]
    pub color: Color,
    /// Bounding box of the span
    #[serde(default)]
    pub bbox: Rect,
}

impl TextSpan {
    /// Create a span with explicit styling.
    pub fn new(text: impl Into<String>, font_size: f32, flags: FontFlags, bbox: Rect) -> Self {
        Self {
            text: text.into(),
            font_size,
            flags: flags.bits(),
            color: Color::black(),
            bbox,
        }
    }

    /// Decoded font flags.
    pub fn font_flags(&self) -> FontFlags {
        FontFlags::from_bits_truncate(self.flags)
    }

    /// Whether the span uses a bold face.
    pub fn is_bold(&self) -> bool {
        self.font_flags().contains(FontFlags::BOLD)
    }

    /// Whether the span uses an italic face.
    pub fn is_italic(&self) -> bool {
        self.font_flags().contains(FontFlags::ITALIC)
    }
}

/// A line of spans sharing a baseline.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutLine {
    /// Spans in reading order
    #[serde(default)]
    pub spans: Vec<TextSpan>,
}

impl LayoutLine {
    /// Concatenated span text.
    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

/// A block of lines (paragraph, heading, table cell...).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LayoutBlock {
    /// Bounding box of the block
    #[serde(default)]
    pub bbox: Rect,
    /// Lines in reading order
    #[serde(default)]
    pub lines: Vec<LayoutLine>,
}

impl LayoutBlock {
    /// Block text with lines joined by newlines.
    pub fn text(&self) -> String {
        self.lines
            .iter()
            .map(|l| l.text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// The first span of the first line, if any.
    pub fn first_span(&self) -> Option<&TextSpan> {
        self.lines.first().and_then(|l| l.spans.first())
    }
}

/// One page of extracted layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    /// 1-based page number
    pub number: u32,
    /// Page width in points
    #[serde(default = "default_page_width")]
    pub width: f32,
    /// Page height in points
    #[serde(default = "default_page_height")]
    pub height: f32,
    /// Text blocks in extractor order
    #[serde(default)]
    pub blocks: Vec<LayoutBlock>,
}

fn default_page_width() -> f32 {
    612.0
}

fn default_page_height() -> f32 {
    792.0
}

impl PageLayout {
    /// Create an empty Letter-sized page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            width: default_page_width(),
            height: default_page_height(),
            blocks: Vec::new(),
        }
    }

    /// Derived text lines for this page, skipping lines without spans.
    pub fn text_lines(&self) -> impl Iterator<Item = TextLine> + '_ {
        self.blocks
            .iter()
            .flat_map(|b| b.lines.iter())
            .filter_map(move |l| TextLine::from_layout_line(l, self.number))
    }
}

/// A native bookmark (document outline) entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bookmark {
    /// Bookmark title
    pub title: String,
    /// Target page (1-based), if resolvable
    #[serde(default)]
    pub page: Option<u32>,
    /// Nested bookmarks
    #[serde(default)]
    pub children: Vec<Bookmark>,
}

/// A whole document as reported by a layout source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DocumentLayout {
    /// Source file name (with extension)
    #[serde(default)]
    pub name: String,
    /// Title from document metadata, if any
    #[serde(default)]
    pub title: Option<String>,
    /// Pages in order
    #[serde(default)]
    pub pages: Vec<PageLayout>,
    /// Native bookmark tree (empty when the document has none)
    #[serde(default)]
    pub bookmarks: Vec<Bookmark>,
}

impl DocumentLayout {
    /// Create an empty layout for a named document.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// File name without its extension.
    pub fn stem(&self) -> String {
        std::path::Path::new(&self.name)
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.name.clone())
    }

    /// All text lines of the document in page order.
    pub fn text_lines(&self) -> Vec<TextLine> {
        self.pages.iter().flat_map(|p| p.text_lines()).collect()
    }
}

/// A single line of text with the styling signals used for classification.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLine {
    /// Line text (span concatenation)
    pub text: String,
    /// Largest span font size on the line
    pub font_size: f32,
    /// Every non-blank span is bold
    pub is_bold: bool,
    /// Every non-blank span is italic
    pub is_italic: bool,
    /// Union of the span boxes
    pub bbox: Rect,
    /// 1-based page number
    pub page_number: u32,
}

impl TextLine {
    /// Build a line directly from its signals.
    pub fn new(text: impl Into<String>, font_size: f32, is_bold: bool, bbox: Rect, page: u32) -> Self {
        Self {
            text: text.into(),
            font_size,
            is_bold,
            is_italic: false,
            bbox,
            page_number: page,
        }
    }

    /// Derive a line from a layout line; `None` when it has no spans.
    pub fn from_layout_line(line: &LayoutLine, page_number: u32) -> Option<Self> {
        let first = line.spans.first()?;
        let mut bbox = first.bbox;
        let mut font_size = first.font_size;
        for span in &line.spans[1..] {
            bbox = bbox.union(&span.bbox);
            font_size = font_size.max(span.font_size);
        }

        let visible: Vec<&TextSpan> =
            line.spans.iter().filter(|s| !s.text.trim().is_empty()).collect();
        let is_bold = !visible.is_empty() && visible.iter().all(|s| s.is_bold());
        let is_italic = !visible.is_empty() && visible.iter().all(|s| s.is_italic());

        Some(Self {
            text: line.text(),
            font_size,
            is_bold,
            is_italic,
            bbox,
            page_number,
        })
    }

    /// Number of whitespace-separated words.
    pub fn word_count(&self) -> usize {
        self.text.split_whitespace().count()
    }
}
