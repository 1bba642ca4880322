//! Section-anchored paragraph chunking.
//!
//! Walks a document's text blocks in order and accumulates body text under
//! the most recent heading. Running headers and footers (blocks inside the
//! top/bottom margin band) and bare page numbers are dropped before they can
//! reach a chunk.

use crate::layout::{DocumentLayout, FontStatistics, LayoutBlock, is_likely_heading_span};
use crate::text::clean_text;
use log::debug;
use serde::{Deserialize, Serialize};

/// Chunking settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkerConfig {
    /// Height of the header/footer band at the top and bottom of each page
    pub header_footer_margin: f32,
    /// Minimum cleaned length (in characters) of an emitted chunk
    pub min_chunk_chars: usize,
    /// Section title used before the first heading
    pub default_section_title: String,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            header_footer_margin: 50.0,
            min_chunk_chars: 40,
            default_section_title: "Introduction".to_string(),
        }
    }
}

impl ChunkerConfig {
    /// Set the header/footer margin.
    pub fn with_margin(mut self, margin: f32) -> Self {
        self.header_footer_margin = margin;
        self
    }

    /// Set the minimum chunk length.
    pub fn with_min_chunk_chars(mut self, chars: usize) -> Self {
        self.min_chunk_chars = chars;
        self
    }

    /// Set the placeholder section title.
    pub fn with_default_section_title(mut self, title: impl Into<String>) -> Self {
        self.default_section_title = title.into();
        self
    }
}

/// A paragraph of body text under a section heading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chunk {
    /// Source document file name
    pub document: String,
    /// Governing section title
    pub section_title: String,
    /// Page on which the paragraph began
    pub page_number: u32,
    /// Cleaned paragraph text
    pub text: String,
}

/// Splits documents into [`Chunk`]s.
#[derive(Debug, Clone, Default)]
pub struct DocumentChunker {
    config: ChunkerConfig,
}

/// Open paragraph state while walking blocks.
struct Section<'a> {
    title: String,
    start_page: Option<u32>,
    parts: Vec<String>,
    config: &'a ChunkerConfig,
}

impl<'a> Section<'a> {
    fn new(title: String, config: &'a ChunkerConfig) -> Self {
        Self {
            title,
            start_page: None,
            parts: Vec::new(),
            config,
        }
    }

    fn append(&mut self, text: String, page: u32) {
        self.start_page.get_or_insert(page);
        self.parts.push(text);
    }

    /// Emit the buffered paragraph if it is long enough.
    fn flush(self, document: &str, out: &mut Vec<Chunk>) {
        let Some(page_number) = self.start_page else {
            return;
        };
        let text = clean_text(&self.parts.join(" "));
        if text.chars().count() < self.config.min_chunk_chars {
            debug!("{}: dropping short fragment under '{}'", document, self.title);
            return;
        }
        out.push(Chunk {
            document: document.to_string(),
            section_title: self.title,
            page_number,
            text,
        });
    }
}

impl DocumentChunker {
    /// Create a chunker with the given configuration.
    pub fn new(config: ChunkerConfig) -> Self {
        Self { config }
    }

    /// Access the configuration.
    pub fn config(&self) -> &ChunkerConfig {
        &self.config
    }

    /// Chunk a whole document. `document` is the name recorded on each chunk.
    pub fn chunk(&self, layout: &DocumentLayout, document: &str) -> Vec<Chunk> {
        let body_size = FontStatistics::analyze(&layout.text_lines()).body_size;

        let mut chunks = Vec::new();
        let mut section = Section::new(self.config.default_section_title.clone(), &self.config);

        for page in &layout.pages {
            for block in &page.blocks {
                if self.in_margin_band(block, page.height) {
                    continue;
                }

                let raw = block.text();
                let trimmed = raw.trim();
                if trimmed.is_empty() || trimmed.chars().all(|c| c.is_ascii_digit()) {
                    continue;
                }

                let is_heading = block
                    .first_span()
                    .is_some_and(|span| is_likely_heading_span(span, body_size));

                if is_heading {
                    let title = clean_text(trimmed);
                    let previous = std::mem::replace(&mut section, Section::new(title, &self.config));
                    previous.flush(document, &mut chunks);
                } else {
                    section.append(trimmed.to_string(), page.number);
                }
            }
        }
        section.flush(document, &mut chunks);

        debug!("{}: {} chunks", document, chunks.len());
        chunks
    }

    fn in_margin_band(&self, block: &LayoutBlock, page_height: f32) -> bool {
        let margin = self.config.header_footer_margin;
        block.bbox.top() < margin || block.bbox.bottom() > page_height - margin
    }
}
