//! Document outline extraction.
//!
//! Builds a title plus an ordered list of H1/H2/H3 headings for one document.
//! When the document carries a native bookmark tree it is used verbatim;
//! otherwise headings are inferred from layout signals via
//! [`crate::layout::heading_detector`].

use crate::layout::{
    DocumentLayout, FontStatistics, HeadingLevel, StrategyProfile, TextLine, Bookmark,
    select_strategy, title_font_size,
};
use crate::text::{collapse_whitespace, strip_serial};
use crate::utils::safe_float_cmp;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Default maximum number of outline entries.
pub const DEFAULT_MAX_ENTRIES: usize = 50;

/// Outline extraction settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutlineConfig {
    /// Only analyze the first N pages (all pages when `None`)
    pub max_pages: Option<usize>,
    /// Cap on emitted entries
    pub max_entries: usize,
    /// Prefer the native bookmark tree when one exists
    pub use_bookmarks: bool,
    /// Heading level strategy selection
    pub profile: StrategyProfile,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            max_pages: None,
            max_entries: DEFAULT_MAX_ENTRIES,
            use_bookmarks: true,
            profile: StrategyProfile::Auto,
        }
    }
}

impl OutlineConfig {
    /// Limit analysis to the first `pages` pages.
    pub fn with_max_pages(mut self, pages: Option<usize>) -> Self {
        self.max_pages = pages;
        self
    }

    /// Set the entry cap.
    pub fn with_max_entries(mut self, entries: usize) -> Self {
        self.max_entries = entries;
        self
    }

    /// Enable or disable the bookmark fast path.
    pub fn with_bookmarks(mut self, enabled: bool) -> Self {
        self.use_bookmarks = enabled;
        self
    }

    /// Set the heading strategy profile.
    pub fn with_profile(mut self, profile: StrategyProfile) -> Self {
        self.profile = profile;
        self
    }
}

/// A heading accepted by the classifier, before outline post-processing.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadingCandidate {
    /// Cleaned heading text (serial number stripped)
    pub text: String,
    /// Assigned level
    pub level: HeadingLevel,
    /// 1-based page number
    pub page: u32,
    /// Classifier confidence in \[0, 1\]
    pub confidence: f32,
    /// Top of the source line on its page
    pub y: f32,
}

/// One outline artifact entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutlineEntry {
    /// Heading level
    pub level: HeadingLevel,
    /// Heading text
    pub text: String,
    /// 1-based page number
    pub page: u32,
}

/// Title plus ordered heading entries for one document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outline {
    /// Document title
    pub title: String,
    /// Entries in reading order
    #[serde(rename = "outline")]
    pub entries: Vec<OutlineEntry>,
}

impl Outline {
    /// An outline with a title and no entries.
    pub fn empty(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    /// Whether the outline has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Drives statistics and classification across a document.
#[derive(Debug, Clone, Default)]
pub struct OutlineBuilder {
    config: OutlineConfig,
}

impl OutlineBuilder {
    /// Create a builder with the given configuration.
    pub fn new(config: OutlineConfig) -> Self {
        Self { config }
    }

    /// Build the outline of a document.
    pub fn build(&self, layout: &DocumentLayout) -> Outline {
        if self.config.use_bookmarks && !layout.bookmarks.is_empty() {
            debug!("{}: using {} native bookmarks", layout.name, layout.bookmarks.len());
            return self.from_bookmarks(layout);
        }

        let candidates = self.candidates(layout);
        assemble(candidates, layout.stem(), self.config.max_entries)
    }

    /// Classify every analyzed line and return accepted headings in
    /// discovery order.
    pub fn candidates(&self, layout: &DocumentLayout) -> Vec<HeadingCandidate> {
        let page_limit = self.config.max_pages.unwrap_or(usize::MAX);
        let lines: Vec<TextLine> = layout
            .pages
            .iter()
            .take(page_limit)
            .flat_map(|p| p.text_lines())
            .collect();

        let stats = FontStatistics::analyze(&lines);
        let title_font = title_font_size(&lines);
        let strategy = select_strategy(self.config.profile, &stats, title_font);
        debug!(
            "{}: {} lines, body {:.1}pt, sigma {:.2}, strategy {}",
            layout.name,
            lines.len(),
            stats.body_size,
            stats.std_dev_size,
            strategy.name()
        );

        let mut candidates = Vec::new();
        for line in &lines {
            let Some(classification) = strategy.classify(line, &stats) else {
                continue;
            };
            let text = strip_serial(&collapse_whitespace(&line.text));
            if text.is_empty() {
                continue;
            }
            debug!(
                "  {} p{} ({:.2}): {}",
                classification.level, line.page_number, classification.confidence, text
            );
            candidates.push(HeadingCandidate {
                text,
                level: classification.level,
                page: line.page_number,
                confidence: classification.confidence,
                y: line.bbox.top(),
            });
        }
        candidates
    }

    fn from_bookmarks(&self, layout: &DocumentLayout) -> Outline {
        let title = layout
            .title
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| layout.stem());

        let mut entries = Vec::new();
        flatten_bookmarks(&layout.bookmarks, 0, 1, &mut entries);
        entries.truncate(self.config.max_entries);
        Outline { title, entries }
    }
}

/// Walk the bookmark tree depth-first; unresolved pages inherit the parent's.
fn flatten_bookmarks(
    bookmarks: &[Bookmark],
    depth: usize,
    parent_page: u32,
    out: &mut Vec<OutlineEntry>,
) {
    for bookmark in bookmarks {
        let page = bookmark.page.unwrap_or(parent_page);
        let text = collapse_whitespace(&bookmark.title);
        if !text.is_empty() {
            out.push(OutlineEntry {
                level: HeadingLevel::from_depth(depth),
                text,
                page,
            });
        }
        flatten_bookmarks(&bookmark.children, depth + 1, page, out);
    }
}

/// Turn classifier candidates into an outline.
///
/// Deduplicates on (level, lowercase text, page) with the first occurrence
/// winning, lifts the first H1 on the first heading page into the title,
/// sorts by (page, y) and caps the entry count. Falls back to
/// `fallback_title` when no title H1 exists.
pub fn assemble(
    candidates: Vec<HeadingCandidate>,
    fallback_title: String,
    max_entries: usize,
) -> Outline {
    let first_heading_page = candidates.first().map(|c| c.page);
    let mut seen: HashSet<(HeadingLevel, String, u32)> = HashSet::new();
    let mut title: Option<String> = None;
    let mut kept: Vec<HeadingCandidate> = Vec::new();

    for candidate in candidates {
        let key = (candidate.level, candidate.text.to_lowercase(), candidate.page);
        if !seen.insert(key) {
            continue;
        }

        if title.is_none()
            && candidate.level == HeadingLevel::H1
            && Some(candidate.page) == first_heading_page
        {
            title = Some(candidate.text);
            continue;
        }

        kept.push(candidate);
    }

    kept.sort_by(|a, b| a.page.cmp(&b.page).then_with(|| safe_float_cmp(a.y, b.y)));
    kept.truncate(max_entries);

    Outline {
        title: title.unwrap_or(fallback_title),
        entries: kept
            .into_iter()
            .map(|c| OutlineEntry {
                level: c.level,
                text: c.text,
                page: c.page,
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(text: &str, level: HeadingLevel, page: u32, y: f32) -> HeadingCandidate {
        HeadingCandidate {
            text: text.to_string(),
            level,
            page,
            confidence: 0.8,
            y,
        }
    }

    #[test]
    fn test_assemble_lifts_title_and_dedupes() {
        let outline = assemble(
            vec![
                candidate("Annual Report", HeadingLevel::H1, 1, 50.0),
                candidate("Overview", HeadingLevel::H2, 1, 120.0),
                candidate("OVERVIEW", HeadingLevel::H2, 1, 300.0),
                candidate("Annual Report", HeadingLevel::H1, 1, 700.0),
                candidate("Overview", HeadingLevel::H2, 2, 90.0),
            ],
            "fallback".to_string(),
            DEFAULT_MAX_ENTRIES,
        );

        assert_eq!(outline.title, "Annual Report");
        let texts: Vec<(&str, u32)> = outline.entries.iter().map(|e| (e.text.as_str(), e.page)).collect();
        assert_eq!(texts, vec![("Overview", 1), ("Overview", 2)]);
    }

    #[test]
    fn test_assemble_title_only_from_first_heading_page() {
        let outline = assemble(
            vec![
                candidate("Contents", HeadingLevel::H2, 2, 80.0),
                candidate("Part One", HeadingLevel::H1, 3, 80.0),
            ],
            "stem".to_string(),
            DEFAULT_MAX_ENTRIES,
        );
        assert_eq!(outline.title, "stem");
        assert_eq!(outline.entries.len(), 2);
    }

    #[test]
    fn test_assemble_sorts_by_page_then_y_and_caps() {
        let outline = assemble(
            vec![
                candidate("B", HeadingLevel::H2, 2, 300.0),
                candidate("A", HeadingLevel::H3, 2, 100.0),
                candidate("C", HeadingLevel::H2, 1, 500.0),
                candidate("D", HeadingLevel::H3, 3, 10.0),
            ],
            "stem".to_string(),
            3,
        );
        let texts: Vec<&str> = outline.entries.iter().map(|e| e.text.as_str()).collect();
        assert_eq!(texts, vec!["C", "A", "B"]);
    }

    #[test]
    fn test_bookmark_levels_and_page_inheritance() {
        let mut layout = DocumentLayout::new("guide.pdf");
        layout.bookmarks = vec![Bookmark {
            title: "Cities".to_string(),
            page: Some(2),
            children: vec![Bookmark {
                title: "Nice".to_string(),
                page: None,
                children: vec![Bookmark {
                    title: "Old  Town".to_string(),
                    page: Some(4),
                    children: vec![Bookmark {
                        title: "Markets".to_string(),
                        page: None,
                        children: Vec::new(),
                    }],
                }],
            }],
        }];

        let outline = OutlineBuilder::default().build(&layout);
        assert_eq!(outline.title, "guide");
        let flat: Vec<(HeadingLevel, &str, u32)> = outline
            .entries
            .iter()
            .map(|e| (e.level, e.text.as_str(), e.page))
            .collect();
        assert_eq!(
            flat,
            vec![
                (HeadingLevel::H1, "Cities", 2),
                (HeadingLevel::H2, "Nice", 2),
                (HeadingLevel::H3, "Old Town", 4),
                (HeadingLevel::H3, "Markets", 4),
            ]
        );
    }

    #[test]
    fn test_bookmark_title_from_metadata() {
        let mut layout = DocumentLayout::new("guide.pdf");
        layout.title = Some("  South of France  ".to_string());
        layout.bookmarks = vec![Bookmark {
            title: "Intro".to_string(),
            page: None,
            children: Vec::new(),
        }];
        let outline = OutlineBuilder::default().build(&layout);
        assert_eq!(outline.title, "South of France");
        assert_eq!(outline.entries[0].page, 1);
    }

    #[test]
    fn test_outline_serializes_artifact_shape() {
        let outline = Outline {
            title: "T".to_string(),
            entries: vec![OutlineEntry {
                level: HeadingLevel::H2,
                text: "Scope".to_string(),
                page: 3,
            }],
        };
        let json = serde_json::to_value(&outline).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"title": "T", "outline": [{"level": "H2", "text": "Scope", "page": 3}]})
        );
    }
}
