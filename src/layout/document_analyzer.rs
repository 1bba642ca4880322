//! Document-wide font statistics for adaptive heading detection.
//!
//! ## Key Insight
//!
//! Absolute font sizes say little on their own: a 14pt line is a heading in a
//! 10pt report and body text in a large-print flyer. Thresholds are therefore
//! derived from the document's own size distribution:
//!
//! - body size: the modal (most frequent) size
//! - heading threshold: body + σ
//! - large heading threshold: body + 2σ
//!
//! Sizes are rounded to one decimal before counting to absorb floating-point
//! noise from the layout extractor.
//!
//! ## Example
//!
//! ```
//! use outline_oxide::geometry::Rect;
//! use outline_oxide::layout::{FontStatistics, TextLine};
//!
//! let lines = vec![
//!     TextLine::new("Annual Report", 24.0, true, Rect::new(72.0, 80.0, 300.0, 24.0), 1),
//!     TextLine::new("Body text", 11.0, false, Rect::new(72.0, 120.0, 300.0, 11.0), 1),
//!     TextLine::new("More body text", 11.0, false, Rect::new(72.0, 135.0, 300.0, 11.0), 1),
//! ];
//! let stats = FontStatistics::analyze(&lines);
//! assert_eq!(stats.body_size, 11.0);
//! assert!(stats.heading_threshold > stats.body_size);
//! ```

use crate::layout::TextLine;
use indexmap::IndexMap;

/// Body size assumed when a document has no text.
pub const DEFAULT_BODY_SIZE: f32 = 12.0;

/// Standard deviation used when fewer than two distinct sizes exist.
pub const DEFAULT_STD_DEV: f32 = 1.0;

/// Font-size distribution of one document.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontStatistics {
    /// Modal (most frequent) font size.
    pub body_size: f32,
    /// Mean font size.
    pub mean_size: f32,
    /// Population standard deviation of font sizes.
    pub std_dev_size: f32,
    /// `body_size + std_dev_size`
    pub heading_threshold: f32,
    /// `body_size + 2 * std_dev_size`
    pub large_heading_threshold: f32,
}

impl Default for FontStatistics {
    fn default() -> Self {
        Self::from_parts(DEFAULT_BODY_SIZE, DEFAULT_BODY_SIZE, DEFAULT_STD_DEV)
    }
}

impl FontStatistics {
    /// Build statistics from already-known body size, mean and deviation.
    pub fn from_parts(body_size: f32, mean_size: f32, std_dev_size: f32) -> Self {
        Self {
            body_size,
            mean_size,
            std_dev_size,
            heading_threshold: body_size + std_dev_size,
            large_heading_threshold: body_size + 2.0 * std_dev_size,
        }
    }

    /// Analyze all text lines of a document.
    ///
    /// Blank lines are ignored. An empty input yields [`FontStatistics::default`].
    pub fn analyze(lines: &[TextLine]) -> Self {
        let sizes: Vec<f32> = lines
            .iter()
            .filter(|l| !l.text.trim().is_empty())
            .map(|l| round_size(l.font_size))
            .collect();

        if sizes.is_empty() {
            return Self::default();
        }

        let body_size = modal_size(&sizes);
        let mean_size = sizes.iter().sum::<f32>() / sizes.len() as f32;

        let distinct = count_sizes(&sizes).len();
        let std_dev_size = if distinct < 2 {
            DEFAULT_STD_DEV
        } else {
            let variance = sizes.iter().map(|&s| (s - mean_size).powi(2)).sum::<f32>()
                / sizes.len() as f32;
            variance.sqrt()
        };

        Self::from_parts(body_size, mean_size, std_dev_size)
    }
}

/// Largest font size among non-blank lines on page 1.
///
/// Used as the "title font" reference by the title-relative heading strategy.
pub fn title_font_size(lines: &[TextLine]) -> Option<f32> {
    lines
        .iter()
        .filter(|l| l.page_number == 1 && !l.text.trim().is_empty())
        .map(|l| l.font_size)
        .fold(None, |acc: Option<f32>, s| Some(acc.map_or(s, |a| a.max(s))))
}

/// Round a font size to one decimal place.
pub fn round_size(size: f32) -> f32 {
    (size * 10.0).round() / 10.0
}

/// Occurrence counts keyed by the size's tenth-point value, in first-seen order.
fn count_sizes(sizes: &[f32]) -> IndexMap<i64, usize> {
    let mut counts: IndexMap<i64, usize> = IndexMap::new();
    for &s in sizes {
        *counts.entry((s * 10.0).round() as i64).or_insert(0) += 1;
    }
    counts
}

/// Most frequent size; ties resolve to the size observed first.
fn modal_size(sizes: &[f32]) -> f32 {
    let counts = count_sizes(sizes);
    let mut best: Option<(i64, usize)> = None;
    for (&key, &count) in &counts {
        if best.map_or(true, |(_, c)| count > c) {
            best = Some((key, count));
        }
    }
    best.map_or(DEFAULT_BODY_SIZE, |(key, _)| key as f32 / 10.0)
}
