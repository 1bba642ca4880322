//! Heading detection from text-layout signals.
//!
//! This module decides whether a [`TextLine`] is a heading and, if so, which
//! level (H1, H2, H3) it carries. There is no ground truth in a PDF: the
//! decision is made from noisy typographic signals (size relative to the
//! document's body text, weight, structural numbering, vocabulary, position,
//! length).
//!
//! # Pipeline
//!
//! 1. **Gate**: empty text, form-field labels ("Date", "S.No", "3.") and
//!    signature/legal vocabulary are rejected outright. A line ending in a
//!    period is rejected unless it matches a structural pattern.
//! 2. **Score**: an ordered table of weighted rules ([`SCORING_RULES`]) is
//!    summed into a confidence score.
//! 3. **Accept** when the score exceeds [`ACCEPTANCE_THRESHOLD`].
//! 4. **Level** assignment is delegated to a [`HeadingStrategy`].
//!
//! Two strategies are provided: [`StatisticalThresholdStrategy`] (levels from
//! the σ thresholds of [`FontStatistics`], good for reports) and
//! [`TitleRelativeStrategy`] (H1 relative to the largest page-1 font, robust
//! for single-title forms and flyers).

use crate::layout::document_analyzer::FontStatistics;
use crate::layout::text_block::{TextLine, TextSpan};
use crate::text::{collapse_whitespace, is_all_caps};
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Score a line must exceed to be accepted as a heading.
pub const ACCEPTANCE_THRESHOLD: f32 = 0.4;

/// Lines starting at or left of this x-coordinate count as left-aligned.
pub const LEFT_MARGIN_LIMIT: f32 = 100.0;

/// Fraction of the page-1 title font at which a line becomes H1 outright.
pub const TITLE_FONT_RATIO: f32 = 0.9;

/// Multiple of the body size at which the title-relative strategy assigns H2.
pub const SECTION_FONT_RATIO: f32 = 1.3;

/// Multiple of the body size at which an accepted line is never below H2.
pub const PROMINENT_FONT_RATIO: f32 = 1.5;

/// Multiple of the body size at which a chunker span counts as "larger".
pub const SPAN_EMPHASIS_RATIO: f32 = 1.15;

lazy_static! {
    static ref STRUCTURAL_PATTERNS: Vec<Regex> = [
        r"^(?i:chapter|section|part)\s+[IVXLC\d]+",
        r"^[IVX]+\.\s+",
        r"^[A-Z][A-Z0-9\s&:,'/-]{3,}$",
        r"^\d+\.\s+[A-Z]",
        r"^\d+\.\d+\.?\s+\S",
        r"^\d+\.\d+\.\d+\.?\s+\S",
        r"^[A-Z]\.\s+\S",
    ]
    .iter()
    .map(|p| Regex::new(p).unwrap())
    .collect();

    static ref STRUCTURAL_KEYWORDS: Regex = Regex::new(
        r"(?i)\b(introduction|conclusions?|abstract|references|appendix|summary|background|overview|methodology|results|discussion|acknowledge?ments|bibliography|contents|preface)\b"
    )
    .unwrap();

    static ref FORM_FIELD: Regex = Regex::new(r"(?i)^(\d+\.|S\.No|Date|Rs\.?)$").unwrap();

    static ref SIGNATURE_KEYWORDS: Regex =
        Regex::new(r"(?i)\b(signature|date|signed|authorized|stamp|seal)\b").unwrap();

    static ref ARTEFACTS: Regex = Regex::new(r"(?i)\b(page|figure|table)\b|source:|note:").unwrap();
}

/// Heading hierarchy level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HeadingLevel {
    /// Main heading (title-sized)
    H1,
    /// Section heading
    H2,
    /// Subsection heading
    H3,
}

impl HeadingLevel {
    /// Level label as used in outline artifacts.
    pub fn as_str(&self) -> &'static str {
        match self {
            HeadingLevel::H1 => "H1",
            HeadingLevel::H2 => "H2",
            HeadingLevel::H3 => "H3",
        }
    }

    /// Map a nesting depth (0 = top level) to a level; deeper than 2 is H3.
    ///
    /// # Examples
    ///
    /// ```
    /// use outline_oxide::layout::HeadingLevel;
    ///
    /// assert_eq!(HeadingLevel::from_depth(0), HeadingLevel::H1);
    /// assert_eq!(HeadingLevel::from_depth(1), HeadingLevel::H2);
    /// assert_eq!(HeadingLevel::from_depth(5), HeadingLevel::H3);
    /// ```
    pub fn from_depth(depth: usize) -> Self {
        match depth {
            0 => HeadingLevel::H1,
            1 => HeadingLevel::H2,
            _ => HeadingLevel::H3,
        }
    }
}

impl fmt::Display for HeadingLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An accepted heading decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Classification {
    /// Assigned level
    pub level: HeadingLevel,
    /// Confidence clamped to \[0, 1\]
    pub confidence: f32,
}

/// Signals extracted from one line, shared by all scoring rules.
#[derive(Debug, Clone)]
pub struct LineFeatures<'a> {
    /// The line under test
    pub line: &'a TextLine,
    /// Document statistics
    pub stats: &'a FontStatistics,
    /// Whitespace-collapsed text (serial number still present)
    pub text: String,
    /// Word count of `text`
    pub words: usize,
    /// Whether `text` matches any structural pattern
    pub structural: bool,
}

impl<'a> LineFeatures<'a> {
    /// Extract features; `None` when the line is rejected by the gate.
    pub fn extract(line: &'a TextLine, stats: &'a FontStatistics) -> Option<Self> {
        let text = collapse_whitespace(&line.text);
        if text.is_empty() || FORM_FIELD.is_match(&text) || SIGNATURE_KEYWORDS.is_match(&text) {
            return None;
        }

        let structural = matches_structural_pattern(&text);
        if text.ends_with('.') && !structural {
            return None;
        }

        let words = line.word_count();
        Some(Self {
            line,
            stats,
            text,
            words,
            structural,
        })
    }

    fn size(&self) -> f32 {
        self.line.font_size
    }
}

/// One weighted predicate of the heading score.
pub struct ScoringRule {
    /// Stable rule name (used in logs and tests)
    pub name: &'static str,
    /// Added to the score when the predicate holds (negative for penalties)
    pub weight: f32,
    /// The predicate
    pub predicate: fn(&LineFeatures<'_>) -> bool,
}

impl fmt::Debug for ScoringRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScoringRule")
            .field("name", &self.name)
            .field("weight", &self.weight)
            .finish()
    }
}

/// Ordered heading score rules. Size tiers are mutually exclusive.
pub const SCORING_RULES: &[ScoringRule] = &[
    ScoringRule {
        name: "large_font",
        weight: 0.40,
        predicate: |f| f.size() > f.stats.large_heading_threshold,
    },
    ScoringRule {
        name: "heading_font",
        weight: 0.30,
        predicate: |f| {
            f.size() > f.stats.heading_threshold && f.size() <= f.stats.large_heading_threshold
        },
    },
    ScoringRule {
        name: "above_body",
        weight: 0.10,
        predicate: |f| f.size() > f.stats.body_size && f.size() <= f.stats.heading_threshold,
    },
    ScoringRule {
        name: "bold",
        weight: 0.20,
        predicate: |f| f.line.is_bold,
    },
    ScoringRule {
        name: "structural_pattern",
        weight: 0.30,
        predicate: |f| f.structural,
    },
    ScoringRule {
        name: "structural_keyword",
        weight: 0.15,
        predicate: |f| STRUCTURAL_KEYWORDS.is_match(&f.text),
    },
    ScoringRule {
        name: "left_aligned",
        weight: 0.05,
        predicate: |f| f.line.bbox.left() <= LEFT_MARGIN_LIMIT,
    },
    ScoringRule {
        name: "short_line",
        weight: 0.10,
        predicate: |f| f.words <= 8,
    },
    ScoringRule {
        name: "short_all_caps",
        weight: 0.15,
        predicate: |f| f.words <= 8 && is_all_caps(&f.text),
    },
    ScoringRule {
        name: "long_line",
        weight: -0.30,
        predicate: |f| f.words > 15,
    },
    ScoringRule {
        name: "artefact",
        weight: -0.20,
        predicate: |f| ARTEFACTS.is_match(&f.text),
    },
];

/// Whether text matches one of the structural heading patterns
/// (numbered, Roman, lettered, "Chapter N", all-caps).
pub fn matches_structural_pattern(text: &str) -> bool {
    STRUCTURAL_PATTERNS.iter().any(|re| re.is_match(text))
}

/// Sum of the weights of every rule that holds.
pub fn score(features: &LineFeatures<'_>) -> f32 {
    SCORING_RULES
        .iter()
        .filter(|rule| (rule.predicate)(features))
        .map(|rule| rule.weight)
        .sum()
}

/// Names of the rules that hold, in table order.
pub fn fired_rules(features: &LineFeatures<'_>) -> Vec<&'static str> {
    SCORING_RULES
        .iter()
        .filter(|rule| (rule.predicate)(features))
        .map(|rule| rule.name)
        .collect()
}

/// Level assignment policy applied to gated, scored lines.
pub trait HeadingStrategy: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Classify a line, returning `None` when it is not a heading.
    fn classify(&self, line: &TextLine, stats: &FontStatistics) -> Option<Classification>;
}

/// Levels from document σ thresholds: H1 above body+2σ, H2 above body+σ
/// or at 1.5× body, otherwise H3.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatisticalThresholdStrategy;

impl HeadingStrategy for StatisticalThresholdStrategy {
    fn name(&self) -> &'static str {
        "statistical"
    }

    fn classify(&self, line: &TextLine, stats: &FontStatistics) -> Option<Classification> {
        let features = LineFeatures::extract(line, stats)?;
        let total = score(&features);
        if total <= ACCEPTANCE_THRESHOLD {
            return None;
        }

        let level = if line.font_size > stats.large_heading_threshold {
            HeadingLevel::H1
        } else if line.font_size > stats.heading_threshold
            || line.font_size >= stats.body_size * PROMINENT_FONT_RATIO
        {
            HeadingLevel::H2
        } else {
            HeadingLevel::H3
        };

        Some(Classification {
            level,
            confidence: total.clamp(0.0, 1.0),
        })
    }
}

/// H1 whenever the line reaches 90% of the page-1 title font; other accepted
/// lines are H2 when large (1.3× body) or structurally numbered, else H3.
#[derive(Debug, Clone, Copy)]
pub struct TitleRelativeStrategy {
    /// Largest font size observed on page 1
    pub title_font_size: f32,
}

impl TitleRelativeStrategy {
    /// Create a strategy anchored on a title font size.
    pub fn new(title_font_size: f32) -> Self {
        Self { title_font_size }
    }
}

impl HeadingStrategy for TitleRelativeStrategy {
    fn name(&self) -> &'static str {
        "title-relative"
    }

    fn classify(&self, line: &TextLine, stats: &FontStatistics) -> Option<Classification> {
        let features = LineFeatures::extract(line, stats)?;

        if line.font_size >= self.title_font_size * TITLE_FONT_RATIO {
            return Some(Classification {
                level: HeadingLevel::H1,
                confidence: 1.0,
            });
        }

        let total = score(&features);
        if total <= ACCEPTANCE_THRESHOLD {
            return None;
        }

        let level = if line.font_size >= stats.body_size * SECTION_FONT_RATIO || features.structural
        {
            HeadingLevel::H2
        } else {
            HeadingLevel::H3
        };

        Some(Classification {
            level,
            confidence: total.clamp(0.0, 1.0),
        })
    }
}

/// Which heading strategy a document uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StrategyProfile {
    /// Title-relative when page 1 has a distinct title font, else statistical
    #[default]
    Auto,
    /// Always use [`StatisticalThresholdStrategy`]
    Statistical,
    /// Always use [`TitleRelativeStrategy`] (falls back to statistical when
    /// page 1 has no text)
    TitleRelative,
}

impl FromStr for StrategyProfile {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(StrategyProfile::Auto),
            "statistical" => Ok(StrategyProfile::Statistical),
            "title-relative" | "title_relative" | "relative" => Ok(StrategyProfile::TitleRelative),
            other => Err(format!(
                "unknown heading profile '{}' (expected auto, statistical, title-relative)",
                other
            )),
        }
    }
}

/// Pick the strategy for one document.
///
/// # Examples
///
/// ```
/// use outline_oxide::layout::{select_strategy, FontStatistics, StrategyProfile};
///
/// let stats = FontStatistics::from_parts(11.0, 11.5, 1.5);
/// assert_eq!(select_strategy(StrategyProfile::Auto, &stats, Some(20.0)).name(), "title-relative");
/// assert_eq!(select_strategy(StrategyProfile::Auto, &stats, Some(12.0)).name(), "statistical");
/// ```
pub fn select_strategy(
    profile: StrategyProfile,
    stats: &FontStatistics,
    title_font: Option<f32>,
) -> Box<dyn HeadingStrategy> {
    match (profile, title_font) {
        (StrategyProfile::Statistical, _) | (_, None) => Box::new(StatisticalThresholdStrategy),
        (StrategyProfile::TitleRelative, Some(size)) => Box::new(TitleRelativeStrategy::new(size)),
        (StrategyProfile::Auto, Some(size)) => {
            if size > stats.heading_threshold {
                Box::new(TitleRelativeStrategy::new(size))
            } else {
                Box::new(StatisticalThresholdStrategy)
            }
        },
    }
}

/// Span-level heading test used while chunking body text.
///
/// A span qualifies when it is non-blank, emphasized (bold, larger than
/// 1.15× body, or all-caps longer than four characters), shorter than twelve
/// words, and does not end with a period.
pub fn is_likely_heading_span(span: &TextSpan, body_size: f32) -> bool {
    let text = span.text.trim();
    if text.is_empty() {
        return false;
    }

    let is_larger = span.font_size > body_size * SPAN_EMPHASIS_RATIO;
    let is_caps = is_all_caps(text) && text.chars().count() > 4;
    let emphasized = span.is_bold() || is_larger || is_caps;

    emphasized && text.split_whitespace().count() < 12 && !text.ends_with('.')
}
