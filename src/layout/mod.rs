//! Layout model and layout-driven heading analysis.
//!
//! This module provides:
//! - The nested span/line/block/page layout model reported by layout sources
//! - Document-wide font statistics (modal body size, σ thresholds)
//! - Rule-based heading classification with pluggable level strategies

pub mod document_analyzer;
pub mod heading_detector;
pub mod text_block;

// Re-export main types
pub use document_analyzer::{FontStatistics, round_size, title_font_size};
pub use heading_detector::{
    Classification, HeadingLevel, HeadingStrategy, LineFeatures, SCORING_RULES, ScoringRule,
    StatisticalThresholdStrategy, StrategyProfile, TitleRelativeStrategy, is_likely_heading_span,
    matches_structural_pattern, select_strategy,
};
pub use text_block::{
    Bookmark, Color, DocumentLayout, FontFlags, LayoutBlock, LayoutLine, PageLayout, TextLine,
    TextSpan,
};
